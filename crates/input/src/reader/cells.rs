// internal
use super::{origin, Reader};
use crate::core::{Block, Namespace};
use crate::error::Error;
use crate::lexer::RawCard;
use crate::parsers::cell_from_str;

// external
use log::{debug, trace};

impl Reader {
    pub(super) fn read_cells(&mut self, cards: &[RawCard]) {
        debug!("--------------------");
        debug!(" Reading cell cards ");
        debug!("--------------------");

        for card in cards {
            let mut cell = match cell_from_str(&card.text) {
                Ok(cell) => cell,
                Err(e) => {
                    self.skip(card, Block::Cells, reason(e));
                    continue;
                }
            };
            cell.origin = origin(card);
            trace!("line {}: cell {}", card.line, cell.number);

            match self.document.insert_cell(cell) {
                Ok(()) => (),
                Err(Error::DuplicateCell(n)) => self.duplicate(card, Namespace::Cell, n.to_string()),
                Err(e) => self.skip(card, Block::Cells, e.to_string()),
            }
        }

        debug!("Cells : {}", self.document.cells.len());
    }
}

/// Reason for a parse failure without repeating the card text
pub(super) fn reason(error: Error) -> String {
    match error {
        Error::ParseError { reason, .. } => reason,
        other => other.to_string(),
    }
}
