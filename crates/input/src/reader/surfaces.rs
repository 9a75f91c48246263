// internal
use super::cells::reason;
use super::{origin, Reader};
use crate::core::{Block, Namespace};
use crate::error::Error;
use crate::lexer::RawCard;
use crate::parsers::surface_from_str;

// external
use log::{debug, trace};

impl Reader {
    pub(super) fn read_surfaces(&mut self, cards: &[RawCard]) {
        debug!("-----------------------");
        debug!(" Reading surface cards ");
        debug!("-----------------------");

        for card in cards {
            let mut surface = match surface_from_str(&card.text) {
                Ok(surface) => surface,
                Err(e) => {
                    self.skip(card, Block::Surfaces, reason(e));
                    continue;
                }
            };
            surface.origin = origin(card);
            trace!("line {}: surface {} {}", card.line, surface.number, surface.kind);

            match self.document.insert_surface(surface) {
                Ok(()) => (),
                Err(Error::DuplicateSurface(n)) => {
                    self.duplicate(card, Namespace::Surface, n.to_string())
                }
                Err(e) => self.skip(card, Block::Surfaces, e.to_string()),
            }
        }

        debug!("Surfaces : {}", self.document.surfaces.len());
    }
}
