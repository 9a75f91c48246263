// internal
use super::cells::reason;
use super::{origin, Reader};
use crate::core::{Block, CardKind, Namespace};
use crate::error::Error;
use crate::lexer::RawCard;
use crate::parsers::data_card_from_str;

// external
use log::{debug, trace};

impl Reader {
    pub(super) fn read_data(&mut self, cards: &[RawCard]) {
        debug!("--------------------");
        debug!(" Reading data cards ");
        debug!("--------------------");

        for card in cards {
            let mut data = match data_card_from_str(&card.text) {
                Ok(data) => data,
                Err(e) => {
                    self.skip(card, Block::Data, reason(e));
                    continue;
                }
            };
            data.origin = origin(card);
            trace!("line {}: data card {}", card.line, data.name);

            let (namespace, id) = match data.kind() {
                CardKind::Material(n) => (Namespace::Material, n.to_string()),
                CardKind::Transform { number, .. } => {
                    (Namespace::Transformation, number.to_string())
                }
                _ => (Namespace::DataCard, data.name.clone()),
            };

            match self.document.insert_data_card(data) {
                Ok(()) => (),
                Err(Error::DuplicateDataCard(_)) => self.duplicate(card, namespace, id),
                Err(e) => self.skip(card, Block::Data, e.to_string()),
            }
        }

        debug!("Data cards : {}", self.document.data_cards.len());
    }
}
