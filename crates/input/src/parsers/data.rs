//! Data card parsing

use crate::core::DataCard;
use crate::error::{Error, Result};

use super::normalise_equals;

/// Parse the joined text of a data card into its name and raw entries
///
/// Entries are kept as written apart from blanks around `=`, so that typed
/// readers see `key=value` tokens.
pub(crate) fn data_card_from_str(text: &str) -> Result<DataCard> {
    let normalised = normalise_equals(text);
    let mut tokens = normalised.split_whitespace();

    let name = tokens
        .next()
        .ok_or_else(|| Error::parse(text, "empty data card"))?;

    if !super::starts_keyword(name) {
        return Err(Error::parse(text, "data card names start with a letter"));
    }

    Ok(DataCard::new(name, tokens.collect::<Vec<&str>>()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CardKind;

    #[test]
    fn material_card() {
        let card = data_card_from_str("M1 1001.80c 2 8016.80c 1 nlib = 80c").unwrap();
        assert_eq!(card.name, "m1");
        assert_eq!(card.kind(), CardKind::Material(1));
        assert_eq!(card.entries.len(), 5);
        assert_eq!(card.entries[4], "nlib=80c");
    }

    #[test]
    fn named_cards() {
        let card = data_card_from_str("IMP:N 1 2R 0").unwrap();
        assert_eq!(card.name, "imp:n");
        assert_eq!(card.entries, vec!["1", "2R", "0"]);
        assert!(data_card_from_str("1 2 3").is_err());
    }
}
