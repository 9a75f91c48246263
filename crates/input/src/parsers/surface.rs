//! Surface card parsing

use log::warn;
use mcdeck_utils::f;

use crate::core::{Boundary, Surface, SurfaceKind};
use crate::error::{Error, Result};

use super::{parse_int, parse_real};

/// Parse the joined text of a surface card
///
/// `[*|+]n [tr] mnemonic p1 p2 ...`. Parameters are read up to the first
/// token that is not a number. Anything after that is kept as written.
pub(crate) fn surface_from_str(text: &str) -> Result<Surface> {
    let mut tokens = text.split_whitespace();

    let first = tokens
        .next()
        .ok_or_else(|| Error::parse(text, "empty surface card"))?;

    let (boundary, digits) = match first.chars().next() {
        Some('*') => (Boundary::Reflecting, &first[1..]),
        Some('+') => (Boundary::White, &first[1..]),
        _ => (Boundary::Ordinary, first),
    };

    let number = match parse_int::<u32>(digits) {
        Some(n) if n > 0 => n,
        _ => {
            return Err(Error::parse(
                text,
                f!("invalid surface number \"{first}\""),
            ))
        }
    };

    let second = tokens
        .next()
        .ok_or_else(|| Error::parse(text, "missing surface mnemonic"))?;

    let (transform, mnemonic) = match parse_int::<i32>(second) {
        Some(tr) => {
            let mnemonic = tokens
                .next()
                .ok_or_else(|| Error::parse(text, "missing surface mnemonic"))?;
            (Some(tr), mnemonic)
        }
        None => (None, second),
    };

    let kind = mnemonic.parse::<SurfaceKind>()?;

    let mut parameters = Vec::new();
    let mut trailing = Vec::new();
    for token in tokens {
        match (trailing.is_empty(), parse_real(token)) {
            (true, Some(value)) => parameters.push(value),
            _ => trailing.push(token.to_string()),
        }
    }

    if !trailing.is_empty() {
        warn!(
            "surface {number}: kept {} unrecognised trailing token(s) \"{}\"",
            trailing.len(),
            trailing.join(" ")
        );
    }

    Ok(Surface {
        number,
        boundary,
        transform,
        kind,
        parameters,
        trailing,
        origin: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordinary_surface() {
        let surface = surface_from_str("1 so 10.5").unwrap();
        assert_eq!(surface.number, 1);
        assert_eq!(surface.boundary, Boundary::Ordinary);
        assert_eq!(surface.transform, None);
        assert_eq!(surface.kind, SurfaceKind::So);
        assert_eq!(surface.parameters, vec![10.5]);
    }

    #[test]
    fn prefixes_and_transforms() {
        let surface = surface_from_str("*2 3 PZ 1e2").unwrap();
        assert_eq!(surface.boundary, Boundary::Reflecting);
        assert_eq!(surface.transform, Some(3));
        assert_eq!(surface.kind, SurfaceKind::Pz);

        let surface = surface_from_str("+3 -4 px 0").unwrap();
        assert_eq!(surface.boundary, Boundary::White);
        assert_eq!(surface.transform, Some(-4));
    }

    #[test]
    fn wrong_counts_are_kept() {
        // counts are checked by validation, not while reading
        let surface = surface_from_str("4 rpp 0 1 0 1 0").unwrap();
        assert!(!surface.has_valid_parameters());
    }

    #[test]
    fn trailing_tokens() {
        let surface = surface_from_str("5 cz 1.0 extra 2").unwrap();
        assert_eq!(surface.parameters, vec![1.0]);
        assert_eq!(surface.trailing, vec!["extra".to_string(), "2".into()]);
        assert_eq!(surface.to_string(), "5 cz 1 extra 2");
    }

    #[test]
    fn rejected_cards() {
        assert!(surface_from_str("0 so 1").is_err());
        assert!(surface_from_str("a so 1").is_err());
        assert!(surface_from_str("1 torus 1").is_err());
        assert!(surface_from_str("1 2").is_err());
    }
}
