// All parsers split among files for organisation
mod cell;
mod data;
mod geometry;
mod number;
mod surface;
mod zaid;

// Internal re-exports for convenience
pub(crate) use cell::*;
pub(crate) use data::*;
pub(crate) use geometry::*;
pub(crate) use surface::*;
pub(crate) use zaid::*;

pub use number::{parse_int, parse_real};
pub(crate) use number::parse_range;

/// More convenient error creation for nom
use nom::error::{Error, ErrorKind};
pub(in crate::parsers) fn cause(s: &str) -> nom::Err<Error<&str>> {
    nom::Err::Error(Error::new(s, ErrorKind::Fail))
}

/// Remove blanks either side of every `=`
///
/// The format allows `IMP:N = 1` as well as `IMP:N=1`.
pub(crate) fn normalise_equals(text: &str) -> String {
    let mut normalised = String::with_capacity(text.len());
    let mut skipping = false;
    for c in text.chars() {
        if c == '=' {
            let trimmed = normalised.trim_end().len();
            normalised.truncate(trimmed);
            normalised.push('=');
            skipping = true;
        } else if skipping && c.is_whitespace() {
            continue;
        } else {
            skipping = false;
            normalised.push(c);
        }
    }
    normalised
}

/// True for a token that starts with a letter, optionally after a `*`
pub(crate) fn starts_keyword(token: &str) -> bool {
    let token = token.strip_prefix('*').unwrap_or(token);
    token.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equals_normalisation() {
        assert_eq!(normalise_equals("imp:n = 1"), "imp:n=1");
        assert_eq!(normalise_equals("u =2  fill= 3"), "u=2  fill=3");
        assert_eq!(normalise_equals("no equals"), "no equals");
    }

    #[test]
    fn keywords() {
        assert!(starts_keyword("imp:n=1"));
        assert!(starts_keyword("*trcl"));
        assert!(!starts_keyword("-1"));
        assert!(!starts_keyword("#3"));
        assert!(!starts_keyword("*"));
    }
}
