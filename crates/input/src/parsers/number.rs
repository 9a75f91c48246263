// nom parser combinators
use nom::branch::alt;
use nom::character::complete::{char, digit0, digit1, i32 as int32, one_of, space0};
use nom::combinator::{all_consuming, opt, recognize};
use nom::sequence::{pair, preceded, separated_pair, tuple};
use nom::IResult;

use super::cause;

/// Mantissa of a real, `1`, `1.`, `1.5`, or `.5`
fn mantissa(i: &str) -> IResult<&str, &str> {
    alt((
        recognize(pair(digit1, opt(pair(char('.'), digit0)))),
        recognize(pair(char('.'), digit1)),
    ))(i)
}

/// Exponent with an explicit marker, `e-3`, `E+05`, `d2`
fn marked_exponent(i: &str) -> IResult<&str, &str> {
    preceded(one_of("eEdD"), recognize(pair(opt(one_of("+-")), digit1)))(i)
}

/// Fortran style exponent with the marker omitted, `-3` in `1.5-3`
fn bare_exponent(i: &str) -> IResult<&str, &str> {
    recognize(pair(one_of("+-"), digit1))(i)
}

/// Real number in any of the forms accepted by the card format
///
/// The Fortran shorthand `1.5-3` is only recognised when the mantissa has a
/// decimal point, so that `1-3` never becomes a number.
pub(crate) fn real(i: &str) -> IResult<&str, f64> {
    let (i, sign) = opt(one_of("+-"))(i)?;
    let (i, m) = mantissa(i)?;
    let (i, exponent) = match m.contains('.') {
        true => opt(alt((marked_exponent, bare_exponent)))(i)?,
        false => opt(marked_exponent)(i)?,
    };

    let mut text = String::with_capacity(m.len() + 6);
    if let Some(s) = sign {
        text.push(s);
    }
    text.push_str(m);
    if let Some(e) = exponent {
        text.push('e');
        text.push_str(e);
    }

    match text.parse::<f64>() {
        Ok(value) => Ok((i, value)),
        Err(_) => Err(cause("not a valid real number")),
    }
}

/// Inclusive integer range `a:b`, used by lattice fill arrays
pub(crate) fn range(i: &str) -> IResult<&str, (i32, i32)> {
    separated_pair(int32, tuple((space0, char(':'), space0)), int32)(i)
}

/// Parse a complete token as a real number
///
/// ```rust
/// # use mcdeck_input::parse_real;
/// assert_eq!(parse_real("1.0"), Some(1.0));
/// assert_eq!(parse_real("-2.5e-3"), Some(-2.5e-3));
/// assert_eq!(parse_real("1.5-3"), Some(1.5e-3));
/// assert_eq!(parse_real(".5"), Some(0.5));
/// assert_eq!(parse_real("so"), None);
/// assert_eq!(parse_real("1-3"), None);
/// ```
pub fn parse_real(token: &str) -> Option<f64> {
    all_consuming(real)(token).ok().map(|(_, v)| v)
}

/// Parse a complete token as an integer of any type
///
/// ```rust
/// # use mcdeck_input::parse_int;
/// assert_eq!(parse_int::<u32>("10"), Some(10));
/// assert_eq!(parse_int::<i32>("-3"), Some(-3));
/// assert_eq!(parse_int::<u32>("1.0"), None);
/// ```
pub fn parse_int<T: std::str::FromStr>(token: &str) -> Option<T> {
    token.parse::<T>().ok()
}

/// Parse a complete token as a range `a:b`
pub(crate) fn parse_range(token: &str) -> Option<(i32, i32)> {
    all_consuming(range)(token).ok().map(|(_, r)| r)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reals() {
        assert_eq!(parse_real("1"), Some(1.0));
        assert_eq!(parse_real("+1."), Some(1.0));
        assert_eq!(parse_real("1e3"), Some(1000.0));
        assert_eq!(parse_real("1.0D2"), Some(100.0));
        assert_eq!(parse_real("2.5+2"), Some(250.0));
        assert_eq!(parse_real("inf"), None);
        assert_eq!(parse_real("nan"), None);
        assert_eq!(parse_real("1e"), None);
        assert_eq!(parse_real(""), None);
    }

    #[test]
    fn partial_real() {
        let (rest, value) = real("0.5 1").unwrap();
        assert_eq!(value, 0.5);
        assert_eq!(rest, " 1");
    }

    #[test]
    fn ranges() {
        assert_eq!(parse_range("-1:1"), Some((-1, 1)));
        assert_eq!(parse_range("0:0"), Some((0, 0)));
        assert_eq!(parse_range("0"), None);
        assert_eq!(parse_range("1:a"), None);
    }
}
