//! Isotope identifier combinators

use crate::core::{Nuclide, Zaid};
use mcdeck_utils::StringExt;

// nom parser combinators
use nom::branch::alt;
use nom::bytes::complete::take_while_m_n;
use nom::character::complete::{alpha1, alphanumeric1, char, digit1};
use nom::combinator::{all_consuming, opt};
use nom::sequence::preceded;
use nom::IResult;

use super::cause;

/// Parse a complete identifier, either `ZZZAAA[.lib]` or `Sy[-]A[.lib]`
///
/// Returns `None` for anything that is neither form.
pub(crate) fn zaid_from_str(i: &str) -> Option<Zaid> {
    all_consuming(zaid)(i.trim()).ok().map(|(_, z)| z)
}

fn zaid(i: &str) -> IResult<&str, Zaid> {
    let (i, nuclide) = alt((za_number, symbol))(i)?;
    let (i, library) = opt(preceded(char('.'), alphanumeric1))(i)?;
    Ok((
        i,
        Zaid {
            nuclide,
            library: library.map(|l| l.to_lowercase()),
        },
    ))
}

/// `1001`, `92235`, `6000`
fn za_number(i: &str) -> IResult<&str, Nuclide> {
    let (i, digits) = take_while_m_n(4, 6, |c: char| c.is_ascii_digit())(i)?;
    let za = digits.parse::<u32>().map_err(|_| cause("invalid ZZZAAA number"))?;
    let z = za / 1000;
    if z == 0 {
        return Err(cause("atomic number must be at least 1"));
    }
    Ok((
        i,
        Nuclide::Za {
            z: z as u8,
            a: (za % 1000) as u16,
        },
    ))
}

/// `H1`, `fe-56`, `C`
fn symbol(i: &str) -> IResult<&str, Nuclide> {
    let (i, element) = alpha1(i)?;
    if element.len() > 2 {
        return Err(cause("element symbols have at most two letters"));
    }
    let (i, _) = opt(char('-'))(i)?;
    let (i, a) = opt(digit1)(i)?;
    let a = match a {
        Some(digits) => Some(
            digits
                .parse::<u16>()
                .map_err(|_| cause("invalid mass number"))?,
        ),
        None => None,
    };
    Ok((
        i,
        Nuclide::Symbol {
            symbol: element.capitalise(),
            a,
        },
    ))
}
