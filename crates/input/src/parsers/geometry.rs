// nom parser combinators
use nom::branch::alt;
use nom::character::complete::{char, one_of, space0, u32 as uint32, u8 as uint8};
use nom::combinator::{all_consuming, map, opt};
use nom::multi::many0;
use nom::sequence::{delimited, pair, preceded, tuple};
use nom::IResult;

use crate::core::{Geometry, HalfSpace, Sense};
use crate::error::{Error, Result};

use super::cause;

/// Signed surface reference, optionally to a macrobody facet
fn half_space(i: &str) -> IResult<&str, Geometry> {
    let (i, sign) = opt(one_of("+-"))(i)?;
    let (i, surface) = uint32(i)?;
    let (i, facet) = opt(preceded(char('.'), uint8))(i)?;

    if surface == 0 {
        return Err(cause("surface 0 is not a valid reference"));
    }

    let sense = match sign {
        Some('+') => Sense::Positive,
        Some(_) => Sense::Negative,
        None => Sense::Bare,
    };

    Ok((
        i,
        Geometry::HalfSpace(HalfSpace {
            surface,
            facet,
            sense,
        }),
    ))
}

/// Parenthesised sub-expression
fn group(i: &str) -> IResult<&str, Geometry> {
    delimited(
        pair(char('('), space0),
        union,
        pair(space0, char(')')),
    )(i)
}

/// `#n` or `#(...)`
fn complement(i: &str) -> IResult<&str, Geometry> {
    preceded(
        char('#'),
        alt((
            map(group, |g| Geometry::Complement(Box::new(g))),
            map(uint32, Geometry::CellComplement),
        )),
    )(i)
}

fn factor(i: &str) -> IResult<&str, Geometry> {
    alt((complement, group, half_space))(i)
}

/// Juxtaposed factors, whitespace optional next to parentheses
fn intersection(i: &str) -> IResult<&str, Geometry> {
    let (i, first) = factor(i)?;
    let (i, rest) = many0(preceded(space0, factor))(i)?;
    let mut children = Vec::with_capacity(rest.len() + 1);
    children.push(first);
    children.extend(rest);
    Ok((i, Geometry::intersection(children)))
}

/// Intersections separated by `:`
fn union(i: &str) -> IResult<&str, Geometry> {
    let (i, children) = pair(
        intersection,
        many0(preceded(tuple((space0, char(':'), space0)), intersection)),
    )(i)?;
    let (first, rest) = children;
    let mut all = Vec::with_capacity(rest.len() + 1);
    all.push(first);
    all.extend(rest);
    Ok((i, Geometry::union(all)))
}

/// Parse a complete geometry expression
pub(crate) fn parse_geometry(text: &str) -> Result<Geometry> {
    let mut depth: i32 = 0;
    for c in text.chars() {
        match c {
            '(' => depth += 1,
            ')' => depth -= 1,
            _ => (),
        }
        if depth < 0 {
            return Err(Error::parse(text, "unbalanced ')' in geometry"));
        }
    }
    if depth != 0 {
        return Err(Error::parse(text, "unclosed '(' in geometry"));
    }

    match all_consuming(delimited(space0, union, space0))(text) {
        Ok((_, geometry)) => Ok(geometry),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(Error::parse(
            text,
            format!("unrecognised geometry at \"{}\"", e.input),
        )),
        Err(nom::Err::Incomplete(_)) => Err(Error::parse(text, "incomplete geometry")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hs(surface: u32, sense: Sense) -> Geometry {
        Geometry::HalfSpace(HalfSpace::new(surface, sense))
    }

    #[test]
    fn simple_intersection() {
        let g = parse_geometry("-1 2 +3").unwrap();
        assert_eq!(
            g,
            Geometry::Intersection(vec![
                hs(1, Sense::Negative),
                hs(2, Sense::Bare),
                hs(3, Sense::Positive)
            ])
        );
    }

    #[test]
    fn precedence() {
        // intersection binds tighter than union
        let g = parse_geometry("1 2:3").unwrap();
        assert_eq!(
            g,
            Geometry::Union(vec![
                Geometry::Intersection(vec![hs(1, Sense::Bare), hs(2, Sense::Bare)]),
                hs(3, Sense::Bare)
            ])
        );

        // complement binds tighter than intersection
        let g = parse_geometry("#5 -1").unwrap();
        assert_eq!(
            g,
            Geometry::Intersection(vec![Geometry::CellComplement(5), hs(1, Sense::Negative)])
        );
    }

    #[test]
    fn tight_spacing() {
        assert_eq!(
            parse_geometry("-1(2:-3)").unwrap(),
            parse_geometry("-1 ( 2 : -3 )").unwrap()
        );
        assert_eq!(
            parse_geometry("#(1:2)#3").unwrap(),
            parse_geometry("#( 1 : 2 ) #3").unwrap()
        );
    }

    #[test]
    fn invalid() {
        assert!(parse_geometry("").is_err());
        assert!(parse_geometry("-1 (2").is_err());
        assert!(parse_geometry("-1 2)").is_err());
        assert!(parse_geometry("-1 0").is_err());
        assert!(parse_geometry("-1 : : 2").is_err());
        assert!(parse_geometry("-1 imp:n=1").is_err());
        assert!(parse_geometry("99999999999").is_err());
    }
}
