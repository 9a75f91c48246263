//! Cell card parsing
//!
//! `n m [rho] geometry params` or `n LIKE m BUT params`. The geometry ends
//! at the first token that starts with a letter, which must be a known
//! parameter key.

use log::trace;
use mcdeck_utils::f;

// nom parser combinators
use nom::branch::alt;
use nom::bytes::complete::take_until;
use nom::character::complete::{char, one_of, space0, u32 as uint32};
use nom::combinator::{all_consuming, map, opt};
use nom::multi::many0;
use nom::sequence::{delimited, pair, preceded};
use nom::IResult;

use crate::core::{
    Cell, CellKind, CellTransform, Fill, FillEntry, ParamKey, ParamName, ParamValue, Parameter,
    Transformation,
};
use crate::error::{Error, Result};

use super::{normalise_equals, parse_geometry, parse_int, parse_range, parse_real, starts_keyword};

/// Parse the joined text of a cell card
pub(crate) fn cell_from_str(text: &str) -> Result<Cell> {
    let normalised = normalise_equals(text);
    let tokens: Vec<&str> = normalised.split_whitespace().collect();

    let number = match tokens.first().and_then(|t| parse_int::<u32>(t)) {
        Some(n) if n > 0 => n,
        _ => return Err(Error::parse(text, "cell number must be a positive integer")),
    };

    let second = tokens
        .get(1)
        .ok_or_else(|| Error::parse(text, "missing material number"))?;

    if second.eq_ignore_ascii_case("like") {
        let base = tokens
            .get(2)
            .and_then(|t| parse_int::<u32>(t))
            .ok_or_else(|| Error::parse(text, "LIKE must name a cell number"))?;
        match tokens.get(3) {
            Some(t) if t.eq_ignore_ascii_case("but") => (),
            _ => return Err(Error::parse(text, "expected BUT after LIKE n")),
        }
        let parameters = parameters_from_tokens(&tokens[4..], true)?;
        trace!("cell {number} like {base} with {} parameters", parameters.len());
        return Ok(Cell {
            number,
            kind: CellKind::Like { base },
            parameters,
            origin: None,
        });
    }

    let material = parse_int::<u32>(second)
        .ok_or_else(|| Error::parse(text, f!("invalid material number \"{second}\"")))?;

    let (density, start) = match material {
        0 => (None, 2),
        _ => {
            let rho = tokens
                .get(2)
                .and_then(|t| parse_real(t))
                .ok_or_else(|| Error::parse(text, f!("material {material} needs a density")))?;
            (Some(rho), 3)
        }
    };

    let rest = tokens.get(start..).unwrap_or_default();
    let split = rest
        .iter()
        .position(|t| starts_keyword(t))
        .unwrap_or(rest.len());
    let (geometry_tokens, parameter_tokens) = rest.split_at(split);

    if geometry_tokens.is_empty() {
        return Err(Error::parse(text, "cell has no geometry"));
    }
    let geometry = parse_geometry(&geometry_tokens.join(" "))?;
    let parameters = parameters_from_tokens(parameter_tokens, false)?;

    trace!(
        "cell {number}: material {material}, {} surfaces, {} parameters",
        geometry.referenced_surfaces().len(),
        parameters.len()
    );

    Ok(Cell {
        number,
        kind: CellKind::Explicit {
            material,
            density,
            geometry,
        },
        parameters,
        origin: None,
    })
}

/// Group tokens into parameters, each running until the next key
fn parameters_from_tokens(tokens: &[&str], like: bool) -> Result<Vec<Parameter>> {
    let mut grouped: Vec<(ParamKey, Vec<&str>)> = Vec::new();

    for token in tokens {
        let (name, value) = match token.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (*token, None),
        };

        let key = match starts_keyword(token) {
            true => Some(name.parse::<ParamKey>()),
            false => None,
        };

        match key {
            Some(Ok(key)) => {
                if grouped.iter().any(|(k, _)| *k == key) {
                    return Err(Error::parse(*token, f!("{key} given more than once")));
                }
                if key.name.like_only() && !like {
                    return Err(Error::parse(
                        *token,
                        f!("{key} is only allowed after LIKE n BUT"),
                    ));
                }
                let values = match value {
                    Some("") | None => Vec::new(),
                    Some(v) => vec![v],
                };
                grouped.push((key, values));
            }
            // an explicit `key=` must name a real parameter
            Some(Err(e)) if value.is_some() || grouped.is_empty() => return Err(e),
            // otherwise a value that starts with a letter, e.g. EXT:N S
            _ => match grouped.last_mut() {
                Some((_, values)) => values.push(token),
                None => return Err(Error::parse(*token, "value given before any parameter key")),
            },
        }
    }

    grouped
        .into_iter()
        .map(|(key, values)| {
            let value = value_from_tokens(&key, &values)?;
            Ok(Parameter { key, value })
        })
        .collect()
}

/// Interpret the value tokens of a parameter according to its name
fn value_from_tokens(key: &ParamKey, tokens: &[&str]) -> Result<ParamValue> {
    let text = tokens.join(" ");
    if tokens.is_empty() {
        return Err(Error::parse(key.to_string(), "parameter has no value"));
    }

    let single = match tokens {
        [one] => Some(*one),
        _ => None,
    };

    match key.name {
        ParamName::Fill => Ok(ParamValue::Fill(fill_from_str(&text)?)),
        ParamName::Trcl => Ok(ParamValue::Transform(cell_transform_from_str(&text)?)),
        ParamName::U | ParamName::Lat | ParamName::Mat => single
            .and_then(|t| parse_int::<i64>(t))
            .map(ParamValue::Integer)
            .ok_or_else(|| Error::parse(f!("{key}={text}"), "expected a single integer")),
        ParamName::Imp | ParamName::Rho | ParamName::Vol => single
            .and_then(|t| parse_real(t))
            .map(ParamValue::Real)
            .ok_or_else(|| Error::parse(f!("{key}={text}"), "expected a single number")),
        _ => match single.and_then(|t| parse_real(t)) {
            Some(value) => Ok(ParamValue::Real(value)),
            None => Ok(ParamValue::Entries(
                tokens.iter().map(|t| t.to_string()).collect(),
            )),
        },
    }
}

/// Parse a transformation given as `n`, `(n)`, or `(v1 v2 ...)`
pub(crate) fn cell_transform_from_str(text: &str) -> Result<CellTransform> {
    let inner = text.trim();
    let inner = inner
        .strip_prefix('(')
        .and_then(|t| t.strip_suffix(')'))
        .unwrap_or(inner);

    let tokens: Vec<&str> = inner.split_whitespace().collect();
    if let [one] = tokens.as_slice() {
        if let Some(n) = parse_int::<u32>(one) {
            return Ok(CellTransform::Number(n));
        }
    }

    let values = tokens
        .iter()
        .map(|t| parse_real(t).ok_or_else(|| Error::parse(text, f!("invalid transformation value \"{t}\""))))
        .collect::<Result<Vec<f64>>>()?;

    // checked now so that a bad inline transformation skips the card
    Transformation::from_values(0, false, &values)?;
    Ok(CellTransform::Inline(values))
}

/// A parenthesised transformation inside a fill
fn fill_transform(i: &str) -> IResult<&str, &str> {
    delimited(char('('), take_until(")"), char(')'))(i)
}

/// Fill array entry before its transformation is interpreted
enum RawEntry<'a> {
    Universe(u32),
    Repeat(u32),
    Transform(&'a str),
}

fn fill_entry(i: &str) -> IResult<&str, RawEntry<'_>> {
    alt((
        map(fill_transform, RawEntry::Transform),
        map(pair(opt(uint32), one_of("rR")), |(n, _)| {
            RawEntry::Repeat(n.unwrap_or(1))
        }),
        map(uint32, RawEntry::Universe),
    ))(i)
}

fn fill_entries(i: &str) -> IResult<&str, Vec<RawEntry<'_>>> {
    all_consuming(many0(preceded(space0, fill_entry)))(i)
}

fn single_fill(i: &str) -> IResult<&str, (u32, Option<&str>)> {
    all_consuming(pair(uint32, opt(preceded(space0, fill_transform))))(i)
}

/// Parse a `FILL` value, either a single universe or a lattice array
///
/// The array form is recognised by its leading `a:b` range, so the three
/// ranges and the universe list are read by position rather than guessed.
pub(crate) fn fill_from_str(text: &str) -> Result<Fill> {
    let tokens: Vec<&str> = text.split_whitespace().collect();

    if tokens.first().and_then(|t| parse_range(t)).is_some() {
        let mut ranges = [(0, 0); 3];
        for (i, range) in ranges.iter_mut().enumerate() {
            *range = tokens
                .get(i)
                .and_then(|t| parse_range(t))
                .ok_or_else(|| Error::parse(text, "a fill array needs three ranges"))?;
        }

        let rest = tokens[3..].join(" ");
        let (_, raw) = fill_entries(&rest).map_err(|_| Error::parse(text, "invalid fill array"))?;
        let entries = raw
            .into_iter()
            .map(|entry| match entry {
                RawEntry::Universe(u) => Ok(FillEntry::Universe(u)),
                RawEntry::Repeat(n) => Ok(FillEntry::Repeat(n)),
                RawEntry::Transform(t) => cell_transform_from_str(t).map(FillEntry::Transform),
            })
            .collect::<Result<Vec<FillEntry>>>()?;
        return Ok(Fill::Array { ranges, entries });
    }

    let (_, (universe, transform)) =
        single_fill(text.trim()).map_err(|_| Error::parse(text, "expected a universe number"))?;
    let transform = match transform {
        Some(t) => Some(cell_transform_from_str(t)?),
        None => None,
    };
    Ok(Fill::Universe {
        universe,
        transform,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Geometry, Particle};

    #[test]
    fn simple_cell() {
        let cell = cell_from_str("10 0 -1 imp:n=1").unwrap();
        assert_eq!(cell.number, 10);
        assert_eq!(cell.material(), Some(0));
        assert_eq!(cell.density(), None);
        assert_eq!(cell.geometry(), Some(&"-1".parse::<Geometry>().unwrap()));
        assert_eq!(cell.importance(Particle::Neutron), Some(1.0));
    }

    #[test]
    fn material_cell() {
        let cell = cell_from_str("2 3 -7.8 -1 2 (3:-4) u=5 vol=10").unwrap();
        assert_eq!(cell.material(), Some(3));
        assert_eq!(cell.density(), Some(-7.8));
        assert_eq!(cell.universe(), 5);
        assert_eq!(cell.referenced_surfaces_of_boundary().len(), 4);
        assert!(cell_from_str("2 3 -1 2").is_ok());
        assert!(cell_from_str("2 3 imp:n=1").is_err());
    }

    #[test]
    fn spaced_equals_and_missing_equals() {
        let a = cell_from_str("1 0 -1 imp:n = 1 u 2").unwrap();
        let b = cell_from_str("1 0 -1 imp:n=1 u=2").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn lattice_fill_array() {
        let cell = cell_from_str("5 0 -1 2 -3 4 u=1 lat=1 fill=-1:1 -1:1 0:0 7 2R 7 4R").unwrap();
        let fill = cell.fill().unwrap();
        assert_eq!(fill.expected_len(), Some(9));
        assert_eq!(fill.expanded(), vec![7; 8]);
        // array entries never leak into the boundary
        let surfaces: Vec<u32> = cell.referenced_surfaces_of_boundary().into_iter().collect();
        assert_eq!(surfaces, vec![1, 2, 3, 4]);
    }

    #[test]
    fn fill_with_transformation() {
        let cell = cell_from_str("5 0 -1 fill=2 (1)").unwrap();
        assert_eq!(
            cell.fill(),
            Some(&Fill::Universe {
                universe: 2,
                transform: Some(CellTransform::Number(1))
            })
        );

        let fill = fill_from_str("0:1 0:0 0:0 1 (0 0 1) 2").unwrap();
        assert_eq!(fill.expanded(), vec![1, 2]);
        let Fill::Array { entries, .. } = fill else {
            panic!("expected an array")
        };
        assert_eq!(entries[1], FillEntry::Transform(CellTransform::Inline(vec![0.0, 0.0, 1.0])));
    }

    #[test]
    fn like_but() {
        let cell = cell_from_str("20 like 10 but mat=2 rho=-1.0 trcl=(1 0 0)").unwrap();
        assert_eq!(cell.like_base(), Some(10));
        assert_eq!(cell.material(), Some(2));
        assert_eq!(cell.density(), Some(-1.0));
        assert!(cell.transform().is_some());
        assert!(cell_from_str("20 0 -1 mat=2").is_err());
        assert!(cell_from_str("20 like 10 mat=2").is_err());
    }

    #[test]
    fn rejected_cards() {
        assert!(cell_from_str("0 0 -1").is_err());
        assert!(cell_from_str("1 0").is_err());
        assert!(cell_from_str("1 0 -1 colour=red").is_err());
        assert!(cell_from_str("1 0 -1 u=1 u=2").is_err());
        assert!(cell_from_str("1 0 -1 u=a").is_err());
        assert!(cell_from_str("1 0 -1 trcl=(1 2)").is_err());
    }
}
