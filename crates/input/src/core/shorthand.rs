//! Repeat, interpolate, multiply, and jump shorthand for numeric entries
//!
//! | Form    | Meaning                                            |
//! | ------- | -------------------------------------------------- |
//! | `nR`    | repeat the previous entry n more times             |
//! | `nI`    | n linearly interpolated entries between neighbours |
//! | `nILOG` | n log interpolated entries between neighbours      |
//! | `xM`    | previous entry multiplied by x                     |
//! | `nJ`    | skip n entries, leaving the default in place       |
//!
//! `R`, `I`, `ILOG`, and `J` with no count mean a count of one. An entry
//! list never expands past [MAX_EXPANDED_ENTRIES] values.

use mcdeck_utils::f;

use crate::error::{Error, Result};
use crate::parsers::{parse_int, parse_real};

/// Most values an entry list may expand to
pub const MAX_EXPANDED_ENTRIES: usize = 1 << 24;

/// Check that `n` more values still fit, returning `n`
pub(crate) fn room_for(len: usize, n: usize, token: String) -> Result<usize> {
    match len.checked_add(n) {
        Some(total) if total <= MAX_EXPANDED_ENTRIES => Ok(n),
        _ => Err(Error::parse(token, "expands to too many entries")),
    }
}

/// One token of a shorthand entry list
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shorthand {
    Value(f64),
    Repeat(usize),
    Interpolate(usize),
    LogInterpolate(usize),
    Multiply(f64),
    Jump(usize),
}

impl Shorthand {
    /// Classify a single token
    ///
    /// ```rust
    /// # use mcdeck_input::Shorthand;
    /// assert_eq!(Shorthand::parse("2r"), Some(Shorthand::Repeat(2)));
    /// assert_eq!(Shorthand::parse("J"), Some(Shorthand::Jump(1)));
    /// assert_eq!(Shorthand::parse("0.5m"), Some(Shorthand::Multiply(0.5)));
    /// assert_eq!(Shorthand::parse("1e-3"), Some(Shorthand::Value(1e-3)));
    /// assert_eq!(Shorthand::parse("lwtr"), None);
    /// ```
    pub fn parse(token: &str) -> Option<Self> {
        if let Some(value) = parse_real(token) {
            return Some(Self::Value(value));
        }

        let lower = token.to_lowercase();
        let count = |prefix: &str| -> Option<usize> {
            match prefix {
                "" => Some(1),
                n => parse_int::<usize>(n),
            }
        };

        if let Some(prefix) = lower.strip_suffix("ilog").or_else(|| lower.strip_suffix("log")) {
            return count(prefix).map(Self::LogInterpolate);
        }

        let mut chars = lower.chars();
        let last = chars.next_back()?;
        let prefix = chars.as_str();
        match last {
            'r' => count(prefix).map(Self::Repeat),
            'i' => count(prefix).map(Self::Interpolate),
            'j' => count(prefix).map(Self::Jump),
            'm' => parse_real(prefix).map(Self::Multiply),
            _ => None,
        }
    }
}

/// Expand an entry list into values, `None` where a jump leaves a default
///
/// ```rust
/// # use mcdeck_input::expand_shorthand;
/// let entries = ["1", "2r", "0", "2j", "4"];
/// assert_eq!(
///     expand_shorthand(&entries).unwrap(),
///     vec![Some(1.0), Some(1.0), Some(1.0), Some(0.0), None, None, Some(4.0)]
/// );
///
/// let entries = ["1", "2i", "4"];
/// assert_eq!(
///     expand_shorthand(&entries).unwrap(),
///     vec![Some(1.0), Some(2.0), Some(3.0), Some(4.0)]
/// );
/// ```
pub fn expand_shorthand<S: AsRef<str>>(entries: &[S]) -> Result<Vec<Option<f64>>> {
    let tokens = entries
        .iter()
        .map(|e| {
            let e = e.as_ref();
            Shorthand::parse(e).ok_or_else(|| Error::parse(e, "not a number or shorthand"))
        })
        .collect::<Result<Vec<Shorthand>>>()?;

    let mut values: Vec<Option<f64>> = Vec::with_capacity(tokens.len());
    for (i, token) in tokens.iter().enumerate() {
        match *token {
            Shorthand::Value(v) => values.push(Some(v)),
            Shorthand::Jump(n) => {
                let n = room_for(values.len(), n, f!("{n}j"))?;
                values.extend(std::iter::repeat(None).take(n))
            }
            Shorthand::Repeat(n) => {
                let last = *values
                    .last()
                    .ok_or_else(|| Error::parse(f!("{n}r"), "nothing to repeat"))?;
                let n = room_for(values.len(), n, f!("{n}r"))?;
                values.extend(std::iter::repeat(last).take(n));
            }
            Shorthand::Multiply(x) => {
                let last = values
                    .last()
                    .copied()
                    .flatten()
                    .ok_or_else(|| Error::parse(f!("{x}m"), "nothing to multiply"))?;
                values.push(Some(last * x));
            }
            Shorthand::Interpolate(n) | Shorthand::LogInterpolate(n) => {
                let start = values.last().copied().flatten();
                let end = match tokens.get(i + 1) {
                    Some(Shorthand::Value(v)) => Some(*v),
                    _ => None,
                };
                let (Some(a), Some(b)) = (start, end) else {
                    return Err(Error::parse(
                        f!("{n}i"),
                        "interpolation needs a value on both sides",
                    ));
                };
                let n = room_for(values.len(), n, f!("{n}i"))?;
                let log = matches!(token, Shorthand::LogInterpolate(_));
                if log && (a <= 0.0 || b <= 0.0) {
                    return Err(Error::parse(f!("{n}ilog"), "log interpolation of non-positive values"));
                }
                let steps = (n + 1) as f64;
                for k in 1..=n {
                    let t = k as f64 / steps;
                    let value = match log {
                        true => (a.ln() + t * (b.ln() - a.ln())).exp(),
                        false => a + t * (b - a),
                    };
                    values.push(Some(value));
                }
            }
        }
    }

    Ok(values)
}
