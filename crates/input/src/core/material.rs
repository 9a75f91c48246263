//! Material and thermal scattering cards

use itertools::Itertools;
use mcdeck_utils::f;

use super::{CardKind, DataCard};
use crate::error::{Error, Result};
use crate::parsers::{parse_real, zaid_from_str};

/// Nuclide part of an isotope identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Nuclide {
    /// `ZZZAAA`, with `A = 0` for natural elements
    Za { z: u8, a: u16 },
    /// Element symbol with an optional mass number, e.g. `H1` or `Fe`
    Symbol { symbol: String, a: Option<u16> },
}

impl Nuclide {
    /// Atomic number when given explicitly
    ///
    /// Symbol forms need an element table to resolve.
    pub fn z(&self) -> Option<u8> {
        match self {
            Self::Za { z, .. } => Some(*z),
            Self::Symbol { .. } => None,
        }
    }

    /// Mass number, `None` for natural elements
    pub fn a(&self) -> Option<u16> {
        match self {
            Self::Za { a: 0, .. } => None,
            Self::Za { a, .. } => Some(*a),
            Self::Symbol { a, .. } => *a,
        }
    }
}

/// Isotope identifier of a material component
///
/// ```rust
/// # use mcdeck_input::{Nuclide, Zaid};
/// let zaid: Zaid = "1001.80c".parse().unwrap();
/// assert_eq!(zaid.nuclide, Nuclide::Za { z: 1, a: 1 });
/// assert_eq!(zaid.library.as_deref(), Some("80c"));
/// assert_eq!(zaid.to_string(), "1001.80c");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Zaid {
    pub nuclide: Nuclide,
    /// Library suffix without the `.`, lower case
    pub library: Option<String>,
}

impl std::str::FromStr for Zaid {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        zaid_from_str(s).ok_or_else(|| Error::parse(s, "expected ZZZAAA.lib or element symbol"))
    }
}

impl std::fmt::Display for Zaid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.nuclide {
            Nuclide::Za { z, a } => write!(f, "{}", u32::from(*z) * 1000 + u32::from(*a))?,
            Nuclide::Symbol { symbol, a } => {
                write!(f, "{symbol}")?;
                if let Some(a) = a {
                    write!(f, "-{a}")?;
                }
            }
        }
        if let Some(lib) = &self.library {
            write!(f, ".{lib}")?;
        }
        Ok(())
    }
}

/// One `identifier fraction` pair
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    /// Identifier as written
    pub identifier: String,
    /// Positive for atom fractions, negative for mass fractions
    pub fraction: f64,
}

impl Component {
    /// Parsed identifier, `None` if it is not a recognisable form
    pub fn zaid(&self) -> Option<Zaid> {
        zaid_from_str(&self.identifier)
    }
}

/// How fractions of a material are given
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FractionKind {
    Atom,
    Mass,
    /// Positive and negative fractions together, which is invalid
    Mixed,
}

/// Typed view of an `Mn` card
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub number: u32,
    pub components: Vec<Component>,
    /// Keyword tail such as `nlib=80c`, keys lower case
    pub keywords: Vec<(String, String)>,
}

impl Material {
    /// Read a material from its data card
    ///
    /// Pairs are read until the first `key=value` entry, after which only
    /// keywords are allowed.
    ///
    /// ```rust
    /// # use mcdeck_input::{DataCard, Material};
    /// let card = DataCard::new("m1", vec!["1001.80c", "2", "8016.80c", "1", "nlib=80c"]);
    /// let material = Material::from_card(&card).unwrap();
    /// assert_eq!(material.number, 1);
    /// assert_eq!(material.components.len(), 2);
    /// assert_eq!(material.keyword("NLIB"), Some("80c"));
    /// ```
    pub fn from_card(card: &DataCard) -> Result<Self> {
        let CardKind::Material(number) = card.kind() else {
            return Err(Error::parse(&card.name, "not a material card"));
        };

        let split = card
            .entries
            .iter()
            .position(|e| e.contains('='))
            .unwrap_or(card.entries.len());
        let (pairs, tail) = card.entries.split_at(split);

        if pairs.len() % 2 != 0 {
            return Err(Error::parse(
                card.to_string(),
                "material entries must be identifier and fraction pairs",
            ));
        }

        let components = pairs
            .iter()
            .tuples()
            .map(|(identifier, fraction)| {
                let fraction = parse_real(fraction).ok_or_else(|| {
                    Error::parse(card.to_string(), f!("invalid fraction \"{fraction}\""))
                })?;
                Ok(Component {
                    identifier: identifier.to_string(),
                    fraction,
                })
            })
            .collect::<Result<Vec<Component>>>()?;

        let keywords = tail
            .iter()
            .map(|entry| match entry.split_once('=') {
                Some((key, value)) => Ok((key.to_lowercase(), value.to_string())),
                None => Err(Error::parse(
                    card.to_string(),
                    f!("unexpected \"{entry}\" after material keywords"),
                )),
            })
            .collect::<Result<Vec<(String, String)>>>()?;

        Ok(Self {
            number,
            components,
            keywords,
        })
    }

    /// Value of a keyword, case insensitive
    pub fn keyword(&self, key: &str) -> Option<&str> {
        let key = key.to_lowercase();
        self.keywords
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn fraction_kind(&self) -> FractionKind {
        let positive = self.components.iter().any(|c| c.fraction > 0.0);
        let negative = self.components.iter().any(|c| c.fraction < 0.0);
        match (positive, negative) {
            (true, true) => FractionKind::Mixed,
            (false, true) => FractionKind::Mass,
            _ => FractionKind::Atom,
        }
    }

    /// Fractions scaled so that their magnitudes sum to 1
    ///
    /// `None` if the magnitudes sum to zero.
    pub fn normalised_fractions(&self) -> Option<Vec<f64>> {
        let total: f64 = self.components.iter().map(|c| c.fraction.abs()).sum();
        if total == 0.0 {
            return None;
        }
        Some(
            self.components
                .iter()
                .map(|c| c.fraction.abs() / total)
                .collect(),
        )
    }

    /// Identifiers that are neither `ZZZAAA.lib` nor an element symbol
    pub fn invalid_identifiers(&self) -> Vec<&str> {
        self.components
            .iter()
            .filter(|c| c.zaid().is_none())
            .map(|c| c.identifier.as_str())
            .collect()
    }
}

/// Typed view of an `MTn` card
#[derive(Debug, Clone, PartialEq)]
pub struct ThermalBinding {
    pub material: u32,
    /// Library identifiers as written, e.g. `lwtr.20t`
    pub libraries: Vec<String>,
}

impl ThermalBinding {
    pub fn from_card(card: &DataCard) -> Result<Self> {
        let CardKind::Thermal(material) = card.kind() else {
            return Err(Error::parse(&card.name, "not a thermal scattering card"));
        };
        if card.entries.is_empty() {
            return Err(Error::parse(card.to_string(), "no library given"));
        }
        Ok(Self {
            material,
            libraries: card.entries.clone(),
        })
    }

    /// Card for binding `material` to the libraries
    pub fn to_card(&self) -> DataCard {
        DataCard::new(&f!("mt{}", self.material), self.libraries.clone())
    }

    /// Library names with any suffix removed, e.g. `lwtr` for `lwtr.20t`
    pub fn names(&self) -> Vec<&str> {
        self.libraries
            .iter()
            .map(|l| l.split('.').next().unwrap_or(l))
            .collect()
    }
}
