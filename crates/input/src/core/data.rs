//! Data cards and the classification of card names

use super::{Origin, Particle, TallyKind};

/// A data card, stored as its name and entries exactly as written
///
/// Names are lower case and include any particle designator, e.g. `m1`,
/// `imp:n`, or `f4:n,p`. Interpretation is left to the typed readers such
/// as [crate::Material::from_card] which are only called on demand.
#[derive(Debug, Clone)]
pub struct DataCard {
    pub name: String,
    pub entries: Vec<String>,
    pub origin: Option<Origin>,
}

impl PartialEq for DataCard {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.entries == other.entries
    }
}

impl DataCard {
    /// New card, the name is normalised to lower case
    pub fn new<S: Into<String>>(name: &str, entries: Vec<S>) -> Self {
        Self {
            name: name.to_lowercase(),
            entries: entries.into_iter().map(|e| e.into()).collect(),
            origin: None,
        }
    }

    /// Classify the card from its name
    pub fn kind(&self) -> CardKind {
        CardKind::from_name(&self.name)
    }
}

impl std::fmt::Display for DataCard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)?;
        for entry in &self.entries {
            write!(f, " {entry}")?;
        }
        Ok(())
    }
}

/// What a data card is, as far as can be told from its name
///
/// ```rust
/// # use mcdeck_input::{CardKind, Particle, TallyKind};
/// assert_eq!(CardKind::from_name("M10"), CardKind::Material(10));
/// assert_eq!(CardKind::from_name("mt10"), CardKind::Thermal(10));
/// assert_eq!(CardKind::from_name("*tr2"), CardKind::Transform { number: 2, degrees: true });
/// assert_eq!(
///     CardKind::from_name("f4:n"),
///     CardKind::Tally {
///         kind: TallyKind::F,
///         number: 4,
///         particles: vec![Particle::Neutron],
///         starred: false
///     }
/// );
/// assert_eq!(CardKind::from_name("phys:n"), CardKind::Other);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum CardKind {
    /// `Mn`
    Material(u32),
    /// `MTn`
    Thermal(u32),
    Mode,
    Kcode,
    Ksrc,
    Sdef,
    /// `TRn` or `*TRn`
    Transform { number: u32, degrees: bool },
    /// Tally cards and tally modifiers, `F4:N`, `E4`, `FM14`, ...
    Tally {
        kind: TallyKind,
        number: u32,
        particles: Vec<Particle>,
        starred: bool,
    },
    /// `IMP:p` given as a data card for every cell in order
    Importance(Vec<Particle>),
    /// Everything else, kept opaque
    Other,
}

impl CardKind {
    pub fn from_name(name: &str) -> Self {
        let name = name.to_lowercase();
        let (head, particles) = match name.split_once(':') {
            Some((head, particles)) => (head, Some(particles)),
            None => (name.as_str(), None),
        };
        let (starred, head) = match head.strip_prefix('*') {
            Some(rest) => (true, rest),
            None => (false, head),
        };

        let split = head.find(|c: char| c.is_ascii_digit()).unwrap_or(head.len());
        let (prefix, digits) = head.split_at(split);
        let number = match digits {
            "" => None,
            d => match d.parse::<u32>() {
                Ok(n) => Some(n),
                Err(_) => return Self::Other,
            },
        };

        let particles = match particles.map(Particle::parse_list) {
            Some(Ok(list)) => list,
            Some(Err(_)) => return Self::Other,
            None => Vec::new(),
        };

        match (prefix, number, particles.is_empty(), starred) {
            ("m", Some(n), true, false) => Self::Material(n),
            ("mt", Some(n), true, false) => Self::Thermal(n),
            ("mode", None, true, false) => Self::Mode,
            ("kcode", None, true, false) => Self::Kcode,
            ("ksrc", None, true, false) => Self::Ksrc,
            ("sdef", None, true, false) => Self::Sdef,
            ("tr", Some(n), true, degrees) => Self::Transform { number: n, degrees },
            ("imp", None, false, false) => Self::Importance(particles),
            (prefix, Some(n), _, starred) => match TallyKind::from_prefix(prefix) {
                Some(kind) => Self::Tally {
                    kind,
                    number: n,
                    particles,
                    starred,
                },
                None => Self::Other,
            },
            _ => Self::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification() {
        assert_eq!(CardKind::from_name("mode"), CardKind::Mode);
        assert_eq!(CardKind::from_name("KCODE"), CardKind::Kcode);
        assert_eq!(CardKind::from_name("nps"), CardKind::Other);
        assert_eq!(CardKind::from_name("m0"), CardKind::Material(0));
        assert_eq!(CardKind::from_name("mx1"), CardKind::Other);
        assert_eq!(CardKind::from_name("mpn1"), CardKind::Other);
        assert_eq!(
            CardKind::from_name("imp:n,p"),
            CardKind::Importance(vec![Particle::Neutron, Particle::Photon])
        );
        assert_eq!(
            CardKind::from_name("tr3"),
            CardKind::Transform {
                number: 3,
                degrees: false
            }
        );
        assert!(matches!(
            CardKind::from_name("fm14"),
            CardKind::Tally {
                kind: TallyKind::Fm,
                number: 14,
                ..
            }
        ));
        assert!(matches!(
            CardKind::from_name("e0"),
            CardKind::Tally {
                kind: TallyKind::E,
                number: 0,
                ..
            }
        ));
    }

    #[test]
    fn display() {
        let card = DataCard::new("NPS", vec!["1000"]);
        assert_eq!(card.to_string(), "nps 1000");
        assert_eq!(card.kind(), CardKind::Other);
    }
}
