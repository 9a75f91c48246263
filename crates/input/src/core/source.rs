//! Problem type and source cards

use mcdeck_utils::f;

use super::shorthand::room_for;
use super::{CardKind, DataCard, Particle};
use crate::error::{Error, Result};
use crate::parsers::{parse_int, parse_real};

/// Particles transported, read from a `MODE` card
///
/// Without a `MODE` card only neutrons are transported.
pub fn read_mode(card: Option<&DataCard>) -> Result<Vec<Particle>> {
    let Some(card) = card else {
        return Ok(vec![Particle::Neutron]);
    };
    if card.kind() != CardKind::Mode {
        return Err(Error::parse(&card.name, "not a mode card"));
    }
    card.entries
        .iter()
        .map(|e| Particle::try_from(e.as_str()))
        .collect()
}

/// Typed view of a `KCODE` card
///
/// Entries skipped with `J` are left as `None` so the defaults apply.
///
/// ```rust
/// # use mcdeck_input::{DataCard, Kcode};
/// let card = DataCard::new("kcode", vec!["5000", "1.0", "j", "150"]);
/// let kcode = Kcode::from_card(&card).unwrap();
/// assert_eq!(kcode.histories, Some(5000));
/// assert_eq!(kcode.skip, None);
/// assert_eq!(kcode.skip_or_default(), 30);
/// assert_eq!(kcode.cycles_or_default(), 150);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Kcode {
    /// Source histories per cycle
    pub histories: Option<u64>,
    /// Initial guess for k-effective
    pub keff: Option<f64>,
    /// Inactive cycles
    pub skip: Option<u32>,
    /// Total cycles
    pub cycles: Option<u32>,
    /// Remaining entries as written
    pub extra: Vec<String>,
}

impl Kcode {
    pub fn from_card(card: &DataCard) -> Result<Self> {
        if card.kind() != CardKind::Kcode {
            return Err(Error::parse(&card.name, "not a kcode card"));
        }

        let mut entries = expand_jumps(&card.entries)?.into_iter();
        let mut next = || entries.next().flatten();

        let invalid = |what: &str| Error::parse(card.to_string(), f!("invalid {what}"));

        let histories = match next() {
            Some(e) => Some(parse_int::<u64>(&e).ok_or_else(|| invalid("history count"))?),
            None => None,
        };
        let keff = match next() {
            Some(e) => Some(parse_real(&e).ok_or_else(|| invalid("initial keff"))?),
            None => None,
        };
        let skip = match next() {
            Some(e) => Some(parse_int::<u32>(&e).ok_or_else(|| invalid("skipped cycle count"))?),
            None => None,
        };
        let cycles = match next() {
            Some(e) => Some(parse_int::<u32>(&e).ok_or_else(|| invalid("cycle count"))?),
            None => None,
        };

        Ok(Self {
            histories,
            keff,
            skip,
            cycles,
            extra: entries
                .map(|e| e.unwrap_or_else(|| "j".to_string()))
                .collect(),
        })
    }

    pub fn histories_or_default(&self) -> u64 {
        self.histories.unwrap_or(1000)
    }

    pub fn keff_or_default(&self) -> f64 {
        self.keff.unwrap_or(1.0)
    }

    pub fn skip_or_default(&self) -> u32 {
        self.skip.unwrap_or(30)
    }

    pub fn cycles_or_default(&self) -> u32 {
        self.cycles.unwrap_or(130)
    }
}

/// Expand `nJ` jumps into `None` entries, keeping everything else
fn expand_jumps(entries: &[String]) -> Result<Vec<Option<String>>> {
    let mut expanded = Vec::with_capacity(entries.len());
    for entry in entries {
        let lower = entry.to_lowercase();
        match lower.strip_suffix('j') {
            Some("") => expanded.push(None),
            Some(n) => match parse_int::<usize>(n) {
                Some(count) => {
                    let count = room_for(expanded.len(), count, entry.clone())?;
                    expanded.extend(std::iter::repeat(None).take(count));
                }
                None => expanded.push(Some(entry.clone())),
            },
            None => expanded.push(Some(entry.clone())),
        }
    }
    Ok(expanded)
}

/// Typed view of a `KSRC` card, a list of source points
#[derive(Debug, Clone, PartialEq)]
pub struct Ksrc {
    pub points: Vec<[f64; 3]>,
}

impl Ksrc {
    pub fn from_card(card: &DataCard) -> Result<Self> {
        if card.kind() != CardKind::Ksrc {
            return Err(Error::parse(&card.name, "not a ksrc card"));
        }
        if card.entries.len() % 3 != 0 {
            return Err(Error::parse(
                card.to_string(),
                "source points need three coordinates",
            ));
        }

        let values = card
            .entries
            .iter()
            .map(|e| parse_real(e).ok_or_else(|| Error::parse(card.to_string(), "non-numeric coordinate")))
            .collect::<Result<Vec<f64>>>()?;

        Ok(Self {
            points: values.chunks_exact(3).map(|c| [c[0], c[1], c[2]]).collect(),
        })
    }
}

/// Typed view of an `SDEF` card as ordered `key=value` pairs
///
/// Values may span several entries, e.g. `pos=0 0 0`.
///
/// ```rust
/// # use mcdeck_input::{DataCard, Sdef};
/// let card = DataCard::new("sdef", vec!["pos=0", "0", "0", "erg=14", "par=n"]);
/// let sdef = Sdef::from_card(&card).unwrap();
/// assert_eq!(sdef.get("POS"), Some(&["0".to_string(), "0".into(), "0".into()][..]));
/// assert_eq!(sdef.get("erg").unwrap()[0], "14");
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Sdef {
    pub pairs: Vec<(String, Vec<String>)>,
}

impl Sdef {
    pub fn from_card(card: &DataCard) -> Result<Self> {
        if card.kind() != CardKind::Sdef {
            return Err(Error::parse(&card.name, "not an sdef card"));
        }

        let mut pairs: Vec<(String, Vec<String>)> = Vec::new();
        for entry in &card.entries {
            match entry.split_once('=') {
                Some((key, value)) => {
                    let values = match value {
                        "" => Vec::new(),
                        v => vec![v.to_string()],
                    };
                    pairs.push((key.to_lowercase(), values));
                }
                None => match pairs.last_mut() {
                    Some((_, values)) => values.push(entry.clone()),
                    None => {
                        return Err(Error::parse(
                            card.to_string(),
                            f!("\"{entry}\" is not part of a key=value pair"),
                        ))
                    }
                },
            }
        }
        Ok(Self { pairs })
    }

    /// Values of a source variable, case insensitive
    pub fn get(&self, key: &str) -> Option<&[String]> {
        let key = key.to_lowercase();
        self.pairs
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_slice())
    }

    /// Source particle, neutrons unless `PAR` says otherwise
    pub fn particle(&self) -> Result<Particle> {
        match self.get("par").and_then(|v| v.first()) {
            Some(p) => match parse_int::<u8>(p) {
                Some(id) => Particle::try_from(id),
                None => Particle::try_from(p.as_str()),
            },
            None => Ok(Particle::Neutron),
        }
    }
}

/// Typed view of an `IMP:p` data card
///
/// Values are in cell order, with `None` where a jump leaves a cell unset.
#[derive(Debug, Clone, PartialEq)]
pub struct Importances {
    pub particles: Vec<Particle>,
    pub values: Vec<Option<f64>>,
}

impl Importances {
    pub fn from_card(card: &DataCard) -> Result<Self> {
        let CardKind::Importance(particles) = card.kind() else {
            return Err(Error::parse(&card.name, "not an importance card"));
        };
        Ok(Self {
            particles,
            values: super::expand_shorthand(&card.entries)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_defaults_to_neutrons() {
        assert_eq!(read_mode(None).unwrap(), vec![Particle::Neutron]);
        let card = DataCard::new("mode", vec!["n", "p", "e"]);
        assert_eq!(
            read_mode(Some(&card)).unwrap(),
            vec![Particle::Neutron, Particle::Photon, Particle::Electron]
        );
        let card = DataCard::new("mode", vec!["n", "j"]);
        assert!(read_mode(Some(&card)).is_err());
    }

    #[test]
    fn kcode_jumps() {
        let card = DataCard::new("kcode", vec!["2j", "50", "250"]);
        let kcode = Kcode::from_card(&card).unwrap();
        assert_eq!(kcode.histories, None);
        assert_eq!(kcode.keff_or_default(), 1.0);
        assert_eq!(kcode.skip, Some(50));
        assert_eq!(kcode.cycles, Some(250));

        let card = DataCard::new("kcode", vec!["many"]);
        assert!(Kcode::from_card(&card).is_err());

        let card = DataCard::new("kcode", vec!["1000", "4000000000j", "50"]);
        let error = Kcode::from_card(&card).unwrap_err();
        assert!(error.to_string().contains("too many entries"), "{error}");
    }

    #[test]
    fn ksrc_points() {
        let card = DataCard::new("ksrc", vec!["0", "0", "0", "1", "1", "1"]);
        assert_eq!(Ksrc::from_card(&card).unwrap().points.len(), 2);
        let card = DataCard::new("ksrc", vec!["0", "0"]);
        assert!(Ksrc::from_card(&card).is_err());
    }

    #[test]
    fn sdef_particle() {
        let card = DataCard::new("sdef", vec!["par=2"]);
        assert_eq!(Sdef::from_card(&card).unwrap().particle().unwrap(), Particle::Photon);
        let card = DataCard::new("sdef", Vec::<String>::new());
        assert_eq!(Sdef::from_card(&card).unwrap().particle().unwrap(), Particle::Neutron);
        let card = DataCard::new("sdef", vec!["0", "erg=1"]);
        assert!(Sdef::from_card(&card).is_err());
    }

    #[test]
    fn importance_card() {
        let card = DataCard::new("imp:n", vec!["1", "2r", "0"]);
        let imp = Importances::from_card(&card).unwrap();
        assert_eq!(imp.values, vec![Some(1.0), Some(1.0), Some(1.0), Some(0.0)]);
    }
}
