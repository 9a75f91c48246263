//! Tally cards and tally modifier cards

use super::{CardKind, DataCard, Particle};
use crate::error::{Error, Result};

/// Prefix of a tally or tally modifier card
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TallyKind {
    /// `Fn`, the tally itself
    F,
    /// `FCn` comment
    Fc,
    /// `En` energy bins
    E,
    /// `Tn` time bins
    T,
    /// `Cn` cosine bins
    C,
    /// `FQn` print hierarchy
    Fq,
    /// `FMn` multiplier
    Fm,
    /// `DEn` dose energies
    De,
    /// `DFn` dose functions
    Df,
    /// `EMn` energy multipliers
    Em,
    /// `TMn` time multipliers
    Tm,
    /// `CMn` cosine multipliers
    Cm,
    /// `CFn` cell flagging
    Cf,
    /// `SFn` surface flagging
    Sf,
    /// `FSn` segment divisors
    Fs,
    /// `SDn` segment areas and volumes
    Sd,
    /// `FUn` user bins
    Fu,
    /// `FTn` special treatments
    Ft,
    /// `TFn` fluctuation chart bins
    Tf,
}

impl TallyKind {
    pub fn from_prefix(prefix: &str) -> Option<Self> {
        let kind = match prefix.to_lowercase().as_str() {
            "f" => Self::F,
            "fc" => Self::Fc,
            "e" => Self::E,
            "t" => Self::T,
            "c" => Self::C,
            "fq" => Self::Fq,
            "fm" => Self::Fm,
            "de" => Self::De,
            "df" => Self::Df,
            "em" => Self::Em,
            "tm" => Self::Tm,
            "cm" => Self::Cm,
            "cf" => Self::Cf,
            "sf" => Self::Sf,
            "fs" => Self::Fs,
            "sd" => Self::Sd,
            "fu" => Self::Fu,
            "ft" => Self::Ft,
            "tf" => Self::Tf,
            _ => return None,
        };
        Some(kind)
    }

    pub fn prefix(&self) -> &'static str {
        match self {
            Self::F => "f",
            Self::Fc => "fc",
            Self::E => "e",
            Self::T => "t",
            Self::C => "c",
            Self::Fq => "fq",
            Self::Fm => "fm",
            Self::De => "de",
            Self::Df => "df",
            Self::Em => "em",
            Self::Tm => "tm",
            Self::Cm => "cm",
            Self::Cf => "cf",
            Self::Sf => "sf",
            Self::Fs => "fs",
            Self::Sd => "sd",
            Self::Fu => "fu",
            Self::Ft => "ft",
            Self::Tf => "tf",
        }
    }

    /// Modifiers that may use tally number 0 to apply to every tally
    pub fn allows_default(&self) -> bool {
        matches!(self, Self::E | Self::T | Self::C | Self::Fq | Self::De | Self::Df)
    }
}

impl std::fmt::Display for TallyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.prefix().to_uppercase())
    }
}

/// Tally type given by the last digit of the tally number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TallyType {
    /// F1 surface current
    Current,
    /// F2 surface flux
    SurfaceFlux,
    /// F4 cell flux
    CellFlux,
    /// F5 point or ring detector
    Detector,
    /// F6 energy deposition
    Heating,
    /// F7 fission energy deposition
    FissionHeating,
    /// F8 pulse height
    PulseHeight,
}

impl TallyType {
    pub fn from_number(number: u32) -> Option<Self> {
        let t = match number % 10 {
            1 => Self::Current,
            2 => Self::SurfaceFlux,
            4 => Self::CellFlux,
            5 => Self::Detector,
            6 => Self::Heating,
            7 => Self::FissionHeating,
            8 => Self::PulseHeight,
            _ => return None,
        };
        Some(t)
    }
}

/// Typed view of any tally or tally modifier card
#[derive(Debug, Clone, PartialEq)]
pub struct TallyCard {
    pub kind: TallyKind,
    pub number: u32,
    pub particles: Vec<Particle>,
    /// `*Fn` and friends change units
    pub starred: bool,
    pub entries: Vec<String>,
}

impl TallyCard {
    pub fn from_card(card: &DataCard) -> Result<Self> {
        match card.kind() {
            CardKind::Tally {
                kind,
                number,
                particles,
                starred,
            } => Ok(Self {
                kind,
                number,
                particles,
                starred,
                entries: card.entries.clone(),
            }),
            _ => Err(Error::parse(&card.name, "not a tally card")),
        }
    }

    /// Tally type, `None` for modifiers and invalid tally numbers
    pub fn tally_type(&self) -> Option<TallyType> {
        match self.kind {
            TallyKind::F => TallyType::from_number(self.number),
            _ => None,
        }
    }
}
