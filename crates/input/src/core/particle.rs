//! MCNP particle designators

use crate::error::Error;
use mcdeck_utils::f;

/// Complete collection of MCNP particle variants
///
/// Particles appear on `MODE` cards, particle-qualified cell parameters such
/// as `IMP:N`, and tally cards such as `F4:N,P`. Every variant maps to exactly
/// one designator character.
///
/// ```rust
/// # use mcdeck_input::Particle;
/// // From the particle designator
/// assert_eq!(Particle::Alpha, Particle::try_from("a").unwrap());
/// assert_eq!(Particle::Alpha, Particle::try_from('a').unwrap());
///
/// // From the full name given in the user manual
/// assert_eq!(Particle::Alpha, Particle::try_from("alpha particle").unwrap());
///
/// // And back again
/// assert_eq!(Particle::Photon.designator(), 'p');
/// ```
///
/// For reference, a full list of valid MCNP particle identifiers is shown below:
///
/// | ID | Name                                  | Symbol   |
/// | -- | ------------------------------------- | -------- |
/// | 1  | neutron                               | n        |
/// | 2  | photon                                | p        |
/// | 3  | electron                              | e        |
/// | 4  | negative muon                         | \|       |
/// | 5  | anti neutron                          | q        |
/// | 6  | electron neutrino                     | u        |
/// | 7  | muon neutrino                         | v        |
/// | 8  | positron                              | f        |
/// | 9  | proton                                | h        |
/// | 10 | lambda baryon                         | l        |
/// | 11 | positive sigma baryon                 | +        |
/// | 12 | negative sigma baryon                 | -        |
/// | 13 | cascade; xi baryon                    | x        |
/// | 14 | negative cascade; negative xi baryon  | y        |
/// | 15 | omega baryon                          | o        |
/// | 16 | positive muon                         | !        |
/// | 17 | anti electron neutrino                | <        |
/// | 18 | anti muon neutrino                    | >        |
/// | 19 | anti proton                           | g        |
/// | 20 | positive pion                         | /        |
/// | 21 | neutral pion                          | z        |
/// | 22 | positive kaon                         | k        |
/// | 23 | kaon, short                           | %        |
/// | 24 | kaon, long                            | ^        |
/// | 25 | anti lambda baryon                    | b        |
/// | 26 | anti positive sigma baryon            | _        |
/// | 27 | anti negative sigma baryon            | ~        |
/// | 28 | anti cascade; anti neutral xi baryon  | c        |
/// | 29 | positive cascade; positive xi baryon  | w        |
/// | 30 | anti omega                            | @        |
/// | 31 | deuteron                              | d        |
/// | 32 | triton                                | t        |
/// | 33 | helion                                | s        |
/// | 34 | alpha particle                        | a        |
/// | 35 | negative pion                         | *        |
/// | 36 | negative kaon                         | ?        |
/// | 37 | heavy ions                            | #        |
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Ord, Eq, Hash)]
pub enum Particle {
    Neutron = 1,
    Photon = 2,
    Electron = 3,
    NegativeMuon = 4,
    AntiNeutron = 5,
    ElectronNeutrino = 6,
    MuonNeutrino = 7,
    Positron = 8,
    Proton = 9,
    LambdaBaryon = 10,
    PosSigmaBaryon = 11,
    NegSigmaBaryon = 12,
    XiBaryon = 13,
    NegXiBaryon = 14,
    OmegaBaryon = 15,
    PosMuon = 16,
    AntiElectronNeutrino = 17,
    AntiMuonNeutrino = 18,
    AntiProton = 19,
    PosPion = 20,
    NeuPion = 21,
    PosKaon = 22,
    ShortKaon = 23,
    LongKaon = 24,
    AntiLambdaBaryon = 25,
    AntiPosSigmaBaryon = 26,
    AntiNegSigmaBaryon = 27,
    AntiNeuXiBaryon = 28,
    PosXiBaryon = 29,
    AntiOmega = 30,
    Deuteron = 31,
    Triton = 32,
    Helion = 33,
    Alpha = 34,
    NegPion = 35,
    NegKaon = 36,
    HeavyIon = 37,
}

impl Particle {
    /// Numerical MCNP particle id
    #[inline]
    pub fn id(&self) -> u8 {
        *self as u8
    }

    /// Single character designator used on cards
    pub fn designator(&self) -> char {
        match self {
            Self::Neutron => 'n',
            Self::Photon => 'p',
            Self::Electron => 'e',
            Self::NegativeMuon => '|',
            Self::AntiNeutron => 'q',
            Self::ElectronNeutrino => 'u',
            Self::MuonNeutrino => 'v',
            Self::Positron => 'f',
            Self::Proton => 'h',
            Self::LambdaBaryon => 'l',
            Self::PosSigmaBaryon => '+',
            Self::NegSigmaBaryon => '-',
            Self::XiBaryon => 'x',
            Self::NegXiBaryon => 'y',
            Self::OmegaBaryon => 'o',
            Self::PosMuon => '!',
            Self::AntiElectronNeutrino => '<',
            Self::AntiMuonNeutrino => '>',
            Self::AntiProton => 'g',
            Self::PosPion => '/',
            Self::NeuPion => 'z',
            Self::PosKaon => 'k',
            Self::ShortKaon => '%',
            Self::LongKaon => '^',
            Self::AntiLambdaBaryon => 'b',
            Self::AntiPosSigmaBaryon => '_',
            Self::AntiNegSigmaBaryon => '~',
            Self::AntiNeuXiBaryon => 'c',
            Self::PosXiBaryon => 'w',
            Self::AntiOmega => '@',
            Self::Deuteron => 'd',
            Self::Triton => 't',
            Self::Helion => 's',
            Self::Alpha => 'a',
            Self::NegPion => '*',
            Self::NegKaon => '?',
            Self::HeavyIon => '#',
        }
    }

    /// Parse a comma separated designator list such as `n,p,e`
    ///
    /// ```rust
    /// # use mcdeck_input::Particle;
    /// let list = Particle::parse_list("n,p").unwrap();
    /// assert_eq!(list, vec![Particle::Neutron, Particle::Photon]);
    /// ```
    pub fn parse_list(s: &str) -> Result<Vec<Self>, Error> {
        s.split(',')
            .filter(|p| !p.trim().is_empty())
            .map(|p| Self::try_from(p.trim()))
            .collect()
    }

    /// Comma separated designators, the inverse of [Particle::parse_list]
    pub fn join(list: &[Self]) -> String {
        list.iter()
            .map(|p| p.designator().to_string())
            .collect::<Vec<String>>()
            .join(",")
    }
}

impl std::fmt::Display for Particle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.designator())
    }
}

/// Convert from any valid numerical designator
impl TryFrom<u8> for Particle {
    type Error = Error;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        match v {
            1 => Ok(Self::Neutron),
            2 => Ok(Self::Photon),
            3 => Ok(Self::Electron),
            4 => Ok(Self::NegativeMuon),
            5 => Ok(Self::AntiNeutron),
            6 => Ok(Self::ElectronNeutrino),
            7 => Ok(Self::MuonNeutrino),
            8 => Ok(Self::Positron),
            9 => Ok(Self::Proton),
            10 => Ok(Self::LambdaBaryon),
            11 => Ok(Self::PosSigmaBaryon),
            12 => Ok(Self::NegSigmaBaryon),
            13 => Ok(Self::XiBaryon),
            14 => Ok(Self::NegXiBaryon),
            15 => Ok(Self::OmegaBaryon),
            16 => Ok(Self::PosMuon),
            17 => Ok(Self::AntiElectronNeutrino),
            18 => Ok(Self::AntiMuonNeutrino),
            19 => Ok(Self::AntiProton),
            20 => Ok(Self::PosPion),
            21 => Ok(Self::NeuPion),
            22 => Ok(Self::PosKaon),
            23 => Ok(Self::ShortKaon),
            24 => Ok(Self::LongKaon),
            25 => Ok(Self::AntiLambdaBaryon),
            26 => Ok(Self::AntiPosSigmaBaryon),
            27 => Ok(Self::AntiNegSigmaBaryon),
            28 => Ok(Self::AntiNeuXiBaryon),
            29 => Ok(Self::PosXiBaryon),
            30 => Ok(Self::AntiOmega),
            31 => Ok(Self::Deuteron),
            32 => Ok(Self::Triton),
            33 => Ok(Self::Helion),
            34 => Ok(Self::Alpha),
            35 => Ok(Self::NegPion),
            36 => Ok(Self::NegKaon),
            37 => Ok(Self::HeavyIon),
            _ => Err(Error::FailedToInferParticle(f!("{v}"))),
        }
    }
}

/// Convert from a designator character
impl TryFrom<char> for Particle {
    type Error = Error;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        Self::try_from(c.to_string().as_str())
    }
}

/// Convert from any valid designator or name
impl TryFrom<&str> for Particle {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let s = s.trim().to_lowercase();

        match s.as_str() {
            "n" | "neutron" => Ok(Self::Neutron),
            "p" | "photon" => Ok(Self::Photon),
            "e" | "electron" => Ok(Self::Electron),
            "|" | "negative muon" => Ok(Self::NegativeMuon),
            "q" | "anti neutron" => Ok(Self::AntiNeutron),
            "u" | "electron neutrino" => Ok(Self::ElectronNeutrino),
            "v" | "muon neutrino" => Ok(Self::MuonNeutrino),
            "f" | "positron" => Ok(Self::Positron),
            "h" | "proton" => Ok(Self::Proton),
            "l" | "lambda baryon" => Ok(Self::LambdaBaryon),
            "+" | "positive sigma baryon" => Ok(Self::PosSigmaBaryon),
            "-" | "negative sigma baryon" => Ok(Self::NegSigmaBaryon),
            "x" | "cascade; xi baryon" => Ok(Self::XiBaryon),
            "y" | "negative cascade; negative xi baryon" => Ok(Self::NegXiBaryon),
            "o" | "omega baryon" => Ok(Self::OmegaBaryon),
            "!" | "positive muon" => Ok(Self::PosMuon),
            "<" | "anti electron neutrino" => Ok(Self::AntiElectronNeutrino),
            ">" | "anti muon neutrino" => Ok(Self::AntiMuonNeutrino),
            "g" | "anti proton" => Ok(Self::AntiProton),
            "/" | "positive pion" => Ok(Self::PosPion),
            "z" | "neutral pion" => Ok(Self::NeuPion),
            "k" | "positive kaon" => Ok(Self::PosKaon),
            "%" | "kaon, short" => Ok(Self::ShortKaon),
            "^" | "kaon, long" => Ok(Self::LongKaon),
            "b" | "anti lambda baryon" => Ok(Self::AntiLambdaBaryon),
            "_" | "anti positive sigma baryon" => Ok(Self::AntiPosSigmaBaryon),
            "~" | "anti negative sigma baryon" => Ok(Self::AntiNegSigmaBaryon),
            "c" | "anti cascade; anti neutral xi baryon" => Ok(Self::AntiNeuXiBaryon),
            "w" | "positive cascade; positive xi baryon" => Ok(Self::PosXiBaryon),
            "@" | "anti omega" => Ok(Self::AntiOmega),
            "d" | "deuteron" => Ok(Self::Deuteron),
            "t" | "triton" => Ok(Self::Triton),
            "s" | "helion" => Ok(Self::Helion),
            "a" | "alpha" | "alpha particle" => Ok(Self::Alpha),
            "*" | "negative pion" => Ok(Self::NegPion),
            "?" | "negative kaon" => Ok(Self::NegKaon),
            "#" | "heavy ions" => Ok(Self::HeavyIon),
            _ => Err(Error::FailedToInferParticle(s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn designators_round_trip() {
        for id in 1..=37_u8 {
            let particle = Particle::try_from(id).unwrap();
            assert_eq!(Particle::try_from(particle.designator()).unwrap(), particle);
            assert_eq!(particle.id(), id);
        }
    }

    #[test]
    fn invalid_designators() {
        assert!(Particle::try_from(0_u8).is_err());
        assert!(Particle::try_from(38_u8).is_err());
        assert!(Particle::try_from("neutrons").is_err());
        assert!(Particle::parse_list("n,j").is_err());
    }

    #[test]
    fn lists_are_case_insensitive() {
        assert_eq!(
            Particle::parse_list("N,P,E").unwrap(),
            vec![Particle::Neutron, Particle::Photon, Particle::Electron]
        );
        assert_eq!(Particle::join(&[Particle::Neutron, Particle::Photon]), "n,p");
    }
}
