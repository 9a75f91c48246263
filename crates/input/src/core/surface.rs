//! Surface cards

use itertools::Itertools;
use mcdeck_utils::ValueExt;

use super::Origin;
use crate::error::{Error, Result};

/// Boundary condition selected by the prefix of the surface number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Boundary {
    #[default]
    Ordinary,
    /// `*n`
    Reflecting,
    /// `+n`
    White,
}

impl Boundary {
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Ordinary => "",
            Self::Reflecting => "*",
            Self::White => "+",
        }
    }
}

/// Closed set of surface mnemonics, including macrobodies
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SurfaceKind {
    P,
    Px,
    Py,
    Pz,
    So,
    S,
    Sx,
    Sy,
    Sz,
    CSlashX,
    CSlashY,
    CSlashZ,
    Cx,
    Cy,
    Cz,
    KSlashX,
    KSlashY,
    KSlashZ,
    Kx,
    Ky,
    Kz,
    Sq,
    Gq,
    Tx,
    Ty,
    Tz,
    X,
    Y,
    Z,
    Box,
    Rpp,
    Sph,
    Rcc,
    Rhp,
    Hex,
    Rec,
    Trc,
    Ell,
    Wed,
    Arb,
}

impl SurfaceKind {
    const ALL: [SurfaceKind; 40] = [
        Self::P,
        Self::Px,
        Self::Py,
        Self::Pz,
        Self::So,
        Self::S,
        Self::Sx,
        Self::Sy,
        Self::Sz,
        Self::CSlashX,
        Self::CSlashY,
        Self::CSlashZ,
        Self::Cx,
        Self::Cy,
        Self::Cz,
        Self::KSlashX,
        Self::KSlashY,
        Self::KSlashZ,
        Self::Kx,
        Self::Ky,
        Self::Kz,
        Self::Sq,
        Self::Gq,
        Self::Tx,
        Self::Ty,
        Self::Tz,
        Self::X,
        Self::Y,
        Self::Z,
        Self::Box,
        Self::Rpp,
        Self::Sph,
        Self::Rcc,
        Self::Rhp,
        Self::Hex,
        Self::Rec,
        Self::Trc,
        Self::Ell,
        Self::Wed,
        Self::Arb,
    ];

    /// Mnemonic as written on the card, lower case
    ///
    /// Off-axis cylinders and cones are `c/x` and `k/x`, on-axis ones `cx`
    /// and `kx`.
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Self::P => "p",
            Self::Px => "px",
            Self::Py => "py",
            Self::Pz => "pz",
            Self::So => "so",
            Self::S => "s",
            Self::Sx => "sx",
            Self::Sy => "sy",
            Self::Sz => "sz",
            Self::CSlashX => "c/x",
            Self::CSlashY => "c/y",
            Self::CSlashZ => "c/z",
            Self::Cx => "cx",
            Self::Cy => "cy",
            Self::Cz => "cz",
            Self::KSlashX => "k/x",
            Self::KSlashY => "k/y",
            Self::KSlashZ => "k/z",
            Self::Kx => "kx",
            Self::Ky => "ky",
            Self::Kz => "kz",
            Self::Sq => "sq",
            Self::Gq => "gq",
            Self::Tx => "tx",
            Self::Ty => "ty",
            Self::Tz => "tz",
            Self::X => "x",
            Self::Y => "y",
            Self::Z => "z",
            Self::Box => "box",
            Self::Rpp => "rpp",
            Self::Sph => "sph",
            Self::Rcc => "rcc",
            Self::Rhp => "rhp",
            Self::Hex => "hex",
            Self::Rec => "rec",
            Self::Trc => "trc",
            Self::Ell => "ell",
            Self::Wed => "wed",
            Self::Arb => "arb",
        }
    }

    /// Numbers of parameters the kind accepts
    ///
    /// | Kind             | Counts  |
    /// | ---------------- | ------- |
    /// | p                | 4, 9    |
    /// | px py pz so      | 1       |
    /// | s                | 4       |
    /// | sx sy sz         | 2       |
    /// | c/x c/y c/z      | 3       |
    /// | cx cy cz         | 1       |
    /// | k/x k/y k/z      | 4, 5    |
    /// | kx ky kz         | 2, 3    |
    /// | sq gq            | 10      |
    /// | tx ty tz         | 6       |
    /// | x y z            | 2, 4, 6 |
    /// | box              | 9, 12   |
    /// | rpp              | 6       |
    /// | sph              | 4       |
    /// | rcc              | 7       |
    /// | rhp hex          | 9, 15   |
    /// | rec              | 10, 12  |
    /// | trc              | 8       |
    /// | ell              | 7       |
    /// | wed              | 12      |
    /// | arb              | 30      |
    pub fn parameter_counts(&self) -> &'static [usize] {
        match self {
            Self::P => &[4, 9],
            Self::Px | Self::Py | Self::Pz | Self::So => &[1],
            Self::S => &[4],
            Self::Sx | Self::Sy | Self::Sz => &[2],
            Self::CSlashX | Self::CSlashY | Self::CSlashZ => &[3],
            Self::Cx | Self::Cy | Self::Cz => &[1],
            Self::KSlashX | Self::KSlashY | Self::KSlashZ => &[4, 5],
            Self::Kx | Self::Ky | Self::Kz => &[2, 3],
            Self::Sq | Self::Gq => &[10],
            Self::Tx | Self::Ty | Self::Tz => &[6],
            Self::X | Self::Y | Self::Z => &[2, 4, 6],
            Self::Box => &[9, 12],
            Self::Rpp => &[6],
            Self::Sph => &[4],
            Self::Rcc => &[7],
            Self::Rhp | Self::Hex => &[9, 15],
            Self::Rec => &[10, 12],
            Self::Trc => &[8],
            Self::Ell => &[7],
            Self::Wed => &[12],
            Self::Arb => &[30],
        }
    }

    /// True if `n` parameters is a valid count for this kind
    pub fn accepts(&self, n: usize) -> bool {
        self.parameter_counts().contains(&n)
    }

    /// Allowed counts as text, e.g. `4 or 9`
    pub fn expected(&self) -> String {
        self.parameter_counts().iter().join(" or ")
    }

    pub fn is_macrobody(&self) -> bool {
        matches!(
            self,
            Self::Box
                | Self::Rpp
                | Self::Sph
                | Self::Rcc
                | Self::Rhp
                | Self::Hex
                | Self::Rec
                | Self::Trc
                | Self::Ell
                | Self::Wed
                | Self::Arb
        )
    }

    /// Check a parameter list against the table
    pub fn check_parameters(&self, parameters: &[f64]) -> Result<()> {
        if self.accepts(parameters.len()) {
            Ok(())
        } else {
            Err(Error::InvalidParameterCount {
                kind: *self,
                expected: self.expected(),
                found: parameters.len(),
            })
        }
    }
}

impl std::str::FromStr for SurfaceKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let lower = s.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|k| k.mnemonic() == lower)
            .ok_or(Error::UnknownSurfaceKind(s.to_string()))
    }
}

impl std::fmt::Display for SurfaceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.mnemonic())
    }
}

/// A surface card
///
/// Tokens after the last real parameter are kept in `trailing` so that they
/// survive a round trip, but take no part in validation.
#[derive(Debug, Clone)]
pub struct Surface {
    pub number: u32,
    pub boundary: Boundary,
    /// Transformation number, negative for periodic boundaries
    pub transform: Option<i32>,
    pub kind: SurfaceKind,
    pub parameters: Vec<f64>,
    pub trailing: Vec<String>,
    pub origin: Option<Origin>,
}

impl PartialEq for Surface {
    fn eq(&self, other: &Self) -> bool {
        self.number == other.number
            && self.boundary == other.boundary
            && self.transform == other.transform
            && self.kind == other.kind
            && self.parameters == other.parameters
            && self.trailing == other.trailing
    }
}

impl Surface {
    /// Ordinary surface with no transformation
    pub fn new(number: u32, kind: SurfaceKind, parameters: Vec<f64>) -> Self {
        Self {
            number,
            boundary: Boundary::Ordinary,
            transform: None,
            kind,
            parameters,
            trailing: Vec::new(),
            origin: None,
        }
    }

    /// Whether the parameter count matches the mnemonic table
    pub fn has_valid_parameters(&self) -> bool {
        self.kind.accepts(self.parameters.len())
    }
}

impl std::fmt::Display for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.boundary.prefix(), self.number)?;
        if let Some(tr) = self.transform {
            write!(f, " {tr}")?;
        }
        write!(f, " {}", self.kind)?;
        for p in &self.parameters {
            write!(f, " {}", p.canonical())?;
        }
        for t in &self.trailing {
            write!(f, " {t}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mnemonics() {
        assert_eq!("SO".parse::<SurfaceKind>().unwrap(), SurfaceKind::So);
        assert_eq!("c/z".parse::<SurfaceKind>().unwrap(), SurfaceKind::CSlashZ);
        assert_eq!("CZ".parse::<SurfaceKind>().unwrap(), SurfaceKind::Cz);
        assert!("tor".parse::<SurfaceKind>().is_err());
    }

    #[test]
    fn parameter_table() {
        assert!(SurfaceKind::P.accepts(4));
        assert!(SurfaceKind::P.accepts(9));
        assert!(!SurfaceKind::P.accepts(5));
        assert_eq!(SurfaceKind::X.expected(), "2 or 4 or 6");
        assert!(SurfaceKind::Rpp.check_parameters(&[0.0; 5]).is_err());
        assert!(SurfaceKind::Rpp.is_macrobody());
    }

    #[test]
    fn display() {
        let mut surface = Surface::new(1, SurfaceKind::So, vec![1.0]);
        assert_eq!(surface.to_string(), "1 so 1");
        surface.boundary = Boundary::Reflecting;
        surface.transform = Some(3);
        assert_eq!(surface.to_string(), "*1 3 so 1");
    }
}
