//! Cell cards and their parameters

use std::collections::BTreeSet;

use itertools::Itertools;
use mcdeck_utils::{f, ValueExt};

use super::{Geometry, Origin, Particle};
use crate::error::{Error, Result};

/// A cell card
///
/// Cells are either written out in full or as `n LIKE m BUT ...`, which is
/// kept symbolic. Use [crate::Document::expand_like] for the expanded view.
#[derive(Debug, Clone)]
pub struct Cell {
    /// Unique cell number
    pub number: u32,
    /// Explicit definition or a LIKE BUT reference
    pub kind: CellKind,
    /// Parameters in the order given
    pub parameters: Vec<Parameter>,
    /// Where the card came from, if it was read from text
    pub origin: Option<Origin>,
}

/// The two forms of cell card
#[derive(Debug, Clone, PartialEq)]
pub enum CellKind {
    /// `n m [rho] geometry`
    Explicit {
        material: u32,
        density: Option<f64>,
        geometry: Geometry,
    },
    /// `n LIKE m BUT`
    Like { base: u32 },
}

impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        self.number == other.number
            && self.kind == other.kind
            && self.parameters == other.parameters
    }
}

impl Cell {
    /// New explicit cell with no parameters
    pub fn new(number: u32, material: u32, density: Option<f64>, geometry: Geometry) -> Self {
        Self {
            number,
            kind: CellKind::Explicit {
                material,
                density,
                geometry,
            },
            parameters: Vec::new(),
            origin: None,
        }
    }

    /// New `LIKE base BUT` cell with no parameters
    pub fn like(number: u32, base: u32) -> Self {
        Self {
            number,
            kind: CellKind::Like { base },
            parameters: Vec::new(),
            origin: None,
        }
    }

    /// Builder style parameter assignment
    pub fn with_param(mut self, key: ParamKey, value: ParamValue) -> Self {
        self.set_param(key, value);
        self
    }

    pub fn is_like(&self) -> bool {
        matches!(self.kind, CellKind::Like { .. })
    }

    /// Cell this one is LIKE, if any
    pub fn like_base(&self) -> Option<u32> {
        match self.kind {
            CellKind::Like { base } => Some(base),
            CellKind::Explicit { .. } => None,
        }
    }

    /// Material number, `MAT` for LIKE cells that override it
    pub fn material(&self) -> Option<u32> {
        match &self.kind {
            CellKind::Explicit { material, .. } => Some(*material),
            CellKind::Like { .. } => self
                .param_value(ParamName::Mat)
                .and_then(|v| v.as_integer())
                .and_then(|m| u32::try_from(m).ok()),
        }
    }

    /// Density, `RHO` for LIKE cells that override it
    pub fn density(&self) -> Option<f64> {
        match &self.kind {
            CellKind::Explicit { density, .. } => *density,
            CellKind::Like { .. } => self.param_value(ParamName::Rho).and_then(|v| v.as_real()),
        }
    }

    pub fn geometry(&self) -> Option<&Geometry> {
        match &self.kind {
            CellKind::Explicit { geometry, .. } => Some(geometry),
            CellKind::Like { .. } => None,
        }
    }

    pub fn geometry_mut(&mut self) -> Option<&mut Geometry> {
        match &mut self.kind {
            CellKind::Explicit { geometry, .. } => Some(geometry),
            CellKind::Like { .. } => None,
        }
    }

    /// Surfaces bounding the cell
    ///
    /// Fill arrays are parsed as a structured `FILL` parameter, never as part
    /// of the geometry, so universe numbers in a lattice array can not be
    /// mistaken for surfaces. LIKE cells have no geometry of their own.
    pub fn referenced_surfaces_of_boundary(&self) -> BTreeSet<u32> {
        self.geometry()
            .map(|g| g.referenced_surfaces())
            .unwrap_or_default()
    }

    /// Universe the cell belongs to, 0 if not set
    ///
    /// A negative `U` only changes how the cell is tracked, so the sign is
    /// dropped.
    pub fn universe(&self) -> u32 {
        self.param_value(ParamName::U)
            .and_then(|v| v.as_integer())
            .map(|u| u.unsigned_abs() as u32)
            .unwrap_or(0)
    }

    pub fn fill(&self) -> Option<&Fill> {
        match self.param_value(ParamName::Fill) {
            Some(ParamValue::Fill(fill)) => Some(fill),
            _ => None,
        }
    }

    pub fn fill_mut(&mut self) -> Option<&mut Fill> {
        self.parameters
            .iter_mut()
            .find(|p| p.key.name == ParamName::Fill)
            .and_then(|p| match &mut p.value {
                ParamValue::Fill(fill) => Some(fill),
                _ => None,
            })
    }

    pub fn lattice(&self) -> Option<LatticeKind> {
        self.param_value(ParamName::Lat)
            .and_then(|v| v.as_integer())
            .and_then(LatticeKind::from_code)
    }

    pub fn transform(&self) -> Option<(&CellTransform, bool)> {
        self.param(ParamName::Trcl).and_then(|p| match &p.value {
            ParamValue::Transform(t) => Some((t, p.key.starred)),
            _ => None,
        })
    }

    /// Importance for a particle set on the cell card
    pub fn importance(&self, particle: Particle) -> Option<f64> {
        self.parameters
            .iter()
            .find(|p| p.key.name == ParamName::Imp && p.key.particles.contains(&particle))
            .and_then(|p| p.value.as_real())
    }

    /// First parameter with the given name
    pub fn param(&self, name: ParamName) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.key.name == name)
    }

    pub fn param_value(&self, name: ParamName) -> Option<&ParamValue> {
        self.param(name).map(|p| &p.value)
    }

    /// Replace the parameter with an identical key, or append it
    pub fn set_param(&mut self, key: ParamKey, value: ParamValue) {
        match self.parameters.iter_mut().find(|p| p.key == key) {
            Some(existing) => existing.value = value,
            None => self.parameters.push(Parameter { key, value }),
        }
    }

    /// Remove every parameter with the given name, returning how many went
    pub fn remove_param(&mut self, name: ParamName) -> usize {
        let before = self.parameters.len();
        self.parameters.retain(|p| p.key.name != name);
        before - self.parameters.len()
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            CellKind::Explicit {
                material,
                density,
                geometry,
            } => {
                write!(f, "{} {}", self.number, material)?;
                if let Some(rho) = density {
                    write!(f, " {}", rho.canonical())?;
                }
                write!(f, " {geometry}")?;
            }
            CellKind::Like { base } => write!(f, "{} like {} but", self.number, base)?,
        }

        for parameter in &self.parameters {
            write!(f, " {parameter}")?;
        }
        Ok(())
    }
}

/// Closed set of cell parameter names
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ParamName {
    U,
    Fill,
    Lat,
    Imp,
    Trcl,
    Vol,
    Pwt,
    Ext,
    Fcl,
    Wwn,
    Dxc,
    Nonu,
    Pd,
    Tmp,
    Elpt,
    Cosy,
    Bflcl,
    Unc,
    /// Only valid after `LIKE n BUT`
    Mat,
    /// Only valid after `LIKE n BUT`
    Rho,
}

impl ParamName {
    const ALL: [ParamName; 20] = [
        Self::U,
        Self::Fill,
        Self::Lat,
        Self::Imp,
        Self::Trcl,
        Self::Vol,
        Self::Pwt,
        Self::Ext,
        Self::Fcl,
        Self::Wwn,
        Self::Dxc,
        Self::Nonu,
        Self::Pd,
        Self::Tmp,
        Self::Elpt,
        Self::Cosy,
        Self::Bflcl,
        Self::Unc,
        Self::Mat,
        Self::Rho,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::U => "u",
            Self::Fill => "fill",
            Self::Lat => "lat",
            Self::Imp => "imp",
            Self::Trcl => "trcl",
            Self::Vol => "vol",
            Self::Pwt => "pwt",
            Self::Ext => "ext",
            Self::Fcl => "fcl",
            Self::Wwn => "wwn",
            Self::Dxc => "dxc",
            Self::Nonu => "nonu",
            Self::Pd => "pd",
            Self::Tmp => "tmp",
            Self::Elpt => "elpt",
            Self::Cosy => "cosy",
            Self::Bflcl => "bflcl",
            Self::Unc => "unc",
            Self::Mat => "mat",
            Self::Rho => "rho",
        }
    }

    /// Case-insensitive lookup of a parameter name
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.to_lowercase();
        Self::ALL.into_iter().find(|p| p.as_str() == name)
    }

    /// Parameters that must carry a particle designator
    pub fn requires_particles(&self) -> bool {
        matches!(self, Self::Imp | Self::Ext | Self::Fcl | Self::Wwn | Self::Dxc | Self::Pd | Self::Elpt)
    }

    /// Parameters that accept the `*` prefix for angles in degrees
    pub fn accepts_star(&self) -> bool {
        matches!(self, Self::Fill | Self::Trcl)
    }

    /// Parameters that only make sense after `LIKE n BUT`
    pub fn like_only(&self) -> bool {
        matches!(self, Self::Mat | Self::Rho)
    }
}

impl std::fmt::Display for ParamName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parameter key, `name`, optional index, and optional particles
///
/// ```rust
/// # use mcdeck_input::{ParamKey, ParamName, Particle};
/// let key: ParamKey = "IMP:N,P".parse().unwrap();
/// assert_eq!(key.name, ParamName::Imp);
/// assert_eq!(key.particles, vec![Particle::Neutron, Particle::Photon]);
/// assert_eq!(key.to_string(), "imp:n,p");
/// assert_eq!(key.flattened(), "imp_n,p");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParamKey {
    pub name: ParamName,
    /// Numeric suffix, e.g. the energy bin of `WWN1:N` or the time of `TMP2`
    pub index: Option<u32>,
    pub particles: Vec<Particle>,
    /// `*TRCL` and `*FILL` give rotations in degrees
    pub starred: bool,
}

impl ParamKey {
    /// Key with only a name
    pub fn new(name: ParamName) -> Self {
        Self {
            name,
            index: None,
            particles: Vec::new(),
            starred: false,
        }
    }

    /// Particle qualified key such as `IMP:N`
    pub fn with_particles(name: ParamName, particles: &[Particle]) -> Self {
        Self {
            particles: particles.to_vec(),
            ..Self::new(name)
        }
    }

    /// String safe form with the particle qualifier joined by `_`
    pub fn flattened(&self) -> String {
        let mut key = self.head();
        if !self.particles.is_empty() {
            key.push('_');
            key.push_str(&Particle::join(&self.particles));
        }
        key
    }

    fn head(&self) -> String {
        let mut head = String::new();
        if self.starred {
            head.push('*');
        }
        head.push_str(self.name.as_str());
        if let Some(index) = self.index {
            head.push_str(&index.to_string());
        }
        head
    }
}

impl std::str::FromStr for ParamKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (head, particles) = match s.split_once(':') {
            Some((head, particles)) => (head, Some(particles)),
            None => (s, None),
        };

        let (starred, head) = match head.strip_prefix('*') {
            Some(rest) => (true, rest),
            None => (false, head),
        };

        let split = head
            .find(|c: char| c.is_ascii_digit())
            .unwrap_or(head.len());
        let (name, index) = head.split_at(split);

        let name = ParamName::from_name(name)
            .ok_or_else(|| Error::parse(s, f!("unknown cell parameter \"{name}\"")))?;

        let index = match index {
            "" => None,
            digits => Some(
                digits
                    .parse::<u32>()
                    .map_err(|_| Error::parse(s, "invalid parameter index"))?,
            ),
        };

        if starred && !name.accepts_star() {
            return Err(Error::parse(s, f!("{name} does not accept '*'")));
        }

        let particles = match particles {
            Some(list) => Particle::parse_list(list)?,
            None if name.requires_particles() => {
                return Err(Error::parse(s, f!("{name} requires a particle designator")))
            }
            None => Vec::new(),
        };

        Ok(Self {
            name,
            index,
            particles,
            starred,
        })
    }
}

impl std::fmt::Display for ParamKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.head())?;
        if !self.particles.is_empty() {
            write!(f, ":{}", Particle::join(&self.particles))?;
        }
        Ok(())
    }
}

/// A `key=value` pair on a cell card
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub key: ParamKey,
    pub value: ParamValue,
}

impl std::fmt::Display for Parameter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

/// Typed parameter values
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Integer(i64),
    Real(f64),
    Fill(Fill),
    Transform(CellTransform),
    /// Anything else, kept as written
    Entries(Vec<String>),
}

impl ParamValue {
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric value, integers included
    pub fn as_real(&self) -> Option<f64> {
        match self {
            Self::Real(r) => Some(*r),
            Self::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }
}

impl std::fmt::Display for ParamValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer(i) => write!(f, "{i}"),
            Self::Real(r) => write!(f, "{}", r.canonical()),
            Self::Fill(fill) => write!(f, "{fill}"),
            Self::Transform(t) => write!(f, "{t}"),
            Self::Entries(entries) => write!(f, "{}", entries.join(" ")),
        }
    }
}

/// Transformation of a cell, by number or given inline
#[derive(Debug, Clone, PartialEq)]
pub enum CellTransform {
    /// Reference to a `TRn` card
    Number(u32),
    /// 3, 9, 12, or 13 values in parentheses
    Inline(Vec<f64>),
}

impl CellTransform {
    /// Always in parentheses, as required inside a `FILL`
    pub fn parenthesised(&self) -> String {
        match self {
            Self::Number(n) => f!("({n})"),
            Self::Inline(_) => self.to_string(),
        }
    }
}

impl std::fmt::Display for CellTransform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Inline(values) => write!(
                f,
                "({})",
                values.iter().map(|v| v.canonical()).join(" ")
            ),
        }
    }
}

/// Lattice geometry selected by `LAT`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LatticeKind {
    /// `LAT=1`, hexahedral elements
    Rectangular,
    /// `LAT=2`, hexagonal prism elements
    Hexagonal,
}

impl LatticeKind {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Self::Rectangular),
            2 => Some(Self::Hexagonal),
            _ => None,
        }
    }

    pub fn code(&self) -> i64 {
        match self {
            Self::Rectangular => 1,
            Self::Hexagonal => 2,
        }
    }
}

/// Contents of a `FILL` parameter
#[derive(Debug, Clone, PartialEq)]
pub enum Fill {
    /// `FILL=u` with an optional transformation, `FILL=u (tr)`
    Universe {
        universe: u32,
        transform: Option<CellTransform>,
    },
    /// `FILL=i1:i2 j1:j2 k1:k2 u u u ...` for lattices
    Array {
        ranges: [(i32, i32); 3],
        entries: Vec<FillEntry>,
    },
}

/// A single item of a fill array as written
#[derive(Debug, Clone, PartialEq)]
pub enum FillEntry {
    Universe(u32),
    /// `nR`, repeat the previous universe n more times
    Repeat(u32),
    /// `(tr)` applying to the previous universe
    Transform(CellTransform),
}

impl std::fmt::Display for FillEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Universe(u) => write!(f, "{u}"),
            Self::Repeat(n) => write!(f, "{n}r"),
            Self::Transform(t) => write!(f, "{}", t.parenthesised()),
        }
    }
}

/// Most lattice positions [Fill::expanded] will materialise
pub const MAX_FILL_ELEMENTS: usize = 1 << 24;

impl Fill {
    /// Universes named anywhere in the fill, in order of first appearance
    ///
    /// Repeats are not expanded, so this stays proportional to the text.
    pub fn universes(&self) -> Vec<u32> {
        match self {
            Self::Universe { universe, .. } => vec![*universe],
            Self::Array { entries, .. } => {
                let mut universes = Vec::new();
                for entry in entries {
                    if let FillEntry::Universe(u) = entry {
                        if !universes.contains(u) {
                            universes.push(*u);
                        }
                    }
                }
                universes
            }
        }
    }

    /// Fill array with `nR` repeats expanded
    ///
    /// Stops at [MAX_FILL_ELEMENTS], use [Fill::entry_count] to compare
    /// against the ranges without expanding anything.
    ///
    /// ```rust
    /// # use mcdeck_input::{Fill, FillEntry};
    /// let fill = Fill::Array {
    ///     ranges: [(-1, 1), (-1, 1), (0, 0)],
    ///     entries: vec![
    ///         FillEntry::Universe(7),
    ///         FillEntry::Repeat(2),
    ///         FillEntry::Universe(7),
    ///         FillEntry::Repeat(4),
    ///     ],
    /// };
    /// assert_eq!(fill.expanded(), vec![7; 8]);
    /// assert_eq!(fill.entry_count(), 8);
    /// assert_eq!(fill.expected_len(), Some(9));
    /// ```
    pub fn expanded(&self) -> Vec<u32> {
        let Self::Array { entries, .. } = self else {
            return Vec::new();
        };

        let mut expanded = Vec::with_capacity(entries.len().min(MAX_FILL_ELEMENTS));
        for entry in entries {
            let room = MAX_FILL_ELEMENTS - expanded.len();
            match entry {
                _ if room == 0 => break,
                FillEntry::Universe(u) => expanded.push(*u),
                FillEntry::Repeat(n) => {
                    if let Some(&last) = expanded.last() {
                        let n = usize::try_from(*n).unwrap_or(usize::MAX).min(room);
                        expanded.extend(std::iter::repeat(last).take(n));
                    }
                }
                FillEntry::Transform(_) => (),
            }
        }
        expanded
    }

    /// Number of lattice positions the entries fill once repeats are counted
    pub fn entry_count(&self) -> u64 {
        let Self::Array { entries, .. } = self else {
            return 1;
        };

        let mut count = 0u64;
        let mut seen_universe = false;
        for entry in entries {
            match entry {
                FillEntry::Universe(_) => {
                    seen_universe = true;
                    count = count.saturating_add(1);
                }
                FillEntry::Repeat(n) if seen_universe => count = count.saturating_add(u64::from(*n)),
                _ => (),
            }
        }
        count
    }

    /// Number of lattice elements covered by the ranges, `None` if the
    /// product does not fit in a `u64`
    pub fn expected_len(&self) -> Option<u64> {
        match self {
            Self::Universe { .. } => Some(1),
            Self::Array { .. } => self
                .spans()
                .iter()
                .try_fold(1u64, |product, span| product.checked_mul(*span)),
        }
    }

    /// Span of each range, for messages like `3·3·1 = 9`
    pub fn spans(&self) -> [u64; 3] {
        match self {
            Self::Universe { .. } => [1, 1, 1],
            Self::Array { ranges, .. } => {
                ranges.map(|(lo, hi)| (i64::from(hi) - i64::from(lo) + 1).max(0) as u64)
            }
        }
    }

    /// Rename every occurrence of a universe, returning the number of lattice
    /// positions affected after repeat expansion
    pub fn replace_universe(&mut self, old: u32, new: u32) -> usize {
        match self {
            Self::Universe { universe, .. } => {
                if *universe == old {
                    *universe = new;
                    1
                } else {
                    0
                }
            }
            Self::Array { entries, .. } => {
                let mut count: usize = 0;
                let mut last_replaced = false;
                for entry in entries.iter_mut() {
                    match entry {
                        FillEntry::Universe(u) => {
                            last_replaced = *u == old;
                            if last_replaced {
                                *u = new;
                                count += 1;
                            }
                        }
                        FillEntry::Repeat(n) if last_replaced => {
                            count = count.saturating_add(*n as usize)
                        }
                        _ => (),
                    }
                }
                count
            }
        }
    }
}

impl std::fmt::Display for Fill {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Universe {
                universe,
                transform,
            } => {
                write!(f, "{universe}")?;
                if let Some(t) = transform {
                    write!(f, " {}", t.parenthesised())?;
                }
                Ok(())
            }
            Self::Array { ranges, entries } => {
                let ranges = ranges.iter().map(|(lo, hi)| f!("{lo}:{hi}")).join(" ");
                write!(f, "{ranges}")?;
                for entry in entries {
                    write!(f, " {entry}")?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn param_keys() {
        let key: ParamKey = "*TRCL".parse().unwrap();
        assert!(key.starred);
        assert_eq!(key.name, ParamName::Trcl);

        let key: ParamKey = "wwn1:n".parse().unwrap();
        assert_eq!(key.index, Some(1));
        assert_eq!(key.to_string(), "wwn1:n");

        assert!("imp".parse::<ParamKey>().is_err());
        assert!("*u".parse::<ParamKey>().is_err());
        assert!("colour".parse::<ParamKey>().is_err());
        assert!("imp:n,j".parse::<ParamKey>().is_err());
    }

    #[test]
    fn repeat_expansion() {
        let fill = Fill::Array {
            ranges: [(0, 9), (0, 0), (0, 0)],
            entries: vec![FillEntry::Universe(100), FillEntry::Repeat(2)],
        };
        assert_eq!(fill.expanded(), vec![100, 100, 100]);

        let fill = Fill::Array {
            ranges: [(0, 24), (0, 0), (0, 0)],
            entries: vec![FillEntry::Universe(100), FillEntry::Repeat(24)],
        };
        assert_eq!(fill.expanded().len(), 25);
        assert_eq!(fill.entry_count(), 25);
        assert_eq!(fill.expected_len(), Some(25));
    }

    #[test]
    fn oversized_ranges_are_not_counted() {
        let fill = Fill::Array {
            ranges: [(-2_000_000_000, 2_000_000_000); 3],
            entries: vec![FillEntry::Universe(1)],
        };
        assert_eq!(fill.spans(), [4_000_000_001; 3]);
        assert_eq!(fill.expected_len(), None);

        let fill = Fill::Array {
            ranges: [(i32::MIN, i32::MAX), (0, 0), (0, 0)],
            entries: vec![FillEntry::Universe(1)],
        };
        assert_eq!(fill.expected_len(), Some(1 << 32));
    }

    #[test]
    fn huge_repeats_are_counted_not_expanded() {
        let fill = Fill::Array {
            ranges: [(0, 0), (0, 0), (0, 0)],
            entries: vec![
                FillEntry::Universe(1),
                FillEntry::Repeat(4_000_000_000),
                FillEntry::Universe(2),
                FillEntry::Repeat(u32::MAX),
            ],
        };
        assert_eq!(fill.entry_count(), 2 + 4_000_000_000 + u64::from(u32::MAX));
        assert_eq!(fill.expanded().len(), MAX_FILL_ELEMENTS);
        assert_eq!(fill.universes(), vec![1, 2]);
    }

    #[test]
    fn leading_repeat_fills_nothing() {
        let fill = Fill::Array {
            ranges: [(0, 1), (0, 0), (0, 0)],
            entries: vec![FillEntry::Repeat(3), FillEntry::Universe(4)],
        };
        assert_eq!(fill.entry_count(), 1);
        assert_eq!(fill.expanded(), vec![4]);
    }

    #[test]
    fn replace_counts_positions() {
        let mut fill = Fill::Array {
            ranges: [(-1, 1), (-1, 1), (0, 0)],
            entries: vec![
                FillEntry::Universe(1),
                FillEntry::Repeat(3),
                FillEntry::Universe(2),
                FillEntry::Universe(1),
                FillEntry::Repeat(2),
            ],
        };
        assert_eq!(fill.replace_universe(1, 5), 7);
        assert_eq!(fill.expanded(), vec![5, 5, 5, 5, 2, 5, 5, 5]);
        assert_eq!(fill.to_string(), "-1:1 -1:1 0:0 5 3r 2 5 2r");
    }

    #[test]
    fn cell_accessors() {
        let geometry: Geometry = "-1".parse().unwrap();
        let cell = Cell::new(10, 0, None, geometry)
            .with_param(ParamKey::new(ParamName::U), ParamValue::Integer(-3))
            .with_param(
                ParamKey::with_particles(ParamName::Imp, &[Particle::Neutron]),
                ParamValue::Real(1.0),
            );
        assert_eq!(cell.universe(), 3);
        assert_eq!(cell.importance(Particle::Neutron), Some(1.0));
        assert_eq!(cell.importance(Particle::Photon), None);
        assert_eq!(cell.to_string(), "10 0 -1 u=-3 imp:n=1");
    }
}
