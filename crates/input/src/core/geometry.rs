//! Boolean CSG expressions of cell geometry

use std::collections::BTreeSet;

/// Side of a surface selected by a reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sense {
    /// Explicit `+N`
    Positive,
    /// Explicit `-N`
    Negative,
    /// Unsigned `N`, resolved to the negative half-space
    Bare,
}

impl Sense {
    /// Half-space actually selected, with bare references made explicit
    pub fn resolved(&self) -> Self {
        match self {
            Self::Bare => Self::Negative,
            other => *other,
        }
    }

    /// True for both explicit and bare negative references
    pub fn is_negative(&self) -> bool {
        self.resolved() == Self::Negative
    }

    fn prefix(&self) -> &'static str {
        match self {
            Self::Positive => "+",
            Self::Negative => "-",
            Self::Bare => "",
        }
    }
}

/// A signed reference to a surface, or a facet of a macrobody
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HalfSpace {
    pub surface: u32,
    pub facet: Option<u8>,
    pub sense: Sense,
}

impl HalfSpace {
    pub fn new(surface: u32, sense: Sense) -> Self {
        Self {
            surface,
            facet: None,
            sense,
        }
    }
}

impl std::fmt::Display for HalfSpace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.sense.prefix(), self.surface)?;
        if let Some(facet) = self.facet {
            write!(f, ".{facet}")?;
        }
        Ok(())
    }
}

/// Expression tree of a cell geometry
///
/// Built through [Geometry::intersection] and [Geometry::union] the tree is
/// kept flat: a node never has a direct child of its own kind, and never has
/// a single child. Parsed geometries are always in this form, so structural
/// equality ignores redundant parentheses.
///
/// ```rust
/// # use mcdeck_input::Geometry;
/// let geometry: Geometry = "-1 (2 : -3) #4".parse().unwrap();
/// assert_eq!(geometry.referenced_surfaces().into_iter().collect::<Vec<_>>(), vec![1, 2, 3]);
/// assert_eq!(geometry.referenced_cells().into_iter().collect::<Vec<_>>(), vec![4]);
/// assert_eq!(geometry.to_string(), "-1 (2 : -3) #4");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    HalfSpace(HalfSpace),
    /// `#n`, the complement of another cell
    CellComplement(u32),
    /// `#(...)`, the complement of an expression
    Complement(Box<Geometry>),
    Intersection(Vec<Geometry>),
    Union(Vec<Geometry>),
}

impl Geometry {
    /// Intersection of the children, flattening nested intersections
    pub fn intersection(children: Vec<Geometry>) -> Self {
        let mut flat = Vec::with_capacity(children.len());
        for child in children {
            match child {
                Self::Intersection(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }
        match flat.len() {
            1 => flat.remove(0),
            _ => Self::Intersection(flat),
        }
    }

    /// Union of the children, flattening nested unions
    pub fn union(children: Vec<Geometry>) -> Self {
        let mut flat = Vec::with_capacity(children.len());
        for child in children {
            match child {
                Self::Union(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }
        match flat.len() {
            1 => flat.remove(0),
            _ => Self::Union(flat),
        }
    }

    /// Every half-space leaf, depth first
    pub fn half_spaces(&self) -> Vec<&HalfSpace> {
        let mut leaves = Vec::new();
        self.visit(&mut |node| {
            if let Self::HalfSpace(h) = node {
                leaves.push(h);
            }
        });
        leaves
    }

    /// Surface numbers of all half-space leaves, facets reduced to the body
    pub fn referenced_surfaces(&self) -> BTreeSet<u32> {
        self.half_spaces().iter().map(|h| h.surface).collect()
    }

    /// Cell numbers of all `#n` complements
    pub fn referenced_cells(&self) -> BTreeSet<u32> {
        let mut cells = BTreeSet::new();
        self.visit(&mut |node| {
            if let Self::CellComplement(n) = node {
                cells.insert(*n);
            }
        });
        cells
    }

    /// New expression with every reference to `old` renamed to `new`
    ///
    /// Sense and facet of each reference are preserved.
    ///
    /// ```rust
    /// # use mcdeck_input::Geometry;
    /// let geometry: Geometry = "-1 2 -3".parse().unwrap();
    /// assert_eq!(geometry.substitute_surface(2, 99).to_string(), "-1 99 -3");
    /// ```
    pub fn substitute_surface(&self, old: u32, new: u32) -> Self {
        let mut substituted = self.clone();
        substituted.rename_surface(old, new);
        substituted
    }

    /// In-place version of [Geometry::substitute_surface], returning the
    /// number of references renamed
    pub fn rename_surface(&mut self, old: u32, new: u32) -> usize {
        let mut count = 0;
        self.visit_mut(&mut |node| {
            if let Self::HalfSpace(h) = node {
                if h.surface == old {
                    h.surface = new;
                    count += 1;
                }
            }
        });
        count
    }

    /// In-place rename of `#old` cell complements
    pub fn rename_cell(&mut self, old: u32, new: u32) -> usize {
        let mut count = 0;
        self.visit_mut(&mut |node| {
            if let Self::CellComplement(n) = node {
                if *n == old {
                    *n = new;
                    count += 1;
                }
            }
        });
        count
    }

    fn visit<'a>(&'a self, f: &mut impl FnMut(&'a Geometry)) {
        f(self);
        match self {
            Self::Complement(inner) => inner.visit(&mut *f),
            Self::Intersection(children) | Self::Union(children) => {
                for child in children {
                    child.visit(&mut *f);
                }
            }
            _ => (),
        }
    }

    fn visit_mut(&mut self, f: &mut impl FnMut(&mut Geometry)) {
        f(self);
        match self {
            Self::Complement(inner) => inner.visit_mut(&mut *f),
            Self::Intersection(children) | Self::Union(children) => {
                for child in children {
                    child.visit_mut(&mut *f);
                }
            }
            _ => (),
        }
    }
}

impl std::str::FromStr for Geometry {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::parsers::parse_geometry(s)
    }
}

impl std::fmt::Display for Geometry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HalfSpace(h) => write!(f, "{h}"),
            Self::CellComplement(n) => write!(f, "#{n}"),
            Self::Complement(inner) => write!(f, "#({inner})"),
            Self::Intersection(children) => {
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    match child {
                        Self::Union(_) => write!(f, "({child})")?,
                        _ => write!(f, "{child}")?,
                    }
                }
                Ok(())
            }
            Self::Union(children) => {
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        write!(f, " : ")?;
                    }
                    write!(f, "{child}")?;
                }
                Ok(())
            }
        }
    }
}

/// Check that an expression is well formed
///
/// Parentheses must balance, every token must be recognisable, and every
/// surface number must be a valid positive integer.
///
/// ```rust
/// # use mcdeck_input::validate_geometry;
/// assert!(validate_geometry("-1 (2:3)").is_ok());
/// assert!(validate_geometry("-1 (2:3").is_err());
/// assert!(validate_geometry("-1 x").is_err());
/// ```
pub fn validate_geometry(text: &str) -> crate::error::Result<()> {
    crate::parsers::parse_geometry(text).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry(s: &str) -> Geometry {
        s.parse().unwrap()
    }

    #[test]
    fn flattening() {
        let g = geometry("(1 2) 3");
        assert_eq!(g, geometry("1 2 3"));
        let g = geometry("1 : (2 : 3)");
        assert_eq!(g, geometry("1 : 2 : 3"));
        assert_eq!(geometry("((-1))"), geometry("-1"));
    }

    #[test]
    fn minimal_parentheses() {
        assert_eq!(geometry("(1 2) : 3").to_string(), "1 2 : 3");
        assert_eq!(geometry("1 (2 : 3)").to_string(), "1 (2 : 3)");
        assert_eq!(geometry("#(1 : 2) 3").to_string(), "#(1 : 2) 3");
        assert_eq!(geometry("#(1)").to_string(), "#(1)");
    }

    #[test]
    fn sense_is_preserved() {
        let g = geometry("+1 -2 3");
        let senses: Vec<Sense> = g.half_spaces().iter().map(|h| h.sense).collect();
        assert_eq!(senses, vec![Sense::Positive, Sense::Negative, Sense::Bare]);
        assert!(Sense::Bare.is_negative());
        assert_eq!(g.to_string(), "+1 -2 3");
    }

    #[test]
    fn facets() {
        let g = geometry("-10.2 10.3");
        assert_eq!(g.referenced_surfaces().len(), 1);
        assert_eq!(g.to_string(), "-10.2 10.3");
    }

    #[test]
    fn rename_counts() {
        let mut g = geometry("-1 (1 : -2) #(1)");
        assert_eq!(g.rename_surface(1, 5), 3);
        assert_eq!(g.to_string(), "-5 (5 : -2) #(5)");
        let mut g = geometry("-1 #3 #3");
        assert_eq!(g.rename_cell(3, 4), 2);
        assert_eq!(g.to_string(), "-1 #4 #4");
    }
}
