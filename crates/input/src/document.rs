//! The in-memory model of a complete input deck

use std::borrow::Cow;
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::OnceLock;

use indexmap::IndexMap;
use log::{info, warn};

use crate::core::{
    read_mode, CardKind, Cell, CellKind, DataCard, Diagnostics, Kcode, Material, ParamName,
    Particle, Surface, TallyCard, ThermalBinding, Transformation,
};
use crate::error::{Error, Result};
use crate::graph::CrossReferenceGraph;
use crate::reader::Reader;

/// Parsed representation of an input deck
///
/// Cells, surfaces, and data cards are kept in insertion order so that a
/// serialised deck follows the order of the source. Every identity is unique
/// within its namespace.
///
/// The collections are only reachable through methods so that every change
/// goes through the editing API, which keeps [Document::revision] and the
/// cached [CrossReferenceGraph] in step with the content.
///
/// ```rust
/// # use mcdeck_input::Document;
/// let deck = "simple problem
/// 10 0 -1 imp:n=1
/// 20 0  1 imp:n=0
///
/// 1 so 1.0
///
/// mode n
/// nps 1000
/// sdef
/// ";
/// let doc = Document::from_str(deck).unwrap();
/// assert_eq!(doc.title, "simple problem");
/// assert_eq!(doc.cells().len(), 2);
/// assert_eq!(doc.surfaces().len(), 1);
/// assert_eq!(doc.data_cards().len(), 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Document {
    /// Title card
    pub title: String,
    /// Optional `MESSAGE:` block, without the leading tag
    pub message: Option<String>,
    pub(crate) cells: IndexMap<u32, Cell>,
    pub(crate) surfaces: IndexMap<u32, Surface>,
    pub(crate) data_cards: IndexMap<String, DataCard>,
    pub(crate) diagnostics: Diagnostics,
    pub(crate) revision: u64,
    pub(crate) graph: OnceLock<CrossReferenceGraph>,
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.title == other.title
            && self.message == other.message
            && self.cells == other.cells
            && self.surfaces == other.surfaces
            && self.data_cards == other.data_cards
    }
}

// ! Construction
impl Document {
    /// Empty document with a title
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            ..Default::default()
        }
    }

    /// Parse the full text of an input deck
    ///
    /// Only structural problems are errors. Cards that can not be read are
    /// skipped and recorded in [Document::diagnostics].
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(source: &str) -> Result<Self> {
        Reader::new().read(source)
    }

    /// Read and parse an input deck from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Reading {}", path.display());
        let source = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::InvalidData => Error::InvalidEncoding,
            _ => Error::IOError(e),
        })?;
        Self::from_str(&source)
    }
}

// ! Read access
impl Document {
    pub fn cells(&self) -> &IndexMap<u32, Cell> {
        &self.cells
    }

    pub fn surfaces(&self) -> &IndexMap<u32, Surface> {
        &self.surfaces
    }

    pub fn data_cards(&self) -> &IndexMap<String, DataCard> {
        &self.data_cards
    }

    pub fn cell(&self, number: u32) -> Option<&Cell> {
        self.cells.get(&number)
    }

    pub fn surface(&self, number: u32) -> Option<&Surface> {
        self.surfaces.get(&number)
    }

    /// Data card by name, case insensitive
    pub fn data_card(&self, name: &str) -> Option<&DataCard> {
        self.data_cards.get(&name.to_lowercase())
    }

    /// Problems recovered from while reading
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Counter incremented by every mutation
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Cross-reference graph of the current content
    ///
    /// Built on first use and cached until the next mutation.
    pub fn cross_reference_graph(&self) -> &CrossReferenceGraph {
        self.graph.get_or_init(|| CrossReferenceGraph::build(self))
    }
}

// ! Typed views of data cards
impl Document {
    /// Numbers of every `Mn` card, whether or not its contents are valid
    pub fn material_numbers(&self) -> BTreeSet<u32> {
        self.data_cards
            .values()
            .filter_map(|c| match c.kind() {
                CardKind::Material(n) => Some(n),
                _ => None,
            })
            .collect()
    }

    /// The `Mn` card for a material
    pub fn material_card(&self, number: u32) -> Option<&DataCard> {
        self.data_cards
            .values()
            .find(|c| c.kind() == CardKind::Material(number))
    }

    /// Every material that can be read
    pub fn materials(&self) -> Vec<Material> {
        self.cards_of(|k| matches!(k, CardKind::Material(_)), Material::from_card)
    }

    /// A single material, if defined and readable
    pub fn material(&self, number: u32) -> Option<Material> {
        self.material_card(number)
            .and_then(|card| Material::from_card(card).ok())
    }

    /// Every `MTn` card
    pub fn thermal_bindings(&self) -> Vec<ThermalBinding> {
        self.cards_of(|k| matches!(k, CardKind::Thermal(_)), ThermalBinding::from_card)
    }

    /// The `MTn` card for a material
    pub fn thermal_binding(&self, material: u32) -> Option<ThermalBinding> {
        self.data_cards
            .values()
            .find(|c| c.kind() == CardKind::Thermal(material))
            .and_then(|card| ThermalBinding::from_card(card).ok())
    }

    /// Particles transported, neutrons only without a `MODE` card
    pub fn mode(&self) -> Result<Vec<Particle>> {
        read_mode(self.data_card("mode"))
    }

    /// Every `TRn` and `*TRn` card that can be read
    pub fn transformations(&self) -> Vec<Transformation> {
        self.cards_of(
            |k| matches!(k, CardKind::Transform { .. }),
            Transformation::from_card,
        )
    }

    /// Transformation by number
    pub fn transformation(&self, number: u32) -> Option<Transformation> {
        self.transformations()
            .into_iter()
            .find(|t| t.number == number)
    }

    /// Every tally and tally modifier card
    pub fn tallies(&self) -> Vec<TallyCard> {
        self.cards_of(|k| matches!(k, CardKind::Tally { .. }), TallyCard::from_card)
    }

    /// The `KCODE` card, if present
    pub fn kcode(&self) -> Option<Result<Kcode>> {
        self.data_card("kcode").map(Kcode::from_card)
    }

    /// Read every card of a kind, logging and skipping the unreadable ones
    fn cards_of<T, F, R>(&self, filter: F, read: R) -> Vec<T>
    where
        F: Fn(&CardKind) -> bool,
        R: Fn(&DataCard) -> Result<T>,
    {
        self.data_cards
            .values()
            .filter(|c| filter(&c.kind()))
            .filter_map(|c| match read(c) {
                Ok(value) => Some(value),
                Err(e) => {
                    warn!("Unable to read \"{}\": {e}", c.name);
                    None
                }
            })
            .collect()
    }
}

// ! LIKE n BUT expansion
impl Document {
    /// Expanded view of a cell
    ///
    /// Explicit cells are borrowed as they are. A `LIKE n BUT` cell is
    /// resolved through its chain of base cells, with `MAT` and `RHO`
    /// replacing the material and density and every other parameter
    /// replacing the one of the same name and particles.
    ///
    /// ```rust
    /// # use mcdeck_input::Document;
    /// let doc = Document::from_str("t\n1 1 -1.0 -1 imp:n=1\n2 like 1 but rho=-2.0\n\n1 so 1\n\nm1 1001 1\n").unwrap();
    /// let cell = doc.expand_like(2).unwrap();
    /// assert_eq!(cell.number, 2);
    /// assert_eq!(cell.material(), Some(1));
    /// assert_eq!(cell.density(), Some(-2.0));
    /// ```
    pub fn expand_like(&self, number: u32) -> Result<Cow<'_, Cell>> {
        let cell = self.cells.get(&number).ok_or(Error::CellNotFound(number))?;

        let mut chain = vec![cell];
        let mut current = cell;
        while let CellKind::Like { base } = current.kind {
            let next = self
                .cells
                .get(&base)
                .ok_or(Error::UnresolvedLike { cell: number })?;
            if chain.iter().any(|c| c.number == next.number) {
                return Err(Error::UnresolvedLike { cell: number });
            }
            chain.push(next);
            current = next;
        }

        if chain.len() == 1 {
            return Ok(Cow::Borrowed(cell));
        }

        // apply overrides from the nearest base outwards
        let mut expanded = current.clone();
        for like in chain.iter().rev().skip(1) {
            apply_overrides(&mut expanded, like);
        }
        expanded.number = number;
        expanded.origin = cell.origin.clone();
        Ok(Cow::Owned(expanded))
    }
}

fn apply_overrides(expanded: &mut Cell, like: &Cell) {
    for parameter in &like.parameters {
        match parameter.key.name {
            ParamName::Mat => {
                if let (Some(m), CellKind::Explicit { material, density, .. }) =
                    (parameter.value.as_integer(), &mut expanded.kind)
                {
                    *material = u32::try_from(m).unwrap_or(0);
                    if *material == 0 {
                        *density = None;
                    }
                }
            }
            ParamName::Rho => (),
            _ => {
                let key = &parameter.key;
                expanded.parameters.retain(|p| {
                    !(p.key.name == key.name
                        && p.key.index == key.index
                        && p.key.particles == key.particles)
                });
                expanded.parameters.push(parameter.clone());
            }
        }
    }

    // density after material so that MAT=0 RHO=x can not leave a density
    if let (Some(rho), CellKind::Explicit { material, density, .. }) =
        (like.density(), &mut expanded.kind)
    {
        if *material != 0 {
            *density = Some(rho);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIKE_CHAIN: &str = "like chain
1 1 -1.0 -1 imp:n=1 u=2
2 like 1 but trcl=(1 0 0)
3 like 2 but mat=0 imp:n=4
4 like 9 but u=3
5 like 6 but u=1
6 like 5 but u=1

1 so 1

m1 1001 1
";

    #[test]
    fn explicit_cells_are_borrowed() {
        let doc = Document::from_str(LIKE_CHAIN).unwrap();
        assert!(matches!(doc.expand_like(1).unwrap(), Cow::Borrowed(_)));
    }

    #[test]
    fn chained_like() {
        let doc = Document::from_str(LIKE_CHAIN).unwrap();

        let two = doc.expand_like(2).unwrap();
        assert_eq!(two.material(), Some(1));
        assert_eq!(two.density(), Some(-1.0));
        assert!(two.transform().is_some());
        assert_eq!(two.universe(), 2);

        let three = doc.expand_like(3).unwrap();
        assert_eq!(three.material(), Some(0));
        assert_eq!(three.density(), None);
        assert_eq!(three.importance(Particle::Neutron), Some(4.0));
        assert!(three.transform().is_some());
        assert_eq!(three.geometry(), doc.cell(1).and_then(|c| c.geometry()));
    }

    #[test]
    fn unresolved_like() {
        let doc = Document::from_str(LIKE_CHAIN).unwrap();
        assert!(matches!(doc.expand_like(4), Err(Error::UnresolvedLike { cell: 4 })));
        assert!(matches!(doc.expand_like(5), Err(Error::UnresolvedLike { cell: 5 })));
        assert!(matches!(doc.expand_like(99), Err(Error::CellNotFound(99))));
    }

    #[test]
    fn typed_views() {
        let doc = Document::from_str(
            "t\n1 1 -1.0 -1\n\n1 so 1\n\nm1 1001.80c 2 8016.80c 1\nmt1 lwtr.20t\ntr2 1 0 0\nf4:n 1\nkcode 100 1.0 5 50\n",
        )
        .unwrap();
        assert_eq!(doc.material_numbers().into_iter().collect::<Vec<_>>(), vec![1]);
        assert_eq!(doc.materials().len(), 1);
        assert!(doc.thermal_binding(1).is_some());
        assert!(doc.thermal_binding(2).is_none());
        assert_eq!(doc.mode().unwrap(), vec![Particle::Neutron]);
        assert_eq!(doc.transformation(2).map(|t| t.displacement), Some([1.0, 0.0, 0.0]));
        assert_eq!(doc.tallies().len(), 1);
        assert_eq!(doc.kcode().unwrap().unwrap().cycles, Some(50));
    }

    #[test]
    fn equality_ignores_diagnostics() {
        let a = Document::from_str("t\n1 0 -1\n   imp:n=1\n\n1 so 1\n\nnps 1\n").unwrap();
        let b = Document::from_str("t\n1 0 -1\n     imp:n=1\n\n1 so 1\n\nnps 1\n").unwrap();
        assert!(!a.diagnostics().is_clean());
        assert!(b.diagnostics().is_clean());
        assert_eq!(a, b);
    }
}
