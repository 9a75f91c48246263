//! Entity model of an input deck
mod cell;
mod data;
mod diagnostics;
mod geometry;
mod material;
mod particle;
mod shorthand;
mod source;
mod surface;
mod tally;
mod transform;

pub use cell::{
    Cell, CellKind, CellTransform, Fill, FillEntry, LatticeKind, ParamKey, ParamName, ParamValue,
    Parameter, MAX_FILL_ELEMENTS,
};
pub use data::{CardKind, DataCard};
pub use diagnostics::{Block, Diagnostics, Issue, Namespace};
pub use geometry::{validate_geometry, Geometry, HalfSpace, Sense};
pub use material::{Component, FractionKind, Material, Nuclide, ThermalBinding, Zaid};
pub use particle::Particle;
pub use shorthand::{expand_shorthand, Shorthand, MAX_EXPANDED_ENTRIES};
pub use source::{read_mode, Importances, Kcode, Ksrc, Sdef};
pub use surface::{Boundary, Surface, SurfaceKind};
pub use tally::{TallyCard, TallyKind, TallyType};
pub use transform::Transformation;

/// Where an entity was read from
///
/// Only kept for reporting and diff style edits. Entities compare equal
/// regardless of origin.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Origin {
    /// 1-based line of the first physical line of the card
    pub line: usize,
    /// Physical lines exactly as read
    pub raw_text: String,
}
