//! Result and Error types for mcdeck-input

use crate::core::SurfaceKind;

/// Type alias for Result<T, input::Error>
pub type Result<T> = core::result::Result<T, Error>;

/// The error type for the `mcdeck-input` crate
///
/// Only structural problems and misuse of the editing API are errors. Anything
/// wrong with the content of a well-formed deck is left for the validators to
/// report.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("failed input/output stream")]
    IOError(#[from] std::io::Error),

    #[error("input is not valid UTF-8 text")]
    InvalidEncoding,

    #[error("input contains no title line")]
    MissingTitle,

    #[error("expected at least 3 blocks (cells, surfaces, data), found {found}")]
    TooFewBlocks { found: usize },

    #[error("cell {0} is already defined")]
    DuplicateCell(u32),

    #[error("surface {0} is already defined")]
    DuplicateSurface(u32),

    #[error("data card \"{0}\" is already defined")]
    DuplicateDataCard(String),

    #[error("void cell {0} can not have a density")]
    VoidCellWithDensity(u32),

    #[error("cell {cell} is filled with material {material} but has no density")]
    MissingDensity { cell: u32, material: u32 },

    #[error("density must be non-zero, found {0}")]
    InvalidDensity(f64),

    #[error("cell {0} not found")]
    CellNotFound(u32),

    #[error("surface {0} not found")]
    SurfaceNotFound(u32),

    #[error("material {0} not found")]
    MaterialNotFound(u32),

    #[error("transformation {0} not found")]
    TransformNotFound(u32),

    #[error("cell {0} is not a lattice with an explicit fill array")]
    NotALattice(u32),

    #[error("cell {cell} expands a LIKE chain that never reaches a real cell")]
    UnresolvedLike { cell: u32 },

    #[error("surface {surface} is still referenced by cells {cells:?}")]
    SurfaceInUse { surface: u32, cells: Vec<u32> },

    #[error("surface {kind} expects {expected} parameters, found {found}")]
    InvalidParameterCount {
        kind: SurfaceKind,
        expected: String,
        found: usize,
    },

    #[error("unknown surface mnemonic \"{0}\"")]
    UnknownSurfaceKind(String),

    #[error("failed to infer particle from \"{0}\"")]
    FailedToInferParticle(String),

    #[error("failed to parse \"{card}\": {reason}")]
    ParseError { card: String, reason: String },
}

impl Error {
    /// Shorthand for a card level parse failure
    pub(crate) fn parse<C: Into<String>, R: Into<String>>(card: C, reason: R) -> Self {
        Self::ParseError {
            card: card.into(),
            reason: reason.into(),
        }
    }
}
