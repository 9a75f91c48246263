//! Problems recorded while reading a deck
//!
//! Reading never stops for a bad card. Anything the lexer or the parsers had
//! to work around is kept here so that validators can report it later.

/// The three card blocks of an input deck
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Block {
    /// Cell cards, opened by the title line
    Cells,
    /// Surface cards, opened by the first blank line
    Surfaces,
    /// Data cards, opened by the second blank line
    Data,
}

impl std::fmt::Display for Block {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Cells => "cell",
            Self::Surfaces => "surface",
            Self::Data => "data",
        };
        write!(f, "{s}")
    }
}

/// Identity namespaces, each of which forbids duplicates
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Namespace {
    Cell,
    Surface,
    Material,
    Transformation,
    DataCard,
}

impl std::fmt::Display for Namespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Cell => "cell",
            Self::Surface => "surface",
            Self::Material => "material",
            Self::Transformation => "transformation",
            Self::DataCard => "data card",
        };
        write!(f, "{s}")
    }
}

/// A single problem found while reading
///
/// Line numbers are 1-based and refer to the first physical line of the
/// logical card involved.
#[derive(Debug, Clone, PartialEq)]
pub enum Issue {
    /// Continuation line indented by fewer than five spaces
    ShortIndent { line: usize, indent: usize },
    /// Continuation line with no card to continue, discarded
    OrphanContinuation { line: usize, text: String },
    /// Card that could not be parsed, skipped
    SkippedCard {
        line: usize,
        block: Block,
        text: String,
        reason: String,
    },
    /// Second definition of an identity, not inserted
    Duplicate {
        line: usize,
        namespace: Namespace,
        id: String,
    },
}

impl Issue {
    /// Line of the source the issue was raised for
    pub fn line(&self) -> usize {
        match self {
            Self::ShortIndent { line, .. }
            | Self::OrphanContinuation { line, .. }
            | Self::SkippedCard { line, .. }
            | Self::Duplicate { line, .. } => *line,
        }
    }
}

/// Everything recorded while reading a deck
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagnostics {
    /// Number of blocks opened, including an empty trailing data block
    pub block_count: usize,
    /// Issues in the order they were found
    pub issues: Vec<Issue>,
}

impl Diagnostics {
    /// True if nothing needed working around
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}
