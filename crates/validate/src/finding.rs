//! Findings reported by the checks

use serde::{Deserialize, Serialize};

/// How bad a finding is
///
/// Ordered so that `Info < Warning < Error < Fatal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Worth knowing, no action required
    Info,
    /// Probably unintended, the deck will still run
    Warning,
    /// The deck will run but the results are likely wrong
    Error,
    /// The deck will not run
    Fatal,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Fatal => "fatal",
        };
        write!(f, "{s}")
    }
}

/// Every check, with a stable identifier
///
/// The identifiers are the kebab-case variant names, e.g.
/// `surface-resolution`, and are what configuration files and JSON output
/// use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Check {
    BlockStructure,
    ContinuationFormatting,
    SurfaceResolution,
    MaterialResolution,
    DuplicateIdentity,
    UniverseCycle,
    UniverseFillResolution,
    LatticeCardinality,
    ThermalBinding,
    ThermalTemperature,
    NumberingScheme,
    ImportanceCoverage,
    MaterialComposition,
    CardSyntax,
    ComplementResolution,
    TransformResolution,
    TallyConsistency,
    SurfaceParameters,
}

impl Check {
    /// Every check in the order they run
    pub const ALL: [Check; 18] = [
        Self::BlockStructure,
        Self::ContinuationFormatting,
        Self::SurfaceResolution,
        Self::MaterialResolution,
        Self::DuplicateIdentity,
        Self::UniverseCycle,
        Self::UniverseFillResolution,
        Self::LatticeCardinality,
        Self::ThermalBinding,
        Self::ThermalTemperature,
        Self::NumberingScheme,
        Self::ImportanceCoverage,
        Self::MaterialComposition,
        Self::CardSyntax,
        Self::ComplementResolution,
        Self::TransformResolution,
        Self::TallyConsistency,
        Self::SurfaceParameters,
    ];

    /// Stable identifier
    ///
    /// ```rust
    /// # use mcdeck_validate::Check;
    /// assert_eq!(Check::UniverseCycle.id(), "universe-cycle");
    /// assert_eq!(Check::from_id("Universe-Cycle"), Some(Check::UniverseCycle));
    /// assert_eq!(Check::UniverseCycle.number(), 6);
    /// ```
    pub fn id(&self) -> &'static str {
        match self {
            Self::BlockStructure => "block-structure",
            Self::ContinuationFormatting => "continuation-formatting",
            Self::SurfaceResolution => "surface-resolution",
            Self::MaterialResolution => "material-resolution",
            Self::DuplicateIdentity => "duplicate-identity",
            Self::UniverseCycle => "universe-cycle",
            Self::UniverseFillResolution => "universe-fill-resolution",
            Self::LatticeCardinality => "lattice-cardinality",
            Self::ThermalBinding => "thermal-binding",
            Self::ThermalTemperature => "thermal-temperature",
            Self::NumberingScheme => "numbering-scheme",
            Self::ImportanceCoverage => "importance-coverage",
            Self::MaterialComposition => "material-composition",
            Self::CardSyntax => "card-syntax",
            Self::ComplementResolution => "complement-resolution",
            Self::TransformResolution => "transform-resolution",
            Self::TallyConsistency => "tally-consistency",
            Self::SurfaceParameters => "surface-parameters",
        }
    }

    /// Check from its identifier, ignoring case
    pub fn from_id(id: &str) -> Option<Self> {
        let id = id.trim().to_lowercase();
        Self::ALL.into_iter().find(|c| c.id() == id)
    }

    /// Position in [Check::ALL], starting from 1
    pub fn number(&self) -> usize {
        Self::ALL
            .iter()
            .position(|c| c == self)
            .map_or(0, |i| i + 1)
    }
}

impl std::fmt::Display for Check {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// An entity a finding is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "number", rename_all = "lowercase")]
pub enum Reference {
    Cell(u32),
    Surface(u32),
    Material(u32),
    Universe(u32),
    Transform(u32),
    Tally(u32),
    /// Line of the source file, only for problems found while reading
    Line(usize),
}

impl std::fmt::Display for Reference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cell(n) => write!(f, "cell {n}"),
            Self::Surface(n) => write!(f, "surface {n}"),
            Self::Material(n) => write!(f, "material {n}"),
            Self::Universe(n) => write!(f, "universe {n}"),
            Self::Transform(n) => write!(f, "transformation {n}"),
            Self::Tally(n) => write!(f, "tally {n}"),
            Self::Line(n) => write!(f, "line {n}"),
        }
    }
}

/// A single problem found in a deck
///
/// ```rust
/// # use mcdeck_validate::{Check, Finding, Reference, Severity};
/// let finding = Finding::new(Check::SurfaceResolution, Severity::Fatal, "cell 10 uses undefined surface 2")
///     .with_remediation("define surface 2")
///     .with_reference(Reference::Cell(10))
///     .with_reference(Reference::Surface(2));
/// assert_eq!(
///     finding.to_string(),
///     "fatal[surface-resolution]: cell 10 uses undefined surface 2\n  help: define surface 2"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub check: Check,
    pub severity: Severity,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remediation: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<Reference>,
}

impl Finding {
    pub fn new<S: Into<String>>(check: Check, severity: Severity, message: S) -> Self {
        Self {
            check,
            severity,
            message: message.into(),
            remediation: None,
            references: Vec::new(),
        }
    }

    pub fn fatal<S: Into<String>>(check: Check, message: S) -> Self {
        Self::new(check, Severity::Fatal, message)
    }

    pub fn error<S: Into<String>>(check: Check, message: S) -> Self {
        Self::new(check, Severity::Error, message)
    }

    pub fn warning<S: Into<String>>(check: Check, message: S) -> Self {
        Self::new(check, Severity::Warning, message)
    }

    pub fn info<S: Into<String>>(check: Check, message: S) -> Self {
        Self::new(check, Severity::Info, message)
    }

    pub fn with_remediation<S: Into<String>>(mut self, remediation: S) -> Self {
        self.remediation = Some(remediation.into());
        self
    }

    pub fn with_reference(mut self, reference: Reference) -> Self {
        self.references.push(reference);
        self
    }

    pub fn with_references<I: IntoIterator<Item = Reference>>(mut self, references: I) -> Self {
        self.references.extend(references);
        self
    }

    /// True for errors and fatal findings
    pub fn is_failure(&self) -> bool {
        self.severity >= Severity::Error
    }
}

impl std::fmt::Display for Finding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, self.check, self.message)?;
        if let Some(remediation) = &self.remediation {
            write!(f, "\n  help: {remediation}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_order() {
        assert!(Severity::Info < Severity::Warning);
        assert!(Severity::Warning < Severity::Error);
        assert!(Severity::Error < Severity::Fatal);
    }

    #[test]
    fn identifiers_match_serde() {
        for check in Check::ALL {
            let json = serde_json::to_string(&check).unwrap();
            assert_eq!(json, format!("\"{}\"", check.id()));
            assert_eq!(Check::from_id(check.id()), Some(check));
        }
        assert_eq!(Check::SurfaceParameters.number(), 18);
    }

    #[test]
    fn finding_json() {
        let finding = Finding::error(Check::ThermalBinding, "material 1 has no MT card")
            .with_reference(Reference::Material(1));
        let json = serde_json::to_value(&finding).unwrap();
        assert_eq!(json["check"], "thermal-binding");
        assert_eq!(json["severity"], "error");
        assert_eq!(json["references"][0]["kind"], "material");
        assert_eq!(json["references"][0]["number"], 1);
        assert!(json.get("remediation").is_none());
        assert!(finding.is_failure());
    }
}
