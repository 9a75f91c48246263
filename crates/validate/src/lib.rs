//! Semantic validation of MCNP input decks
#![doc = include_str!("../readme.md")]

mod checks;
mod error;
mod finding;
mod numbering;
mod options;

use log::debug;
use mcdeck_input::Document;

#[doc(inline)]
pub use error::{Error, Result};

#[doc(inline)]
pub use finding::{Check, Finding, Reference, Severity};

#[doc(inline)]
pub use numbering::{NumberingRule, NumberingScheme, ReservedRange};

#[doc(inline)]
pub use options::ValidationOptions;

/// Run every enabled check on a document
///
/// Findings are grouped by check in the order of [Check::ALL]. The result
/// only depends on the content of the document, so validating a deck and
/// its re-serialised form gives the same findings.
pub fn validate(document: &Document, options: &ValidationOptions) -> Vec<Finding> {
    let context = checks::Context::new(document, options);
    let findings: Vec<Finding> = Check::ALL
        .into_iter()
        .filter(|c| options.is_enabled(*c))
        .flat_map(|c| checks::run(c, &context))
        .collect();

    debug!(
        "{} findings for \"{}\", worst {:?}",
        findings.len(),
        document.title,
        worst(&findings)
    );
    findings
}

/// Run a single check regardless of the selection in `options`
pub fn validate_one(document: &Document, check: Check, options: &ValidationOptions) -> Vec<Finding> {
    checks::run(check, &checks::Context::new(document, options))
}

/// Highest severity among the findings
pub fn worst(findings: &[Finding]) -> Option<Severity> {
    findings.iter().map(|f| f.severity).max()
}

/// Process exit code for a set of findings
///
/// `1` if anything is an error or fatal, `0` otherwise. Warnings alone never
/// fail a run.
///
/// ```rust
/// # use mcdeck_validate::{exit_code, Check, Finding};
/// let warning = Finding::warning(Check::NumberingScheme, "cell 1 has 1 digit");
/// assert_eq!(exit_code(&[warning.clone()]), 0);
/// let error = Finding::error(Check::CardSyntax, "card skipped");
/// assert_eq!(exit_code(&[warning, error]), 1);
/// assert_eq!(exit_code(&[]), 0);
/// ```
pub fn exit_code(findings: &[Finding]) -> i32 {
    match worst(findings) {
        Some(severity) if severity >= Severity::Error => 1,
        _ => 0,
    }
}
