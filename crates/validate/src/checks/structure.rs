//! Checks on the shape of the deck and problems found while reading it

use mcdeck_input::{
    CardKind, DataCard, Importances, Issue, Kcode, Ksrc, Namespace, Sdef, TallyCard,
    ThermalBinding, Transformation,
};
use mcdeck_utils::f;

use super::Context;
use crate::finding::{Check, Finding, Reference};

/// Three blocks with at least one cell and one surface
pub(crate) fn block_structure(context: &Context) -> Vec<Finding> {
    let check = Check::BlockStructure;
    let doc = context.doc;
    let mut findings = Vec::new();

    let blocks = doc.diagnostics().block_count;
    if blocks != 0 && blocks < 3 {
        findings.push(
            Finding::fatal(check, f!("deck has {blocks} blocks, expected 3"))
                .with_remediation("separate the cell, surface, and data blocks with blank lines"),
        );
    }
    if doc.cells().is_empty() {
        findings.push(
            Finding::fatal(check, "deck defines no cells")
                .with_remediation("add at least one cell card after the title"),
        );
    }
    if doc.surfaces().is_empty() {
        findings.push(
            Finding::fatal(check, "deck defines no surfaces")
                .with_remediation("add at least one surface card in the second block"),
        );
    }
    findings
}

/// Continuation lines with fewer than five leading blanks
pub(crate) fn continuation_formatting(context: &Context) -> Vec<Finding> {
    context
        .doc
        .diagnostics()
        .issues
        .iter()
        .filter_map(|issue| match issue {
            Issue::ShortIndent { line, indent } => Some(
                Finding::fatal(
                    Check::ContinuationFormatting,
                    f!("line {line} is indented by {indent} blanks, continuation lines need at least 5"),
                )
                .with_remediation("indent the line by five blanks or end the previous line with '&'")
                .with_reference(Reference::Line(*line)),
            ),
            _ => None,
        })
        .collect()
}

/// Identities defined more than once, as recorded by the reader
pub(crate) fn duplicate_identity(context: &Context) -> Vec<Finding> {
    let check = Check::DuplicateIdentity;
    context
        .doc
        .diagnostics()
        .issues
        .iter()
        .filter_map(|issue| {
            let Issue::Duplicate {
                line,
                namespace,
                id,
            } = issue
            else {
                return None;
            };

            let number = id.parse::<u32>().ok();
            let entity = match (namespace, number) {
                (Namespace::Cell, Some(n)) => Some(Reference::Cell(n)),
                (Namespace::Surface, Some(n)) => Some(Reference::Surface(n)),
                (Namespace::Material, Some(n)) => Some(Reference::Material(n)),
                (Namespace::Transformation, Some(n)) => Some(Reference::Transform(n)),
                _ => None,
            };

            let message = f!("{namespace} {id} is defined more than once, line {line} ignored");
            let finding = match namespace {
                Namespace::DataCard => Finding::error(check, message),
                _ => Finding::fatal(check, message),
            };
            Some(
                finding
                    .with_remediation(f!("renumber or remove the second {namespace} {id}"))
                    .with_references(entity)
                    .with_reference(Reference::Line(*line)),
            )
        })
        .collect()
}

/// Cards skipped by the reader and typed data cards that can not be read
pub(crate) fn card_syntax(context: &Context) -> Vec<Finding> {
    let check = Check::CardSyntax;
    let mut findings: Vec<Finding> = context
        .doc
        .diagnostics()
        .issues
        .iter()
        .filter_map(|issue| match issue {
            Issue::SkippedCard {
                line,
                block,
                text,
                reason,
            } => Some(
                Finding::error(check, f!("{block} card on line {line} skipped: {reason}"))
                    .with_remediation(f!("correct or remove \"{text}\""))
                    .with_reference(Reference::Line(*line)),
            ),
            Issue::OrphanContinuation { line, text } => Some(
                Finding::warning(check, f!("line {line} continues nothing and was ignored"))
                    .with_remediation(f!("remove the indentation of \"{}\" or delete it", text.trim()))
                    .with_reference(Reference::Line(*line)),
            ),
            _ => None,
        })
        .collect();

    for card in context.doc.data_cards().values() {
        if let Some(reason) = unreadable(card) {
            findings.push(
                Finding::error(check, f!("{} card can not be read: {reason}", card.name))
                    .with_remediation(f!("correct \"{card}\"")),
            );
        }
    }
    findings
}

/// Reason a data card with a typed reader fails to read
///
/// Material cards are left to [Check::MaterialComposition].
fn unreadable(card: &DataCard) -> Option<String> {
    let result = match card.kind() {
        CardKind::Mode => mcdeck_input::read_mode(Some(card)).map(|_| ()),
        CardKind::Kcode => Kcode::from_card(card).map(|_| ()),
        CardKind::Ksrc => Ksrc::from_card(card).map(|_| ()),
        CardKind::Sdef => Sdef::from_card(card).map(|_| ()),
        CardKind::Transform { .. } => Transformation::from_card(card).map(|_| ()),
        CardKind::Thermal(_) => ThermalBinding::from_card(card).map(|_| ()),
        CardKind::Importance(_) => Importances::from_card(card).map(|_| ()),
        CardKind::Tally { .. } => TallyCard::from_card(card).map(|_| ()),
        CardKind::Material(_) | CardKind::Other => Ok(()),
    };
    result.err().map(|e| e.to_string())
}

/// Parameter counts that the surface mnemonic does not allow
pub(crate) fn surface_parameters(context: &Context) -> Vec<Finding> {
    context
        .doc
        .surfaces()
        .values()
        .filter(|s| !s.has_valid_parameters())
        .map(|s| {
            Finding::error(
                Check::SurfaceParameters,
                f!(
                    "surface {} ({}) has {} parameters, expected {}",
                    s.number,
                    s.kind,
                    s.parameters.len(),
                    s.kind.expected()
                ),
            )
            .with_remediation(f!("give surface {} the parameters a {} needs", s.number, s.kind))
            .with_reference(Reference::Surface(s.number))
        })
        .collect()
}
