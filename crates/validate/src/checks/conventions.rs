//! Advisory checks on numbering and importances

use mcdeck_input::CardKind;
use mcdeck_utils::f;

use super::Context;
use crate::finding::{Check, Finding, Reference};
use crate::numbering::NumberingRule;

/// Entity numbers follow the configured numbering scheme
pub(crate) fn numbering_scheme(context: &Context) -> Vec<Finding> {
    let Some(scheme) = &context.options.numbering else {
        return Vec::new();
    };
    let doc = context.doc;

    let transformations: Vec<u32> = doc
        .data_cards()
        .values()
        .filter_map(|c| match c.kind() {
            CardKind::Transform { number, .. } => Some(number),
            _ => None,
        })
        .collect();

    let universes: Vec<u32> = context
        .graph
        .universe_members
        .keys()
        .copied()
        .filter(|u| *u != 0)
        .collect();

    let mut findings = Vec::new();
    let mut apply = |kind: &str, rule: &NumberingRule, numbers: &[u32], wrap: fn(u32) -> Reference| {
        for number in numbers {
            if let Some(violation) = rule.violation(*number) {
                let scheme_name = scheme.name.as_deref().unwrap_or("numbering");
                findings.push(
                    Finding::warning(
                        Check::NumberingScheme,
                        f!("{kind} {number} {violation} ({scheme_name} scheme)"),
                    )
                    .with_remediation(f!("renumber {kind} {number} to follow the scheme"))
                    .with_reference(wrap(*number)),
                );
            }
        }
    };

    if let Some(rule) = &scheme.cells {
        let numbers: Vec<u32> = doc.cells().keys().copied().collect();
        apply("cell", rule, &numbers, Reference::Cell);
    }
    if let Some(rule) = &scheme.surfaces {
        let numbers: Vec<u32> = doc.surfaces().keys().copied().collect();
        apply("surface", rule, &numbers, Reference::Surface);
    }
    if let Some(rule) = &scheme.materials {
        let numbers: Vec<u32> = doc.material_numbers().into_iter().collect();
        apply("material", rule, &numbers, Reference::Material);
    }
    if let Some(rule) = &scheme.universes {
        apply("universe", rule, &universes, Reference::Universe);
    }
    if let Some(rule) = &scheme.transformations {
        apply("transformation", rule, &transformations, Reference::Transform);
    }
    findings
}

/// Every cell has an importance for every transported particle
pub(crate) fn importance_coverage(context: &Context) -> Vec<Finding> {
    let mut findings = Vec::new();
    for cell in context.expanded_cells() {
        let missing: Vec<String> = context
            .mode
            .iter()
            .filter(|p| context.importance(&cell, **p).is_none())
            .map(|p| p.to_string())
            .collect();
        if missing.is_empty() {
            continue;
        }
        let particles = missing.join(",");
        findings.push(
            Finding::info(
                Check::ImportanceCoverage,
                f!(
                    "cell {} has no importance for {particles}, defaulting to 1",
                    cell.number
                ),
            )
            .with_remediation(f!("add imp:{particles}=1 to cell {}", cell.number))
            .with_reference(Reference::Cell(cell.number)),
        );
    }
    findings
}
