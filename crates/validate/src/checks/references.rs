//! Checks that every number a card refers to is defined

use std::collections::{BTreeMap, BTreeSet};

use mcdeck_input::{CardKind, CellKind, CellTransform, Fill, FillEntry, ParamName, ParamValue};
use mcdeck_utils::f;

use super::Context;
use crate::finding::{Check, Finding, Reference};

/// Every surface in a cell geometry is defined
///
/// Only explicit cells are checked, a `LIKE n BUT` cell shares the
/// geometry of its base.
pub(crate) fn surface_resolution(context: &Context) -> Vec<Finding> {
    let doc = context.doc;
    let mut findings = Vec::new();

    for cell in doc.cells().values() {
        let Some(geometry) = cell.geometry() else {
            continue;
        };
        for surface in geometry.referenced_surfaces() {
            if doc.surface(surface).is_none() {
                findings.push(
                    Finding::fatal(
                        Check::SurfaceResolution,
                        f!("cell {} references undefined surface {surface}", cell.number),
                    )
                    .with_remediation(f!(
                        "define surface {surface} or correct the geometry of cell {}",
                        cell.number
                    ))
                    .with_reference(Reference::Cell(cell.number))
                    .with_reference(Reference::Surface(surface)),
                );
            }
        }
    }
    findings
}

/// Every non-zero material number on a cell has an `Mn` card
pub(crate) fn material_resolution(context: &Context) -> Vec<Finding> {
    let doc = context.doc;
    let defined = doc.material_numbers();
    let mut findings = Vec::new();

    for cell in doc.cells().values() {
        let material = match &cell.kind {
            CellKind::Explicit { material, .. } => Some(*material),
            CellKind::Like { .. } => cell
                .param_value(ParamName::Mat)
                .and_then(|v| v.as_integer())
                .and_then(|m| u32::try_from(m).ok()),
        };
        let Some(material) = material.filter(|m| *m != 0) else {
            continue;
        };
        if !defined.contains(&material) {
            findings.push(
                Finding::fatal(
                    Check::MaterialResolution,
                    f!("cell {} uses undefined material {material}", cell.number),
                )
                .with_remediation(f!("add an m{material} card or change the material of cell {}", cell.number))
                .with_reference(Reference::Cell(cell.number))
                .with_reference(Reference::Material(material)),
            );
        }
    }
    findings
}

/// `#n` complements and `LIKE n BUT` bases name defined cells
pub(crate) fn complement_resolution(context: &Context) -> Vec<Finding> {
    let check = Check::ComplementResolution;
    let doc = context.doc;
    let mut findings = Vec::new();

    for cell in doc.cells().values() {
        if let Some(geometry) = cell.geometry() {
            for other in geometry.referenced_cells() {
                if doc.cell(other).is_none() {
                    findings.push(
                        Finding::fatal(
                            check,
                            f!("cell {} complements undefined cell {other}", cell.number),
                        )
                        .with_remediation(f!("define cell {other} or remove #{other}"))
                        .with_reference(Reference::Cell(cell.number))
                        .with_reference(Reference::Cell(other)),
                    );
                }
            }
        }

        if let Some(base) = cell.like_base() {
            if doc.cell(base).is_none() {
                findings.push(
                    Finding::fatal(
                        check,
                        f!("cell {} is like undefined cell {base}", cell.number),
                    )
                    .with_remediation(f!("define cell {base} or write cell {} in full", cell.number))
                    .with_reference(Reference::Cell(cell.number))
                    .with_reference(Reference::Cell(base)),
                );
            } else if let Err(e) = doc.expand_like(cell.number) {
                findings.push(
                    Finding::fatal(check, f!("cell {} can not be expanded: {e}", cell.number))
                        .with_remediation("break the loop of LIKE n BUT references")
                        .with_reference(Reference::Cell(cell.number)),
                );
            }
        }
    }
    findings
}

/// Transformation numbers on surfaces, `TRCL`, and `FILL` are defined once
pub(crate) fn transform_resolution(context: &Context) -> Vec<Finding> {
    let check = Check::TransformResolution;
    let doc = context.doc;
    let mut findings = Vec::new();

    // TRn and *TRn are different card names with the same identity
    let mut cards: BTreeMap<u32, Vec<&str>> = BTreeMap::new();
    for card in doc.data_cards().values() {
        if let CardKind::Transform { number, .. } = card.kind() {
            cards.entry(number).or_default().push(&card.name);
        }
    }
    for (number, names) in cards.iter().filter(|(_, names)| names.len() > 1) {
        findings.push(
            Finding::fatal(
                check,
                f!("transformation {number} is defined by {}", names.join(" and ")),
            )
            .with_remediation(f!("keep one of {}", names.join(", ")))
            .with_reference(Reference::Transform(*number)),
        );
    }

    let defined: BTreeSet<u32> = cards.keys().copied().collect();
    let missing = |number: u32, by: String, reference: Reference| {
        Finding::error(
            check,
            f!("{by} uses undefined transformation {number}"),
        )
        .with_remediation(f!("add a tr{number} card"))
        .with_reference(reference)
        .with_reference(Reference::Transform(number))
    };

    for surface in doc.surfaces().values() {
        match surface.transform {
            Some(n) if n > 0 => {
                let n = n.unsigned_abs();
                if !defined.contains(&n) {
                    findings.push(missing(
                        n,
                        f!("surface {}", surface.number),
                        Reference::Surface(surface.number),
                    ));
                }
            }
            Some(n) if n < 0 => {
                let partner = n.unsigned_abs();
                if doc.surface(partner).is_none() {
                    findings.push(
                        Finding::error(
                            check,
                            f!(
                                "surface {} is periodic with undefined surface {partner}",
                                surface.number
                            ),
                        )
                        .with_remediation(f!("define surface {partner}"))
                        .with_reference(Reference::Surface(surface.number))
                        .with_reference(Reference::Surface(partner)),
                    );
                }
            }
            _ => (),
        }
    }

    for cell in doc.cells().values() {
        let mut used = BTreeSet::new();
        if let Some(ParamValue::Transform(CellTransform::Number(n))) =
            cell.param_value(ParamName::Trcl)
        {
            used.insert(*n);
        }
        match cell.fill() {
            Some(Fill::Universe {
                transform: Some(CellTransform::Number(n)),
                ..
            }) => {
                used.insert(*n);
            }
            Some(Fill::Array { entries, .. }) => {
                used.extend(entries.iter().filter_map(|e| match e {
                    FillEntry::Transform(CellTransform::Number(n)) => Some(*n),
                    _ => None,
                }));
            }
            _ => (),
        }

        for n in used.into_iter().filter(|n| !defined.contains(n)) {
            findings.push(missing(
                n,
                f!("cell {}", cell.number),
                Reference::Cell(cell.number),
            ));
        }
    }
    findings
}
