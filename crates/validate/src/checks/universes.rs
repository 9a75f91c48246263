//! Checks on universes, fills, and lattices

use itertools::Itertools;
use mcdeck_input::Fill;
use mcdeck_utils::f;

use super::Context;
use crate::finding::{Check, Finding, Reference};

/// The universe fill graph has no cycles
pub(crate) fn universe_cycle(context: &Context) -> Vec<Finding> {
    context
        .graph
        .cycles()
        .into_iter()
        .map(|cycle| {
            let universes = cycle.universes.iter().sorted().join(", ");
            Finding::fatal(
                Check::UniverseCycle,
                f!(
                    "universes {{{universes}}} fill each other, universe {} fills {}",
                    cycle.source,
                    cycle.target
                ),
            )
            .with_remediation(f!(
                "remove universe {} from the fill of universe {}",
                cycle.target,
                cycle.source
            ))
            .with_references(cycle.universes.iter().sorted().map(|u| Reference::Universe(*u)))
        })
        .collect()
}

/// Every filled universe is defined by at least one cell
pub(crate) fn fill_resolution(context: &Context) -> Vec<Finding> {
    let graph = context.graph;
    graph
        .undefined_fills()
        .into_iter()
        .map(|universe| {
            let cells: Vec<u32> = graph
                .fill_references
                .get(&universe)
                .map(|c| c.iter().copied().collect())
                .unwrap_or_default();
            Finding::fatal(
                Check::UniverseFillResolution,
                f!(
                    "universe {universe} is filled into cell {} but no cell has u={universe}",
                    cells.iter().join(", ")
                ),
            )
            .with_remediation(f!("define cells with u={universe} or change the fill"))
            .with_reference(Reference::Universe(universe))
            .with_references(cells.into_iter().map(Reference::Cell))
        })
        .collect()
}

/// Lattice fill arrays have one entry per element
///
/// Entries are counted with `nR` repeats included, without expanding them.
pub(crate) fn lattice_cardinality(context: &Context) -> Vec<Finding> {
    let check = Check::LatticeCardinality;
    let mut findings = Vec::new();

    for cell in context.expanded_cells() {
        let Some(fill) = cell.fill().filter(|f| matches!(f, Fill::Array { .. })) else {
            continue;
        };

        if cell.lattice().is_none() {
            findings.push(
                Finding::error(
                    check,
                    f!("cell {} has a fill array but no LAT", cell.number),
                )
                .with_remediation(f!("add lat=1 or lat=2 to cell {}", cell.number))
                .with_reference(Reference::Cell(cell.number)),
            );
            continue;
        }

        let Some(expected) = fill.expected_len() else {
            findings.push(
                Finding::fatal(
                    check,
                    f!(
                        "cell {} lattice ranges cover more elements than can be counted",
                        cell.number
                    ),
                )
                .with_remediation("narrow the lattice index ranges")
                .with_reference(Reference::Cell(cell.number)),
            );
            continue;
        };

        let found = fill.entry_count();
        if expected != found {
            let [i, j, k] = fill.spans();
            findings.push(
                Finding::fatal(
                    check,
                    f!(
                        "cell {} lattice fill has {found} entries, expected {i}·{j}·{k} = {expected}",
                        cell.number
                    ),
                )
                .with_remediation("make the fill array match the index ranges")
                .with_reference(Reference::Cell(cell.number)),
            );
        }
    }
    findings
}
