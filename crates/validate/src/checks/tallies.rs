//! Checks on tally cards and their modifiers

use std::collections::{BTreeMap, BTreeSet};

use mcdeck_input::{parse_real, TallyCard, TallyKind};
use mcdeck_utils::f;

use super::Context;
use crate::finding::{Check, Finding, Reference};

/// Modifiers name an existing tally and dose tables come in equal pairs
pub(crate) fn tally_consistency(context: &Context) -> Vec<Finding> {
    let check = Check::TallyConsistency;
    let tallies = context.doc.tallies();
    let mut findings = Vec::new();

    let mut defined: BTreeMap<u32, usize> = BTreeMap::new();
    for tally in tallies.iter().filter(|t| t.kind == TallyKind::F) {
        *defined.entry(tally.number).or_default() += 1;
        if tally.tally_type().is_none() {
            findings.push(
                Finding::error(
                    check,
                    f!("tally {} does not end in a valid tally type digit", tally.number),
                )
                .with_remediation("end tally numbers in 1, 2, 4, 5, 6, 7, or 8")
                .with_reference(Reference::Tally(tally.number)),
            );
        }
    }

    for (number, count) in defined.iter().filter(|(_, count)| **count > 1) {
        findings.push(
            Finding::error(check, f!("tally {number} is defined {count} times"))
                .with_remediation(f!("give each F{number} card a different number"))
                .with_reference(Reference::Tally(*number)),
        );
    }

    let mut reported = BTreeSet::new();
    for modifier in tallies.iter().filter(|t| t.kind != TallyKind::F) {
        let number = modifier.number;
        if number == 0 && modifier.kind.allows_default() {
            continue;
        }
        if !defined.contains_key(&number) && reported.insert((modifier.kind, number)) {
            findings.push(
                Finding::error(
                    check,
                    f!("{}{number} modifies tally {number} which is not defined", modifier.kind),
                )
                .with_remediation(f!("add an F{number} card or remove the {}{number} card", modifier.kind))
                .with_reference(Reference::Tally(number)),
            );
        }
    }

    let energies = by_number(&tallies, TallyKind::De);
    let functions = by_number(&tallies, TallyKind::Df);

    for number in energies.keys().chain(functions.keys()).collect::<BTreeSet<&u32>>() {
        match (energies.get(number), functions.get(number)) {
            (Some(de), Some(df)) => {
                let (n_de, n_df) = (numeric_entries(de), numeric_entries(df));
                if n_de != n_df {
                    findings.push(
                        Finding::error(
                            check,
                            f!("DE{number} has {n_de} energies but DF{number} has {n_df} values"),
                        )
                        .with_remediation(f!("give DE{number} and DF{number} the same length"))
                        .with_reference(Reference::Tally(*number)),
                    );
                }
            }
            (Some(_), None) | (None, Some(_)) => {
                let (present, absent) = if energies.contains_key(number) {
                    ("DE", "DF")
                } else {
                    ("DF", "DE")
                };
                findings.push(
                    Finding::error(check, f!("{present}{number} has no matching {absent}{number}"))
                        .with_remediation(f!("add {absent}{number} or remove {present}{number}"))
                        .with_reference(Reference::Tally(*number)),
                );
            }
            (None, None) => (),
        }
    }
    findings
}

fn by_number(tallies: &[TallyCard], kind: TallyKind) -> BTreeMap<u32, &TallyCard> {
    tallies
        .iter()
        .filter(|t| t.kind == kind)
        .map(|t| (t.number, t))
        .collect()
}

/// Numeric entries of a dose card, ignoring interpolation keywords such as
/// `LOG` and `LIN`
fn numeric_entries(card: &TallyCard) -> usize {
    card.entries
        .iter()
        .filter(|e| parse_real(e).is_some())
        .count()
}
