//! Checks on material compositions and thermal scattering

use itertools::Itertools;
use log::debug;
use mcdeck_input::{CardKind, FractionKind, Material, Nuclide, Particle, Zaid};
use mcdeck_refdata::{element, element_by_symbol, ThermalLibrary};
use mcdeck_utils::{f, ValueExt};

use super::Context;
use crate::finding::{Check, Finding, Reference};

/// Elements that need an S(a,b) treatment when bound in a moderator
const MODERATOR_ELEMENTS: [u8; 3] = [1, 4, 6];

/// A component that should be covered by a thermal scattering library
struct BoundComponent {
    identifier: String,
    z: u8,
    a: Option<u16>,
    library: Option<String>,
}

impl BoundComponent {
    fn describe(&self) -> String {
        let name = match (self.z, self.a) {
            (1, Some(2)) => "deuterium",
            (z, _) => element(z).map_or("element", |e| e.name.as_str()),
        };
        f!("{name} ({})", self.identifier)
    }
}

/// Atomic number of a nuclide, looking symbols up in the element table
fn atomic_number(zaid: &Zaid) -> Option<u8> {
    match &zaid.nuclide {
        Nuclide::Za { z, .. } => Some(*z),
        Nuclide::Symbol { symbol, .. } => element_by_symbol(symbol).map(|e| e.z),
    }
}

fn bound_components(material: &Material) -> Vec<BoundComponent> {
    material
        .components
        .iter()
        .filter_map(|c| {
            let zaid = c.zaid()?;
            let z = atomic_number(&zaid).filter(|z| MODERATOR_ELEMENTS.contains(z))?;
            Some(BoundComponent {
                identifier: c.identifier.clone(),
                z,
                a: zaid.nuclide.a(),
                library: zaid
                    .library
                    .clone()
                    .or_else(|| material.keyword("nlib").map(|l| l.to_lowercase())),
            })
        })
        .collect()
}

/// Operating temperatures for a material, the configured one if given and
/// otherwise the `TMP` of every cell using it
fn temperatures(context: &Context, material: u32) -> Vec<f64> {
    if let Some(t) = context.options.temperature {
        return vec![t];
    }
    let Some(cells) = context.graph.material_uses.get(&material) else {
        return Vec::new();
    };
    cells
        .iter()
        .filter_map(|n| context.doc.expand_like(*n).ok())
        .filter_map(|cell| context.cell_temperature(&cell))
        .sorted_by(|a, b| a.total_cmp(b))
        .dedup_by(|a, b| (a - b).abs() < 1e-6)
        .collect()
}

/// True if any cell using the material transports neutrons
fn in_neutron_transport(context: &Context, material: u32) -> bool {
    let Some(cells) = context.graph.material_uses.get(&material) else {
        return false;
    };
    cells
        .iter()
        .filter_map(|n| context.doc.expand_like(*n).ok())
        .any(|cell| context.importance(&cell, Particle::Neutron) != Some(0.0))
}

/// Bound moderator nuclides have an `MTn` card
pub(crate) fn thermal_binding(context: &Context) -> Vec<Finding> {
    let check = Check::ThermalBinding;
    if !context.mode.contains(&Particle::Neutron) {
        return Vec::new();
    }

    let xs = &context.reference().xs;
    let thermal = &context.reference().thermal;
    let mut findings = Vec::new();

    for material in context.doc.materials() {
        let number = material.number;
        if !in_neutron_transport(context, number) {
            debug!("Material {number} not in neutron transport, skipping thermal check");
            continue;
        }
        let bound = bound_components(&material);
        if bound.is_empty() {
            continue;
        }

        let Some(binding) = context.doc.thermal_binding(number) else {
            let temperature = temperatures(context, number).first().copied();
            let recommended: Vec<&ThermalLibrary> = bound
                .iter()
                .filter_map(|b| {
                    let source = b.library.as_deref().and_then(|l| xs.source_of(l));
                    thermal.recommend(b.z, b.a, temperature, source)
                })
                .unique_by(|l| l.family.clone())
                .collect();

            let remediation = if recommended.is_empty() {
                f!("add an mt{number} card with a suitable S(a,b) library")
            } else {
                f!(
                    "add \"mt{number} {}\" ({})",
                    recommended.iter().map(|l| l.identifier.as_str()).join(" "),
                    recommended
                        .iter()
                        .map(|l| f!("{} at {} K", l.moderator, l.temperature.canonical()))
                        .join(", ")
                )
            };

            findings.push(
                Finding::error(
                    check,
                    f!(
                        "material {number} contains {} but has no mt{number} card",
                        bound.iter().map(|b| b.describe()).join(", ")
                    ),
                )
                .with_remediation(remediation)
                .with_reference(Reference::Material(number)),
            );
            continue;
        };

        let known: Vec<&ThermalLibrary> = binding
            .libraries
            .iter()
            .filter_map(|name| {
                thermal
                    .get(name)
                    .or_else(|| thermal.family(name).into_iter().next())
            })
            .collect();

        for name in binding
            .libraries
            .iter()
            .filter(|name| !thermal.is_known_family(name))
        {
            findings.push(
                Finding::warning(
                    check,
                    f!("mt{number} library {name} is not in the thermal scattering catalog"),
                )
                .with_remediation("check the identifier or extend the catalog")
                .with_reference(Reference::Material(number)),
            );
        }

        if known.len() < binding.libraries.len() {
            continue;
        }
        for component in &bound {
            if !known.iter().any(|l| l.binds(component.z, component.a)) {
                findings.push(
                    Finding::warning(
                        check,
                        f!(
                            "mt{number} has no library for {}",
                            component.describe()
                        ),
                    )
                    .with_remediation(f!(
                        "add a library binding {} to mt{number}",
                        component.identifier
                    ))
                    .with_reference(Reference::Material(number)),
                );
            }
        }
    }
    findings
}

/// Thermal libraries are evaluated near the operating temperature
pub(crate) fn thermal_temperature(context: &Context) -> Vec<Finding> {
    let thermal = &context.reference().thermal;
    let tolerance = context.options.tolerance;
    let mut findings = Vec::new();

    for binding in context.doc.thermal_bindings() {
        let number = binding.material;
        let temperatures = temperatures(context, number);
        if temperatures.is_empty() {
            continue;
        }

        for name in &binding.libraries {
            let Some(library) = thermal.get(name) else {
                continue;
            };
            for t in temperatures.iter().filter(|t| !library.suits(**t, tolerance)) {
                let closest = thermal
                    .family(&library.family)
                    .into_iter()
                    .filter(|l| l.source == library.source)
                    .min_by(|a, b| (a.temperature - t).abs().total_cmp(&(b.temperature - t).abs()));

                let remediation = match closest {
                    Some(c) if c.identifier != library.identifier => {
                        f!("use {} ({} K)", c.identifier, c.temperature.canonical())
                    }
                    _ => f!("no {} library is closer to {} K", library.family, t.canonical()),
                };

                findings.push(
                    Finding::warning(
                        Check::ThermalTemperature,
                        f!(
                            "mt{number} library {} is evaluated at {} K, {} K is outside {} K of it",
                            library.identifier,
                            library.temperature.canonical(),
                            t.canonical(),
                            tolerance.canonical()
                        ),
                    )
                    .with_remediation(remediation)
                    .with_reference(Reference::Material(number)),
                );
            }
        }
    }
    findings
}

/// Material cards read cleanly with consistent fractions and identifiers
pub(crate) fn material_composition(context: &Context) -> Vec<Finding> {
    let check = Check::MaterialComposition;
    let xs = &context.reference().xs;
    let mut findings = Vec::new();

    for card in context.doc.data_cards().values() {
        let CardKind::Material(number) = card.kind() else {
            continue;
        };
        let reference = Reference::Material(number);

        let material = match Material::from_card(card) {
            Ok(material) => material,
            Err(e) => {
                findings.push(
                    Finding::error(check, f!("material {number} can not be read: {e}"))
                        .with_remediation("write the card as identifier and fraction pairs")
                        .with_reference(reference),
                );
                continue;
            }
        };

        if material.components.is_empty() {
            findings.push(
                Finding::error(check, f!("material {number} has no components"))
                    .with_remediation(f!("add identifier and fraction pairs to m{number}"))
                    .with_reference(reference),
            );
            continue;
        }

        if material.fraction_kind() == FractionKind::Mixed {
            findings.push(
                Finding::error(
                    check,
                    f!("material {number} mixes atom (positive) and mass (negative) fractions"),
                )
                .with_remediation("give every fraction the same sign")
                .with_reference(reference),
            );
        }

        for identifier in material.invalid_identifiers() {
            findings.push(
                Finding::error(
                    check,
                    f!("material {number} has malformed identifier \"{identifier}\""),
                )
                .with_remediation("use ZZZAAA.nnX or an element symbol")
                .with_reference(reference),
            );
        }

        for component in &material.components {
            let Some(zaid) = component.zaid() else {
                continue;
            };

            if atomic_number(&zaid).and_then(element).is_none() {
                findings.push(
                    Finding::error(
                        check,
                        f!("material {number} names unknown element \"{}\"", component.identifier),
                    )
                    .with_remediation("check the atomic number or symbol")
                    .with_reference(reference),
                );
            }

            if component.fraction == 0.0 {
                findings.push(
                    Finding::warning(
                        check,
                        f!("material {number} gives {} a zero fraction", component.identifier),
                    )
                    .with_remediation(f!("remove {} or give it a fraction", component.identifier))
                    .with_reference(reference),
                );
            }

            if let Some(library) = zaid.library.as_deref().filter(|l| !xs.contains(l)) {
                findings.push(
                    Finding::warning(
                        check,
                        f!(
                            "material {number} uses library .{library} ({}) which is not in the cross-section catalog",
                            component.identifier
                        ),
                    )
                    .with_remediation("check the suffix or extend the catalog")
                    .with_reference(reference),
                );
            }
        }
    }
    findings
}
