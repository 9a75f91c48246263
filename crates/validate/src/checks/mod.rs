//! The checks, grouped by what they look at
//!
//! Every check is a plain function from a [Context] to the findings it
//! produced. Checks never mutate the document and never touch the file
//! system.

mod conventions;
mod materials;
mod references;
mod structure;
mod tallies;
mod universes;

use std::borrow::Cow;

use log::{trace, warn};
use mcdeck_input::{
    parse_real, CardKind, Cell, CrossReferenceGraph, Document, Importances, ParamName, ParamValue,
    Particle,
};
use mcdeck_refdata::{kelvin_from_mev, ReferenceData};

use crate::finding::{Check, Finding};
use crate::options::ValidationOptions;

/// Shared inputs of every check
pub(crate) struct Context<'a> {
    pub doc: &'a Document,
    pub graph: &'a CrossReferenceGraph,
    pub options: &'a ValidationOptions,
    /// Particles transported, neutrons if the `MODE` card can not be read
    pub mode: Vec<Particle>,
    importances: Vec<Importances>,
}

impl<'a> Context<'a> {
    pub fn new(doc: &'a Document, options: &'a ValidationOptions) -> Self {
        let mode = doc.mode().unwrap_or_else(|e| {
            warn!("Assuming neutron transport, MODE card not readable: {e}");
            vec![Particle::Neutron]
        });

        let importances = doc
            .data_cards()
            .values()
            .filter(|c| matches!(c.kind(), CardKind::Importance(_)))
            .filter_map(|c| Importances::from_card(c).ok())
            .collect();

        Self {
            doc,
            graph: doc.cross_reference_graph(),
            options,
            mode,
            importances,
        }
    }

    pub fn reference(&self) -> &ReferenceData {
        &self.options.reference
    }

    /// Expanded view of every cell that can be expanded
    ///
    /// Cells with a broken `LIKE n BUT` chain are left out here and reported
    /// by [Check::ComplementResolution].
    pub fn expanded_cells(&self) -> impl Iterator<Item = Cow<'a, Cell>> + 'a {
        let doc = self.doc;
        doc.cells()
            .keys()
            .filter_map(move |n| doc.expand_like(*n).ok())
    }

    /// Importance of a cell for a particle, from the cell card or an `IMP`
    /// data card
    pub fn importance(&self, cell: &Cell, particle: Particle) -> Option<f64> {
        if let Some(value) = cell.importance(particle) {
            return Some(value);
        }
        let position = self.doc.cells().get_index_of(&cell.number)?;
        self.importances
            .iter()
            .filter(|imp| imp.particles.contains(&particle))
            .find_map(|imp| imp.values.get(position).copied().flatten())
    }

    /// Temperature of a cell in kelvin from its `TMP` parameter
    pub fn cell_temperature(&self, cell: &Cell) -> Option<f64> {
        let kt = match cell.param_value(ParamName::Tmp)? {
            ParamValue::Entries(entries) => entries.first().and_then(|e| parse_real(e)),
            value => value.as_real(),
        };
        kt.filter(|kt| *kt > 0.0).map(kelvin_from_mev)
    }
}

/// Run one check
pub(crate) fn run(check: Check, context: &Context) -> Vec<Finding> {
    let findings = match check {
        Check::BlockStructure => structure::block_structure(context),
        Check::ContinuationFormatting => structure::continuation_formatting(context),
        Check::SurfaceResolution => references::surface_resolution(context),
        Check::MaterialResolution => references::material_resolution(context),
        Check::DuplicateIdentity => structure::duplicate_identity(context),
        Check::UniverseCycle => universes::universe_cycle(context),
        Check::UniverseFillResolution => universes::fill_resolution(context),
        Check::LatticeCardinality => universes::lattice_cardinality(context),
        Check::ThermalBinding => materials::thermal_binding(context),
        Check::ThermalTemperature => materials::thermal_temperature(context),
        Check::NumberingScheme => conventions::numbering_scheme(context),
        Check::ImportanceCoverage => conventions::importance_coverage(context),
        Check::MaterialComposition => materials::material_composition(context),
        Check::CardSyntax => structure::card_syntax(context),
        Check::ComplementResolution => references::complement_resolution(context),
        Check::TransformResolution => references::transform_resolution(context),
        Check::TallyConsistency => tallies::tally_consistency(context),
        Check::SurfaceParameters => structure::surface_parameters(context),
    };
    trace!("{check}: {} findings", findings.len());
    findings
}
