//! Cross-reference indexes derived from a [Document]

use std::collections::{BTreeMap, BTreeSet};

use log::{debug, trace, warn};

use crate::core::{CellTransform, Fill, ParamName, ParamValue};
use crate::document::Document;

type Index = BTreeMap<u32, BTreeSet<u32>>;

/// Indexes between cells, surfaces, materials, and universes
///
/// Built from the expanded view of every cell, so `LIKE n BUT` cells take
/// part with the geometry and parameters of their base. A graph records the
/// [Document::revision] it was built from; use [CrossReferenceGraph::is_current]
/// to check a graph that was kept across edits.
///
/// ```rust
/// # use mcdeck_input::Document;
/// let doc = Document::from_str("t\n1 0 -1 fill=2\n2 0 -2 u=2\n\n1 so 2\n2 so 1\n\nnps 1\n").unwrap();
/// let graph = doc.cross_reference_graph();
/// assert!(graph.universe_members[&2].contains(&2));
/// assert!(graph.universe_fill_edges[&0].contains(&2));
/// assert!(graph.find_cycle().is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CrossReferenceGraph {
    /// Revision of the document this was built from
    pub revision: u64,
    /// Surfaces bounding each cell
    pub cell_to_surfaces: Index,
    /// Material of each non-void cell
    pub cell_to_material: BTreeMap<u32, u32>,
    /// Universe each cell belongs to, including 0
    pub cell_to_universe: BTreeMap<u32, u32>,
    /// Cells named by `#n` complements in each cell
    pub cell_complements: Index,
    /// Cells belonging to each universe
    pub universe_members: Index,
    /// Universes embedded in each universe through `FILL`
    pub universe_fill_edges: Index,
    /// Cells whose `FILL` names each universe
    pub fill_references: Index,
    /// Universes placed in each lattice cell, in order of first appearance
    pub lattice_fills: BTreeMap<u32, Vec<u32>>,
    /// Cells using each material
    pub material_uses: Index,
    /// Cells bounded by each surface
    pub surface_uses: Index,
    /// Numeric `TRCL` references of each cell
    pub cell_transforms: BTreeMap<u32, u32>,
}

/// A back edge found in the universe fill graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniverseCycle {
    /// Universe whose fill closes the loop
    pub source: u32,
    /// Universe filled by `source` that is already being visited
    pub target: u32,
    /// Universes on the loop, starting from `target`
    pub universes: Vec<u32>,
}

impl CrossReferenceGraph {
    /// Build every index from the current content of a document
    pub fn build(document: &Document) -> Self {
        let mut graph = Self {
            revision: document.revision(),
            ..Default::default()
        };

        for number in document.cells().keys() {
            let cell = match document.expand_like(*number) {
                Ok(cell) => cell,
                Err(e) => {
                    warn!("Cell {number} left out of the cross-reference graph: {e}");
                    continue;
                }
            };

            let surfaces = cell.referenced_surfaces_of_boundary();
            for s in &surfaces {
                graph.surface_uses.entry(*s).or_default().insert(*number);
            }
            graph.cell_to_surfaces.insert(*number, surfaces);

            if let Some(material) = cell.material().filter(|m| *m != 0) {
                graph.cell_to_material.insert(*number, material);
                graph.material_uses.entry(material).or_default().insert(*number);
            }

            let complements = cell
                .geometry()
                .map(|g| g.referenced_cells())
                .unwrap_or_default();
            if !complements.is_empty() {
                graph.cell_complements.insert(*number, complements);
            }

            let universe = cell.universe();
            graph.cell_to_universe.insert(*number, universe);
            graph.universe_members.entry(universe).or_default().insert(*number);

            if let Some(fill) = cell.fill() {
                let is_lattice = cell.lattice().is_some();
                for filled in fill.universes() {
                    graph.fill_references.entry(filled).or_default().insert(*number);
                    // lattice elements naming the lattice universe hold the lattice cell itself
                    if is_lattice && filled == universe {
                        continue;
                    }
                    graph
                        .universe_fill_edges
                        .entry(universe)
                        .or_default()
                        .insert(filled);
                }
                if is_lattice {
                    if let Fill::Array { .. } = fill {
                        graph.lattice_fills.insert(*number, fill.universes());
                    }
                }
            }

            if let Some(ParamValue::Transform(CellTransform::Number(n))) =
                cell.param_value(ParamName::Trcl)
            {
                graph.cell_transforms.insert(*number, *n);
            }
        }

        debug!(
            "Cross-reference graph: {} cells, {} universes, {} fill edges",
            graph.cell_to_surfaces.len(),
            graph.universe_members.len(),
            graph.universe_fill_edges.values().map(|e| e.len()).sum::<usize>()
        );

        graph
    }

    /// True if the graph was built from the document as it is now
    pub fn is_current(&self, document: &Document) -> bool {
        self.revision == document.revision()
    }

    /// Universes that are filled into something but defined by no cell
    pub fn undefined_fills(&self) -> BTreeSet<u32> {
        self.fill_references
            .keys()
            .filter(|u| !self.universe_members.contains_key(u))
            .copied()
            .collect()
    }

    /// First cycle in the universe fill graph, searching from universe 0
    ///
    /// Universes unreachable from 0 are searched afterwards in increasing
    /// order, so every cycle is found whether or not it is placed in the
    /// problem.
    pub fn find_cycle(&self) -> Option<UniverseCycle> {
        self.cycles().into_iter().next()
    }

    /// Every back edge of a depth first search over the fill graph
    pub fn cycles(&self) -> Vec<UniverseCycle> {
        let mut finished = BTreeSet::new();
        let mut cycles = Vec::new();

        let roots = std::iter::once(0).chain(
            self.universe_fill_edges
                .keys()
                .copied()
                .filter(|u| *u != 0),
        );

        for root in roots {
            if finished.contains(&root) {
                continue;
            }
            let mut stack = Vec::new();
            self.visit(root, &mut stack, &mut finished, &mut cycles);
        }
        cycles
    }

    fn visit(
        &self,
        universe: u32,
        stack: &mut Vec<u32>,
        finished: &mut BTreeSet<u32>,
        cycles: &mut Vec<UniverseCycle>,
    ) {
        stack.push(universe);
        for child in self.universe_fill_edges.get(&universe).into_iter().flatten() {
            if let Some(position) = stack.iter().position(|u| u == child) {
                trace!("Back edge {universe} -> {child}");
                cycles.push(UniverseCycle {
                    source: universe,
                    target: *child,
                    universes: stack[position..].to_vec(),
                });
            } else if !finished.contains(child) {
                self.visit(*child, stack, finished, cycles);
            }
        }
        stack.pop();
        finished.insert(universe);
    }

    /// Every universe reachable from `universe` through fills, excluding itself
    pub fn nested_universes(&self, universe: u32) -> BTreeSet<u32> {
        let mut seen = BTreeSet::new();
        let mut pending = vec![universe];
        while let Some(u) = pending.pop() {
            for child in self.universe_fill_edges.get(&u).into_iter().flatten() {
                if seen.insert(*child) {
                    pending.push(*child);
                }
            }
        }
        seen.remove(&universe);
        seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(cells: &str) -> Document {
        let text = format!("title\n{cells}\n\n1 so 1\n2 so 2\n3 so 3\n\nm1 1001 1\n");
        Document::from_str(&text).unwrap()
    }

    #[test]
    fn basic_indexes() {
        let doc = document("1 1 -1.0 -1 imp:n=1\n2 0 1 -2 #1 imp:n=1\n3 like 2 but imp:n=2");
        let graph = doc.cross_reference_graph();
        assert_eq!(graph.cell_to_surfaces[&2], BTreeSet::from([1, 2]));
        assert_eq!(graph.cell_to_surfaces[&3], BTreeSet::from([1, 2]));
        assert_eq!(graph.cell_to_material.get(&1), Some(&1));
        assert_eq!(graph.cell_to_material.get(&2), None);
        assert_eq!(graph.material_uses[&1], BTreeSet::from([1]));
        assert_eq!(graph.surface_uses[&2], BTreeSet::from([2, 3]));
        assert_eq!(graph.cell_complements[&2], BTreeSet::from([1]));
        assert_eq!(graph.universe_members[&0], BTreeSet::from([1, 2, 3]));
        assert!(graph.is_current(&doc));
    }

    #[test]
    fn two_universe_cycle() {
        let doc = document("1 0 -1 u=1 fill=2\n2 0 -2 u=2 fill=1\n3 0 -3 fill=1");
        let cycle = doc.cross_reference_graph().find_cycle().unwrap();
        let universes: BTreeSet<u32> = cycle.universes.iter().copied().collect();
        assert_eq!(universes, BTreeSet::from([1, 2]));
        assert_eq!(cycle.source, 2);
        assert_eq!(cycle.target, 1);
    }

    #[test]
    fn unplaced_cycle_is_found() {
        let doc = document("1 0 -1 u=1 fill=1\n3 0 -3");
        let cycle = doc.cross_reference_graph().find_cycle().unwrap();
        assert_eq!(cycle.universes, vec![1]);
    }

    #[test]
    fn lattice_self_reference_is_not_a_cycle() {
        let doc = document(
            "1 0 -1 fill=1\n2 0 -2 u=1 lat=1 fill=0:1 0:0 0:0 1 2\n3 0 -3 u=2",
        );
        let graph = doc.cross_reference_graph();
        assert!(graph.find_cycle().is_none());
        assert_eq!(graph.lattice_fills[&2], vec![1, 2]);
        assert_eq!(graph.universe_fill_edges[&1], BTreeSet::from([2]));
        assert_eq!(graph.nested_universes(0), BTreeSet::from([1, 2]));
        assert!(graph.undefined_fills().is_empty());
    }

    #[test]
    fn undefined_fill() {
        let doc = document("1 0 -1 fill=7");
        assert_eq!(doc.cross_reference_graph().undefined_fills(), BTreeSet::from([7]));
    }
}
