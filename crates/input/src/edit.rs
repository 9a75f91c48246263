//! Editing operations on a [Document]
//!
//! Every operation leaves the document consistent with the insertion
//! invariants, increments the revision, and drops the cached graph.

use std::collections::BTreeSet;
use std::ops::RangeInclusive;
use std::sync::OnceLock;

use log::{debug, trace};

use crate::core::{
    CardKind, Cell, CellKind, CellTransform, DataCard, Fill, ParamKey, ParamName, ParamValue, Surface,
    SurfaceKind, ThermalBinding, Transformation,
};
use crate::document::Document;
use crate::error::{Error, Result};

// ! Cells
impl Document {
    /// Add a cell at the end of the cell block
    ///
    /// Rejects duplicate numbers, void cells with a density, and material
    /// cells without one.
    pub fn insert_cell(&mut self, cell: Cell) -> Result<()> {
        if self.cells.contains_key(&cell.number) {
            return Err(Error::DuplicateCell(cell.number));
        }

        if let CellKind::Explicit {
            material, density, ..
        } = &cell.kind
        {
            match (material, density) {
                (0, Some(_)) => return Err(Error::VoidCellWithDensity(cell.number)),
                (m, None) if *m != 0 => {
                    return Err(Error::MissingDensity {
                        cell: cell.number,
                        material: *m,
                    })
                }
                _ => (),
            }
        }

        trace!("Inserting cell {}", cell.number);
        self.cells.insert(cell.number, cell);
        self.touch();
        Ok(())
    }

    /// Remove a cell, keeping the order of the others
    pub fn remove_cell(&mut self, number: u32) -> Result<Cell> {
        let cell = self
            .cells
            .shift_remove(&number)
            .ok_or(Error::CellNotFound(number))?;
        self.touch();
        Ok(cell)
    }

    /// Swap one universe for another in the fill array of a lattice
    ///
    /// Returns the number of lattice elements changed, counting `nR`
    /// repeats of a replaced entry.
    pub fn replace_universe_in_lattice(&mut self, cell: u32, old: u32, new: u32) -> Result<usize> {
        let target = self.cells.get_mut(&cell).ok_or(Error::CellNotFound(cell))?;

        if target.lattice().is_none() {
            return Err(Error::NotALattice(cell));
        }
        let count = match target.fill_mut() {
            Some(fill) if matches!(fill, Fill::Array { .. }) => fill.replace_universe(old, new),
            _ => return Err(Error::NotALattice(cell)),
        };

        debug!("Replaced universe {old} with {new} in {count} element(s) of lattice {cell}");
        if count > 0 {
            self.touch();
        }
        Ok(count)
    }
}

// ! Surfaces
impl Document {
    /// Add a surface, rejecting duplicate numbers
    pub fn insert_surface(&mut self, surface: Surface) -> Result<()> {
        if self.surfaces.contains_key(&surface.number) {
            return Err(Error::DuplicateSurface(surface.number));
        }
        trace!("Inserting surface {}", surface.number);
        self.surfaces.insert(surface.number, surface);
        self.touch();
        Ok(())
    }

    /// Add a new surface numbered one above the current highest
    ///
    /// ```rust
    /// # use mcdeck_input::{Document, SurfaceKind};
    /// let mut doc = Document::new("title");
    /// assert_eq!(doc.add_surface(SurfaceKind::So, vec![10.0]).unwrap(), 1);
    /// assert_eq!(doc.add_surface(SurfaceKind::Pz, vec![0.0]).unwrap(), 2);
    /// assert!(doc.add_surface(SurfaceKind::Rpp, vec![0.0; 4]).is_err());
    /// ```
    pub fn add_surface(&mut self, kind: SurfaceKind, parameters: Vec<f64>) -> Result<u32> {
        kind.check_parameters(&parameters)?;
        let number = self.surfaces.keys().max().map_or(1, |n| n + 1);
        self.insert_surface(Surface::new(number, kind, parameters))?;
        debug!("Added surface {number} {kind}");
        Ok(number)
    }

    /// Replace the surface with the same number in place
    pub fn replace_surface(&mut self, surface: Surface) -> Result<Surface> {
        let existing = self
            .surfaces
            .get_mut(&surface.number)
            .ok_or(Error::SurfaceNotFound(surface.number))?;
        let old = std::mem::replace(existing, surface);
        self.touch();
        Ok(old)
    }

    /// Remove a surface that no cell refers to
    pub fn remove_surface(&mut self, number: u32) -> Result<Surface> {
        if !self.surfaces.contains_key(&number) {
            return Err(Error::SurfaceNotFound(number));
        }

        let cells: Vec<u32> = self
            .cells
            .values()
            .filter(|c| c.referenced_surfaces_of_boundary().contains(&number))
            .map(|c| c.number)
            .collect();
        if !cells.is_empty() {
            return Err(Error::SurfaceInUse {
                surface: number,
                cells,
            });
        }

        let surface = self
            .surfaces
            .shift_remove(&number)
            .ok_or(Error::SurfaceNotFound(number))?;
        self.touch();
        Ok(surface)
    }

    /// Give a surface a new number and update every reference to it
    ///
    /// Returns the number of half-space references rewritten.
    pub fn renumber_surface(&mut self, old: u32, new: u32) -> Result<usize> {
        if old == new {
            return Ok(0);
        }
        if self.surfaces.contains_key(&new) {
            return Err(Error::DuplicateSurface(new));
        }
        let index = self
            .surfaces
            .get_index_of(&old)
            .ok_or(Error::SurfaceNotFound(old))?;

        let mut surface = self
            .surfaces
            .shift_remove(&old)
            .ok_or(Error::SurfaceNotFound(old))?;
        surface.number = new;
        self.surfaces.shift_insert(index, new, surface);

        let count = self
            .cells
            .values_mut()
            .filter_map(|c| c.geometry_mut())
            .map(|g| g.rename_surface(old, new))
            .sum::<usize>();

        debug!("Renumbered surface {old} to {new}, {count} reference(s) updated");
        self.touch();
        Ok(count)
    }
}

// ! Materials
impl Document {
    /// Set the density of every cell filled with a material
    ///
    /// `LIKE n BUT` cells that name the material or their own density get
    /// an `RHO` override; the others follow their base cell. Returns the
    /// number of cells changed.
    pub fn set_material_density(&mut self, material: u32, density: f64) -> Result<usize> {
        if density == 0.0 || !density.is_finite() {
            return Err(Error::InvalidDensity(density));
        }
        if !self.material_numbers().contains(&material) {
            return Err(Error::MaterialNotFound(material));
        }

        // LIKE cells are decided on the expanded view, before anything changes
        let like_overrides: BTreeSet<u32> = self
            .cells
            .values()
            .filter(|c| c.is_like())
            .filter(|c| c.param(ParamName::Mat).is_some() || c.param(ParamName::Rho).is_some())
            .filter(|c| {
                self.expand_like(c.number)
                    .is_ok_and(|e| e.material() == Some(material))
            })
            .map(|c| c.number)
            .collect();

        let mut count = 0;
        for cell in self.cells.values_mut() {
            if like_overrides.contains(&cell.number) {
                cell.set_param(ParamKey::new(ParamName::Rho), ParamValue::Real(density));
                count += 1;
                continue;
            }
            if let CellKind::Explicit {
                material: m,
                density: rho,
                ..
            } = &mut cell.kind
            {
                if *m == material {
                    *rho = Some(density);
                    count += 1;
                }
            }
        }

        debug!("Set density {density} on {count} cell(s) of material {material}");
        if count > 0 {
            self.touch();
        }
        Ok(count)
    }

    /// Set the density of every defined material in an inclusive range
    ///
    /// Returns the total number of cells changed.
    pub fn set_density_for_materials(
        &mut self,
        materials: RangeInclusive<u32>,
        density: f64,
    ) -> Result<usize> {
        if density == 0.0 || !density.is_finite() {
            return Err(Error::InvalidDensity(density));
        }

        let selected: Vec<u32> = self
            .material_numbers()
            .into_iter()
            .filter(|m| materials.contains(m))
            .collect();

        let mut count = 0;
        for material in selected {
            count += self.set_material_density(material, density)?;
        }
        Ok(count)
    }

    /// Bind thermal scattering libraries to a material
    ///
    /// An existing `MTn` card is replaced. A new one is placed straight
    /// after the `Mn` card.
    pub fn set_thermal_binding(&mut self, material: u32, libraries: Vec<String>) -> Result<()> {
        let index = self
            .data_cards
            .values()
            .position(|c| c.kind() == CardKind::Material(material))
            .ok_or(Error::MaterialNotFound(material))?;

        let card = ThermalBinding {
            material,
            libraries,
        }
        .to_card();

        match self.data_cards.get_mut(&card.name) {
            Some(existing) => existing.entries = card.entries,
            None => {
                self.data_cards.shift_insert(index + 1, card.name.clone(), card);
            }
        }
        self.touch();
        Ok(())
    }
}

// ! Transformations
impl Document {
    /// Move cells by a rigid transformation
    ///
    /// The transformation is composed after any existing `TRCL`, and the
    /// result is written back as an inline `TRCL` in cosine form. Numbered
    /// references must resolve to a `TRn` card.
    pub fn transform_cells(&mut self, cells: &[u32], transformation: &Transformation) -> Result<()> {
        let mut composed = Vec::with_capacity(cells.len());
        for number in cells {
            let cell = self.cells.get(number).ok_or(Error::CellNotFound(*number))?;
            let existing = match cell.transform() {
                None => None,
                Some((CellTransform::Number(n), _)) => Some(
                    self.transformation(*n)
                        .ok_or(Error::TransformNotFound(*n))?,
                ),
                Some((CellTransform::Inline(values), starred)) => {
                    Some(Transformation::from_values(0, starred, values)?)
                }
            };
            let total = match existing {
                Some(inner) => inner.then(transformation),
                None => transformation.then(&Transformation::translation(0, [0.0; 3])),
            };
            composed.push((*number, total));
        }

        for (number, total) in composed {
            if let Some(cell) = self.cells.get_mut(&number) {
                cell.remove_param(ParamName::Trcl);
                cell.set_param(
                    ParamKey::new(ParamName::Trcl),
                    ParamValue::Transform(CellTransform::Inline(total.to_values())),
                );
                trace!("Cell {number} now has trcl {:?}", total.to_values());
            }
        }

        self.touch();
        Ok(())
    }

    /// Translate a single cell
    pub fn translate_cell(&mut self, cell: u32, displacement: [f64; 3]) -> Result<()> {
        self.transform_cells(&[cell], &Transformation::translation(0, displacement))
    }
}

// ! Data cards
impl Document {
    /// Add a data card at the end of the data block
    pub fn insert_data_card(&mut self, card: DataCard) -> Result<()> {
        if self.data_cards.contains_key(&card.name) {
            return Err(Error::DuplicateDataCard(card.name));
        }
        trace!("Inserting data card {}", card.name);
        self.data_cards.insert(card.name.clone(), card);
        self.touch();
        Ok(())
    }

    /// Remove a data card by name, case insensitive
    pub fn remove_data_card(&mut self, name: &str) -> Option<DataCard> {
        let card = self.data_cards.shift_remove(&name.to_lowercase())?;
        self.touch();
        Some(card)
    }
}

impl Document {
    /// Record a mutation
    fn touch(&mut self) {
        self.revision += 1;
        self.graph = OnceLock::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Geometry;

    const DECK: &str = "edit me
1 1 -1.0 -1 imp:n=1
2 2 0.08 1 -2 imp:n=1
3 like 2 but rho=0.1
4 0 2 imp:n=0

1 so 1
2 so 2
3 pz 0

m1 1001 1
m2 6000 1
";

    fn doc() -> Document {
        Document::from_str(DECK).unwrap()
    }

    #[test]
    fn insertion_invariants() {
        let mut doc = doc();
        let g: Geometry = "-3".parse().unwrap();
        assert!(matches!(
            doc.insert_cell(Cell::new(1, 0, None, g.clone())),
            Err(Error::DuplicateCell(1))
        ));
        assert!(matches!(
            doc.insert_cell(Cell::new(5, 0, Some(1.0), g.clone())),
            Err(Error::VoidCellWithDensity(5))
        ));
        assert!(matches!(
            doc.insert_cell(Cell::new(5, 1, None, g.clone())),
            Err(Error::MissingDensity { cell: 5, material: 1 })
        ));
        assert_eq!(doc.revision(), 0);
        doc.insert_cell(Cell::new(5, 0, None, g)).unwrap();
        assert_eq!(doc.revision(), 1);
        assert_eq!(doc.cells().keys().last(), Some(&5));
    }

    #[test]
    fn surfaces() {
        let mut doc = doc();
        assert_eq!(doc.add_surface(SurfaceKind::Cz, vec![4.0]).unwrap(), 4);

        assert!(matches!(
            doc.remove_surface(2),
            Err(Error::SurfaceInUse { surface: 2, .. })
        ));
        assert_eq!(doc.remove_surface(3).unwrap().kind, SurfaceKind::Pz);

        let old = doc.replace_surface(Surface::new(1, SurfaceKind::So, vec![5.0])).unwrap();
        assert_eq!(old.parameters, vec![1.0]);
        assert!(doc.replace_surface(Surface::new(9, SurfaceKind::So, vec![5.0])).is_err());
    }

    #[test]
    fn renumbering_keeps_order_and_sense() {
        let mut doc = doc();
        assert_eq!(doc.renumber_surface(2, 99).unwrap(), 2);
        let order: Vec<u32> = doc.surfaces().keys().copied().collect();
        assert_eq!(order, vec![1, 99, 3]);
        assert_eq!(doc.cell(2).unwrap().geometry().unwrap().to_string(), "1 -99");
        assert_eq!(doc.cell(4).unwrap().geometry().unwrap().to_string(), "99");
        assert!(doc.renumber_surface(1, 3).is_err());
    }

    #[test]
    fn densities() {
        let mut doc = doc();
        // cell 2 and the RHO override of cell 3
        assert_eq!(doc.set_material_density(2, -2.5).unwrap(), 2);
        assert_eq!(doc.cell(2).unwrap().density(), Some(-2.5));
        assert_eq!(doc.expand_like(3).unwrap().density(), Some(-2.5));
        assert!(doc.set_material_density(7, 1.0).is_err());
        assert!(doc.set_material_density(1, 0.0).is_err());

        assert_eq!(doc.set_density_for_materials(1..=2, 0.1).unwrap(), 3);
        assert_eq!(doc.cell(1).unwrap().density(), Some(0.1));
    }

    #[test]
    fn thermal_binding_follows_material() {
        let mut doc = doc();
        doc.set_thermal_binding(1, vec!["lwtr.20t".into()]).unwrap();
        let names: Vec<&str> = doc.data_cards().keys().map(|k| k.as_str()).collect();
        assert_eq!(names, vec!["m1", "mt1", "m2"]);
        doc.set_thermal_binding(1, vec!["lwtr.21t".into()]).unwrap();
        assert_eq!(doc.data_card("mt1").unwrap().entries, vec!["lwtr.21t"]);
        assert!(doc.set_thermal_binding(5, vec![]).is_err());
    }

    #[test]
    fn lattice_universe_swap() {
        let mut doc = Document::from_str(
            "t\n1 0 -1 u=1 lat=1 fill=0:3 0:0 0:0 7 2r 8\n2 0 -1 fill=1\n\n1 so 1\n\nnps 1\n",
        )
        .unwrap();
        assert_eq!(doc.replace_universe_in_lattice(1, 7, 9).unwrap(), 3);
        assert_eq!(doc.cell(1).and_then(|c| c.fill()).map(Fill::expanded), Some(vec![9, 9, 9, 8]));
        assert!(matches!(
            doc.replace_universe_in_lattice(2, 1, 3),
            Err(Error::NotALattice(2))
        ));
    }

    #[test]
    fn translations_compose() {
        let mut doc = doc();
        doc.translate_cell(1, [1.0, 0.0, 0.0]).unwrap();
        doc.translate_cell(1, [0.0, 2.0, 0.0]).unwrap();
        let (transform, starred) = doc.cell(1).unwrap().transform().unwrap();
        assert!(!starred);
        assert_eq!(transform, &CellTransform::Inline(vec![1.0, 2.0, 0.0]));

        doc.insert_data_card(DataCard::new("tr5", vec!["0", "0", "3"])).unwrap();
        doc.cells
            .get_mut(&4)
            .unwrap()
            .set_param(ParamKey::new(ParamName::Trcl), ParamValue::Transform(CellTransform::Number(5)));
        doc.translate_cell(4, [1.0, 0.0, 0.0]).unwrap();
        assert_eq!(
            doc.cell(4).unwrap().transform().unwrap().0,
            &CellTransform::Inline(vec![1.0, 0.0, 3.0])
        );

        assert!(doc.translate_cell(42, [0.0; 3]).is_err());
    }

    #[test]
    fn graph_is_rebuilt_after_edits() {
        let mut doc = doc();
        assert!(doc.cross_reference_graph().is_current(&doc));
        let before = doc.cross_reference_graph().clone();
        doc.renumber_surface(1, 10).unwrap();
        assert!(!before.is_current(&doc));
        assert!(doc.cross_reference_graph().cell_to_surfaces[&1].contains(&10));
    }
}
