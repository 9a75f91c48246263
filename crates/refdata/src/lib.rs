//! Reference tables for checking MCNP input decks
#![doc = include_str!("../readme.md")]

mod elements;
mod error;
mod tables;
mod thermal;
mod xs;

use std::path::Path;

#[doc(inline)]
pub use elements::{element, element_by_symbol, elements, natural_abundances, Element, Isotope};

#[doc(inline)]
pub use error::{Error, Result};

#[doc(inline)]
pub use thermal::{
    family_of, kelvin_from_mev, BoundNuclide, ThermalCatalog, ThermalLibrary, BOLTZMANN,
    ROOM_TEMPERATURE,
};

#[doc(inline)]
pub use xs::{LibraryClass, XsCatalog, XsLibrary};

/// The library catalogs consulted when checking a deck
///
/// The element table is fixed and always read through [element] and
/// [element_by_symbol].
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceData {
    pub xs: XsCatalog,
    pub thermal: ThermalCatalog,
}

impl Default for ReferenceData {
    fn default() -> Self {
        Self::embedded()
    }
}

impl ReferenceData {
    /// Catalogs compiled into the crate
    pub fn embedded() -> Self {
        Self {
            xs: XsCatalog::embedded().clone(),
            thermal: ThermalCatalog::embedded().clone(),
        }
    }

    /// Replace the cross-section catalog
    pub fn with_xs(mut self, xs: XsCatalog) -> Self {
        self.xs = xs;
        self
    }

    /// Replace the thermal scattering catalog
    pub fn with_thermal(mut self, thermal: ThermalCatalog) -> Self {
        self.thermal = thermal;
        self
    }

    /// Add libraries from a cross-section catalog file to the current ones
    pub fn extend_xs_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.xs.extend(XsCatalog::from_file(path)?);
        Ok(())
    }

    /// Add libraries from a thermal scattering catalog file to the current ones
    pub fn extend_thermal_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.thermal.extend(ThermalCatalog::from_file(path)?);
        Ok(())
    }
}
