//! Element table and natural isotopic abundances

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::tables::embedded;

/// A chemical element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Atomic number
    pub z: u8,
    /// Chemical symbol, e.g. `Fe`
    pub symbol: String,
    /// Lower case element name
    pub name: String,
    /// Standard atomic weight, or the mass number of the longest lived
    /// isotope for elements without one
    pub weight: f64,
}

/// One naturally occurring isotope
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Isotope {
    pub z: u8,
    pub a: u16,
    /// Atom fraction in the natural element
    pub abundance: f64,
}

impl Isotope {
    /// The `ZZZAAA` number
    pub fn za(&self) -> u32 {
        u32::from(self.z) * 1000 + u32::from(self.a)
    }
}

// Only ever deserialise data once on first use
static ELEMENTS: OnceLock<Vec<Element>> = OnceLock::new();
static ABUNDANCES: OnceLock<Vec<Isotope>> = OnceLock::new();

/// Every element from hydrogen to fermium, ordered by atomic number
pub fn elements() -> &'static [Element] {
    ELEMENTS.get_or_init(|| embedded("element", include_str!("../data/elements.csv")))
}

/// Element with atomic number `z`
///
/// ```rust
/// # use mcdeck_refdata::element;
/// assert_eq!(element(26).unwrap().symbol, "Fe");
/// assert!(element(0).is_none());
/// assert!(element(101).is_none());
/// ```
pub fn element(z: u8) -> Option<&'static Element> {
    let index = usize::from(z).checked_sub(1)?;
    elements().get(index).filter(|e| e.z == z)
}

/// Element with the given symbol, ignoring case
///
/// ```rust
/// # use mcdeck_refdata::element_by_symbol;
/// assert_eq!(element_by_symbol("fe").unwrap().z, 26);
/// assert_eq!(element_by_symbol("HE").unwrap().z, 2);
/// assert!(element_by_symbol("Xx").is_none());
/// ```
pub fn element_by_symbol(symbol: &str) -> Option<&'static Element> {
    elements()
        .iter()
        .find(|e| e.symbol.eq_ignore_ascii_case(symbol))
}

/// Natural isotopic composition of element `z`
///
/// Empty for elements not covered by the table.
pub fn natural_abundances(z: u8) -> Vec<Isotope> {
    ABUNDANCES
        .get_or_init(|| embedded("abundance", include_str!("../data/abundances.csv")))
        .iter()
        .filter(|i| i.z == z)
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_complete_and_ordered() {
        let table = elements();
        assert_eq!(table.len(), 100);
        for (i, e) in table.iter().enumerate() {
            assert_eq!(usize::from(e.z), i + 1);
            assert!(e.weight > 0.0);
        }
        assert_eq!(element(100).unwrap().name, "fermium");
    }

    #[test]
    fn symbols_are_unique() {
        let table = elements();
        for e in table {
            assert_eq!(element_by_symbol(&e.symbol).unwrap().z, e.z);
        }
    }

    #[test]
    fn abundances_sum_to_one() {
        for z in [1, 2, 3, 4, 5, 6, 7, 8, 13, 14, 24, 26, 28, 29, 40, 42, 82, 92] {
            let isotopes = natural_abundances(z);
            assert!(!isotopes.is_empty(), "no isotopes for {z}");
            let total: f64 = isotopes.iter().map(|i| i.abundance).sum();
            assert!((total - 1.0).abs() < 1e-3, "Z={z} sums to {total}");
        }
    }

    #[test]
    fn uncovered_element_has_no_abundances() {
        assert!(natural_abundances(43).is_empty());
        assert_eq!(natural_abundances(1)[1].za(), 1002);
    }
}
