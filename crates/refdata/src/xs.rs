//! Cross-section library catalog

// standard library
use std::io::{Read, Write};
use std::path::Path;
use std::sync::OnceLock;

// external crates
use indexmap::IndexMap;
use log::{debug, warn};
use mcdeck_utils::f;
use serde::{Deserialize, Serialize};

// crate modules
use crate::error::{Error, Result};
use crate::tables::{embedded, open, read_csv, read_json, write_json};

/// Kind of data held by a library, taken from the suffix letter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LibraryClass {
    /// Continuous energy (`c`) or discrete (`d`) neutron data
    Neutron,
    /// Thermal scattering S(a,b) data (`t`)
    Thermal,
    /// Photoatomic data (`p`)
    Photon,
    /// Electron data (`e`)
    Electron,
    /// Photonuclear data (`u`)
    Photonuclear,
    /// Proton data (`h`)
    Proton,
    /// Dosimetry data (`y`)
    Dosimetry,
}

impl LibraryClass {
    /// Class implied by the last letter of a suffix such as `80c`
    ///
    /// ```rust
    /// # use mcdeck_refdata::LibraryClass;
    /// assert_eq!(LibraryClass::from_suffix("80c"), Some(LibraryClass::Neutron));
    /// assert_eq!(LibraryClass::from_suffix("12p"), Some(LibraryClass::Photon));
    /// assert_eq!(LibraryClass::from_suffix("80"), None);
    /// ```
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        let letter = suffix.chars().last()?.to_ascii_lowercase();
        match letter {
            'c' | 'd' => Some(Self::Neutron),
            't' => Some(Self::Thermal),
            'p' => Some(Self::Photon),
            'e' => Some(Self::Electron),
            'u' => Some(Self::Photonuclear),
            'h' => Some(Self::Proton),
            'y' => Some(Self::Dosimetry),
            _ => None,
        }
    }
}

/// One entry of the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XsLibrary {
    /// Suffix without the leading `.`, lower case
    pub suffix: String,
    /// Evaluation the library was processed from
    pub source: String,
    /// Nominal temperature in kelvin, where the data has one
    pub temperature: Option<f64>,
    pub class: LibraryClass,
}

impl XsLibrary {
    fn checked(mut self) -> Result<Self> {
        self.suffix = normalise(&self.suffix);
        if self.suffix.is_empty() || !self.suffix.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(Error::invalid(&self.suffix, "suffix must be alphanumeric"));
        }
        if let Some(t) = self.temperature {
            if !t.is_finite() || t <= 0.0 {
                return Err(Error::invalid(&self.suffix, f!("temperature {t} K")));
            }
        }
        match LibraryClass::from_suffix(&self.suffix) {
            Some(class) if class != self.class => Err(Error::invalid(
                &self.suffix,
                f!("suffix letter implies {class:?}, not {:?}", self.class),
            )),
            _ => Ok(self),
        }
    }
}

/// Library suffix to source, temperature, and class
///
/// Lookups ignore case and a leading `.`.
///
/// ```rust
/// # use mcdeck_refdata::{LibraryClass, XsCatalog};
/// let catalog = XsCatalog::embedded();
/// let library = catalog.get(".80c").unwrap();
/// assert_eq!(library.temperature, Some(293.6));
/// assert_eq!(library.class, LibraryClass::Neutron);
/// assert!(catalog.get("99c").is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct XsCatalog {
    libraries: IndexMap<String, XsLibrary>,
}

static EMBEDDED: OnceLock<XsCatalog> = OnceLock::new();

impl XsCatalog {
    /// The catalog compiled into the crate
    pub fn embedded() -> &'static Self {
        EMBEDDED.get_or_init(|| {
            let rows: Vec<XsLibrary> =
                embedded("cross-section", include_str!("../data/xs_libraries.csv"));
            Self::from_rows(rows).unwrap_or_else(|e| {
                warn!("Embedded cross-section catalog is invalid: {e}");
                Self::default()
            })
        })
    }

    /// Build a catalog from rows, later rows replacing earlier suffixes
    pub fn from_rows<I: IntoIterator<Item = XsLibrary>>(rows: I) -> Result<Self> {
        let mut catalog = Self::default();
        for row in rows {
            catalog.insert(row)?;
        }
        debug!("Cross-section catalog with {} libraries", catalog.len());
        Ok(catalog)
    }

    /// Read a CSV table with columns `suffix,source,temperature,class`
    pub fn from_csv<R: Read>(reader: R) -> Result<Self> {
        Self::from_rows(read_csv::<XsLibrary, R>(reader)?)
    }

    /// Read a JSON array of libraries
    pub fn from_json<R: Read>(reader: R) -> Result<Self> {
        Self::from_rows(read_json::<XsLibrary, R>(reader)?)
    }

    /// Read a catalog file, JSON if the extension says so and CSV otherwise
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("Reading cross-section catalog {}", path.display());
        if is_json(path) {
            Self::from_json(open(path)?)
        } else {
            Self::from_csv(open(path)?)
        }
    }

    /// Write the catalog as a pretty JSON array
    pub fn to_json<W: Write>(&self, writer: W) -> Result<()> {
        let rows: Vec<&XsLibrary> = self.libraries.values().collect();
        write_json(&rows, writer)
    }

    /// Add or replace a library, returning any entry it replaced
    pub fn insert(&mut self, library: XsLibrary) -> Result<Option<XsLibrary>> {
        let library = library.checked()?;
        Ok(self.libraries.insert(library.suffix.clone(), library))
    }

    /// Add every library of `other`, replacing suffixes already present
    pub fn extend(&mut self, other: Self) {
        self.libraries.extend(other.libraries);
    }

    pub fn get(&self, suffix: &str) -> Option<&XsLibrary> {
        self.libraries.get(&normalise(suffix))
    }

    pub fn contains(&self, suffix: &str) -> bool {
        self.get(suffix).is_some()
    }

    /// Evaluation source of a suffix, if known
    pub fn source_of(&self, suffix: &str) -> Option<&str> {
        self.get(suffix).map(|l| l.source.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &XsLibrary> {
        self.libraries.values()
    }

    pub fn len(&self) -> usize {
        self.libraries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.libraries.is_empty()
    }
}

fn normalise(suffix: &str) -> String {
    suffix.trim().trim_start_matches('.').to_ascii_lowercase()
}

pub(crate) fn is_json(path: &Path) -> bool {
    path.extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_catalog() {
        let catalog = XsCatalog::embedded();
        assert!(catalog.len() > 30);
        assert_eq!(catalog.source_of("70c"), Some("ENDF/B-VII.0"));
        assert_eq!(catalog.source_of("00C"), Some("ENDF/B-VII.1"));
        assert_eq!(catalog.get("84c").unwrap().temperature, Some(2500.0));
        assert_eq!(catalog.get("12p").unwrap().temperature, None);
        assert_eq!(catalog.get("03e").unwrap().class, LibraryClass::Electron);
    }

    #[test]
    fn csv_with_comments_and_blanks() {
        let text = "suffix,source,temperature,class\n\
                    # local builds\n\
                    .90c , LOCAL , 600 , neutron\n\
                    90p,LOCAL,,photon\n";
        let catalog = XsCatalog::from_csv(text.as_bytes()).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("90c").unwrap().source, "LOCAL");
        assert_eq!(catalog.get("90p").unwrap().temperature, None);
    }

    #[test]
    fn class_must_match_suffix() {
        let text = "suffix,source,temperature,class\n90c,LOCAL,600,photon\n";
        let error = XsCatalog::from_csv(text.as_bytes()).unwrap_err();
        assert!(matches!(error, Error::InvalidEntry { .. }));
    }

    #[test]
    fn negative_temperature_is_rejected() {
        let text = "suffix,source,temperature,class\n90c,LOCAL,-1,neutron\n";
        assert!(XsCatalog::from_csv(text.as_bytes()).is_err());
    }

    #[test]
    fn json_round_trip() {
        let mut buffer = Vec::new();
        XsCatalog::embedded().to_json(&mut buffer).unwrap();
        let reread = XsCatalog::from_json(buffer.as_slice()).unwrap();
        assert_eq!(&reread, XsCatalog::embedded());
    }

    #[test]
    fn extend_overrides() {
        let mut catalog = XsCatalog::embedded().clone();
        let local = "suffix,source,temperature,class\n80c,LOCAL,300,neutron\n";
        catalog.extend(XsCatalog::from_csv(local.as_bytes()).unwrap());
        assert_eq!(catalog.source_of("80c"), Some("LOCAL"));
        assert_eq!(catalog.len(), XsCatalog::embedded().len());
    }
}
