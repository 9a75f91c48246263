//! Configuration of a validation run

// standard library
use std::path::{Path, PathBuf};

// external crates
use log::{debug, info};
use mcdeck_refdata::ReferenceData;
use serde::{Deserialize, Serialize};

// crate modules
use crate::error::Result;
use crate::finding::Check;
use crate::numbering::NumberingScheme;

/// Everything a validation run can be told
///
/// All fields have defaults, so an empty JSON object is a valid
/// configuration.
///
/// ```rust
/// # use mcdeck_validate::{Check, ValidationOptions};
/// let options = ValidationOptions::from_json_str(r#"{
///     "temperature": 600.0,
///     "skip": ["importance-coverage"]
/// }"#).unwrap();
/// assert_eq!(options.temperature, Some(600.0));
/// assert_eq!(options.tolerance, 50.0);
/// assert!(!options.is_enabled(Check::ImportanceCoverage));
/// assert!(options.is_enabled(Check::UniverseCycle));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidationOptions {
    /// Operating temperature in kelvin, used for thermal library checks
    pub temperature: Option<f64>,
    /// Allowed distance in kelvin between a library and the operating
    /// temperature
    pub tolerance: f64,
    /// Numbering convention to check entities against
    pub numbering: Option<NumberingScheme>,
    /// Checks to run, every check if not given
    pub checks: Option<Vec<Check>>,
    /// Checks never to run, applied after `checks`
    pub skip: Vec<Check>,
    /// Cross-section catalog extending the embedded one
    pub xs_catalog: Option<PathBuf>,
    /// Thermal scattering catalog extending the embedded one
    pub sab_catalog: Option<PathBuf>,
    /// Catalogs consulted by the checks
    #[serde(skip)]
    pub reference: ReferenceData,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            temperature: None,
            tolerance: 50.0,
            numbering: None,
            checks: None,
            skip: Vec::new(),
            xs_catalog: None,
            sab_catalog: None,
            reference: ReferenceData::embedded(),
        }
    }
}

impl ValidationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read options from JSON text and load any catalogs it names
    pub fn from_json_str(text: &str) -> Result<Self> {
        let mut options: Self = serde_json::from_str(text)?;
        if let Some(scheme) = options.numbering.take() {
            options.numbering = Some(scheme.checked()?);
        }
        options.load_catalogs()?;
        Ok(options)
    }

    /// Read options from a JSON file and load any catalogs it names
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Reading validation options {}", path.display());
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Extend the embedded catalogs with the files in `xs_catalog` and
    /// `sab_catalog`
    ///
    /// Checks never read files themselves, so this is the only place
    /// catalogs are loaded.
    pub fn load_catalogs(&mut self) -> Result<()> {
        if let Some(path) = &self.xs_catalog {
            debug!("Extending cross-section catalog from {}", path.display());
            self.reference.extend_xs_from_file(path)?;
        }
        if let Some(path) = &self.sab_catalog {
            debug!("Extending thermal scattering catalog from {}", path.display());
            self.reference.extend_thermal_from_file(path)?;
        }
        Ok(())
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_numbering(mut self, scheme: NumberingScheme) -> Self {
        self.numbering = Some(scheme);
        self
    }

    pub fn with_reference(mut self, reference: ReferenceData) -> Self {
        self.reference = reference;
        self
    }

    /// Run only the given checks
    pub fn only(mut self, checks: &[Check]) -> Self {
        self.checks = Some(checks.to_vec());
        self
    }

    /// Never run the given check
    pub fn without(mut self, check: Check) -> Self {
        self.skip.push(check);
        self
    }

    pub fn is_enabled(&self, check: Check) -> bool {
        let selected = self
            .checks
            .as_ref()
            .map_or(true, |checks| checks.contains(&check));
        selected && !self.skip.contains(&check)
    }
}
