//! Thermal scattering S(a,b) library catalog

// standard library
use std::io::{Read, Write};
use std::path::Path;
use std::sync::OnceLock;

// external crates
use indexmap::IndexMap;
use log::{debug, trace, warn};
use mcdeck_utils::f;
use serde::{Deserialize, Serialize};

// crate modules
use crate::error::{Error, Result};
use crate::tables::{embedded, open, read_csv, read_json, write_json};
use crate::xs::is_json;

/// Temperature assumed when none is given, in kelvin
pub const ROOM_TEMPERATURE: f64 = 293.6;

/// Boltzmann constant in MeV/K, for `TMP` values given as kT
pub const BOLTZMANN: f64 = 8.617_333_262e-11;

/// Convert a kT value in MeV to kelvin
///
/// ```rust
/// # use mcdeck_refdata::kelvin_from_mev;
/// assert!((kelvin_from_mev(2.53e-8) - 293.6).abs() < 0.1);
/// ```
pub fn kelvin_from_mev(kt: f64) -> f64 {
    kt / BOLTZMANN
}

/// A nuclide bound by a thermal scattering library
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundNuclide {
    pub z: u8,
    /// Mass number, `None` binds every isotope of the element
    pub a: Option<u16>,
}

impl BoundNuclide {
    /// True if this binding applies to the nuclide `z`, `a`
    ///
    /// A natural element (`a` of `None`) is covered by a binding to any of
    /// its isotopes.
    pub fn covers(&self, z: u8, a: Option<u16>) -> bool {
        self.z == z && (self.a.is_none() || a.is_none() || self.a == a)
    }

    fn from_za(za: &str) -> Option<Self> {
        let za = za.parse::<u32>().ok()?;
        let z = u8::try_from(za / 1000).ok().filter(|z| *z > 0)?;
        let a = (za % 1000) as u16;
        Some(Self {
            z,
            a: (a != 0).then_some(a),
        })
    }
}

/// One entry of the thermal scattering catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThermalLibrary {
    /// Full identifier with suffix, e.g. `lwtr.20t`
    pub identifier: String,
    /// Moderator described by the data, e.g. `light water`
    pub moderator: String,
    /// Identifier without the suffix, e.g. `lwtr`
    pub family: String,
    /// Evaluation the library was processed from
    pub source: String,
    /// Nuclides the scattering law applies to
    pub bound: Vec<BoundNuclide>,
    /// Nominal temperature in kelvin
    pub temperature: f64,
}

impl ThermalLibrary {
    /// True if the nominal temperature is within `tolerance` of `temperature`
    pub fn suits(&self, temperature: f64, tolerance: f64) -> bool {
        (self.temperature - temperature).abs() <= tolerance
    }

    pub fn binds(&self, z: u8, a: Option<u16>) -> bool {
        self.bound.iter().any(|b| b.covers(z, a))
    }

    fn checked(mut self) -> Result<Self> {
        self.identifier = self.identifier.trim().to_ascii_lowercase();
        self.family = self.family.trim().to_ascii_lowercase();
        if family_of(&self.identifier) != self.family {
            return Err(Error::invalid(
                &self.identifier,
                f!("identifier does not belong to family {}", self.family),
            ));
        }
        if self.bound.is_empty() {
            return Err(Error::invalid(&self.identifier, "no bound nuclides"));
        }
        if !self.temperature.is_finite() || self.temperature <= 0.0 {
            return Err(Error::invalid(
                &self.identifier,
                f!("temperature {} K", self.temperature),
            ));
        }
        Ok(self)
    }
}

/// Flat CSV form with the bound nuclides as a blank separated list
#[derive(Debug, Deserialize)]
struct ThermalRow {
    identifier: String,
    moderator: String,
    family: String,
    source: String,
    bound: String,
    temperature: f64,
}

impl TryFrom<ThermalRow> for ThermalLibrary {
    type Error = Error;

    fn try_from(row: ThermalRow) -> Result<Self> {
        let bound = row
            .bound
            .split_whitespace()
            .map(|za| {
                BoundNuclide::from_za(za)
                    .ok_or_else(|| Error::invalid(&row.identifier, f!("bad ZZZAAA \"{za}\"")))
            })
            .collect::<Result<Vec<BoundNuclide>>>()?;

        Ok(Self {
            identifier: row.identifier,
            moderator: row.moderator,
            family: row.family,
            source: row.source,
            bound,
            temperature: row.temperature,
        })
    }
}

/// Family part of an identifier, `lwtr` for `lwtr.20t`
pub fn family_of(identifier: &str) -> &str {
    identifier
        .split_once('.')
        .map_or(identifier, |(family, _)| family)
}

/// S(a,b) identifier to moderator, bound nuclides, and temperature
///
/// Entries keep the order they were read in, which is also the order of
/// preference when [ThermalCatalog::recommend] has a choice between
/// families.
///
/// ```rust
/// # use mcdeck_refdata::ThermalCatalog;
/// let catalog = ThermalCatalog::embedded();
/// let grph = catalog.get("GRPH.18t").unwrap();
/// assert_eq!(grph.temperature, 1600.0);
/// assert!(grph.binds(6, Some(12)));
/// assert!(catalog.is_known_family("c-graphite"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThermalCatalog {
    libraries: IndexMap<String, ThermalLibrary>,
}

static EMBEDDED: OnceLock<ThermalCatalog> = OnceLock::new();

impl ThermalCatalog {
    /// The catalog compiled into the crate
    pub fn embedded() -> &'static Self {
        EMBEDDED.get_or_init(|| {
            let rows: Vec<ThermalRow> = embedded(
                "thermal scattering",
                include_str!("../data/thermal_libraries.csv"),
            );
            Self::from_csv_rows(rows).unwrap_or_else(|e| {
                warn!("Embedded thermal scattering catalog is invalid: {e}");
                Self::default()
            })
        })
    }

    /// Build a catalog from libraries, later entries replacing earlier ones
    pub fn from_libraries<I: IntoIterator<Item = ThermalLibrary>>(libraries: I) -> Result<Self> {
        let mut catalog = Self::default();
        for library in libraries {
            catalog.insert(library)?;
        }
        debug!("Thermal scattering catalog with {} libraries", catalog.len());
        Ok(catalog)
    }

    fn from_csv_rows(rows: Vec<ThermalRow>) -> Result<Self> {
        let libraries = rows
            .into_iter()
            .map(ThermalLibrary::try_from)
            .collect::<Result<Vec<ThermalLibrary>>>()?;
        Self::from_libraries(libraries)
    }

    /// Read a CSV table with columns
    /// `identifier,moderator,family,source,bound,temperature`
    pub fn from_csv<R: Read>(reader: R) -> Result<Self> {
        Self::from_csv_rows(read_csv(reader)?)
    }

    /// Read a JSON array of libraries
    pub fn from_json<R: Read>(reader: R) -> Result<Self> {
        Self::from_libraries(read_json::<ThermalLibrary, R>(reader)?)
    }

    /// Read a catalog file, JSON if the extension says so and CSV otherwise
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("Reading thermal scattering catalog {}", path.display());
        if is_json(path) {
            Self::from_json(open(path)?)
        } else {
            Self::from_csv(open(path)?)
        }
    }

    /// Write the catalog as a pretty JSON array
    pub fn to_json<W: Write>(&self, writer: W) -> Result<()> {
        let rows: Vec<&ThermalLibrary> = self.libraries.values().collect();
        write_json(&rows, writer)
    }

    /// Add or replace a library, returning any entry it replaced
    pub fn insert(&mut self, library: ThermalLibrary) -> Result<Option<ThermalLibrary>> {
        let library = library.checked()?;
        Ok(self.libraries.insert(library.identifier.clone(), library))
    }

    /// Add every library of `other`, replacing identifiers already present
    pub fn extend(&mut self, other: Self) {
        self.libraries.extend(other.libraries);
    }

    /// Library by full identifier, ignoring case
    pub fn get(&self, identifier: &str) -> Option<&ThermalLibrary> {
        self.libraries.get(&identifier.trim().to_ascii_lowercase())
    }

    /// True for an identifier such as `lwtr` or `lwtr.20t` whose family is
    /// in the catalog
    pub fn is_known_family(&self, identifier: &str) -> bool {
        let family = family_of(identifier.trim()).to_ascii_lowercase();
        self.libraries.values().any(|l| l.family == family)
    }

    /// Every library of a family, in catalog order
    pub fn family(&self, family: &str) -> Vec<&ThermalLibrary> {
        let family = family.trim().to_ascii_lowercase();
        self.libraries
            .values()
            .filter(|l| l.family == family)
            .collect()
    }

    /// Every library binding the nuclide `z`, `a`
    pub fn binding(&self, z: u8, a: Option<u16>) -> Vec<&ThermalLibrary> {
        self.libraries.values().filter(|l| l.binds(z, a)).collect()
    }

    /// True if any library binds the nuclide `z`, `a`
    pub fn is_bindable(&self, z: u8, a: Option<u16>) -> bool {
        self.libraries.values().any(|l| l.binds(z, a))
    }

    /// Best library for a bound nuclide
    ///
    /// Libraries from `source` are preferred when there are any. Among the
    /// remaining candidates the first family in catalog order wins, and
    /// within it the library closest to `temperature` (room temperature if
    /// not given).
    pub fn recommend(
        &self,
        z: u8,
        a: Option<u16>,
        temperature: Option<f64>,
        source: Option<&str>,
    ) -> Option<&ThermalLibrary> {
        let candidates = self.binding(z, a);
        let from_source: Vec<&ThermalLibrary> = match source {
            Some(s) => candidates
                .iter()
                .copied()
                .filter(|l| l.source.eq_ignore_ascii_case(s))
                .collect(),
            None => Vec::new(),
        };
        let candidates = if from_source.is_empty() {
            candidates
        } else {
            from_source
        };

        let first = candidates.first()?;
        let target = temperature.unwrap_or(ROOM_TEMPERATURE);
        let best = candidates
            .iter()
            .filter(|l| l.family == first.family && l.source == first.source)
            .min_by(|x, y| {
                let dx = (x.temperature - target).abs();
                let dy = (y.temperature - target).abs();
                dx.total_cmp(&dy)
            })
            .copied();

        if let Some(library) = best {
            trace!(
                "Recommending {} for Z={z} A={a:?} at {target} K",
                library.identifier
            );
        }
        best
    }

    pub fn iter(&self) -> impl Iterator<Item = &ThermalLibrary> {
        self.libraries.values()
    }

    pub fn len(&self) -> usize {
        self.libraries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.libraries.is_empty()
    }
}
