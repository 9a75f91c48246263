//! Command line arguments

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use log::debug;
use mcdeck_validate::{Check, ValidationOptions};

use crate::error::Result;

/// Check and format MCNP input decks
#[derive(Parser, Debug)]
#[command(name = "mcdeck", version, arg_required_else_help = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// No log output at all
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Parse and validate decks, reporting findings
    Check(CheckArgs),

    /// Print the canonical form of a deck
    Format(FormatArgs),
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Input decks to check
    #[arg(required = true, value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Write findings as JSON instead of text
    #[arg(long)]
    pub json: bool,

    /// Validation options as JSON
    #[arg(short, long, value_name = "JSON")]
    pub config: Option<PathBuf>,

    /// Operating temperature in kelvin
    #[arg(short, long, value_name = "K")]
    pub temperature: Option<f64>,

    /// Allowed distance between a library and the operating temperature
    #[arg(long, value_name = "K")]
    pub tolerance: Option<f64>,

    /// Extra cross-section libraries (CSV or JSON)
    #[arg(long, value_name = "PATH")]
    pub xs_catalog: Option<PathBuf>,

    /// Extra thermal scattering libraries (CSV or JSON)
    #[arg(long, value_name = "PATH")]
    pub sab_catalog: Option<PathBuf>,

    /// Only run these checks
    #[arg(long, value_name = "ID", value_delimiter = ',', value_parser = parse_check)]
    pub only: Vec<Check>,

    /// Skip these checks
    #[arg(long, value_name = "ID", value_delimiter = ',', value_parser = parse_check)]
    pub skip: Vec<Check>,
}

impl CheckArgs {
    /// Options from the config file with command line values on top
    pub fn options(&self) -> Result<ValidationOptions> {
        let mut options = match &self.config {
            Some(path) => ValidationOptions::from_json_file(path)?,
            None => ValidationOptions::new(),
        };

        if let Some(t) = self.temperature {
            options = options.with_temperature(t);
        }
        if let Some(t) = self.tolerance {
            options = options.with_tolerance(t);
        }
        if !self.only.is_empty() {
            options = options.only(&self.only);
        }
        for check in &self.skip {
            options = options.without(*check);
        }

        if let Some(path) = &self.xs_catalog {
            options.reference.extend_xs_from_file(path)?;
            options.xs_catalog = Some(path.clone());
        }
        if let Some(path) = &self.sab_catalog {
            options.reference.extend_thermal_from_file(path)?;
            options.sab_catalog = Some(path.clone());
        }

        debug!(
            "{} checks enabled, temperature {:?} K, {} xs and {} S(a,b) libraries",
            Check::ALL.iter().filter(|c| options.is_enabled(**c)).count(),
            options.temperature,
            options.reference.xs.len(),
            options.reference.thermal.len()
        );
        Ok(options)
    }
}

#[derive(Args, Debug)]
pub struct FormatArgs {
    /// Input deck to format
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Maximum line width
    #[arg(short, long, default_value_t = 78)]
    pub width: usize,

    /// Write to a file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

fn parse_check(id: &str) -> core::result::Result<Check, String> {
    Check::from_id(id).ok_or_else(|| {
        let known: Vec<&str> = Check::ALL.iter().map(|c| c.id()).collect();
        format!("unknown check \"{id}\", expected one of {}", known.join(", "))
    })
}
