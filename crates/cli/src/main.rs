//! The `mcdeck` command line tool
//!
//! ```text
//! mcdeck check deck.i other.i --temperature 600 --json
//! mcdeck format deck.i --width 80 -o tidy.i
//! ```
//!
//! Exit codes are `0` when nothing is worse than a warning, `1` when any file
//! has an error or fatal finding, and `2` for usage and I/O failures.

mod cli;
mod error;
mod report;

use std::io::Write;
use std::path::Path;

use clap::Parser;
use log::{debug, error, info, warn};
use mcdeck_input::{parse_file, Writer};
use mcdeck_validate::{validate, ValidationOptions};
use rayon::prelude::*;

use crate::cli::{CheckArgs, Cli, Command, FormatArgs};
use crate::error::{Error, Result};
use crate::report::{write_json, FileReport};

/// Exit code for usage and I/O failures
const FAILURE: i32 = 2;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = stderrlog::new()
        .modules(["mcdeck", "mcdeck_input", "mcdeck_refdata", "mcdeck_validate"])
        .quiet(cli.quiet)
        .verbosity(usize::from(cli.verbose) + 1)
        .init()
    {
        eprintln!("logging unavailable: {e}");
    }

    let code = match run(cli.command) {
        Ok(code) => code,
        Err(e) => {
            for message in e.chain() {
                error!("{message}");
            }
            FAILURE
        }
    };
    std::process::exit(code)
}

fn run(command: Command) -> Result<i32> {
    match command {
        Command::Check(args) => check(&args),
        Command::Format(args) => format(&args),
    }
}

/// Validate every file in parallel and report in the order given
fn check(args: &CheckArgs) -> Result<i32> {
    let options = args.options()?;
    info!("Checking {} file(s)", args.files.len());

    let results: Vec<Result<FileReport>> = args
        .files
        .par_iter()
        .map(|path| check_file(path, &options))
        .collect();

    let mut code = 0;
    let mut reports = Vec::with_capacity(results.len());
    for result in results {
        match result {
            Ok(report) => {
                code = code.max(report.exit_code());
                reports.push(report);
            }
            Err(e) => {
                for message in e.chain() {
                    error!("{message}");
                }
                code = FAILURE;
            }
        }
    }

    let mut stdout = std::io::stdout().lock();
    if args.json {
        write_json(&reports, &mut stdout)?;
    } else {
        for report in &reports {
            report.write_text(&mut stdout)?;
        }
    }
    stdout.flush()?;
    Ok(code)
}

fn check_file(path: &Path, options: &ValidationOptions) -> Result<FileReport> {
    debug!("Reading {}", path.display());
    let document = parse_file(path).map_err(|e| Error::deck(path, e))?;
    let findings = validate(&document, options);
    Ok(FileReport {
        path: path.to_path_buf(),
        title: document.title.clone(),
        findings,
    })
}

/// Write the canonical form of a deck
fn format(args: &FormatArgs) -> Result<i32> {
    let document = parse_file(&args.file).map_err(|e| Error::deck(&args.file, e))?;
    if !document.diagnostics().is_clean() {
        warn!(
            "{} has reading problems, the formatted deck may differ",
            args.file.display()
        );
    }

    let writer = Writer::with_width(args.width);
    match &args.output {
        Some(path) => {
            writer
                .write_file(&document, path)
                .map_err(|source| Error::Write {
                    path: path.clone(),
                    source,
                })?;
            info!("Formatted deck written to {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(writer.serialize(&document).as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(0)
}
