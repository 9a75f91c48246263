//! Findings for one input file and how they are printed

use std::io::Write;
use std::path::PathBuf;

use mcdeck_utils::f;
use mcdeck_validate::{exit_code, Finding, Severity};
use serde::Serialize;

use crate::error::Result;

/// Findings of one checked file
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    pub title: String,
    pub findings: Vec<Finding>,
}

impl FileReport {
    pub fn exit_code(&self) -> i32 {
        exit_code(&self.findings)
    }

    /// One line count of findings by severity, worst first
    pub fn summary(&self) -> String {
        let counts: Vec<String> = [
            (Severity::Fatal, "fatal"),
            (Severity::Error, "error"),
            (Severity::Warning, "warning"),
            (Severity::Info, "info"),
        ]
        .into_iter()
        .filter_map(|(severity, name)| {
            let n = self.findings.iter().filter(|f| f.severity == severity).count();
            match n {
                0 => None,
                1 => Some(f!("1 {name}")),
                _ if severity == Severity::Fatal || severity == Severity::Info => Some(f!("{n} {name}")),
                _ => Some(f!("{n} {name}s")),
            }
        })
        .collect();

        match counts.is_empty() {
            true => f!("{}: ok", self.path.display()),
            false => f!("{}: {}", self.path.display(), counts.join(", ")),
        }
    }

    /// Human readable findings followed by the summary line
    pub fn write_text<W: Write>(&self, writer: &mut W) -> Result<()> {
        for finding in &self.findings {
            writeln!(writer, "{}: {finding}", self.path.display())?;
        }
        writeln!(writer, "{}", self.summary())?;
        Ok(())
    }
}

/// All reports as a pretty JSON array
pub fn write_json<W: Write>(reports: &[FileReport], writer: &mut W) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, reports)?;
    writeln!(writer)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcdeck_validate::{Check, Reference};

    fn report(findings: Vec<Finding>) -> FileReport {
        FileReport {
            path: PathBuf::from("deck.i"),
            title: "test deck".into(),
            findings,
        }
    }

    #[test]
    fn clean_report() {
        let report = report(Vec::new());
        assert_eq!(report.summary(), "deck.i: ok");
        assert_eq!(report.exit_code(), 0);
    }

    #[test]
    fn text_output() {
        let report = report(vec![
            Finding::fatal(Check::SurfaceResolution, "cell 10 references undefined surface 2")
                .with_remediation("define surface 2"),
            Finding::warning(Check::NumberingScheme, "cell 10 has 2 digits, expected 3"),
            Finding::warning(Check::NumberingScheme, "cell 20 has 2 digits, expected 3"),
        ]);

        let mut buffer = Vec::new();
        report.write_text(&mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "deck.i: fatal[surface-resolution]: cell 10 references undefined surface 2"
        );
        assert_eq!(lines[1], "  help: define surface 2");
        assert_eq!(lines.last().unwrap(), &"deck.i: 1 fatal, 2 warnings");
        assert_eq!(report.exit_code(), 1);
    }

    #[test]
    fn json_output() {
        let report = report(vec![Finding::error(Check::ThermalBinding, "no mt1")
            .with_reference(Reference::Material(1))]);

        let mut buffer = Vec::new();
        write_json(&[report], &mut buffer).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();

        let finding = &value[0]["findings"][0];
        assert_eq!(value[0]["path"], "deck.i");
        assert_eq!(finding["check"], "thermal-binding");
        assert_eq!(finding["severity"], "error");
        assert_eq!(finding["references"][0]["kind"], "material");
        assert_eq!(finding["references"][0]["number"], 1);
    }
}
