//! Shared readers for the CSV and JSON tables

// standard library
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

// external crates
use log::{error, trace};
use serde::de::DeserializeOwned;
use serde::Serialize;

// crate modules
use crate::error::Result;

/// Deserialise every row of a CSV table with a header line
///
/// Fields are trimmed and lines starting with `#` are ignored.
pub(crate) fn read_csv<T: DeserializeOwned, R: Read>(reader: R) -> Result<Vec<T>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .quoting(false)
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for row in reader.deserialize::<T>() {
        rows.push(row?);
    }
    trace!("Read {} CSV rows", rows.len());
    Ok(rows)
}

/// Deserialise a JSON array of rows
pub(crate) fn read_json<T: DeserializeOwned, R: Read>(reader: R) -> Result<Vec<T>> {
    Ok(serde_json::from_reader(reader)?)
}

/// Open a file for buffered reading
pub(crate) fn open<P: AsRef<Path>>(path: P) -> Result<BufReader<File>> {
    Ok(BufReader::new(File::open(path)?))
}

/// Write rows as a pretty JSON array
pub(crate) fn write_json<T: Serialize, W: Write>(rows: &[T], writer: W) -> Result<()> {
    let mut writer = BufWriter::new(writer);
    serde_json::to_writer_pretty(&mut writer, rows)?;
    writer.flush()?;
    Ok(())
}

/// Rows of a table compiled into the crate
///
/// The embedded tables are checked by the crate tests, so a failure here is
/// logged and gives an empty table rather than a panic.
pub(crate) fn embedded<T: DeserializeOwned>(name: &str, text: &'static str) -> Vec<T> {
    read_csv(text.as_bytes()).unwrap_or_else(|e| {
        error!("Embedded {name} table could not be read: {e}");
        Vec::new()
    })
}
