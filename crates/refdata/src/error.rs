//! Result and Error types for the reference data module

/// Type alias for `Result<T, refdata::Error>`
pub type Result<T> = core::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
/// The error type for `mcdeck-refdata`
pub enum Error {
    /// Underlying file I/O error
    #[error("failure in file I/O")]
    Io(#[from] std::io::Error),

    /// Failure to read or write a JSON catalog
    #[error("failed serde JSON operation")]
    Json(#[from] serde_json::Error),

    /// Failure to read a CSV catalog
    #[error("failed CSV operation")]
    Csv(#[from] csv::Error),

    /// A catalog row that deserialised but makes no sense
    #[error("invalid catalog entry {entry}: {reason}")]
    InvalidEntry { entry: String, reason: String },
}

impl Error {
    pub(crate) fn invalid<E: Into<String>, R: Into<String>>(entry: E, reason: R) -> Self {
        Self::InvalidEntry {
            entry: entry.into(),
            reason: reason.into(),
        }
    }
}
