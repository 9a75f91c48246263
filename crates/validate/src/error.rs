//! Result and Error types for the validation module

/// Type alias for `Result<T, validate::Error>`
pub type Result<T> = core::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
/// The error type for `mcdeck-validate`
///
/// Only loading configuration can fail. Problems with a deck are always
/// reported as [crate::Finding]s.
pub enum Error {
    /// Underlying file I/O error
    #[error("failure in file I/O")]
    Io(#[from] std::io::Error),

    /// Failure to read a JSON configuration
    #[error("failed serde JSON operation")]
    Json(#[from] serde_json::Error),

    /// Failure to load a reference catalog
    #[error("failed to load reference data")]
    RefData(#[from] mcdeck_refdata::Error),

    /// Numbering scheme that contradicts itself
    #[error("invalid numbering scheme: {0}")]
    InvalidScheme(String),
}
