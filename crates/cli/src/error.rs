//! Result and Error types for the mcdeck binary

use std::path::PathBuf;

/// Type alias for Result<T, cli::Error>
pub type Result<T> = core::result::Result<T, Error>;

/// Anything that stops a command before findings can be reported
///
/// All of these map to exit code 2.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("failed to write output")]
    Io(#[from] std::io::Error),

    #[error("failed to write findings as JSON")]
    Json(#[from] serde_json::Error),

    #[error("{} can not be read as an input deck", path.display())]
    Deck {
        path: PathBuf,
        #[source]
        source: mcdeck_input::Error,
    },

    #[error("failed to write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: mcdeck_input::Error,
    },

    #[error("invalid validation options")]
    Options(#[from] mcdeck_validate::Error),

    #[error("invalid reference catalog")]
    Catalog(#[from] mcdeck_refdata::Error),
}

impl Error {
    pub fn deck(path: &std::path::Path, source: mcdeck_input::Error) -> Self {
        Self::Deck {
            path: path.to_path_buf(),
            source,
        }
    }

    /// The error and every cause below it, outermost first
    pub fn chain(&self) -> Vec<String> {
        let mut messages = vec![self.to_string()];
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            messages.push(cause.to_string());
            source = cause.source();
        }
        messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_includes_causes() {
        let error = Error::deck(
            std::path::Path::new("deck.i"),
            mcdeck_input::Error::TooFewBlocks { found: 1 },
        );
        assert_eq!(
            error.chain(),
            vec![
                "deck.i can not be read as an input deck".to_string(),
                "expected at least 3 blocks (cells, surfaces, data), found 1".to_string(),
            ]
        );
    }
}
