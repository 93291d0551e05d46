//! Error types for corpus loading and index generation.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for corpus operations.
#[derive(Error, Debug)]
pub enum CorpusError {
    /// A document has no discoverable title.
    #[error("Parse error in {path}: {reason}")]
    Parse {
        /// File that failed to parse
        path: PathBuf,
        /// Human-readable cause
        reason: String,
    },

    /// Source directory unreadable or output path unwritable.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// Path being read or written
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Level grouping or other configuration does not fit the corpus.
    #[error("Config error: {0}")]
    Config(String),
}

impl CorpusError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CorpusError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for corpus operations.
pub type Result<T> = std::result::Result<T, CorpusError>;
