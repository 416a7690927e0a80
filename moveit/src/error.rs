//! Error types for rebalance log analysis.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for analyzer operations.
pub type Result<T> = std::result::Result<T, MoveitError>;

/// Main error type for the analyzer.
#[derive(Error, Debug)]
pub enum MoveitError {
    /// A file could not be read or written.
    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A log line is not a valid JSON event.
    #[error("malformed event on line {line}: {source}")]
    MalformedEvent {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// A field required by the event type is absent.
    #[error("event on line {line} is missing required field '{field}'")]
    MissingField { line: usize, field: &'static str },

    /// Invalid configuration file or value.
    #[error("config error: {0}")]
    Config(String),

    /// The bucket has no completed movements.
    #[error("bucket '{bucket}' has no completed movements")]
    EmptyBucket { bucket: String },

    /// The bucket's time window has zero or negative length.
    #[error("bucket '{bucket}' has a degenerate time window")]
    DegenerateWindow { bucket: String },
}

impl MoveitError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        MoveitError::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether the error only means "nothing to analyse in this bucket".
    ///
    /// Callers skip the bucket instead of aborting the run.
    pub fn is_skippable(&self) -> bool {
        matches!(
            self,
            MoveitError::EmptyBucket { .. } | MoveitError::DegenerateWindow { .. }
        )
    }
}
