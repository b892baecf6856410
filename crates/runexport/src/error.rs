//! Error types for the runexport library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for runexport operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Error writing an export artifact to disk.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV writer.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for runexport operations.
pub type Result<T> = std::result::Result<T, ExportError>;
