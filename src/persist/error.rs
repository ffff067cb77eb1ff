//! Persistence error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while writing a log file
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV encoding failed: {0}")]
    Csv(#[from] csv::Error),

    /// The rendered log could not replace the target file
    #[error("Failed to replace {}: {source}", .path.display())]
    Replace {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Persistence result.
pub type PersistResult<T> = Result<T, PersistError>;
