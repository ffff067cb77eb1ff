//! Configuration errors for tracker builders.

use std::path::PathBuf;
use thiserror::Error;

/// A single problem found while validating a tracker configuration.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigViolation {
    #[error("buffer_size must be at least 1")]
    ZeroBufferSize,

    #[error("log_file '{}' has no file name", .path.display())]
    MissingFileName { path: PathBuf },
}

/// Errors that can occur when building a tracker.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Every violation found, not just the first
    #[error("Invalid tracker configuration: {}", join(.0))]
    Invalid(Vec<ConfigViolation>),

    #[error("Failed to parse tracker configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

fn join(violations: &[ConfigViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
