//! Tracker error types.

use crate::builder::ConfigError;
use crate::core::AssignError;
use crate::persist::PersistError;
use thiserror::Error;

/// Errors that can occur while creating or using a tracker
#[derive(Debug, Error)]
pub enum TrackError {
    /// The name belongs to tracker bookkeeping
    #[error("Attribute '{name}' is reserved for tracker bookkeeping")]
    ReservedAttribute { name: String },

    /// The empty name marks the initial entry
    #[error("Attribute name must not be empty")]
    EmptyAttributeName,

    #[error(transparent)]
    Assign(#[from] AssignError),

    /// The write was applied and logged, but the log file could not be updated
    #[error("Failed to write log file: {0}")]
    Persist(#[from] PersistError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Tracker result.
pub type TrackResult<T> = Result<T, TrackError>;
