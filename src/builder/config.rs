//! Tracker configuration.

use crate::builder::error::{ConfigError, ConfigViolation};
use crate::core::SimplifyPolicy;
use crate::persist::{Encoder, LogFormat};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Default number of entries kept in memory.
pub const DEFAULT_BUFFER_SIZE: usize = 100;

/// Tracker configuration, fixed when the tracker is created.
///
/// Every field has a default, so a partial JSON document is enough:
///
/// ```rust
/// use statesight::builder::TrackerConfig;
///
/// let config = TrackerConfig::from_json(r#"{"log_lists": true}"#).unwrap();
/// assert_eq!(config.buffer_size, 100);
/// assert!(config.log_lists);
/// assert!(config.log_file.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Maximum number of entries kept in memory.
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,
    /// File mirroring the log; format follows the extension.
    #[serde(default)]
    pub log_file: Option<PathBuf>,
    /// Log list values verbatim instead of a placeholder.
    #[serde(default)]
    pub log_lists: bool,
    /// Log dict values verbatim instead of a placeholder.
    #[serde(default)]
    pub log_dicts: bool,
    /// Log numeric arrays verbatim instead of a placeholder.
    #[serde(default)]
    pub log_numpy_arrays: bool,
}

fn default_buffer_size() -> usize {
    DEFAULT_BUFFER_SIZE
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
            log_file: None,
            log_lists: false,
            log_dicts: false,
            log_numpy_arrays: false,
        }
    }
}

impl TrackerConfig {
    /// Parse a configuration from JSON and validate it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.check()?;
        Ok(config)
    }

    /// Validate the configuration, accumulating every violation.
    pub fn validate(&self) -> Validation<(), NonEmptyVec<ConfigViolation>> {
        let buffer = if self.buffer_size == 0 {
            Validation::fail(ConfigViolation::ZeroBufferSize)
        } else {
            Validation::success(())
        };

        let file = match &self.log_file {
            Some(path) if path.file_name().is_none() => {
                Validation::fail(ConfigViolation::MissingFileName { path: path.clone() })
            }
            _ => Validation::success(()),
        };

        Validation::all_vec(vec![buffer, file]).map(|_| ())
    }

    /// Validate, converting failures into a `ConfigError`.
    pub fn check(&self) -> Result<(), ConfigError> {
        match self.validate() {
            Validation::Success(()) => Ok(()),
            Validation::Failure(violations) => {
                Err(ConfigError::Invalid(violations.iter().cloned().collect()))
            }
        }
    }

    /// Simplification policy implied by the logging flags.
    pub fn policy(&self) -> SimplifyPolicy {
        SimplifyPolicy {
            log_lists: self.log_lists,
            log_dicts: self.log_dicts,
            log_numpy_arrays: self.log_numpy_arrays,
        }
    }

    pub fn encoder(&self) -> Encoder {
        Encoder::new(self.log_numpy_arrays)
    }

    /// Format of the log file, if file logging is enabled.
    pub fn log_format(&self) -> Option<LogFormat> {
        self.log_file.as_ref().map(LogFormat::from_path)
    }
}
