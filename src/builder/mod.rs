//! Builder API for creating trackers.
//!
//! This module provides a fluent builder over [`TrackerConfig`] and the
//! [`trackable!`](crate::trackable) macro for declaring tracked types with
//! minimal boilerplate.

pub mod config;
pub mod error;
pub mod macros;

pub use config::{TrackerConfig, DEFAULT_BUFFER_SIZE};
pub use error::{ConfigError, ConfigViolation};

use crate::core::Trackable;
use crate::tracker::{StateTracker, TrackResult};
use std::path::PathBuf;

/// Builder for constructing trackers with a fluent API.
///
/// # Example
///
/// ```
/// use statesight::builder::TrackerBuilder;
/// use statesight::core::DynamicObject;
///
/// let tracker = TrackerBuilder::new()
///     .buffer_size(50)
///     .log_dicts(true)
///     .build(DynamicObject::new("Config").with("retries", 3))
///     .unwrap();
///
/// assert_eq!(tracker.get_log().len(), 1);
/// assert_eq!(tracker.config().buffer_size, 50);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TrackerBuilder {
    config: TrackerConfig,
}

impl TrackerBuilder {
    /// Create a builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration.
    pub fn from_config(config: TrackerConfig) -> Self {
        Self { config }
    }

    /// Maximum number of entries kept in memory.
    pub fn buffer_size(mut self, size: usize) -> Self {
        self.config.buffer_size = size;
        self
    }

    /// Mirror the log to a file; format follows the extension.
    pub fn log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.log_file = Some(path.into());
        self
    }

    pub fn log_lists(mut self, enabled: bool) -> Self {
        self.config.log_lists = enabled;
        self
    }

    pub fn log_dicts(mut self, enabled: bool) -> Self {
        self.config.log_dicts = enabled;
        self
    }

    pub fn log_numpy_arrays(mut self, enabled: bool) -> Self {
        self.config.log_numpy_arrays = enabled;
        self
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Track an already constructed object.
    ///
    /// The log starts with a single "Initial State" entry describing the
    /// object as given.
    pub fn build<T: Trackable>(self, object: T) -> TrackResult<StateTracker<T>> {
        self.config.check()?;
        let mut tracker = StateTracker::new(object, self.config);
        tracker.start()?;
        Ok(tracker)
    }

    /// Track an object built up by an initializer.
    ///
    /// `init` runs against the tracker with recording switched off: its
    /// writes reach the object but produce no entries and no file writes.
    /// Afterwards the log holds a single "Initial State" entry.
    ///
    /// # Example
    ///
    /// ```
    /// use statesight::builder::TrackerBuilder;
    /// use statesight::core::{DynamicObject, Value};
    ///
    /// let tracker = TrackerBuilder::new()
    ///     .construct(DynamicObject::new("Point"), |t| {
    ///         t.set_attribute("x", 10)?;
    ///         t.set_attribute("y", "Hello")?;
    ///         Ok(())
    ///     })
    ///     .unwrap();
    ///
    /// let log = tracker.get_log();
    /// assert_eq!(log.len(), 1);
    /// assert!(log[0].change.is_initial());
    /// assert_eq!(log[0].value_of("y"), Value::from("Hello"));
    /// ```
    pub fn construct<T, F>(self, seed: T, init: F) -> TrackResult<StateTracker<T>>
    where
        T: Trackable,
        F: FnOnce(&mut StateTracker<T>) -> TrackResult<()>,
    {
        self.config.check()?;
        let mut tracker = StateTracker::new(seed, self.config);
        tracker.mute();
        init(&mut tracker)?;
        tracker.start()?;
        Ok(tracker)
    }
}
