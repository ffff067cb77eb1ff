//! StateSight: transparent change tracking for mutable objects
//!
//! Every attribute write on a tracked object is recorded as a timestamped log
//! entry holding the attribute name, its previous and new values, and a full
//! snapshot of the object at that moment. The log is bounded and can be
//! mirrored to a JSON, CSV or plain-text file.
//!
//! # Core Concepts
//!
//! - **Trackable**: objects expose their attributes by name via the
//!   `Trackable` trait, implemented by the `trackable!` macro or by
//!   `DynamicObject`
//! - **Simplification**: lists, dicts and numeric arrays are logged as
//!   placeholders unless enabled
//! - **Change log**: bounded, oldest entries evicted first
//! - **Persistence**: the whole log is rewritten on every change
//!
//! # Example
//!
//! ```rust
//! use statesight::builder::TrackerBuilder;
//! use statesight::core::Value;
//! use statesight::trackable;
//!
//! trackable! {
//!     #[derive(Debug)]
//!     struct Position {
//!         x: i64,
//!         y: i64,
//!     }
//! }
//!
//! let mut tracker = TrackerBuilder::new()
//!     .buffer_size(20)
//!     .build(Position { x: 0, y: 0 })
//!     .unwrap();
//!
//! tracker.set_attribute("x", 1).unwrap();
//! tracker.set_attribute("x", 2).unwrap();
//!
//! let log = tracker.get_log();
//! assert_eq!(log.len(), 3);
//! assert_eq!(log[1].change.previous(), Some(&Value::Int(0)));
//! assert_eq!(log[2].change.current(), Some(&Value::Int(2)));
//! assert_eq!(tracker.inner().x, 2);
//! ```

pub mod builder;
pub mod core;
pub mod persist;
pub mod tracker;

// Re-export commonly used types
pub use crate::builder::{TrackerBuilder, TrackerConfig};
pub use crate::core::{DynamicObject, LogEntry, Trackable, Value};
pub use crate::tracker::{StateTracker, TrackError};
