//! Core change-tracking types.
//!
//! This module contains the pure pieces of the tracker:
//! - Attribute values and their conversions
//! - The `Trackable` trait for tracked objects
//! - Value simplification
//! - Log entries and the bounded change log
//!
//! Nothing here touches the filesystem; persistence lives in
//! [`persist`](crate::persist).

mod entry;
mod error;
mod log;
mod simplify;
mod tracked;
mod value;

pub use entry::{Change, LogEntry, Snapshot, INITIAL_STATE, TIMESTAMP_FORMAT};
pub use error::AssignError;
pub use log::ChangeLog;
pub use simplify::SimplifyPolicy;
pub use tracked::{is_reserved, DynamicObject, Trackable, RESERVED_ATTRIBUTES};
pub use value::{AttributeValue, NumericArray, Value, ValueKind};
