//! Value simplification for snapshots and diffs.
//!
//! Containers are replaced by an opaque placeholder unless their logging is
//! enabled. Everything else passes through untouched. Simplification is pure
//! and total.

use super::entry::Snapshot;
use super::tracked::{is_reserved, Trackable};
use super::value::{Value, ValueKind};

/// Which container kinds are logged verbatim.
///
/// # Example
///
/// ```rust
/// use statesight::core::{SimplifyPolicy, Value, ValueKind};
///
/// let policy = SimplifyPolicy::default();
/// let list = Value::from(vec![1, 2, 3]);
/// assert_eq!(policy.simplify(&list), Value::Placeholder(ValueKind::List));
///
/// let policy = SimplifyPolicy { log_lists: true, ..SimplifyPolicy::default() };
/// assert_eq!(policy.simplify(&list), list);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SimplifyPolicy {
    pub log_lists: bool,
    pub log_dicts: bool,
    pub log_numpy_arrays: bool,
}

impl SimplifyPolicy {
    /// Simplify a value for storage in a log entry.
    pub fn simplify(&self, value: &Value) -> Value {
        match value {
            Value::List(_) if !self.log_lists => Value::Placeholder(ValueKind::List),
            Value::Dict(_) if !self.log_dicts => Value::Placeholder(ValueKind::Dict),
            Value::Array(_) if !self.log_numpy_arrays => Value::Placeholder(ValueKind::Array),
            other => other.clone(),
        }
    }

    /// Simplified snapshot of every non-reserved attribute of an object.
    pub fn snapshot<T: Trackable + ?Sized>(&self, object: &T) -> Snapshot {
        object
            .attributes()
            .into_iter()
            .filter(|(name, _)| !is_reserved(name))
            .map(|(name, value)| {
                let simple = self.simplify(&value);
                (name, simple)
            })
            .collect()
    }
}
