//! Log entries: one record per tracked write.

use super::value::Value;
use chrono::{DateTime, Local};
use indexmap::IndexMap;

/// Marker stored as the change of the first entry in every log.
pub const INITIAL_STATE: &str = "Initial State";

/// Timestamp layout used when entries are written out.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Simplified attribute values keyed by attribute name, in declaration order.
pub type Snapshot = IndexMap<String, Value>;

/// What an entry records about the write that produced it.
#[derive(Clone, Debug, PartialEq)]
pub enum Change {
    /// Snapshot taken right after construction.
    Initial,
    /// A single attribute write.
    Update { previous: Value, current: Value },
}

impl Change {
    pub fn is_initial(&self) -> bool {
        matches!(self, Self::Initial)
    }

    pub fn previous(&self) -> Option<&Value> {
        match self {
            Self::Initial => None,
            Self::Update { previous, .. } => Some(previous),
        }
    }

    pub fn current(&self) -> Option<&Value> {
        match self {
            Self::Initial => None,
            Self::Update { current, .. } => Some(current),
        }
    }
}

/// Record of one tracked write.
///
/// Entries are never modified once they are in a log.
///
/// # Example
///
/// ```rust
/// use statesight::core::{Change, LogEntry, Snapshot, Value};
///
/// let mut state = Snapshot::new();
/// state.insert("x".to_string(), Value::Int(1));
///
/// let entry = LogEntry::update("x", Value::Int(0), Value::Int(1), state);
/// assert_eq!(entry.changed_attribute, "x");
/// assert_eq!(entry.change.previous(), Some(&Value::Int(0)));
/// assert_eq!(entry.value_of("x"), Value::Int(1));
/// assert_eq!(entry.value_of("missing"), Value::Unset);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct LogEntry {
    /// When the write happened
    pub timestamp: DateTime<Local>,
    /// Attribute that was written; empty for the initial entry
    pub changed_attribute: String,
    pub change: Change,
    /// Every attribute after the write, simplified
    pub state: Snapshot,
}

impl LogEntry {
    /// Entry recording the state right after construction.
    pub fn initial(state: Snapshot) -> Self {
        Self {
            timestamp: Local::now(),
            changed_attribute: String::new(),
            change: Change::Initial,
            state,
        }
    }

    /// Entry recording a write to `attribute`.
    pub fn update(
        attribute: impl Into<String>,
        previous: Value,
        current: Value,
        state: Snapshot,
    ) -> Self {
        Self {
            timestamp: Local::now(),
            changed_attribute: attribute.into(),
            change: Change::Update { previous, current },
            state,
        }
    }

    /// Logged value of an attribute, or `Value::Unset` if this snapshot lacks it.
    pub fn value_of(&self, attribute: &str) -> Value {
        self.state.get(attribute).cloned().unwrap_or_default()
    }

    /// Timestamp rendered as ISO-8601 with microseconds.
    pub fn timestamp_iso(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }
}
