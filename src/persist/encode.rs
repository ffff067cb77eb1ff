//! JSON encoding of values and log entries.

use crate::core::{Change, LogEntry, Snapshot, Value, INITIAL_STATE};
use serde_json::{Map, Number, Value as JsonValue};

/// Converts tracked values into JSON for persistence.
///
/// Primitives, lists and dicts map to their JSON counterparts. Numeric
/// arrays become nested lists when array logging is enabled. Every other
/// value is written as its display string, and an array that cannot be
/// represented falls back to its type name. Encoding never fails.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Encoder {
    pub log_numpy_arrays: bool,
}

impl Encoder {
    pub fn new(log_numpy_arrays: bool) -> Self {
        Self { log_numpy_arrays }
    }

    /// Encode a single value.
    ///
    /// # Example
    ///
    /// ```rust
    /// use statesight::core::{NumericArray, Value};
    /// use statesight::persist::Encoder;
    /// use serde_json::json;
    ///
    /// let array = Value::Array(NumericArray::from_vec(vec![1.0, 2.0]));
    /// assert_eq!(Encoder::new(true).encode(&array), json!([1.0, 2.0]));
    /// assert_eq!(Encoder::new(false).encode(&array), json!("[1 2]"));
    /// ```
    pub fn encode(&self, value: &Value) -> JsonValue {
        match value {
            Value::Unset => JsonValue::Null,
            Value::Bool(b) => JsonValue::Bool(*b),
            Value::Int(i) => JsonValue::Number((*i).into()),
            Value::Float(x) => Number::from_f64(*x)
                .map(JsonValue::Number)
                .unwrap_or_else(|| JsonValue::String(value.to_string())),
            Value::Str(s) => JsonValue::String(s.clone()),
            Value::List(items) => JsonValue::Array(items.iter().map(|v| self.encode(v)).collect()),
            Value::Dict(map) => JsonValue::Object(
                map.iter()
                    .map(|(key, v)| (key.clone(), self.encode(v)))
                    .collect(),
            ),
            Value::Array(array) if self.log_numpy_arrays => {
                if array.is_finite() {
                    self.encode(&array.to_list())
                } else {
                    JsonValue::String(value.kind().type_name().to_string())
                }
            }
            other => JsonValue::String(other.to_string()),
        }
    }

    pub fn encode_change(&self, change: &Change) -> JsonValue {
        match change {
            Change::Initial => JsonValue::String(INITIAL_STATE.to_string()),
            Change::Update { previous, current } => {
                let mut object = Map::new();
                object.insert("previous".to_string(), self.encode(previous));
                object.insert("current".to_string(), self.encode(current));
                JsonValue::Object(object)
            }
        }
    }

    pub fn encode_state(&self, state: &Snapshot) -> JsonValue {
        JsonValue::Object(
            state
                .iter()
                .map(|(name, v)| (name.clone(), self.encode(v)))
                .collect(),
        )
    }

    /// Encode an entry with its keys in declared order.
    pub fn encode_entry(&self, entry: &LogEntry) -> JsonValue {
        let mut object = Map::new();
        object.insert(
            "Timestamp".to_string(),
            JsonValue::String(entry.timestamp_iso()),
        );
        object.insert(
            "Changed Attribute".to_string(),
            JsonValue::String(entry.changed_attribute.clone()),
        );
        object.insert("Change".to_string(), self.encode_change(&entry.change));
        object.insert("State".to_string(), self.encode_state(&entry.state));
        JsonValue::Object(object)
    }
}
