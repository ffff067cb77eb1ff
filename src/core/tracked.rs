//! The `Trackable` trait for objects whose attribute writes are recorded.
//!
//! A tracked type exposes its attributes as an ordered list of
//! `(name, Value)` pairs and accepts writes by name. Typed structs get an
//! implementation from the [`trackable!`](crate::trackable) macro;
//! [`DynamicObject`] accepts any attribute at all.

use super::error::AssignError;
use super::value::Value;
use indexmap::IndexMap;

/// Attribute names reserved for tracker bookkeeping.
///
/// They never appear in a snapshot and cannot be assigned through a tracker.
pub const RESERVED_ATTRIBUTES: &[&str] = &[
    "_log",
    "_buffer_size",
    "_log_to_file",
    "_log_file",
    "_internal_attributes",
];

/// Check whether a name is reserved for tracker bookkeeping.
pub fn is_reserved(name: &str) -> bool {
    RESERVED_ATTRIBUTES.contains(&name)
}

/// Trait for objects whose attribute writes can be tracked.
///
/// # Example
///
/// ```rust
/// use statesight::core::{AssignError, Trackable, Value};
///
/// struct Counter {
///     hits: i64,
/// }
///
/// impl Trackable for Counter {
///     fn type_name(&self) -> &str {
///         "Counter"
///     }
///
///     fn attributes(&self) -> Vec<(String, Value)> {
///         vec![("hits".to_string(), Value::Int(self.hits))]
///     }
///
///     fn assign(&mut self, name: &str, value: Value) -> Result<(), AssignError> {
///         match (name, value) {
///             ("hits", Value::Int(hits)) => {
///                 self.hits = hits;
///                 Ok(())
///             }
///             (_, value) => Err(AssignError::TypeMismatch {
///                 attribute: name.to_string(),
///                 expected: "i64",
///                 found: value.kind(),
///             }),
///         }
///     }
/// }
///
/// let mut counter = Counter { hits: 0 };
/// counter.assign("hits", Value::Int(3)).unwrap();
/// assert_eq!(counter.attribute("hits"), Some(Value::Int(3)));
/// ```
pub trait Trackable {
    /// Name of the tracked type, used in error messages.
    fn type_name(&self) -> &str;

    /// Current attributes in declaration order.
    fn attributes(&self) -> Vec<(String, Value)>;

    /// Write a single attribute.
    fn assign(&mut self, name: &str, value: Value) -> Result<(), AssignError>;

    /// Current value of one attribute, if the object has it.
    fn attribute(&self, name: &str) -> Option<Value> {
        self.attributes()
            .into_iter()
            .find(|(attr, _)| attr == name)
            .map(|(_, value)| value)
    }
}

/// Object with an open set of attributes.
///
/// Assigning a new name adds the attribute at the end; assigning an existing
/// name replaces the value in place.
///
/// # Example
///
/// ```rust
/// use statesight::core::{DynamicObject, Trackable, Value};
///
/// let point = DynamicObject::new("Point").with("x", 0).with("y", 0);
/// let names: Vec<String> = point.attributes().into_iter().map(|(n, _)| n).collect();
/// assert_eq!(names, vec!["x", "y"]);
/// assert_eq!(point.get("x"), Some(&Value::Int(0)));
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DynamicObject {
    type_name: String,
    attributes: IndexMap<String, Value>,
}

impl DynamicObject {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            attributes: IndexMap::new(),
        }
    }

    /// Builder-style attribute initialization.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

impl Trackable for DynamicObject {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn attributes(&self) -> Vec<(String, Value)> {
        self.attributes
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }

    fn assign(&mut self, name: &str, value: Value) -> Result<(), AssignError> {
        self.attributes.insert(name.to_string(), value);
        Ok(())
    }

    fn attribute(&self, name: &str) -> Option<Value> {
        self.attributes.get(name).cloned()
    }
}
