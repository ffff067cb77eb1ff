//! Attribute values recorded by the tracker.
//!
//! Tracked objects expose their attributes as [`Value`]s, a closed set of
//! cases covering primitives, containers, numeric arrays and opaque things
//! such as function references or foreign objects. Snapshots and diffs in the
//! change log are built from these values.

use chrono::{DateTime, Local};
use indexmap::IndexMap;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::hash::BuildHasher;

/// Kind tag for a [`Value`].
///
/// Used for placeholders and for error reporting when an assignment does not
/// fit the target attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Unset,
    Bool,
    Int,
    Float,
    Str,
    List,
    Dict,
    Array,
    DateTime,
    Function,
    Object,
    Placeholder,
}

impl ValueKind {
    /// Short type name, used when a value cannot be serialized at all.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Unset => "unset",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::Str => "str",
            Self::List => "list",
            Self::Dict => "dict",
            Self::Array => "ndarray",
            Self::DateTime => "datetime",
            Self::Function => "function",
            Self::Object => "object",
            Self::Placeholder => "placeholder",
        }
    }

    /// Text stored in place of a value of this kind when its logging is disabled.
    pub fn placeholder_text(&self) -> String {
        match self {
            Self::List => "<list object>".to_string(),
            Self::Dict => "<dict object>".to_string(),
            Self::Array => "<numpy array object>".to_string(),
            other => format!("<{} object>", other.type_name()),
        }
    }
}

/// Dense multi-dimensional array of numbers, stored row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct NumericArray {
    shape: Vec<usize>,
    data: Vec<f64>,
}

impl NumericArray {
    /// Create an array from a shape and row-major data.
    ///
    /// Returns `None` if the data length does not match the shape, or if the
    /// shape's element count does not fit in a `usize`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use statesight::core::NumericArray;
    ///
    /// let grid = NumericArray::new(vec![2, 2], vec![1.0, 2.0, 3.0, 4.0]).unwrap();
    /// assert_eq!(grid.shape(), &[2, 2]);
    /// assert!(NumericArray::new(vec![3], vec![1.0]).is_none());
    /// ```
    pub fn new(shape: Vec<usize>, data: Vec<f64>) -> Option<Self> {
        if element_count(&shape)? != data.len() {
            return None;
        }
        Some(Self { shape, data })
    }

    /// One-dimensional array.
    pub fn from_vec(data: Vec<f64>) -> Self {
        Self {
            shape: vec![data.len()],
            data,
        }
    }

    /// Two-dimensional array from equally sized rows.
    ///
    /// Returns `None` if the rows are ragged.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Option<Self> {
        let width = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|row| row.len() != width) {
            return None;
        }
        let height = rows.len();
        let data = rows.into_iter().flatten().collect();
        Some(Self {
            shape: vec![height, width],
            data,
        })
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// True when every element is a finite number.
    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|x| x.is_finite())
    }

    /// Convert to nested lists of floats, one nesting level per dimension.
    pub fn to_list(&self) -> Value {
        nest(&self.shape, &self.data)
    }
}

/// Number of elements in an array of the given shape, `None` on overflow.
fn element_count(shape: &[usize]) -> Option<usize> {
    shape.iter().try_fold(1usize, |n, &d| n.checked_mul(d))
}

// A stride that overflows implies a zero-length outer dimension, so the
// zero fallback is never used to index.
fn stride_of(rest: &[usize]) -> usize {
    element_count(rest).unwrap_or(0)
}

fn nest(shape: &[usize], data: &[f64]) -> Value {
    match shape.split_first() {
        None => data.first().copied().map_or(Value::Unset, Value::Float),
        Some((&len, rest)) => {
            let stride = stride_of(rest);
            Value::List(
                (0..len)
                    .map(|i| nest(rest, &data[i * stride..(i + 1) * stride]))
                    .collect(),
            )
        }
    }
}

impl fmt::Display for NumericArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn write_level(
            f: &mut fmt::Formatter<'_>,
            shape: &[usize],
            data: &[f64],
        ) -> fmt::Result {
            match shape.split_first() {
                None => match data.first() {
                    Some(x) => write!(f, "{x}"),
                    None => Ok(()),
                },
                Some((&len, rest)) => {
                    let stride = stride_of(rest);
                    f.write_str("[")?;
                    for i in 0..len {
                        if i > 0 {
                            f.write_str(" ")?;
                        }
                        write_level(f, rest, &data[i * stride..(i + 1) * stride])?;
                    }
                    f.write_str("]")
                }
            }
        }
        write_level(f, &self.shape, &self.data)
    }
}

/// A single attribute value.
///
/// Containers own their contents, so a value cloned into a snapshot is never
/// affected by later changes to the live object.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    /// No value recorded for the attribute.
    #[default]
    Unset,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    /// Insertion-ordered mapping.
    Dict(IndexMap<String, Value>),
    Array(NumericArray),
    DateTime(DateTime<Local>),
    /// Reference to a callable, identified by name.
    Function(String),
    /// Any other object, identified by type and its display form.
    Object { type_name: String, repr: String },
    /// Stand-in for a container whose logging is disabled.
    Placeholder(ValueKind),
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Unset => ValueKind::Unset,
            Self::Bool(_) => ValueKind::Bool,
            Self::Int(_) => ValueKind::Int,
            Self::Float(_) => ValueKind::Float,
            Self::Str(_) => ValueKind::Str,
            Self::List(_) => ValueKind::List,
            Self::Dict(_) => ValueKind::Dict,
            Self::Array(_) => ValueKind::Array,
            Self::DateTime(_) => ValueKind::DateTime,
            Self::Function(_) => ValueKind::Function,
            Self::Object { .. } => ValueKind::Object,
            Self::Placeholder(_) => ValueKind::Placeholder,
        }
    }

    /// Wrap an arbitrary value as an opaque object, keeping its `Debug` form.
    ///
    /// # Example
    ///
    /// ```rust
    /// use statesight::core::Value;
    ///
    /// #[derive(Debug)]
    /// struct Handle(u32);
    ///
    /// let value = Value::object(&Handle(7));
    /// assert_eq!(value.to_string(), "Handle(7)");
    /// ```
    pub fn object<T: fmt::Debug>(value: &T) -> Self {
        Self::Object {
            type_name: std::any::type_name::<T>().to_string(),
            repr: format!("{value:?}"),
        }
    }

    /// Reference to a callable by name.
    pub fn function(name: impl Into<String>) -> Self {
        Self::Function(name.into())
    }

    pub fn is_unset(&self) -> bool {
        matches!(self, Self::Unset)
    }

    /// True for a placeholder standing in for the given kind.
    pub fn is_placeholder_for(&self, kind: ValueKind) -> bool {
        matches!(self, Self::Placeholder(k) if *k == kind)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unset => f.write_str("None"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Str(s) => f.write_str(s),
            Self::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write_nested(f, item)?;
                }
                f.write_str("]")
            }
            Self::Dict(map) => {
                f.write_str("{")?;
                for (i, (key, item)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key:?}: ")?;
                    write_nested(f, item)?;
                }
                f.write_str("}")
            }
            Self::Array(array) => write!(f, "{array}"),
            Self::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S%.6f")),
            Self::Function(name) => write!(f, "<function {name}>"),
            Self::Object { repr, .. } => f.write_str(repr),
            Self::Placeholder(kind) => f.write_str(&kind.placeholder_text()),
        }
    }
}

// Strings inside containers are quoted so `["a"]` and `[a]` stay distinct.
fn write_nested(f: &mut fmt::Formatter<'_>, value: &Value) -> fmt::Result {
    match value {
        Value::Str(s) => write!(f, "{s:?}"),
        other => write!(f, "{other}"),
    }
}

/// Conversion between a Rust attribute type and [`Value`].
///
/// Implemented for the primitive types, strings, `Option`, `Vec`, string-keyed
/// maps, [`NumericArray`] and local datetimes. Implement it for your own types
/// to track them as attributes; `from_value` may return `None` for types that
/// cannot be rebuilt from a value.
pub trait AttributeValue: Sized {
    fn to_value(&self) -> Value;

    fn from_value(value: Value) -> Option<Self>;
}

impl AttributeValue for Value {
    fn to_value(&self) -> Value {
        self.clone()
    }

    fn from_value(value: Value) -> Option<Self> {
        Some(value)
    }
}

impl AttributeValue for bool {
    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(b),
            _ => None,
        }
    }
}

macro_rules! int_attribute {
    ($($ty:ty),*) => {
        $(
            impl AttributeValue for $ty {
                fn to_value(&self) -> Value {
                    i64::try_from(*self).map_or_else(
                        |_| Value::Float(*self as f64),
                        Value::Int,
                    )
                }

                fn from_value(value: Value) -> Option<Self> {
                    match value {
                        Value::Int(i) => <$ty>::try_from(i).ok(),
                        _ => None,
                    }
                }
            }

            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    value.to_value()
                }
            }
        )*
    };
}

int_attribute!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl AttributeValue for f64 {
    fn to_value(&self) -> Value {
        Value::Float(*self)
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Float(x) => Some(x),
            Value::Int(i) => Some(i as f64),
            _ => None,
        }
    }
}

impl AttributeValue for f32 {
    fn to_value(&self) -> Value {
        Value::Float(f64::from(*self))
    }

    fn from_value(value: Value) -> Option<Self> {
        f64::from_value(value).map(|x| x as f32)
    }
}

impl AttributeValue for String {
    fn to_value(&self) -> Value {
        Value::Str(self.clone())
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl AttributeValue for NumericArray {
    fn to_value(&self) -> Value {
        Value::Array(self.clone())
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Array(array) => Some(array),
            _ => None,
        }
    }
}

impl AttributeValue for DateTime<Local> {
    fn to_value(&self) -> Value {
        Value::DateTime(*self)
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::DateTime(dt) => Some(dt),
            _ => None,
        }
    }
}

impl<T: AttributeValue> AttributeValue for Option<T> {
    fn to_value(&self) -> Value {
        self.as_ref().map_or(Value::Unset, T::to_value)
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Unset => Some(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl<T: AttributeValue> AttributeValue for Vec<T> {
    fn to_value(&self) -> Value {
        Value::List(self.iter().map(T::to_value).collect())
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::List(items) => items.into_iter().map(T::from_value).collect(),
            _ => None,
        }
    }
}

impl<T: AttributeValue> AttributeValue for IndexMap<String, T> {
    fn to_value(&self) -> Value {
        Value::Dict(
            self.iter()
                .map(|(k, v)| (k.clone(), v.to_value()))
                .collect(),
        )
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Dict(map) => map
                .into_iter()
                .map(|(k, v)| T::from_value(v).map(|v| (k, v)))
                .collect(),
            _ => None,
        }
    }
}

impl<T: AttributeValue> AttributeValue for BTreeMap<String, T> {
    fn to_value(&self) -> Value {
        Value::Dict(
            self.iter()
                .map(|(k, v)| (k.clone(), v.to_value()))
                .collect(),
        )
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Dict(map) => map
                .into_iter()
                .map(|(k, v)| T::from_value(v).map(|v| (k, v)))
                .collect(),
            _ => None,
        }
    }
}

impl<T: AttributeValue, H: BuildHasher + Default> AttributeValue for HashMap<String, T, H> {
    fn to_value(&self) -> Value {
        Value::Dict(
            self.iter()
                .map(|(k, v)| (k.clone(), v.to_value()))
                .collect(),
        )
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Dict(map) => map
                .into_iter()
                .map(|(k, v)| T::from_value(v).map(|v| (k, v)))
                .collect(),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(f64::from(value))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<NumericArray> for Value {
    fn from(value: NumericArray) -> Self {
        Value::Array(value)
    }
}

impl From<DateTime<Local>> for Value {
    fn from(value: DateTime<Local>) -> Self {
        Value::DateTime(value)
    }
}

impl<T: AttributeValue> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.to_value()
    }
}

impl<T: AttributeValue> From<Vec<T>> for Value {
    fn from(value: Vec<T>) -> Self {
        value.to_value()
    }
}

impl<T: AttributeValue> From<IndexMap<String, T>> for Value {
    fn from(value: IndexMap<String, T>) -> Self {
        value.to_value()
    }
}

impl<T: AttributeValue> From<BTreeMap<String, T>> for Value {
    fn from(value: BTreeMap<String, T>) -> Self {
        value.to_value()
    }
}
