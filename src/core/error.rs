//! Attribute assignment errors.

use super::value::ValueKind;
use thiserror::Error;

/// Errors raised when a tracked object rejects an assignment.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AssignError {
    #[error("'{type_name}' has no attribute '{attribute}'")]
    UnknownAttribute {
        type_name: String,
        attribute: String,
    },

    #[error("Attribute '{attribute}' expects {expected}, got {}", .found.type_name())]
    TypeMismatch {
        attribute: String,
        expected: &'static str,
        found: ValueKind,
    },
}
