//! Expected-type enumeration for bound fields

use crate::model::ModelType;
use std::fmt;

/// Declared JSON type of a bound field.
///
/// For array fields this names the element type, not the array itself.
/// A dedicated `Any` variant keeps the type checker's match exhaustive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExpectedType {
    /// Wildcard: any JSON value matches.
    Any,
    /// JSON string.
    String,
    /// JSON number.
    Number,
    /// JSON boolean.
    Boolean,
    /// Nested bound model; the JSON value must be an object.
    Model(ModelType),
}

impl fmt::Display for ExpectedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpectedType::Any => write!(f, "any"),
            ExpectedType::String => write!(f, "string"),
            ExpectedType::Number => write!(f, "number"),
            ExpectedType::Boolean => write!(f, "boolean"),
            ExpectedType::Model(model) => write!(f, "{}", model.name()),
        }
    }
}
