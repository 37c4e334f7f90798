//! Error types for jsonbind

use thiserror::Error;

/// jsonbind error types
#[derive(Debug, Error)]
pub enum BindError {
    /// Target type has no registered declaration.
    #[error("type `{0}` has no bound fields; declare it before mapping")]
    NotMapped(String),
    /// A required (non-optional) property is absent.
    #[error("{class}.{property}: required property `{key}` is missing")]
    MissingProperty {
        /// Owning model type name.
        class: String,
        /// Field identifier on the model.
        property: String,
        /// Key looked up in the JSON representation.
        key: String,
    },
    /// Null encountered on a field bound as not-null.
    #[error("{class}.{property}: property `{key}` is null but bound as not-null")]
    NotNullViolation {
        /// Owning model type name.
        class: String,
        /// Field identifier on the model.
        property: String,
        /// Key looked up in the JSON representation.
        key: String,
    },
    /// Runtime shape does not match the declared expected type.
    #[error("{class}.{property}: expected {expected}, got {actual}")]
    TypeMismatch {
        /// Owning model type name.
        class: String,
        /// Field identifier on the model.
        property: String,
        /// Description of the declared type.
        expected: String,
        /// Description of the value actually seen.
        actual: String,
    },
    /// Array passed where a single object was expected, or vice versa.
    #[error("expected {expected} at the top level, got {actual}")]
    ShapeMismatch {
        /// Shape the entry point requires.
        expected: &'static str,
        /// Shape the caller supplied.
        actual: &'static str,
    },
    /// `optional` and `not_null` requested together at declaration time.
    #[error("{class}.{property}: `optional` and `not_null` bindings are incompatible")]
    IncompatiblePolicy {
        /// Owning model type name.
        class: String,
        /// Field identifier on the model.
        property: String,
    },
    /// JSON parsing or serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// Internal invariant was violated.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl BindError {
    /// Build a [`BindError::TypeMismatch`] with the owning field left blank,
    /// to be filled in by [`BindError::locate`] once the engine knows which
    /// descriptor was being processed. Converters use this.
    pub fn type_mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        BindError::TypeMismatch {
            class: String::new(),
            property: String::new(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Attach the owning class/property names to a mismatch that was raised
    /// without them (converter failures, native value rejections). Errors
    /// that already carry a location keep it.
    pub fn locate(self, class: &str, property: &str) -> Self {
        match self {
            BindError::TypeMismatch {
                class: c,
                property: p,
                expected,
                actual,
            } if c.is_empty() => BindError::TypeMismatch {
                class: class.to_string(),
                property: if p.is_empty() { property.to_string() } else { p },
                expected,
                actual,
            },
            other => other,
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, BindError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locate_fills_blank_location() {
        let err = BindError::type_mismatch("string", "number").locate("User", "name");
        assert_eq!(
            err.to_string(),
            "User.name: expected string, got number"
        );
    }

    #[test]
    fn test_locate_keeps_existing_location() {
        let err = BindError::TypeMismatch {
            class: "Inner".to_string(),
            property: "v".to_string(),
            expected: "string".to_string(),
            actual: "null".to_string(),
        };
        let relocated = err.locate("Outer", "inner");
        assert_eq!(relocated.to_string(), "Inner.v: expected string, got null");
    }

    #[test]
    fn test_locate_passes_other_kinds_through() {
        let err = BindError::NotMapped("User".to_string()).locate("User", "x");
        assert!(matches!(err, BindError::NotMapped(_)));
    }
}
