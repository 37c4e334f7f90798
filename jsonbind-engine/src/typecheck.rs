//! Runtime shape checks against declared expected types

use jsonbind_schema::ExpectedType;
use serde_json::Value;

/// Check whether a JSON value's runtime shape matches a field's declared
/// expected type.
///
/// For `is_array`, the value must be a JSON array; an empty array always
/// matches, and otherwise only the first element's shape is checked against
/// the element type. The shallow check is preserved for compatibility with
/// the systems this engine exchanges data with; it is a known weak spot of
/// the validation contract, and heterogeneous arrays are not rejected.
///
/// Primitive kinds must match exactly; there is no coercion, so a numeric
/// string does not satisfy a number check and vice versa. A `Model` expected
/// type accepts any JSON object; the structural check happens field by field
/// during recursive deserialization.
pub fn matches(value: &Value, expected: &ExpectedType, is_array: bool) -> bool {
    let value = if is_array {
        match value {
            Value::Array(items) => match items.first() {
                Some(first) => first,
                // No element to check.
                None => return true,
            },
            _ => return false,
        }
    } else {
        value
    };

    match expected {
        ExpectedType::Any => true,
        ExpectedType::String => value.is_string(),
        ExpectedType::Number => value.is_number(),
        ExpectedType::Boolean => value.is_boolean(),
        ExpectedType::Model(_) => value.is_object(),
    }
}

/// Diagnostic name of a JSON value's runtime shape.
pub fn shape_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
