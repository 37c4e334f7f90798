//! Model-to-JSON traversal

use crate::typecheck;
use jsonbind_schema::{
    registry, BindError, Context, FieldDescriptor, FieldValue, MappedModel, Result,
};
use serde_json::{Map, Value};

fn missing_property(descriptor: &FieldDescriptor) -> BindError {
    BindError::MissingProperty {
        class: descriptor.class_name.clone(),
        property: descriptor.class_property_name.clone(),
        key: descriptor.json_property_name.clone(),
    }
}

fn not_null_violation(descriptor: &FieldDescriptor) -> BindError {
    BindError::NotNullViolation {
        class: descriptor.class_name.clone(),
        property: descriptor.class_property_name.clone(),
        key: descriptor.json_property_name.clone(),
    }
}

fn type_mismatch(
    descriptor: &FieldDescriptor,
    expected: impl Into<String>,
    actual: impl Into<String>,
) -> BindError {
    BindError::TypeMismatch {
        class: descriptor.class_name.clone(),
        property: descriptor.class_property_name.clone(),
        expected: expected.into(),
        actual: actual.into(),
    }
}

/// Serialize one model instance into a JSON object.
///
/// The mirror of deserialization: fields are read in declaration order,
/// the missing/null policies apply to the native value, and the produced
/// JSON value is shape-checked after converters and recursion have run.
/// Fields resolving to the missing sentinel are omitted from the output
/// entirely rather than emitted as null.
pub fn serialize_instance(
    instance: &dyn MappedModel,
    context: &Context,
) -> Result<Map<String, Value>> {
    let entry = registry::lookup(instance.as_any().type_id())
        .ok_or_else(|| BindError::NotMapped(instance.model_name().to_string()))?;

    let mut json = Map::new();
    for descriptor in &entry.fields {
        let native = instance.field(&descriptor.class_property_name);
        let emitted = if descriptor.is_array {
            emit_array(native, descriptor, context)?
        } else {
            emit_property(native, descriptor, context)?
        };
        if let Some(value) = emitted {
            json.insert(descriptor.json_property_name.clone(), value);
        }
    }
    Ok(json)
}

/// Serialize one non-array field value. `Ok(None)` means the key is omitted.
fn emit_property(
    native: FieldValue,
    descriptor: &FieldDescriptor,
    context: &Context,
) -> Result<Option<Value>> {
    let native = match native {
        FieldValue::Missing => {
            if descriptor.is_optional {
                return Ok(None);
            }
            return Err(missing_property(descriptor));
        }
        FieldValue::Null => {
            if descriptor.not_null {
                return Err(not_null_violation(descriptor));
            }
            return Ok(Some(Value::Null));
        }
        native => native,
    };

    let produced = if let Some(reference) = &descriptor.converter {
        reference
            .resolve()
            .serialize(&native, context)
            .map_err(|err| err.locate(&descriptor.class_name, &descriptor.class_property_name))?
    } else if let FieldValue::Model(inner) = &native {
        Value::Object(serialize_instance(&**inner, context)?)
    } else {
        native.as_json().ok_or_else(|| {
            BindError::Internal(format!(
                "{}.{} holds a {} value but declares no converter",
                descriptor.class_name,
                descriptor.class_property_name,
                native.kind(),
            ))
        })?
    };

    // A converter may itself produce null; the null policy applies to it too.
    if produced.is_null() {
        if descriptor.not_null {
            return Err(not_null_violation(descriptor));
        }
        return Ok(Some(Value::Null));
    }

    if !typecheck::matches(&produced, &descriptor.expected_type, false) {
        return Err(type_mismatch(
            descriptor,
            descriptor.expected_type.to_string(),
            typecheck::shape_of(&produced),
        ));
    }
    Ok(Some(produced))
}

/// Serialize an array field value: whole-value policy first, then each
/// element through the single-field rule. An element resolving to the
/// missing sentinel renders as null inside the array, since a position
/// cannot be omitted.
fn emit_array(
    native: FieldValue,
    descriptor: &FieldDescriptor,
    context: &Context,
) -> Result<Option<Value>> {
    match native {
        FieldValue::Missing => {
            if descriptor.is_optional {
                Ok(None)
            } else {
                Err(missing_property(descriptor))
            }
        }
        FieldValue::Null => {
            if descriptor.not_null {
                Err(not_null_violation(descriptor))
            } else {
                Ok(Some(Value::Null))
            }
        }
        FieldValue::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            for element in items {
                out.push(emit_property(element, descriptor, context)?.unwrap_or(Value::Null));
            }
            Ok(Some(Value::Array(out)))
        }
        other => Err(type_mismatch(
            descriptor,
            format!("array of {}", descriptor.expected_type),
            other.kind(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonbind_schema::FieldBinding;
    use serde_json::json;

    fn descriptor(binding: FieldBinding) -> FieldDescriptor {
        let mut descriptor = FieldDescriptor::new("Test", "field");
        descriptor.apply(binding).unwrap();
        descriptor
    }

    #[test]
    fn test_missing_required_native_value() {
        let desc = descriptor(FieldBinding::string());
        let err = emit_property(FieldValue::Missing, &desc, &Context::new()).unwrap_err();
        assert!(matches!(err, BindError::MissingProperty { .. }));
    }

    #[test]
    fn test_missing_optional_omits_key() {
        let desc = descriptor(FieldBinding::string().optional());
        let emitted = emit_property(FieldValue::Missing, &desc, &Context::new()).unwrap();
        assert_eq!(emitted, None);
    }

    #[test]
    fn test_null_native_value_emits_json_null() {
        let desc = descriptor(FieldBinding::string());
        let emitted = emit_property(FieldValue::Null, &desc, &Context::new()).unwrap();
        assert_eq!(emitted, Some(Value::Null));
    }

    #[test]
    fn test_null_native_value_against_not_null() {
        let desc = descriptor(FieldBinding::string().not_null());
        let err = emit_property(FieldValue::Null, &desc, &Context::new()).unwrap_err();
        assert!(matches!(err, BindError::NotNullViolation { .. }));
    }

    #[test]
    fn test_produced_value_is_shape_checked() {
        // Declared number, native value is a string: the post-hoc check fires.
        let desc = descriptor(FieldBinding::number());
        let err = emit_property(FieldValue::String("s1".into()), &desc, &Context::new())
            .unwrap_err();
        assert_eq!(err.to_string(), "Test.field: expected number, got string");
    }

    #[test]
    fn test_array_elements_emit_in_order() {
        let desc = descriptor(FieldBinding::string().array());
        let native = FieldValue::Array(vec![
            FieldValue::String("a".into()),
            FieldValue::String("b".into()),
        ]);
        let emitted = emit_array(native, &desc, &Context::new()).unwrap();
        assert_eq!(emitted, Some(json!(["a", "b"])));
    }

    #[test]
    fn test_empty_array_emits_empty_array() {
        let desc = descriptor(FieldBinding::string().array());
        let emitted = emit_array(FieldValue::Array(Vec::new()), &desc, &Context::new()).unwrap();
        assert_eq!(emitted, Some(json!([])));
    }

    #[test]
    fn test_non_array_native_for_array_field() {
        let desc = descriptor(FieldBinding::string().array());
        let err =
            emit_array(FieldValue::String("s".into()), &desc, &Context::new()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Test.field: expected array of string, got string"
        );
    }
}
