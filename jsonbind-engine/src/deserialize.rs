//! JSON-to-model traversal

use crate::typecheck;
use jsonbind_schema::{
    registry, BindError, Context, ExpectedType, FieldDescriptor, FieldValue, MappedModel,
    ModelType, Result,
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

/// Deserialize one JSON object into an instance of `model`.
///
/// Walks the model's descriptors in declaration order, applying each field's
/// policy, recursing into nested bound models, and threading `context`
/// unchanged into every converter call. JSON keys without a descriptor are
/// ignored; struct fields without a descriptor keep their defaults.
pub fn deserialize_object(
    json: &Map<String, Value>,
    model: &ModelType,
    context: &Context,
) -> Result<Box<dyn MappedModel>> {
    let entry = registry::lookup(model.id())
        .ok_or_else(|| BindError::NotMapped(model.name().to_string()))?;

    let mut instance = model.construct();
    for descriptor in &entry.fields {
        let raw = json.get(&descriptor.json_property_name);
        let resolved = if descriptor.is_array {
            resolve_array(raw, descriptor, context)?
        } else {
            resolve_property(raw, descriptor, context)?
        };

        // A resolved "missing" only touches the instance when the field opts
        // into overriding its default; the unset value is then assigned.
        if resolved.is_missing() && !descriptor.override_default {
            continue;
        }
        instance.set_field(&descriptor.class_property_name, resolved)?;
    }
    Ok(instance)
}

/// Resolve one non-array property. `None` is the missing sentinel, distinct
/// from JSON null.
fn resolve_property(
    raw: Option<&Value>,
    descriptor: &FieldDescriptor,
    context: &Context,
) -> Result<FieldValue> {
    let value = match raw {
        None => {
            if descriptor.is_optional {
                return Ok(FieldValue::Missing);
            }
            return Err(missing_property(descriptor));
        }
        Some(Value::Null) => {
            if descriptor.not_null {
                return Err(not_null_violation(descriptor));
            }
            return Ok(FieldValue::Null);
        }
        Some(value) => value,
    };

    if !typecheck::matches(value, &descriptor.expected_type, false) {
        return Err(type_mismatch(
            descriptor,
            descriptor.expected_type.to_string(),
            typecheck::shape_of(value),
        ));
    }

    // A converter owns the field outright; no recursion, no further checks.
    if let Some(reference) = &descriptor.converter {
        return reference
            .resolve()
            .deserialize(value, context)
            .map_err(|err| err.locate(&descriptor.class_name, &descriptor.class_property_name));
    }

    match (&descriptor.expected_type, value) {
        (ExpectedType::Model(inner), Value::Object(map)) => {
            deserialize_object(map, inner, context).map(FieldValue::Model)
        }
        _ => Ok(FieldValue::from_json(value)),
    }
}

/// Resolve an array property: missing/null policy on the whole array, the
/// shallow array check, then each element through the single-property rule.
fn resolve_array(
    raw: Option<&Value>,
    descriptor: &FieldDescriptor,
    context: &Context,
) -> Result<FieldValue> {
    let value = match raw {
        None => {
            if descriptor.is_optional {
                return Ok(FieldValue::Missing);
            }
            return Err(missing_property(descriptor));
        }
        Some(Value::Null) => {
            if descriptor.not_null {
                return Err(not_null_violation(descriptor));
            }
            return Ok(FieldValue::Null);
        }
        Some(value) => value,
    };

    if !typecheck::matches(value, &descriptor.expected_type, true) {
        return Err(type_mismatch(
            descriptor,
            format!("array of {}", descriptor.expected_type),
            typecheck::shape_of(value),
        ));
    }

    match value.as_array() {
        Some(items) => items
            .iter()
            .map(|element| resolve_property(Some(element), descriptor, context))
            .collect::<Result<Vec<_>>>()
            .map(FieldValue::Array),
        None => Err(type_mismatch(
            descriptor,
            format!("array of {}", descriptor.expected_type),
            typecheck::shape_of(value),
        )),
    }
}
