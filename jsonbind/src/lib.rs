//! jsonbind - Bidirectional mapping between JSON values and declared models
//!
//! This crate provides the high-level entry points for jsonbind:
//!
//! - Serialization of instances and batches to JSON values or text
//! - Deserialization from JSON values, arrays, or text
//! - Object-vs-array shape normalization and strict entry points
//!
//! JSON text is parsed and printed only here, never mid-traversal. Models
//! are declared once with `bind_model!` and mapped any number of times;
//! see `jsonbind-schema` for the declaration surface and `jsonbind-engine`
//! for the traversal engine.

#![deny(unsafe_code)]
#![warn(missing_docs)]

use jsonbind_engine::{deserialize_object as engine_deserialize, serialize_instance};
use serde_json::Value;
use std::any::TypeId;

// Re-export the public surface
pub use jsonbind_engine::{DateConverter, DateTimeConverter};
pub use jsonbind_schema::bind_model;
pub use jsonbind_schema::{
    BindError, Context, Converter, ConverterRef, ExpectedType, FieldBinding, FieldDescriptor,
    FieldNative, FieldValue, MappedModel, ModelType, Nullable, Result, TypedConverter,
};

/// Outcome of a shape-normalizing deserialization: the input was either a
/// single JSON object or an array of them.
#[derive(Debug, PartialEq)]
pub enum Deserialized<T> {
    /// Input was a single object.
    One(T),
    /// Input was an array; element order preserved.
    Many(Vec<T>),
}

impl<T> Deserialized<T> {
    /// Unwrap the single-object case; `ShapeMismatch` if the input was an
    /// array.
    pub fn into_one(self) -> Result<T> {
        match self {
            Deserialized::One(instance) => Ok(instance),
            Deserialized::Many(_) => Err(BindError::ShapeMismatch {
                expected: "object",
                actual: "array",
            }),
        }
    }

    /// Unwrap the array case; `ShapeMismatch` if the input was a single
    /// object.
    pub fn into_many(self) -> Result<Vec<T>> {
        match self {
            Deserialized::Many(instances) => Ok(instances),
            Deserialized::One(_) => Err(BindError::ShapeMismatch {
                expected: "array",
                actual: "object",
            }),
        }
    }
}

/// True once `T` has been declared to the registry.
pub fn is_mapped<T: MappedModel>() -> bool {
    jsonbind_schema::registry::is_mapped(TypeId::of::<T>())
}

/// Serialize one instance to a JSON object.
pub fn serialize<T: MappedModel>(instance: &T, context: &Context) -> Result<Value> {
    serialize_instance(instance, context).map(Value::Object)
}

/// Serialize a batch to a JSON array, each element independently and all
/// sharing `context`.
pub fn serialize_all<T: MappedModel>(instances: &[T], context: &Context) -> Result<Value> {
    instances
        .iter()
        .map(|instance| serialize(instance, context))
        .collect::<Result<Vec<_>>>()
        .map(Value::Array)
}

/// Serialize one instance to JSON text.
pub fn serialize_to_string<T: MappedModel>(instance: &T, context: &Context) -> Result<String> {
    let value = serialize(instance, context)?;
    serde_json::to_string(&value).map_err(BindError::from)
}

/// Serialize a batch to JSON text.
pub fn serialize_all_to_string<T: MappedModel>(
    instances: &[T],
    context: &Context,
) -> Result<String> {
    let value = serialize_all(instances, context)?;
    serde_json::to_string(&value).map_err(BindError::from)
}

fn model_of<T: MappedModel>() -> Result<ModelType> {
    jsonbind_schema::registry::lookup(TypeId::of::<T>())
        .map(|entry| entry.model)
        .ok_or_else(|| BindError::NotMapped(std::any::type_name::<T>().to_string()))
}

fn downcast<T: MappedModel>(instance: Box<dyn MappedModel>) -> Result<T> {
    instance
        .into_any()
        .downcast::<T>()
        .map(|boxed| *boxed)
        .map_err(|_| BindError::Internal("deserialized instance has the wrong type".to_string()))
}

/// Deserialize a single JSON object into `T`. Strict: array or primitive
/// input is a `ShapeMismatch`.
pub fn deserialize_object<T: MappedModel>(value: &Value, context: &Context) -> Result<T> {
    match value {
        Value::Object(map) => {
            let model = model_of::<T>()?;
            engine_deserialize(map, &model, context).and_then(downcast::<T>)
        }
        other => Err(BindError::ShapeMismatch {
            expected: "object",
            actual: jsonbind_engine::typecheck::shape_of(other),
        }),
    }
}

/// Deserialize a JSON array into a `Vec<T>`, each element independently and
/// all sharing `context`. Strict: non-array input is a `ShapeMismatch`.
pub fn deserialize_array<T: MappedModel>(value: &Value, context: &Context) -> Result<Vec<T>> {
    match value {
        Value::Array(items) => items
            .iter()
            .map(|item| deserialize_object(item, context))
            .collect(),
        other => Err(BindError::ShapeMismatch {
            expected: "array",
            actual: jsonbind_engine::typecheck::shape_of(other),
        }),
    }
}

/// Deserialize a JSON value that may be a single object or an array of them.
pub fn deserialize_value<T: MappedModel>(
    value: &Value,
    context: &Context,
) -> Result<Deserialized<T>> {
    match value {
        Value::Array(_) => deserialize_array(value, context).map(Deserialized::Many),
        _ => deserialize_object(value, context).map(Deserialized::One),
    }
}

/// Parse JSON text, then deserialize the resulting object or array.
pub fn deserialize<T: MappedModel>(text: &str, context: &Context) -> Result<Deserialized<T>> {
    let value: Value = serde_json::from_str(text)?;
    deserialize_value(&value, context)
}
