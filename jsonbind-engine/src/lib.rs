//! jsonbind engine - Mapping traversal engines
//!
//! This crate provides the core mapping machinery for jsonbind:
//!
//! - Runtime shape checks against declared expected types
//! - The JSON-to-model deserializer
//! - The model-to-JSON serializer
//! - Built-in date and time converters

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod converters;
pub mod deserialize;
pub mod serialize;
pub mod typecheck;

// Re-export commonly used types
pub use jsonbind_schema::{
    BindError, Context, Converter, ConverterRef, ExpectedType, FieldBinding, FieldDescriptor,
    FieldNative, FieldValue, MappedModel, ModelType, Nullable, Result, TypedConverter,
};

// Re-export our own entry points
pub use converters::{DateConverter, DateTimeConverter};
pub use deserialize::deserialize_object;
pub use serialize::serialize_instance;
