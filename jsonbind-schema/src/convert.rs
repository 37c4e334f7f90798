//! Converter contract: per-field custom mapping overrides

use crate::context::Context;
use crate::error::{BindError, Result};
use crate::value::{FieldNative, FieldValue};
use serde_json::Value;
use std::any::Any;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// Bidirectional transform owning the mapping of one field.
///
/// When a field declares a converter, the engine skips its own type check
/// and nested-model recursion for that field; only the optional/not-null
/// presence checks still apply around the call. The converter's output is
/// trusted as-is (the serializer re-checks the produced JSON shape
/// afterwards).
pub trait Converter: Send + Sync {
    /// Render a native field value as JSON.
    fn serialize(&self, value: &FieldValue, context: &Context) -> Result<Value>;

    /// Rebuild a native field value from JSON.
    fn deserialize(&self, value: &Value, context: &Context) -> Result<FieldValue>;
}

/// Typed convenience layer over [`Converter`].
///
/// Implementors work with their concrete `Native` type; the blanket
/// [`Converter`] impl bridges through [`FieldValue::Custom`], downcasting on
/// the way out and boxing on the way in.
pub trait TypedConverter: Send + Sync {
    /// Concrete Rust type this converter produces and consumes.
    type Native: Any + Send + Clone + FieldNative;

    /// Render the native value as JSON.
    fn serialize(&self, value: &Self::Native, context: &Context) -> Result<Value>;

    /// Parse the JSON value into the native type.
    fn deserialize(&self, value: &Value, context: &Context) -> Result<Self::Native>;
}

/// Recover a concrete native from the dynamic value: direct downcast for
/// `Custom`-carried natives, the `FieldNative` route for natives carried in
/// plain JSON variants (a converter over an `i64` field sees `Number`).
fn native_of<N: Any + Clone + FieldNative>(value: &FieldValue) -> Result<N> {
    if let Some(native) = value.as_any().and_then(|any| any.downcast_ref::<N>()) {
        return Ok(native.clone());
    }
    match value.as_json() {
        Some(json) => N::from_field_value(FieldValue::from_json(&json)),
        None => Err(BindError::type_mismatch(
            std::any::type_name::<N>(),
            value.kind(),
        )),
    }
}

impl<C: TypedConverter> Converter for C {
    fn serialize(&self, value: &FieldValue, context: &Context) -> Result<Value> {
        let native = native_of::<C::Native>(value)?;
        TypedConverter::serialize(self, &native, context)
    }

    fn deserialize(&self, value: &Value, context: &Context) -> Result<FieldValue> {
        TypedConverter::deserialize(self, value, context)
            .map(|native| FieldValue::Custom(Box::new(native)))
    }
}

/// Reference to a converter as declared on a field: either a constructor to
/// run per call or a single shared ready instance. Both behave identically
/// beyond construction cost.
#[derive(Clone)]
pub enum ConverterRef {
    /// Instantiate a fresh converter on every mapping call.
    PerCall(fn() -> Box<dyn Converter>),
    /// Reuse one ready instance across calls.
    Shared(Arc<dyn Converter>),
}

impl ConverterRef {
    /// Declare a converter constructed fresh per call.
    pub fn per_call(factory: fn() -> Box<dyn Converter>) -> Self {
        ConverterRef::PerCall(factory)
    }

    /// Declare a single shared converter instance.
    pub fn shared(converter: impl Converter + 'static) -> Self {
        ConverterRef::Shared(Arc::new(converter))
    }

    /// Resolve to a usable instance, constructing lazily for
    /// [`ConverterRef::PerCall`].
    pub fn resolve(&self) -> ResolvedConverter {
        match self {
            ConverterRef::PerCall(factory) => ResolvedConverter::Owned(factory()),
            ConverterRef::Shared(converter) => ResolvedConverter::Shared(Arc::clone(converter)),
        }
    }
}

impl fmt::Debug for ConverterRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConverterRef::PerCall(_) => write!(f, "ConverterRef::PerCall"),
            ConverterRef::Shared(_) => write!(f, "ConverterRef::Shared"),
        }
    }
}

/// A converter ready for one mapping call.
pub enum ResolvedConverter {
    /// Freshly constructed, owned by this call.
    Owned(Box<dyn Converter>),
    /// Shared ready instance.
    Shared(Arc<dyn Converter>),
}

impl Deref for ResolvedConverter {
    type Target = dyn Converter;

    fn deref(&self) -> &Self::Target {
        match self {
            ResolvedConverter::Owned(b) => &**b,
            ResolvedConverter::Shared(a) => &**a,
        }
    }
}
