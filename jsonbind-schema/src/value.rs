//! Dynamic native-value representation moved between engine and models

use crate::error::{BindError, Result};
use crate::model::MappedModel;
use serde_json::{Number, Value};
use std::any::Any;
use std::fmt;

/// Value of a single model field as seen by the mapping engine.
///
/// `Missing` is the sentinel for an absent value and is distinct from an
/// explicit `Null`; the serializer omits `Missing` fields from its output
/// entirely while `Null` becomes a JSON `null`.
pub enum FieldValue {
    /// No value at all; distinct from an explicit null.
    Missing,
    /// Explicit null.
    Null,
    /// Boolean payload.
    Bool(bool),
    /// Numeric payload.
    Number(Number),
    /// String payload.
    String(String),
    /// Raw JSON payload, used for `Any`-typed fields and plain objects.
    Json(Value),
    /// Sequence of element values, order preserved.
    Array(Vec<FieldValue>),
    /// Nested bound model instance.
    Model(Box<dyn MappedModel>),
    /// Converter-produced native value.
    Custom(Box<dyn Any + Send>),
}

impl FieldValue {
    /// Canonical conversion from a JSON value: primitives map to their
    /// dedicated variants, arrays recurse, objects stay raw as [`Json`]
    /// until the engine decides whether they are nested models.
    ///
    /// [`Json`]: FieldValue::Json
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => FieldValue::Null,
            Value::Bool(b) => FieldValue::Bool(*b),
            Value::Number(n) => FieldValue::Number(n.clone()),
            Value::String(s) => FieldValue::String(s.clone()),
            Value::Array(items) => {
                FieldValue::Array(items.iter().map(FieldValue::from_json).collect())
            }
            Value::Object(_) => FieldValue::Json(value.clone()),
        }
    }

    /// Rebuild a JSON value from the pure-JSON variants. `Missing`, `Model`
    /// and `Custom` have no JSON rendering of their own and yield `None`.
    pub fn as_json(&self) -> Option<Value> {
        match self {
            FieldValue::Missing => None,
            FieldValue::Null => Some(Value::Null),
            FieldValue::Bool(b) => Some(Value::Bool(*b)),
            FieldValue::Number(n) => Some(Value::Number(n.clone())),
            FieldValue::String(s) => Some(Value::String(s.clone())),
            FieldValue::Json(v) => Some(v.clone()),
            FieldValue::Array(items) => items
                .iter()
                .map(FieldValue::as_json)
                .collect::<Option<Vec<_>>>()
                .map(Value::Array),
            FieldValue::Model(_) | FieldValue::Custom(_) => None,
        }
    }

    /// Borrow the payload as `&dyn Any` for converter downcasts. `Missing`
    /// and `Null` carry no payload.
    pub fn as_any(&self) -> Option<&dyn Any> {
        match self {
            FieldValue::Missing | FieldValue::Null => None,
            FieldValue::Bool(b) => Some(b),
            FieldValue::Number(n) => Some(n),
            FieldValue::String(s) => Some(s),
            FieldValue::Json(v) => Some(v),
            FieldValue::Array(items) => Some(items),
            FieldValue::Model(m) => Some(m.as_any()),
            FieldValue::Custom(b) => Some(&**b),
        }
    }

    /// Diagnostic name of the variant's shape.
    pub fn kind(&self) -> &'static str {
        match self {
            FieldValue::Missing => "missing",
            FieldValue::Null => "null",
            FieldValue::Bool(_) => "boolean",
            FieldValue::Number(_) => "number",
            FieldValue::String(_) => "string",
            FieldValue::Json(_) => "json",
            FieldValue::Array(_) => "array",
            FieldValue::Model(_) => "model",
            FieldValue::Custom(_) => "custom native",
        }
    }

    /// True for the missing sentinel.
    pub fn is_missing(&self) -> bool {
        matches!(self, FieldValue::Missing)
    }
}

impl fmt::Debug for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Missing => write!(f, "Missing"),
            FieldValue::Null => write!(f, "Null"),
            FieldValue::Bool(b) => write!(f, "Bool({b})"),
            FieldValue::Number(n) => write!(f, "Number({n})"),
            FieldValue::String(s) => write!(f, "String({s:?})"),
            FieldValue::Json(v) => write!(f, "Json({v})"),
            FieldValue::Array(items) => f.debug_tuple("Array").field(items).finish(),
            FieldValue::Model(m) => write!(f, "Model(<{}>)", m.model_name()),
            FieldValue::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

fn reject(expected: &str, got: &FieldValue) -> BindError {
    BindError::type_mismatch(expected, got.kind())
}

/// Try the [`FieldValue::Custom`] escape hatch: converters hand natives back
/// boxed, and the concrete field type unwraps them here.
fn from_custom<T: Any>(value: FieldValue, expected: &str) -> Result<T> {
    match value {
        FieldValue::Custom(b) => b
            .downcast::<T>()
            .map(|b| *b)
            .map_err(|_| BindError::type_mismatch(expected, "custom native")),
        other => Err(reject(expected, &other)),
    }
}

/// Conversion between a concrete Rust field type and [`FieldValue`].
///
/// `from_field_value(Missing)` yields the type's unset value, which is what
/// the override-defaults policy assigns when an optional property is absent.
pub trait FieldNative: Sized {
    /// Render the field as a dynamic value for the engine.
    fn to_field_value(&self) -> FieldValue;

    /// Rebuild the field from a resolved dynamic value.
    fn from_field_value(value: FieldValue) -> Result<Self>;
}

impl FieldNative for bool {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::Bool(*self)
    }

    fn from_field_value(value: FieldValue) -> Result<Self> {
        match value {
            FieldValue::Bool(b) => Ok(b),
            FieldValue::Missing => Ok(false),
            other => from_custom(other, "boolean"),
        }
    }
}

impl FieldNative for String {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::String(self.clone())
    }

    fn from_field_value(value: FieldValue) -> Result<Self> {
        match value {
            FieldValue::String(s) => Ok(s),
            FieldValue::Missing => Ok(String::new()),
            other => from_custom(other, "string"),
        }
    }
}

macro_rules! impl_field_native_int {
    ($($ty:ty => $accessor:ident),* $(,)?) => {
        $(
            impl FieldNative for $ty {
                fn to_field_value(&self) -> FieldValue {
                    FieldValue::Number(Number::from(*self))
                }

                fn from_field_value(value: FieldValue) -> Result<Self> {
                    match value {
                        FieldValue::Number(n) => n
                            .$accessor()
                            .and_then(|v| <$ty>::try_from(v).ok())
                            .ok_or_else(|| BindError::type_mismatch(
                                concat!("number (", stringify!($ty), ")"),
                                n.to_string(),
                            )),
                        FieldValue::Missing => Ok(0),
                        other => from_custom(other, "number"),
                    }
                }
            }
        )*
    };
}

impl_field_native_int! {
    i8 => as_i64,
    i16 => as_i64,
    i32 => as_i64,
    i64 => as_i64,
    u8 => as_u64,
    u16 => as_u64,
    u32 => as_u64,
    u64 => as_u64,
}

impl FieldNative for f64 {
    fn to_field_value(&self) -> FieldValue {
        match Number::from_f64(*self) {
            Some(n) => FieldValue::Number(n),
            // Non-finite numbers have no JSON rendering.
            None => FieldValue::Null,
        }
    }

    fn from_field_value(value: FieldValue) -> Result<Self> {
        match value {
            FieldValue::Number(n) => n
                .as_f64()
                .ok_or_else(|| BindError::type_mismatch("number (f64)", n.to_string())),
            FieldValue::Missing => Ok(0.0),
            other => from_custom(other, "number"),
        }
    }
}

impl FieldNative for f32 {
    fn to_field_value(&self) -> FieldValue {
        f64::from(*self).to_field_value()
    }

    fn from_field_value(value: FieldValue) -> Result<Self> {
        f64::from_field_value(value).map(|v| v as f32)
    }
}

impl FieldNative for Value {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::from_json(self)
    }

    fn from_field_value(value: FieldValue) -> Result<Self> {
        match value {
            FieldValue::Missing => Ok(Value::Null),
            other => other
                .as_json()
                .ok_or_else(|| reject("JSON value", &other)),
        }
    }
}

impl FieldNative for time::OffsetDateTime {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::Custom(Box::new(*self))
    }

    fn from_field_value(value: FieldValue) -> Result<Self> {
        match value {
            FieldValue::Missing => Ok(time::OffsetDateTime::UNIX_EPOCH),
            other => from_custom(other, "timestamp"),
        }
    }
}

impl FieldNative for time::Date {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::Custom(Box::new(*self))
    }

    fn from_field_value(value: FieldValue) -> Result<Self> {
        match value {
            FieldValue::Missing => Ok(time::macros::date!(1970 - 01 - 01)),
            other => from_custom(other, "date"),
        }
    }
}

impl<T: FieldNative> FieldNative for Option<T> {
    fn to_field_value(&self) -> FieldValue {
        match self {
            // Absent, not explicit null; `Nullable` expresses the latter.
            None => FieldValue::Missing,
            Some(v) => v.to_field_value(),
        }
    }

    fn from_field_value(value: FieldValue) -> Result<Self> {
        match value {
            FieldValue::Missing | FieldValue::Null => Ok(None),
            other => T::from_field_value(other).map(Some),
        }
    }
}

impl<T: FieldNative> FieldNative for Vec<T> {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::Array(self.iter().map(FieldNative::to_field_value).collect())
    }

    fn from_field_value(value: FieldValue) -> Result<Self> {
        match value {
            FieldValue::Array(items) => {
                items.into_iter().map(T::from_field_value).collect()
            }
            FieldValue::Missing => Ok(Vec::new()),
            other => Err(reject("array", &other)),
        }
    }
}

/// Three-state field value distinguishing an absent value from an explicit
/// null on the native side. `Option<T>` cannot make that distinction; its
/// `None` always means absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Nullable<T> {
    /// No value; serialized fields are omitted.
    #[default]
    Unset,
    /// Explicit null.
    Null,
    /// Concrete value.
    Value(T),
}

impl<T> Nullable<T> {
    /// True when no value is set.
    pub fn is_unset(&self) -> bool {
        matches!(self, Nullable::Unset)
    }

    /// True for an explicit null.
    pub fn is_null(&self) -> bool {
        matches!(self, Nullable::Null)
    }

    /// Borrow the concrete value, if any.
    pub fn value(&self) -> Option<&T> {
        match self {
            Nullable::Value(v) => Some(v),
            _ => None,
        }
    }

    /// Collapse into an `Option`, dropping the unset/null distinction.
    pub fn into_option(self) -> Option<T> {
        match self {
            Nullable::Value(v) => Some(v),
            _ => None,
        }
    }
}

impl<T: FieldNative> FieldNative for Nullable<T> {
    fn to_field_value(&self) -> FieldValue {
        match self {
            Nullable::Unset => FieldValue::Missing,
            Nullable::Null => FieldValue::Null,
            Nullable::Value(v) => v.to_field_value(),
        }
    }

    fn from_field_value(value: FieldValue) -> Result<Self> {
        match value {
            FieldValue::Missing => Ok(Nullable::Unset),
            FieldValue::Null => Ok(Nullable::Null),
            other => T::from_field_value(other).map(Nullable::Value),
        }
    }
}
