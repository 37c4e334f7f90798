//! Model abstraction: type handles and the field access trait

use crate::error::Result;
use crate::value::FieldValue;
use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Handle identifying a bound model type.
///
/// Carries everything the engine needs to operate on a model without knowing
/// its concrete type: a display name for diagnostics, the [`TypeId`] used as
/// the registry key, and a default constructor for deserialization.
#[derive(Clone, Copy)]
pub struct ModelType {
    name: &'static str,
    id: TypeId,
    construct: fn() -> Box<dyn MappedModel>,
}

impl ModelType {
    /// Create the handle for a concrete model type.
    pub fn of<T>(name: &'static str) -> Self
    where
        T: MappedModel + Default,
    {
        Self {
            name,
            id: TypeId::of::<T>(),
            construct: || Box::<T>::default(),
        }
    }

    /// Display name used in diagnostics.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Registry key for this model.
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Construct a default instance of the model.
    pub fn construct(&self) -> Box<dyn MappedModel> {
        (self.construct)()
    }
}

impl PartialEq for ModelType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ModelType {}

impl Hash for ModelType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelType").field("name", &self.name).finish()
    }
}

/// Field access contract implemented by every bound model.
///
/// Normally generated by `bind_model!`. The engine reads and writes fields
/// exclusively through this trait; field identifiers are the ones the
/// registry holds as `class_property_name`.
pub trait MappedModel: Any + Send {
    /// Short type name used in diagnostics.
    fn model_name(&self) -> &'static str;

    /// Read the native value of one field. Unknown identifiers yield
    /// [`FieldValue::Missing`].
    fn field(&self, property: &str) -> FieldValue;

    /// Write a resolved value into one field.
    fn set_field(&mut self, property: &str, value: FieldValue) -> Result<()>;

    /// Upcast for concrete-type inspection.
    fn as_any(&self) -> &dyn Any;

    /// Mutable upcast.
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Consuming upcast, used by the facade to downcast into the caller's
    /// concrete type.
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl fmt::Debug for dyn MappedModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.model_name())
    }
}
