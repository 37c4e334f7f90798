//! Per-field mapping metadata and partial declaration merging

use crate::convert::ConverterRef;
use crate::error::{BindError, Result};
use crate::expected::ExpectedType;
use crate::model::ModelType;

/// Complete mapping metadata for one bound field of a model type.
///
/// Built up in the registry by merging one or more [`FieldBinding`]s;
/// immutable once mapping traffic starts.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    /// Owning model type's name, for diagnostics.
    pub class_name: String,
    /// Field identifier on the Rust struct.
    pub class_property_name: String,
    /// Key used in the JSON representation; defaults to the property name.
    pub json_property_name: String,
    /// Whether the JSON value is a sequence of the expected type.
    pub is_array: bool,
    /// Declared element type.
    pub expected_type: ExpectedType,
    /// Missing JSON key is not an error; the field stays unset.
    pub is_optional: bool,
    /// JSON null is an error.
    pub not_null: bool,
    /// Custom converter overriding type-check and recursion.
    pub converter: Option<ConverterRef>,
    /// Whether a resolved "missing" overwrites the instance's default.
    pub override_default: bool,
}

impl FieldDescriptor {
    /// Fresh descriptor with defaults: JSON key equals the property name,
    /// expected type `Any`, every policy off.
    pub fn new(class_name: &str, property: &str) -> Self {
        Self {
            class_name: class_name.to_string(),
            class_property_name: property.to_string(),
            json_property_name: property.to_string(),
            is_array: false,
            expected_type: ExpectedType::Any,
            is_optional: false,
            not_null: false,
            converter: None,
            override_default: false,
        }
    }

    /// Merge one declaration site into this descriptor. Only the fields the
    /// binding actually sets are touched, so split declarations accumulate.
    pub fn apply(&mut self, binding: FieldBinding) -> Result<()> {
        if let Some(key) = binding.json_key {
            self.json_property_name = key;
        }
        if let Some(expected) = binding.expected_type {
            self.expected_type = expected;
        }
        if let Some(is_array) = binding.is_array {
            self.is_array = is_array;
        }
        if let Some(optional) = binding.is_optional {
            self.is_optional = optional;
        }
        if let Some(not_null) = binding.not_null {
            self.not_null = not_null;
        }
        if let Some(converter) = binding.converter {
            self.converter = Some(converter);
        }
        if let Some(override_default) = binding.override_default {
            self.override_default = override_default;
        }

        if self.is_optional && self.not_null {
            return Err(BindError::IncompatiblePolicy {
                class: self.class_name.clone(),
                property: self.class_property_name.clone(),
            });
        }
        Ok(())
    }
}

/// Partial field declaration: one declaration site's worth of metadata.
///
/// Unset fields are left untouched when merged, so a field's type, rename,
/// policies, and converter may come from separate `register_field` calls.
#[derive(Debug, Clone, Default)]
pub struct FieldBinding {
    json_key: Option<String>,
    expected_type: Option<ExpectedType>,
    is_array: Option<bool>,
    is_optional: Option<bool>,
    not_null: Option<bool>,
    converter: Option<ConverterRef>,
    override_default: Option<bool>,
}

impl FieldBinding {
    /// Empty binding; sets nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binding expecting a JSON string.
    pub fn string() -> Self {
        Self::new().expect(ExpectedType::String)
    }

    /// Binding expecting a JSON number.
    pub fn number() -> Self {
        Self::new().expect(ExpectedType::Number)
    }

    /// Binding expecting a JSON boolean.
    pub fn boolean() -> Self {
        Self::new().expect(ExpectedType::Boolean)
    }

    /// Binding accepting any JSON value.
    pub fn any() -> Self {
        Self::new().expect(ExpectedType::Any)
    }

    /// Binding expecting a nested bound model object.
    pub fn model(model: ModelType) -> Self {
        Self::new().expect(ExpectedType::Model(model))
    }

    /// Set the expected element type.
    pub fn expect(mut self, expected: ExpectedType) -> Self {
        self.expected_type = Some(expected);
        self
    }

    /// Rename the JSON key.
    pub fn key(mut self, json_key: impl Into<String>) -> Self {
        self.json_key = Some(json_key.into());
        self
    }

    /// The JSON value is an array of the expected type.
    pub fn array(mut self) -> Self {
        self.is_array = Some(true);
        self
    }

    /// A missing JSON key is not an error.
    pub fn optional(mut self) -> Self {
        self.is_optional = Some(true);
        self
    }

    /// A JSON null is an error.
    pub fn not_null(mut self) -> Self {
        self.not_null = Some(true);
        self
    }

    /// Attach a custom converter.
    pub fn converter(mut self, converter: ConverterRef) -> Self {
        self.converter = Some(converter);
        self
    }

    /// Control whether a resolved "missing" overwrites the instance default.
    pub fn override_default(mut self, override_default: bool) -> Self {
        self.override_default = Some(override_default);
        self
    }
}
