//! Process-wide field descriptor registry

use crate::descriptor::{FieldBinding, FieldDescriptor};
use crate::error::Result;
use crate::model::ModelType;
use ahash::AHashMap;
use std::any::TypeId;
use std::sync::{Arc, LazyLock, PoisonError, RwLock};

/// A model's registry entry: its handle plus the declaration-ordered field
/// descriptors.
#[derive(Debug, Clone)]
pub struct ModelEntry {
    /// Handle for the declared model.
    pub model: ModelType,
    /// Field descriptors in declaration order; the order drives
    /// serialization output.
    pub fields: Vec<FieldDescriptor>,
}

impl ModelEntry {
    /// Find the descriptor for one property.
    pub fn descriptor(&self, property: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|d| d.class_property_name == property)
    }
}

/// Model-wide declaration options, folded into every field declared so far.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelOptions {
    /// Whether missing optional properties overwrite instance defaults.
    pub override_defaults: Option<bool>,
}

/// Store associating model types with their field descriptors.
///
/// Append-only while models are being declared, then effectively read-only:
/// mapping traffic clones `Arc` entries out and never holds the lock during
/// traversal.
#[derive(Default)]
pub struct Registry {
    models: AHashMap<TypeId, Arc<ModelEntry>>,
}

impl Registry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the entry for a model. Explicit declaration, even with zero
    /// fields, is what makes [`Registry::is_mapped`] true. Idempotent.
    pub fn declare(&mut self, model: ModelType) {
        self.models
            .entry(model.id())
            .or_insert_with(|| Arc::new(ModelEntry {
                model,
                fields: Vec::new(),
            }));
    }

    /// Merge a partial binding into the descriptor for `(model, property)`,
    /// creating both the model entry and the descriptor on first use.
    /// Fails when a merge would set both `optional` and `not_null`.
    pub fn register_field(
        &mut self,
        model: ModelType,
        property: &str,
        binding: FieldBinding,
    ) -> Result<()> {
        let entry = self
            .models
            .entry(model.id())
            .or_insert_with(|| Arc::new(ModelEntry {
                model,
                fields: Vec::new(),
            }));
        let entry = Arc::make_mut(entry);

        if let Some(descriptor) = entry
            .fields
            .iter_mut()
            .find(|d| d.class_property_name == property)
        {
            return descriptor.apply(binding);
        }

        let mut descriptor = FieldDescriptor::new(model.name(), property);
        descriptor.apply(binding)?;
        entry.fields.push(descriptor);
        Ok(())
    }

    /// Fold model-wide options into every descriptor declared so far,
    /// mirroring a class-level option applied after property declarations.
    pub fn set_model_options(&mut self, model: ModelType, options: ModelOptions) {
        if let Some(entry) = self.models.get_mut(&model.id()) {
            let entry = Arc::make_mut(entry);
            if let Some(override_defaults) = options.override_defaults {
                for descriptor in &mut entry.fields {
                    descriptor.override_default = override_defaults;
                }
            }
        }
    }

    /// True once the model has been declared.
    pub fn is_mapped(&self, id: TypeId) -> bool {
        self.models.contains_key(&id)
    }

    /// Bound property names in declaration order; empty when unmapped
    /// (callers distinguish via [`Registry::is_mapped`]).
    pub fn fields_of(&self, id: TypeId) -> Vec<String> {
        self.models
            .get(&id)
            .map(|entry| {
                entry
                    .fields
                    .iter()
                    .map(|d| d.class_property_name.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Descriptor for one property of a model.
    pub fn descriptor_of(&self, id: TypeId, property: &str) -> Option<FieldDescriptor> {
        self.models
            .get(&id)
            .and_then(|entry| entry.descriptor(property).cloned())
    }

    /// Full entry for a model; the engine's read path.
    pub fn lookup(&self, id: TypeId) -> Option<Arc<ModelEntry>> {
        self.models.get(&id).cloned()
    }
}

/// Startup registration hook collected from `bind_model!` expansions.
///
/// Submitted through `inventory`; every collected hook runs exactly once,
/// when the process-wide registry is first touched, so declaration always
/// precedes mapping traffic.
pub struct ModelRegistration(pub fn(&mut Registry));

inventory::collect!(ModelRegistration);

static REGISTRY: LazyLock<RwLock<Registry>> = LazyLock::new(|| {
    let mut registry = Registry::new();
    for registration in inventory::iter::<ModelRegistration> {
        (registration.0)(&mut registry);
    }
    RwLock::new(registry)
});

fn read() -> std::sync::RwLockReadGuard<'static, Registry> {
    REGISTRY.read().unwrap_or_else(PoisonError::into_inner)
}

fn write() -> std::sync::RwLockWriteGuard<'static, Registry> {
    REGISTRY.write().unwrap_or_else(PoisonError::into_inner)
}

/// Declare a model in the process-wide registry.
pub fn declare(model: ModelType) {
    write().declare(model);
}

/// Register one field declaration in the process-wide registry.
pub fn register_field(model: ModelType, property: &str, binding: FieldBinding) -> Result<()> {
    write().register_field(model, property, binding)
}

/// Apply model-wide options in the process-wide registry.
pub fn set_model_options(model: ModelType, options: ModelOptions) {
    write().set_model_options(model, options);
}

/// True once the model has been declared process-wide.
pub fn is_mapped(id: TypeId) -> bool {
    read().is_mapped(id)
}

/// Declaration-ordered property names from the process-wide registry.
pub fn fields_of(id: TypeId) -> Vec<String> {
    read().fields_of(id)
}

/// Descriptor lookup in the process-wide registry.
pub fn descriptor_of(id: TypeId, property: &str) -> Option<FieldDescriptor> {
    read().descriptor_of(id, property)
}

/// Entry lookup in the process-wide registry; clones the `Arc` out so no
/// lock is held during traversal.
pub fn lookup(id: TypeId) -> Option<Arc<ModelEntry>> {
    read().lookup(id)
}
