//! jsonbind schema - Mapping primitives for JSON/model binding
//!
//! This crate provides the declaration-time half of jsonbind, with no
//! engine logic. It includes:
//!
//! - Field descriptors and partial-binding merges
//! - The expected-type enumeration
//! - The model abstraction (type handles, field access trait)
//! - The dynamic field value representation and native conversions
//! - The converter contract
//! - The caller context bag
//! - The process-wide registry and the `bind_model!` declaration macro
//! - Error types

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod context;
pub mod convert;
pub mod descriptor;
pub mod error;
pub mod expected;
pub mod macros;
pub mod model;
pub mod registry;
pub mod value;

// Re-export commonly used types
pub use context::Context;
pub use convert::{Converter, ConverterRef, ResolvedConverter, TypedConverter};
pub use descriptor::{FieldBinding, FieldDescriptor};
pub use error::{BindError, Result};
pub use expected::ExpectedType;
pub use model::{MappedModel, ModelType};
pub use registry::{ModelEntry, ModelOptions, Registry};
pub use value::{FieldNative, FieldValue, Nullable};

/// Implementation detail of `bind_model!`; not part of the public API.
#[doc(hidden)]
pub mod __private {
    pub use inventory;
}
