//! Declarative model binding

/// Bind a struct's fields to the registry and implement the mapping traits.
///
/// This is the declaration surface replacing runtime introspection: one
/// invocation per model type, at item position, listing each mapped field
/// with its [`FieldBinding`](crate::FieldBinding). Unlisted struct fields
/// are ignored by the engine and keep their defaults.
///
/// ```ignore
/// #[derive(Debug, Default, Clone, PartialEq)]
/// struct User {
///     id: String,
///     name: Option<String>,
/// }
///
/// bind_model!(User {
///     id => FieldBinding::string().not_null(),
///     name => FieldBinding::string().key("display_name").optional(),
/// });
/// ```
///
/// The second form folds `override_defaults` into every field, mirroring a
/// model-wide declaration option:
///
/// ```ignore
/// bind_model!(Prefs, override_defaults, {
///     theme => FieldBinding::string().optional(),
/// });
/// ```
///
/// Expands to `impl MappedModel` and `impl FieldNative` for the struct, an
/// inherent `model_type()` constructor for its [`ModelType`](crate::ModelType)
/// handle, and a registration hook that runs when the process-wide registry
/// is first touched. The struct must be `Default + Clone + Send + 'static`.
/// A faulty declaration (incompatible policies) panics the moment the hook
/// runs.
#[macro_export]
macro_rules! bind_model {
    ($model:ident { $($field:ident => $binding:expr),* $(,)? }) => {
        $crate::bind_model!(@impl $model, [ $($field => $binding),* ], None);
    };
    ($model:ident, override_defaults, { $($field:ident => $binding:expr),* $(,)? }) => {
        $crate::bind_model!(@impl $model, [ $($field => $binding),* ], Some(true));
    };
    (@impl $model:ident, [ $($field:ident => $binding:expr),* ], $override:expr) => {
        impl $crate::MappedModel for $model {
            fn model_name(&self) -> &'static str {
                stringify!($model)
            }

            fn field(&self, property: &str) -> $crate::FieldValue {
                match property {
                    $(
                        stringify!($field) => $crate::FieldNative::to_field_value(&self.$field),
                    )*
                    _ => $crate::FieldValue::Missing,
                }
            }

            fn set_field(
                &mut self,
                property: &str,
                value: $crate::FieldValue,
            ) -> $crate::Result<()> {
                match property {
                    $(
                        stringify!($field) => {
                            self.$field = $crate::FieldNative::from_field_value(value)
                                .map_err(|err| {
                                    err.locate(stringify!($model), stringify!($field))
                                })?;
                            Ok(())
                        }
                    )*
                    _ => Err($crate::BindError::Internal(format!(
                        "no bound field `{property}` on {}",
                        stringify!($model),
                    ))),
                }
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
                self
            }

            fn into_any(self: ::std::boxed::Box<Self>) -> ::std::boxed::Box<dyn ::std::any::Any> {
                self
            }
        }

        impl $crate::FieldNative for $model {
            fn to_field_value(&self) -> $crate::FieldValue {
                $crate::FieldValue::Model(::std::boxed::Box::new(::std::clone::Clone::clone(self)))
            }

            fn from_field_value(value: $crate::FieldValue) -> $crate::Result<Self> {
                match value {
                    $crate::FieldValue::Model(inner) => {
                        $crate::MappedModel::into_any(inner)
                            .downcast::<$model>()
                            .map(|boxed| *boxed)
                            .map_err(|_| {
                                $crate::BindError::type_mismatch(stringify!($model), "model")
                            })
                    }
                    $crate::FieldValue::Missing => {
                        Ok(<$model as ::std::default::Default>::default())
                    }
                    other => Err($crate::BindError::type_mismatch(
                        stringify!($model),
                        other.kind(),
                    )),
                }
            }
        }

        impl $model {
            /// Registry handle for this model.
            pub fn model_type() -> $crate::ModelType {
                $crate::ModelType::of::<$model>(stringify!($model))
            }
        }

        $crate::__private::inventory::submit! {
            $crate::registry::ModelRegistration({
                fn register(registry: &mut $crate::registry::Registry) {
                    let model = <$model>::model_type();
                    registry.declare(model);
                    $(
                        registry
                            .register_field(model, stringify!($field), $binding)
                            .unwrap_or_else(|err| {
                                panic!(
                                    "binding {}.{}: {err}",
                                    stringify!($model),
                                    stringify!($field),
                                )
                            });
                    )*
                    registry.set_model_options(
                        model,
                        $crate::registry::ModelOptions {
                            override_defaults: $override,
                        },
                    );
                }
                register
            })
        }
    };
}
