//! Engine-level mapping tests: recursion, arrays, policies, converters

use jsonbind_engine::{deserialize_object, serialize_instance};
use jsonbind_schema::{
    bind_model, BindError, Context, ConverterRef, FieldBinding, MappedModel, Result,
    TypedConverter,
};
use serde_json::{json, Value};
use time::format_description::well_known::Rfc3339;
use time::macros::datetime;
use time::{Duration, OffsetDateTime};

#[derive(Debug, Default, Clone, PartialEq)]
struct Inner {
    v: String,
}

bind_model!(Inner {
    v => FieldBinding::string(),
});

#[derive(Debug, Default, Clone, PartialEq)]
struct Outer {
    inner: Inner,
    tags: Vec<String>,
}

bind_model!(Outer {
    inner => FieldBinding::model(Inner::model_type()),
    tags => FieldBinding::string().array(),
});

#[derive(Debug, Default, Clone, PartialEq)]
struct Roster {
    members: Vec<Inner>,
}

bind_model!(Roster {
    members => FieldBinding::model(Inner::model_type()).array(),
});

/// Shifts timestamps by `context.timezone` hours, the caller's zone being
/// what the wire format carries.
struct TimezoneConverter;

impl TypedConverter for TimezoneConverter {
    type Native = OffsetDateTime;

    fn serialize(&self, value: &OffsetDateTime, context: &Context) -> Result<Value> {
        let hours = timezone_of(context)?;
        (*value + Duration::hours(hours))
            .format(&Rfc3339)
            .map(Value::String)
            .map_err(|err| BindError::Internal(format!("RFC 3339 formatting failed: {err}")))
    }

    fn deserialize(&self, value: &Value, context: &Context) -> Result<OffsetDateTime> {
        let hours = timezone_of(context)?;
        let text = value
            .as_str()
            .ok_or_else(|| BindError::type_mismatch("RFC 3339 timestamp string", "other"))?;
        OffsetDateTime::parse(text, &Rfc3339)
            .map(|parsed| parsed - Duration::hours(hours))
            .map_err(|_| BindError::type_mismatch("RFC 3339 timestamp", format!("\"{text}\"")))
    }
}

fn timezone_of(context: &Context) -> Result<i64> {
    context
        .get::<i64>("timezone")
        .copied()
        .ok_or_else(|| BindError::Internal("context with timezone must be set".to_string()))
}

#[derive(Debug, Clone, PartialEq)]
struct Event {
    at: OffsetDateTime,
}

impl Default for Event {
    fn default() -> Self {
        Self {
            at: OffsetDateTime::UNIX_EPOCH,
        }
    }
}

bind_model!(Event {
    at => FieldBinding::string().converter(ConverterRef::shared(TimezoneConverter)),
});

#[derive(Debug, Clone, PartialEq)]
struct Prefs {
    theme: Option<String>,
}

impl Default for Prefs {
    fn default() -> Self {
        Self {
            theme: Some("dark".to_string()),
        }
    }
}

bind_model!(Prefs {
    theme => FieldBinding::string().optional(),
});

#[derive(Debug, Clone, PartialEq)]
struct PrefsReset {
    theme: Option<String>,
}

impl Default for PrefsReset {
    fn default() -> Self {
        Self {
            theme: Some("dark".to_string()),
        }
    }
}

bind_model!(PrefsReset, override_defaults, {
    theme => FieldBinding::string().optional(),
});

fn object_of(value: &Value) -> &serde_json::Map<String, Value> {
    value.as_object().expect("test fixture is an object")
}

fn deserialize_as<T: 'static>(value: &Value, model: jsonbind_schema::ModelType) -> Result<T> {
    deserialize_object(object_of(value), &model, &Context::new())
        .map(|instance| *instance.into_any().downcast::<T>().expect("model type matches"))
}

#[test]
fn nested_model_recursion() {
    let outer: Outer = deserialize_as(
        &json!({"inner": {"v": "x"}, "tags": ["a", "b"]}),
        Outer::model_type(),
    )
    .unwrap();
    assert_eq!(outer.inner, Inner { v: "x".to_string() });
    assert_eq!(outer.tags, vec!["a", "b"]);
}

#[test]
fn nested_model_failure_names_inner_field() {
    let err = deserialize_as::<Outer>(
        &json!({"inner": {"v": 1}, "tags": []}),
        Outer::model_type(),
    )
    .unwrap_err();
    assert_eq!(err.to_string(), "Inner.v: expected string, got number");
}

#[test]
fn array_of_models_maps_each_element() {
    let roster: Roster = deserialize_as(
        &json!({"members": [{"v": "a"}, {"v": "b"}]}),
        Roster::model_type(),
    )
    .unwrap();
    assert_eq!(roster.members.len(), 2);
    assert_eq!(roster.members[1].v, "b");
}

#[test]
fn empty_model_array_stays_empty() {
    let roster: Roster =
        deserialize_as(&json!({"members": []}), Roster::model_type()).unwrap();
    assert!(roster.members.is_empty());
}

#[test]
fn serialize_emits_declaration_order() {
    let outer = Outer {
        inner: Inner { v: "x".to_string() },
        tags: vec!["a".to_string()],
    };
    let json = serialize_instance(&outer, &Context::new()).unwrap();
    let keys: Vec<&String> = json.keys().collect();
    assert_eq!(keys, ["inner", "tags"]);
    assert_eq!(Value::Object(json), json!({"inner": {"v": "x"}, "tags": ["a"]}));
}

#[test]
fn round_trip_nested() {
    let original = Outer {
        inner: Inner { v: "x".to_string() },
        tags: vec!["a".to_string(), "b".to_string()],
    };
    let json = serialize_instance(&original, &Context::new()).unwrap();
    let back: Outer =
        deserialize_as(&Value::Object(json), Outer::model_type()).unwrap();
    assert_eq!(back, original);
}

#[test]
fn converter_reads_context_both_directions() {
    let context = Context::new().with("timezone", 2i64);
    let value = json!({"at": "2010-11-23T10:00:00Z"});

    let event = deserialize_object(object_of(&value), &Event::model_type(), &context)
        .map(|instance| *instance.into_any().downcast::<Event>().unwrap())
        .unwrap();
    assert_eq!(event.at, datetime!(2010-11-23 8:00:00 UTC));

    let back = serialize_instance(&event, &context).unwrap();
    assert_eq!(Value::Object(back), value);
}

#[test]
fn converter_without_required_context_fails() {
    let value = json!({"at": "2010-11-23T10:00:00Z"});
    let err = deserialize_object(object_of(&value), &Event::model_type(), &Context::new())
        .unwrap_err();
    assert!(matches!(err, BindError::Internal(_)));
}

#[test]
fn preserved_defaults_survive_missing_optional() {
    let prefs: Prefs = deserialize_as(&json!({}), Prefs::model_type()).unwrap();
    assert_eq!(prefs.theme.as_deref(), Some("dark"));
}

#[test]
fn override_defaults_unsets_missing_optional() {
    let prefs: PrefsReset = deserialize_as(&json!({}), PrefsReset::model_type()).unwrap();
    assert_eq!(prefs.theme, None);
}

#[test]
fn unknown_json_keys_are_ignored() {
    let inner: Inner = deserialize_as(
        &json!({"v": "x", "unbound": 42}),
        Inner::model_type(),
    )
    .unwrap();
    assert_eq!(inner.v, "x");
}

#[test]
fn model_name_survives_into_errors() {
    let err = deserialize_as::<Inner>(&json!({}), Inner::model_type()).unwrap_err();
    assert_eq!(err.to_string(), "Inner.v: required property `v` is missing");
}
