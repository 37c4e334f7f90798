//! Built-in converters exercised through the full mapping stack

use jsonbind::{
    bind_model, BindError, Context, ConverterRef, DateConverter, DateTimeConverter, FieldBinding,
};
use serde_json::json;
use time::macros::datetime;
use time::OffsetDateTime;

#[derive(Debug, Clone, PartialEq)]
struct Audit {
    created_at: OffsetDateTime,
    day: OffsetDateTime,
}

impl Default for Audit {
    fn default() -> Self {
        Self {
            created_at: OffsetDateTime::UNIX_EPOCH,
            day: OffsetDateTime::UNIX_EPOCH,
        }
    }
}

bind_model!(Audit {
    created_at => FieldBinding::string()
        .converter(ConverterRef::per_call(|| Box::new(DateTimeConverter))),
    day => FieldBinding::string().converter(ConverterRef::shared(DateConverter)),
});

#[test]
fn date_converters_round_trip_through_the_engine() {
    let input = json!({
        "created_at": "2010-11-23T10:00:00Z",
        "day": "2010-11-23",
    });

    let audit: Audit = jsonbind::deserialize_object(&input, &Context::new()).unwrap();
    assert_eq!(audit.created_at, datetime!(2010-11-23 10:00:00 UTC));
    assert_eq!(audit.day, datetime!(2010-11-23 0:00:00 UTC));

    let back = jsonbind::serialize(&audit, &Context::new()).unwrap();
    assert_eq!(back, input);
}

#[test]
fn converter_failure_names_the_owning_field() {
    let input = json!({
        "created_at": "not-a-timestamp",
        "day": "2010-11-23",
    });
    let err = jsonbind::deserialize_object::<Audit>(&input, &Context::new()).unwrap_err();
    assert!(matches!(err, BindError::TypeMismatch { .. }));
    assert!(err.to_string().starts_with("Audit.created_at:"));
}

#[test]
fn converted_fields_still_honor_presence_policy() {
    // Missing required converter field fails before the converter runs.
    let err =
        jsonbind::deserialize_object::<Audit>(&json!({"day": "2010-11-23"}), &Context::new())
            .unwrap_err();
    assert!(matches!(err, BindError::MissingProperty { .. }));
}
