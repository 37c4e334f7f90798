//! Round-trip property: serialize then deserialize is the identity for
//! converter-free models with no unset optional fields.

use jsonbind::{bind_model, Context, Deserialized, FieldBinding};
use proptest::prelude::*;

#[derive(Debug, Default, Clone, PartialEq)]
struct Inner {
    v: String,
}

bind_model!(Inner {
    v => FieldBinding::string(),
});

#[derive(Debug, Default, Clone, PartialEq)]
struct Sample {
    text: String,
    count: i64,
    flag: bool,
    tags: Vec<String>,
    note: Option<String>,
    inner: Inner,
}

bind_model!(Sample {
    text => FieldBinding::string(),
    count => FieldBinding::number(),
    flag => FieldBinding::boolean(),
    tags => FieldBinding::string().array(),
    note => FieldBinding::string().optional(),
    inner => FieldBinding::model(Inner::model_type()),
});

fn sample_strategy() -> impl Strategy<Value = Sample> {
    (
        ".*",
        any::<i64>(),
        any::<bool>(),
        prop::collection::vec(".*", 0..5),
        ".*".prop_map(Some),
        ".*".prop_map(|v| Inner { v }),
    )
        .prop_map(|(text, count, flag, tags, note, inner)| Sample {
            text,
            count,
            flag,
            tags,
            note,
            inner,
        })
}

proptest! {
    #[test]
    fn serialize_then_deserialize_is_identity(original in sample_strategy()) {
        let context = Context::new();
        let value = jsonbind::serialize(&original, &context).unwrap();
        let back: Sample = jsonbind::deserialize_object(&value, &context).unwrap();
        prop_assert_eq!(back, original);
    }

    #[test]
    fn text_round_trip_is_identity(original in sample_strategy()) {
        let context = Context::new();
        let text = jsonbind::serialize_to_string(&original, &context).unwrap();
        let back = jsonbind::deserialize::<Sample>(&text, &context).unwrap();
        prop_assert_eq!(back, Deserialized::One(original));
    }
}
