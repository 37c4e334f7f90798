//! Built-in date and time converters

use crate::typecheck;
use jsonbind_schema::{BindError, Context, Result, TypedConverter};
use serde_json::Value;
use std::sync::OnceLock;
use time::format_description::well_known::Rfc3339;
use time::format_description::FormatItem;
use time::{Date, OffsetDateTime};

static DATE_FORMAT: OnceLock<Vec<FormatItem<'static>>> = OnceLock::new();

fn date_format() -> &'static Vec<FormatItem<'static>> {
    DATE_FORMAT.get_or_init(|| {
        time::format_description::parse("[year]-[month]-[day]")
            .expect("static date format is valid")
    })
}

fn expect_string<'v>(value: &'v Value, expected: &str) -> Result<&'v str> {
    value
        .as_str()
        .ok_or_else(|| BindError::type_mismatch(expected, typecheck::shape_of(value)))
}

/// Full ISO-8601 / RFC 3339 timestamp converter, round-trip exact.
#[derive(Debug, Default, Clone, Copy)]
pub struct DateTimeConverter;

impl TypedConverter for DateTimeConverter {
    type Native = OffsetDateTime;

    fn serialize(&self, value: &OffsetDateTime, _context: &Context) -> Result<Value> {
        value
            .format(&Rfc3339)
            .map(Value::String)
            .map_err(|err| BindError::Internal(format!("RFC 3339 formatting failed: {err}")))
    }

    fn deserialize(&self, value: &Value, _context: &Context) -> Result<OffsetDateTime> {
        let text = expect_string(value, "RFC 3339 timestamp string")?;
        OffsetDateTime::parse(text, &Rfc3339)
            .map_err(|_| BindError::type_mismatch("RFC 3339 timestamp", format!("\"{text}\"")))
    }
}

/// ISO-8601 date-only converter (`YYYY-MM-DD`).
///
/// Deserializes to midnight UTC; serializing drops the time-of-day.
#[derive(Debug, Default, Clone, Copy)]
pub struct DateConverter;

impl TypedConverter for DateConverter {
    type Native = OffsetDateTime;

    fn serialize(&self, value: &OffsetDateTime, _context: &Context) -> Result<Value> {
        value
            .date()
            .format(date_format())
            .map(Value::String)
            .map_err(|err| BindError::Internal(format!("date formatting failed: {err}")))
    }

    fn deserialize(&self, value: &Value, _context: &Context) -> Result<OffsetDateTime> {
        let text = expect_string(value, "ISO-8601 date string")?;
        Date::parse(text, date_format())
            .map(|date| date.midnight().assume_utc())
            .map_err(|_| BindError::type_mismatch("ISO-8601 date", format!("\"{text}\"")))
    }
}
