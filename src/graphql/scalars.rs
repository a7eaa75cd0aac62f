//! The `DateTime` scalar
//!
//! Input and output take different paths:
//!
//! - variable-supplied values go through [`DateTimeCodec::parse_value`] and are
//!   converted to an instant immediately,
//! - inline literals go through [`DateTimeCodec::parse_literal`] and are kept
//!   as raw text until something needs the instant,
//! - output always goes through [`DateTimeCodec::serialize`], which accepts
//!   either form and renders ISO-8601 in UTC with millisecond precision.
//!
//! Stored photos carry heterogeneous date strings (`3-18-1977`, RFC 3339, ...),
//! so the raw form is also what the seed data holds.

use async_graphql_value::ConstValue;
use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{QueryError, QueryResult};

pub const DATE_TIME: &str = "DateTime";

/// Internal representation of a `DateTime` value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    /// Parsed instant
    Instant(DateTime<Utc>),
    /// Unparsed text, interpreted on demand
    Raw(String),
}

impl Timestamp {
    pub fn now() -> Self {
        Timestamp::Instant(Utc::now())
    }

    pub fn raw(text: impl Into<String>) -> Self {
        Timestamp::Raw(text.into())
    }

    /// Resolve to an instant, parsing the raw form if needed
    pub fn to_instant(&self) -> QueryResult<DateTime<Utc>> {
        match self {
            Timestamp::Instant(instant) => Ok(*instant),
            Timestamp::Raw(text) => {
                parse_date_time(text).ok_or_else(|| invalid(text, "unrecognised date format"))
            }
        }
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(instant: DateTime<Utc>) -> Self {
        Timestamp::Instant(instant)
    }
}

/// Conversion rules for the `DateTime` scalar
pub struct DateTimeCodec;

impl DateTimeCodec {
    /// Convert a runtime (variable) value into an instant.
    ///
    /// Strings are parsed with [`parse_date_time`]; integers are read as
    /// milliseconds since the Unix epoch.
    pub fn parse_value(value: &ConstValue) -> QueryResult<Timestamp> {
        match value {
            ConstValue::String(text) => parse_date_time(text)
                .map(Timestamp::Instant)
                .ok_or_else(|| invalid(text, "unrecognised date format")),
            ConstValue::Number(number) => {
                let millis = number
                    .as_i64()
                    .ok_or_else(|| invalid(&number.to_string(), "expected an integer"))?;
                DateTime::from_timestamp_millis(millis)
                    .map(Timestamp::Instant)
                    .ok_or_else(|| invalid(&number.to_string(), "timestamp out of range"))
            }
            other => Err(invalid(&other.to_string(), "expected a string or an integer")),
        }
    }

    /// Accept an inline literal without converting it.
    pub fn parse_literal(value: &ConstValue) -> QueryResult<Timestamp> {
        match value {
            ConstValue::String(text) => Ok(Timestamp::Raw(text.clone())),
            ConstValue::Number(number) => Ok(Timestamp::Raw(number.to_string())),
            other => Err(invalid(&other.to_string(), "expected a string or an integer literal")),
        }
    }

    /// Render any accepted representation as ISO-8601.
    pub fn serialize(timestamp: &Timestamp) -> QueryResult<String> {
        let instant = timestamp.to_instant()?;
        Ok(instant.to_rfc3339_opts(SecondsFormat::Millis, true))
    }
}

const NAIVE_DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%m-%d-%Y %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
];

const NAIVE_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m-%d-%Y", "%m/%d/%Y", "%Y/%m/%d"];

/// Parse the textual date forms found in photo records and arguments.
///
/// Offset-less forms are read as UTC. Month-first forms (`3-18-1977`) take
/// precedence over day-first readings.
pub fn parse_date_time(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = DateTime::parse_from_rfc2822(text) {
        return Some(parsed.with_timezone(&Utc));
    }

    NAIVE_DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .or_else(|| {
            NAIVE_DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .map(|naive| naive.and_utc())
}

fn invalid(value: &str, reason: &str) -> QueryError {
    QueryError::InvalidScalarInput {
        scalar: DATE_TIME,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parses_seed_formats() {
        assert_eq!(
            parse_date_time("3-18-1977"),
            Some(Utc.with_ymd_and_hms(1977, 3, 18, 0, 0, 0).unwrap())
        );
        assert_eq!(
            parse_date_time("1-2-1985"),
            Some(Utc.with_ymd_and_hms(1985, 1, 2, 0, 0, 0).unwrap())
        );
        assert!(parse_date_time("2018-04-15T19:09:57.308Z").is_some());
        assert!(parse_date_time("not a date").is_none());
    }

    #[test]
    fn serialize_renders_iso_8601() {
        let raw = Timestamp::raw("3-18-1977");
        assert_eq!(
            DateTimeCodec::serialize(&raw).unwrap(),
            "1977-03-18T00:00:00.000Z"
        );

        let canonical = Timestamp::raw("2018-04-15T19:09:57.308Z");
        assert_eq!(
            DateTimeCodec::serialize(&canonical).unwrap(),
            "2018-04-15T19:09:57.308Z"
        );
    }

    #[test]
    fn serialize_is_idempotent() {
        for text in ["1-2-1985", "2018-04-15T19:09:57.308Z", "2020-02-29 12:30:00"] {
            let once = DateTimeCodec::serialize(&Timestamp::raw(text)).unwrap();
            let twice = DateTimeCodec::serialize(&Timestamp::raw(once.clone())).unwrap();
            assert_eq!(once, twice);
        }

        let now = Timestamp::now();
        let once = DateTimeCodec::serialize(&now).unwrap();
        let twice = DateTimeCodec::serialize(&Timestamp::raw(once.clone())).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn serialize_rejects_garbage() {
        let err = DateTimeCodec::serialize(&Timestamp::raw("yesterday-ish")).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_SCALAR_INPUT");
    }

    #[test]
    fn parse_value_converts_to_instant() {
        let value = ConstValue::String("2018-04-15T19:09:57.308Z".to_string());
        let parsed = DateTimeCodec::parse_value(&value).unwrap();
        assert!(matches!(parsed, Timestamp::Instant(_)));

        let millis = ConstValue::Number(0.into());
        assert_eq!(
            DateTimeCodec::parse_value(&millis).unwrap(),
            Timestamp::Instant(DateTime::from_timestamp_millis(0).unwrap())
        );
    }

    #[test]
    fn parse_value_requires_integer_millis() {
        let fractional = ConstValue::Number(serde_json::Number::from_f64(1.5).unwrap());
        match DateTimeCodec::parse_value(&fractional).unwrap_err() {
            QueryError::InvalidScalarInput { reason, .. } => {
                assert_eq!(reason, "expected an integer")
            }
            other => panic!("unexpected error: {:?}", other),
        }

        let huge = ConstValue::Number(i64::MAX.into());
        match DateTimeCodec::parse_value(&huge).unwrap_err() {
            QueryError::InvalidScalarInput { reason, .. } => {
                assert_eq!(reason, "timestamp out of range")
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn parse_value_rejects_unparseable_strings() {
        let value = ConstValue::String("the day after tomorrow".to_string());
        let err = DateTimeCodec::parse_value(&value).unwrap_err();
        assert!(matches!(err, QueryError::InvalidScalarInput { .. }));
    }

    #[test]
    fn parse_literal_passes_text_through() {
        let value = ConstValue::String("the day after tomorrow".to_string());
        assert_eq!(
            DateTimeCodec::parse_literal(&value).unwrap(),
            Timestamp::raw("the day after tomorrow")
        );
    }

    #[test]
    fn parse_literal_rejects_structured_values() {
        let value = ConstValue::Boolean(true);
        assert!(DateTimeCodec::parse_literal(&value).is_err());
    }
}
