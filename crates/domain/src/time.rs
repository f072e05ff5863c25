//! Time and timestamp helpers.
//!
//! Room documents carry `updatedAt` and `slaExpireAt` as loosely formatted
//! values. Reading them never fails: anything that is not recognisably a
//! date becomes `None`. Writing always produces a UTC ISO-8601 string with
//! millisecond precision.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde_json::Value;

/// UTC timestamp used for `updatedAt`, `slaExpireAt`, etc.
pub type Timestamp = DateTime<Utc>;

/// Read a date from a raw document value.
///
/// Accepted inputs:
/// - RFC 3339 / ISO-8601 strings (`2024-01-01T00:00:00.000Z`, offsets allowed)
/// - naive date-times (`2024-01-01T08:30:00`) and bare dates (`2024-01-01`),
///   both read as UTC
/// - epoch milliseconds as a JSON number
///
/// `null`, empty strings, zero and unparseable values yield `None`.
#[must_use]
pub fn parse_date(value: &Value) -> Option<Timestamp> {
    match value {
        Value::String(text) => parse_date_str(text),
        Value::Number(number) => number
            .as_i64()
            .filter(|millis| *millis != 0)
            .and_then(DateTime::from_timestamp_millis),
        _ => None,
    }
}

/// Text variant of [`parse_date`].
#[must_use]
pub fn parse_date_str(text: &str) -> Option<Timestamp> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.to_utc());
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Format an optional timestamp as `YYYY-MM-DDTHH:MM:SS.mmmZ`.
#[must_use]
pub fn to_iso(value: Option<&Timestamp>) -> Option<String> {
    value.map(|ts| ts.to_rfc3339_opts(SecondsFormat::Millis, true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn new_year() -> Timestamp {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn should_parse_null_as_none() {
        assert_eq!(parse_date(&Value::Null), None);
    }

    #[test]
    fn should_parse_garbage_as_none() {
        assert_eq!(parse_date(&serde_json::json!("not-a-date")), None);
        assert_eq!(parse_date(&serde_json::json!("")), None);
        assert_eq!(parse_date(&serde_json::json!(true)), None);
        assert_eq!(parse_date(&serde_json::json!({"$date": "x"})), None);
    }

    #[test]
    fn should_parse_iso_string_to_same_instant() {
        let parsed = parse_date(&serde_json::json!("2024-01-01T00:00:00.000Z")).unwrap();
        assert_eq!(parsed.timestamp_millis(), new_year().timestamp_millis());
    }

    #[test]
    fn should_normalise_offsets_to_utc() {
        let parsed = parse_date(&serde_json::json!("2024-01-01T02:00:00+02:00")).unwrap();
        assert_eq!(parsed, new_year());
    }

    #[test]
    fn should_parse_bare_date_and_naive_datetime_as_utc() {
        assert_eq!(parse_date_str("2024-01-01"), Some(new_year()));
        assert_eq!(parse_date_str("2024-01-01T00:00:00"), Some(new_year()));
    }

    #[test]
    fn should_parse_epoch_millis() {
        let millis = new_year().timestamp_millis();
        assert_eq!(parse_date(&serde_json::json!(millis)), Some(new_year()));
        assert_eq!(parse_date(&serde_json::json!(0)), None);
    }

    #[test]
    fn should_format_none_as_none() {
        assert_eq!(to_iso(None), None);
    }

    #[test]
    fn should_format_with_millis_and_zulu_suffix() {
        assert_eq!(
            to_iso(Some(&new_year())).as_deref(),
            Some("2024-01-01T00:00:00.000Z")
        );
    }
}
