//! Date parsing and canonical rendering.
//!
//! Clients send dates in a few shapes; everything is normalized to
//! `DateTime<Utc>` on the way in and rendered as an RFC 3339 timestamp with
//! millisecond precision on the way out.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer};

/// Render a timestamp in the canonical wire form (`2015-09-13T00:37:12.623Z`).
pub fn to_canonical(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse a textual date.
///
/// Accepted: RFC 3339, `YYYY-MM-DD HH:MM:SS[.fraction]` (UTC) and
/// `YYYY-MM-DD` (midnight UTC).
pub fn parse(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDate {
    Millis(i64),
    Text(String),
}

/// `deserialize_with` helper for optional date fields.
///
/// `null` and absent both become `None`; malformed values are an error.
pub fn deserialize_option<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawDate>::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(RawDate::Millis(ms)) => DateTime::from_timestamp_millis(ms)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("timestamp out of range: {ms}"))),
        Some(RawDate::Text(text)) => parse(&text)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid date: {text}"))),
    }
}
