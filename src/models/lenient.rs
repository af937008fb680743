//! Tolerant field readers for hand-edited journal documents.
//!
//! A malformed field becomes `None`/empty instead of rejecting the whole
//! document, so one bad record never hides the rest of the journal.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::str::FromStr;

/// Parse a stored date key. Longer ISO timestamps are truncated to their
/// `YYYY-MM-DD` prefix; the wall-clock date is kept as written.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let key = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(key, "%Y-%m-%d").ok()
}

pub fn date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(Value::as_str).and_then(parse_date))
}

pub fn number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(Value::as_f64)
        .filter(|v| v.is_finite()))
}

pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    })
}

pub fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = text(deserializer)?;
    Ok(if s.is_empty() { None } else { Some(s) })
}

pub fn variant<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(Value::as_str)
        .and_then(|s| s.parse().ok()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_timestamps_to_date() {
        let d = NaiveDate::from_ymd_opt(2025, 12, 11).unwrap();
        assert_eq!(parse_date("2025-12-11"), Some(d));
        assert_eq!(parse_date("2025-12-11T23:10:00.000Z"), Some(d));
        assert_eq!(parse_date("11/12/2025"), None);
        assert_eq!(parse_date(""), None);
    }
}
