//! Lenient field decoding shared by the stored models.
//!
//! Batches written by older deployments carry `null` for missing text,
//! numbers where strings are expected, and naive `YYYY-mm-dd HH:MM:SS`
//! capture times.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serializer};
use serde_json::Value;

const LEGACY_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Decodes a string field, accepting `null`, numbers and booleans.
pub fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(other) => other.to_string(),
    })
}

/// Parses a capture timestamp in either RFC 3339 or the legacy naive format (UTC).
#[must_use]
pub fn parse_captured_at(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, LEGACY_TIME_FORMAT)
                .ok()
                .map(|naive| naive.and_utc())
        })
}

pub mod captured_at {
    use super::*;
    use serde::de::Error as _;

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Secs, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse_captured_at(&raw)
            .ok_or_else(|| D::Error::custom(format!("invalid capture timestamp: {raw}")))
    }
}
