//! Lenient field decoders for backend payloads.
//!
//! The chat backend serializes rows straight out of its database, so the
//! same field can arrive as a number, a numeric string, or a bool depending
//! on the driver. These helpers are used through `#[serde(deserialize_with)]`.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, de::Error};

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

/// Accepts a string or a number and yields its string form.
pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Scalar::deserialize(deserializer)? {
        Scalar::Str(s) => Ok(s),
        Scalar::Int(n) => Ok(n.to_string()),
        Scalar::Float(f) => Ok(f.to_string()),
        Scalar::Bool(_) => Err(D::Error::custom("expected a string or a number")),
    }
}

/// Like [`string_or_number`], but `null` and `""` become `None`.
pub fn opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match Option::<Scalar>::deserialize(deserializer)? {
        None => return Ok(None),
        Some(Scalar::Str(s)) => s,
        Some(Scalar::Int(n)) => n.to_string(),
        Some(Scalar::Float(f)) => f.to_string(),
        Some(Scalar::Bool(_)) => return Err(D::Error::custom("expected a string or a number")),
    };

    if value.trim().is_empty() {
        Ok(None)
    } else {
        Ok(Some(value))
    }
}

/// Accepts `true`/`false`, `0`/`1`, and their string spellings.
pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Scalar>::deserialize(deserializer)? {
        None => Ok(false),
        Some(Scalar::Bool(b)) => Ok(b),
        Some(Scalar::Int(n)) => Ok(n != 0),
        Some(Scalar::Float(f)) => Ok(f != 0.0),
        Some(Scalar::Str(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" => Ok(true),
            "" | "0" | "false" | "no" => Ok(false),
            other => Err(D::Error::custom(format!("invalid flag value: {other}"))),
        },
    }
}

/// Accepts `YYYY-MM-DD HH:MM:SS` (read as UTC), RFC 3339, or unix seconds.
pub fn timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    match Scalar::deserialize(deserializer)? {
        Scalar::Int(secs) => Utc
            .timestamp_opt(secs, 0)
            .single()
            .ok_or_else(|| D::Error::custom(format!("timestamp out of range: {secs}"))),
        Scalar::Str(s) => parse_timestamp(&s).map_err(D::Error::custom),
        _ => Err(D::Error::custom("expected a timestamp")),
    }
}

pub fn parse_timestamp(input: &str) -> Result<DateTime<Utc>, String> {
    let input = input.trim();

    if let Ok(naive) = NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M:%S") {
        return Ok(naive.and_utc());
    }

    DateTime::parse_from_rfc3339(input)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| format!("invalid timestamp: {input}"))
}
