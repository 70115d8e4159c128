//! Lenient decoding of stored plan values.
//!
//! Plans are edited by forms that store whatever the input held: numbers,
//! numeric strings, empty strings or `null`. Records therefore keep raw JSON
//! for monetary and date fields, and normalisation reads them through
//! [`Scalar`], which separates "absent" from "present but unreadable".

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Outcome of reading a single optional scalar field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar<T> {
    /// Field missing, `null` or blank.
    Absent,
    /// Field holds a readable value.
    Valid(T),
    /// Field holds something that cannot be read as `T`.
    Malformed,
}

impl<T> Scalar<T> {
    /// Returns the valid value, if any.
    pub fn valid(self) -> Option<T> {
        match self {
            Self::Valid(value) => Some(value),
            Self::Absent | Self::Malformed => None,
        }
    }

    /// Checks whether the field was present at all.
    pub const fn is_present(&self) -> bool {
        !matches!(self, Self::Absent)
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.trim().is_empty(),
        _ => false,
    }
}

/// Reads a monetary amount.
///
/// Accepts JSON numbers and numeric strings. A single decimal comma is
/// accepted in place of a point. Non-finite results are malformed.
#[must_use]
pub fn amount(value: Option<&Value>) -> Scalar<f64> {
    let Some(value) = value.filter(|v| !is_blank(v)) else {
        return Scalar::Absent;
    };
    let parsed = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().replace(',', ".").parse::<f64>().ok(),
        _ => None,
    };
    match parsed {
        Some(amount) if amount.is_finite() => Scalar::Valid(amount),
        _ => Scalar::Malformed,
    }
}

/// Reads a calendar date.
///
/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps, naive `YYYY-MM-DDTHH:MM:SS`
/// timestamps and integer epoch milliseconds. Only the date part is kept.
#[must_use]
pub fn date(value: Option<&Value>) -> Scalar<NaiveDate> {
    let Some(value) = value.filter(|v| !is_blank(v)) else {
        return Scalar::Absent;
    };
    let parsed = match value {
        Value::String(text) => parse_date_text(text.trim()),
        Value::Number(number) => number
            .as_i64()
            .and_then(DateTime::from_timestamp_millis)
            .map(|ts| ts.date_naive()),
        _ => None,
    };
    parsed.map_or(Scalar::Malformed, Scalar::Valid)
}

fn parse_date_text(text: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(text) {
        return Some(timestamp.date_naive());
    }
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|timestamp| timestamp.date())
}

/// Reads an integer, accepting numeric strings and whole floats.
#[must_use]
pub fn integer(value: Option<&Value>) -> Scalar<i64> {
    match amount(value) {
        Scalar::Valid(number) if number.fract() == 0.0 => {
            #[allow(clippy::cast_possible_truncation)]
            Scalar::Valid(number as i64)
        }
        Scalar::Valid(_) | Scalar::Malformed => Scalar::Malformed,
        Scalar::Absent => Scalar::Absent,
    }
}

/// Renders a raw value for diagnostics.
#[must_use]
pub fn describe(value: Option<&Value>) -> String {
    value.map_or_else(String::new, |v| match v {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    })
}

// -----------------------------------------------------------------------------
// serde helpers
// -----------------------------------------------------------------------------

/// Keeps a present field as `Some`, including an explicit `null`.
///
/// Used with `#[serde(default, skip_serializing_if = "Option::is_none")]` so a
/// stored `null` survives a load/save cycle while a missing field stays
/// missing.
///
/// # Errors
/// Returns an error only when the input is not valid JSON.
pub fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Reads an optional nested record, treating any non-matching value as
/// absent.
///
/// # Errors
/// Returns an error only when the input is not valid JSON.
pub fn record_or_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    if !value.is_object() {
        return Ok(None);
    }
    Ok(serde_json::from_value(value).ok())
}

/// Reads a flag the way the planning screens test it: `true`, `"true"` and
/// non-zero numbers are set, everything else is unset.
///
/// # Errors
/// Returns an error only when the input is not valid JSON.
pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let set = match Value::deserialize(deserializer)? {
        Value::Bool(flag) => flag,
        Value::String(text) => text.trim().eq_ignore_ascii_case("true"),
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        _ => false,
    };
    Ok(set)
}

/// Reads optional free text, rendering numbers as text and dropping other
/// shapes.
///
/// # Errors
/// Returns an error only when the input is not valid JSON.
pub fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = match Value::deserialize(deserializer)? {
        Value::String(text) => Some(text),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    };
    Ok(text)
}
