//! Domain identifiers - Newtype wrappers for type safety
//!
//! Stored plans carry identifiers either as strings or as bare numbers,
//! depending on which revision of the planning screens created them. All
//! identifiers are normalised to strings on the way in; other shapes are
//! read leniently rather than rejected.

use core::fmt;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Reads any stored identifier as text.
///
/// Numbers keep their digits, `null` reads as the empty id and any other
/// shape is kept as its JSON text, so a record is never lost to its id.
fn id_text(raw: Value) -> String {
    match raw {
        Value::String(text) => text,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates an identifier from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the inner string reference.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Checks whether the identifier is empty.
            #[must_use]
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                Value::deserialize(deserializer).map(|raw| Self(id_text(raw)))
            }
        }
    };
}

string_id! {
    /// Identifier of a stored plan (one building's MJOP).
    PlanId
}

impl PlanId {
    /// Creates a fresh random plan identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

string_id! {
    /// Identifier of an inspected building element.
    ElementId
}

string_id! {
    /// Identifier of a maintenance task, stable across edits.
    TaskId
}

string_id! {
    /// Identifier of an offer group bundling several tasks.
    OfferGroupId
}

/// Deserializes an optional identifier, mapping `null` and `""` to `None`.
///
/// # Errors
/// Returns an error only when the underlying deserializer fails to produce
/// a JSON value.
pub fn optional_id<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    let id = match value {
        Value::String(ref text) if text.trim().is_empty() => None,
        Value::String(_) | Value::Number(_) => serde_json::from_value(value).ok(),
        _ => None,
    };
    Ok(id)
}
