//! Stored lists of records.

use core::ops::{Deref, DerefMut};

use serde::de::DeserializeOwned;
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use tracing::debug;

/// A stored list of typed records.
///
/// Items without the record shape are kept aside as raw JSON and written
/// back after the records, so a load/save cycle never loses them. A stored
/// value that is not a list at all reads as an empty list and is written
/// back unchanged until records are added.
///
/// Derefs to `Vec<T>` for everything that works on the readable records.
#[derive(Debug, Clone, PartialEq)]
pub struct Records<T> {
    items: Vec<T>,
    unreadable: Vec<Value>,
    not_a_list: Option<Value>,
}

impl<T> Records<T> {
    /// Creates an empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            items: Vec::new(),
            unreadable: Vec::new(),
            not_a_list: None,
        }
    }

    /// Stored items that could not be read as records.
    #[must_use]
    pub fn unreadable(&self) -> &[Value] {
        &self.unreadable
    }
}

impl<T> Default for Records<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Deref for Records<T> {
    type Target = Vec<T>;

    fn deref(&self) -> &Vec<T> {
        &self.items
    }
}

impl<T> DerefMut for Records<T> {
    fn deref_mut(&mut self) -> &mut Vec<T> {
        &mut self.items
    }
}

impl<T> From<Vec<T>> for Records<T> {
    fn from(items: Vec<T>) -> Self {
        Self {
            items,
            ..Self::new()
        }
    }
}

impl<T> FromIterator<T> for Records<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}

impl<'a, T> IntoIterator for &'a Records<T> {
    type Item = &'a T;
    type IntoIter = core::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut Records<T> {
    type Item = &'a mut T;
    type IntoIter = core::slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter_mut()
    }
}

impl<T: Serialize> Serialize for Records<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if let Some(original) = self.not_a_list.as_ref().filter(|_| self.items.is_empty()) {
            return original.serialize(serializer);
        }
        let mut seq = serializer.serialize_seq(Some(self.items.len() + self.unreadable.len()))?;
        for item in &self.items {
            seq.serialize_element(item)?;
        }
        for raw in &self.unreadable {
            seq.serialize_element(raw)?;
        }
        seq.end()
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Records<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let items = match Value::deserialize(deserializer)? {
            Value::Array(items) => items,
            other => {
                return Ok(Self {
                    not_a_list: Some(other),
                    ..Self::new()
                });
            }
        };

        let mut records = Self::new();
        for item in items {
            let parsed = T::deserialize(&item);
            match parsed {
                Ok(record) => records.items.push(record),
                Err(err) => {
                    debug!(%err, "Kept list item with an unexpected shape");
                    records.unreadable.push(item);
                }
            }
        }
        Ok(records)
    }
}
