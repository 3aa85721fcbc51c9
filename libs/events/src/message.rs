//! Message container with explicit absent-key semantics.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Result of looking up one message key.
///
/// A stored `null` is still [`Attribute::Set`]; [`Attribute::Absent`] means
/// the key was never written. Consumers branch on absence instead of
/// guessing whether a missing key was ever checked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Attribute<'a> {
    /// The key holds this value.
    Set(&'a Value),

    /// The key was never set.
    Absent,
}

impl<'a> Attribute<'a> {
    /// True when the key was never set.
    #[must_use]
    pub const fn is_absent(&self) -> bool {
        matches!(self, Attribute::Absent)
    }

    /// The stored value, or `None` for an absent key.
    #[must_use]
    pub const fn value(&self) -> Option<&'a Value> {
        match self {
            Attribute::Set(value) => Some(value),
            Attribute::Absent => None,
        }
    }

    /// The stored value, or `fallback` for an absent key.
    #[must_use]
    pub fn or(self, fallback: &'a Value) -> &'a Value {
        match self {
            Attribute::Set(value) => value,
            Attribute::Absent => fallback,
        }
    }

    /// The stored string, if the key holds one.
    #[must_use]
    pub fn as_str(&self) -> Option<&'a str> {
        self.value().and_then(Value::as_str)
    }
}

/// Free-form event payload: a key→value mapping that is immutable once the
/// envelope owns it.
///
/// Lookups go through [`Message::get`], which yields [`Attribute::Absent`]
/// for keys that were never set instead of failing. There is no mutating
/// surface; a payload is fixed when the envelope is built.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Message {
    entries: Map<String, Value>,
}

impl Message {
    /// An empty payload.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up one key; keys that were never set resolve to
    /// [`Attribute::Absent`]. Never fails.
    #[must_use]
    pub fn get(&self, key: &str) -> Attribute<'_> {
        match self.entries.get(key) {
            Some(value) => Attribute::Set(value),
            None => Attribute::Absent,
        }
    }

    /// True when the key was explicitly set, even to `null`.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no key is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates stored entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl From<Map<String, Value>> for Message {
    fn from(entries: Map<String, Value>) -> Self {
        Self { entries }
    }
}

impl<K: Into<String>, const N: usize> From<[(K, Value); N]> for Message {
    fn from(entries: [(K, Value); N]) -> Self {
        entries.into_iter().map(|(k, v)| (k.into(), v)).collect()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Message {
    fn from_iter<T: IntoIterator<Item = (K, Value)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}
