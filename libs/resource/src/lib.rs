//! Resource-base primitives shared by relay resource kinds.
//!
//! Every resource-like entity goes through the same finalization step: its
//! draft attributes are checked against a declared shape, identity is
//! minted, and a creation time is stamped. The result is a [`Stamp`] the
//! resource embeds. Finalized resources expose the shared read-only surface
//! through the [`Resource`] trait, which also derives the storage/lookup
//! key for one instance.
//!
//! # Invariants
//!
//! - Finalization is all-or-nothing: a draft that fails shape validation
//!   mints no identity and stamps no time
//! - [`item_key`] is a pure function of its inputs; equal inputs always
//!   derive equal keys

use chrono::{DateTime, Utc};
use relay_id::ResourceId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Resource finalization errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResourceError {
    /// The draft is missing a required field.
    #[error("{kind} draft is missing required field '{field}'")]
    MissingField {
        kind: &'static str,
        field: &'static str,
    },

    /// A required field holds the wrong kind of value.
    #[error("{kind} draft field '{field}' must be {expected}, found {found}")]
    Structural {
        kind: &'static str,
        field: &'static str,
        expected: FieldKind,
        found: String,
    },
}

/// Expected kind for one shaped draft field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// A JSON string.
    Str,
    /// A JSON object.
    Object,
}

impl FieldKind {
    fn matches(&self, value: &Value) -> bool {
        match self {
            FieldKind::Str => validate::is_string(value),
            FieldKind::Object => value.is_object(),
        }
    }
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldKind::Str => write!(f, "a string"),
            FieldKind::Object => write!(f, "an object"),
        }
    }
}

/// Required structural shape of a draft attribute object.
///
/// A shape lists the fields a draft must carry and the kind each must hold.
/// Extra draft fields are permitted; a shape constrains only what it names.
#[derive(Debug, Clone, Copy)]
pub struct Shape {
    fields: &'static [(&'static str, FieldKind)],
}

impl Shape {
    /// Declares a shape from its required fields.
    #[must_use]
    pub const fn new(fields: &'static [(&'static str, FieldKind)]) -> Self {
        Self { fields }
    }

    /// Checks `draft` against this shape.
    ///
    /// Every required field must be present and match its kind. A draft
    /// that is not an object fails on the first required field.
    pub fn conforms(&self, kind: &'static str, draft: &Value) -> Result<(), ResourceError> {
        for (field, expected) in self.fields {
            let Some(value) = draft.get(field) else {
                return Err(ResourceError::MissingField { kind, field });
            };
            if !expected.matches(value) {
                return Err(ResourceError::Structural {
                    kind,
                    field,
                    expected: *expected,
                    found: validate::kind_name(value).to_string(),
                });
            }
        }
        Ok(())
    }
}

/// The finalization record a resource embeds: identity and creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stamp<I> {
    /// Identity minted at finalization.
    pub id: I,

    /// When the resource was finalized.
    pub created_at: DateTime<Utc>,
}

/// Validates `draft` against `shape`, then mints identity and stamps the
/// current UTC time.
///
/// # Errors
///
/// Returns the structural failure unchanged; nothing is minted or stamped
/// on failure.
pub fn finalize<I: ResourceId>(
    kind: &'static str,
    shape: &Shape,
    draft: &Value,
) -> Result<Stamp<I>, ResourceError> {
    shape.conforms(kind, draft)?;

    Ok(Stamp {
        id: I::generate(),
        created_at: Utc::now(),
    })
}

/// Read-only surface shared by finalized resource kinds.
pub trait Resource {
    /// Kind tag, fixed per resource type.
    const KIND: &'static str;

    /// The id type minted for this kind.
    type Id: ResourceId;

    /// Identity assigned at finalization.
    fn id(&self) -> Self::Id;

    /// Creation time stamped at finalization.
    fn created_at(&self) -> DateTime<Utc>;

    /// Name supplied at construction.
    fn name(&self) -> &str;

    /// Derives the storage/lookup key for this instance.
    fn item_key(&self) -> String {
        item_key(Self::KIND, self.name(), self.id())
    }
}

/// Derives a deterministic storage/lookup key from a resource's kind, name,
/// and identity.
///
/// The layout is `kind:name:id`. Kind tags, dotted resource names, and
/// canonical id strings never contain `:`, so distinct inputs derive
/// distinct keys. The key addresses one instance; two separately finalized
/// resources never share one because their identities differ.
#[must_use]
pub fn item_key<I: ResourceId>(kind: &str, name: &str, id: I) -> String {
    format!("{kind}:{name}:{id}")
}

/// Structural predicates over draft values.
pub mod validate {
    use serde_json::Value;

    /// True when the value is a JSON string.
    #[must_use]
    pub fn is_string(value: &Value) -> bool {
        value.is_string()
    }

    /// True when the value is null, an empty string, an empty array, or an
    /// empty object.
    #[must_use]
    pub fn is_empty(value: &Value) -> bool {
        match value {
            Value::Null => true,
            Value::String(s) => s.is_empty(),
            Value::Array(items) => items.is_empty(),
            Value::Object(entries) => entries.is_empty(),
            Value::Bool(_) | Value::Number(_) => false,
        }
    }

    /// True when the string is empty or whitespace-only.
    #[must_use]
    pub fn is_blank(s: &str) -> bool {
        s.trim().is_empty()
    }

    /// Human-readable kind of a JSON value, for error messages.
    #[must_use]
    pub fn kind_name(value: &Value) -> &'static str {
        match value {
            Value::Null => "null",
            Value::Bool(_) => "a boolean",
            Value::Number(_) => "a number",
            Value::String(_) => "a string",
            Value::Array(_) => "an array",
            Value::Object(_) => "an object",
        }
    }

    /// Accepts only a JSON object, handing back its entries.
    ///
    /// Anything else is a structural failure against `field`.
    pub fn require_object(
        kind: &'static str,
        field: &'static str,
        value: Value,
    ) -> Result<serde_json::Map<String, Value>, crate::ResourceError> {
        match value {
            Value::Object(entries) => Ok(entries),
            other => Err(crate::ResourceError::Structural {
                kind,
                field,
                expected: crate::FieldKind::Object,
                found: kind_name(&other).to_string(),
            }),
        }
    }
}
