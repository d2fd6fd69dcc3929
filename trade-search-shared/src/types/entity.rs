//! Entity shapes handed over by the content store.
//!
//! Lifecycle events deliver either a bare identifier or a (possibly partial)
//! entity object, and relations inside an entity are either bare identifiers or
//! populated objects. Both cases are modelled by [`Reference`].

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::types::lenient::{lenient, lenient_string};

/// Canonical identifier of a stored entity, numeric or textual.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum EntityId {
    Number(i64),
    Text(String),
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(id) => write!(f, "{}", id),
            Self::Text(id) => f.write_str(id),
        }
    }
}

impl From<i64> for EntityId {
    fn from(id: i64) -> Self {
        Self::Number(id)
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        Self::Text(id.to_string())
    }
}

impl From<String> for EntityId {
    fn from(id: String) -> Self {
        Self::Text(id)
    }
}

/// Either a bare identifier or an expanded object.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Reference<T> {
    Id(EntityId),
    Expanded(T),
}

impl<T> Reference<T> {
    /// Returns true when the reference carries a populated object.
    pub fn is_expanded(&self) -> bool {
        matches!(self, Self::Expanded(_))
    }
}

impl<T> From<EntityId> for Reference<T> {
    fn from(id: EntityId) -> Self {
        Self::Id(id)
    }
}

/// A populated relation object (province or sector).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RelationRecord {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<EntityId>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub code: Option<String>,
}

/// Publication state of a draft-capable entity.
///
/// `Untracked` means the shape carries no publication field at all, which is
/// different from a field that is present and unset (`Draft`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Publication {
    #[default]
    Untracked,
    Draft,
    Published(String),
}

impl Publication {
    /// Returns true when the field is present and explicitly unset.
    pub fn is_draft(&self) -> bool {
        matches!(self, Self::Draft)
    }

    pub fn published_at(&self) -> Option<&str> {
        match self {
            Self::Published(at) => Some(at),
            _ => None,
        }
    }
}

// Only invoked when the field is present; absence falls back to `Untracked`.
// Any non-empty value other than a string still counts as published.
fn deserialize_publication<'de, D>(deserializer: D) -> Result<Publication, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => Publication::Draft,
        Value::String(at) if at.trim().is_empty() => Publication::Draft,
        Value::String(at) => Publication::Published(at),
        Value::Bool(false) => Publication::Draft,
        other => Publication::Published(other.to_string()),
    })
}

/// A company as stored by the content store.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CompanyEntity {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<EntityId>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub website: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub country: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub verification_status: Option<String>,
    /// Number or numeric string; coerced during projection.
    pub trust_score: Option<Value>,
    pub capacities: Option<Value>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub locale: Option<String>,
    #[serde(default, deserialize_with = "deserialize_publication")]
    pub published_at: Publication,
    #[serde(default, deserialize_with = "lenient_string")]
    pub updated_at: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub province: Option<Reference<RelationRecord>>,
    #[serde(default, deserialize_with = "lenient")]
    pub sector: Option<Reference<RelationRecord>>,
}

/// A trade exchange between two provinces.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeEntity {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<EntityId>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub unit: Option<String>,
    /// Number or numeric string; coerced during projection.
    pub value: Option<Value>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub locale: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub source_province: Option<Reference<RelationRecord>>,
    #[serde(default, deserialize_with = "lenient")]
    pub target_province: Option<Reference<RelationRecord>>,
}
