//! Document types for the search indexes.
//!
//! These are the flat, engine-neutral projections sent to the search engine and
//! read back from search hits.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::entity::EntityId;
use crate::types::lenient::{lenient, lenient_f64, lenient_string, lenient_text, lenient_timestamp};

/// Minimal denormalized reference to a province.
///
/// When built from a bare identifier only `id` is known and every text field
/// is `None`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProvinceSummary {
    pub id: EntityId,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub code: Option<String>,
}

impl ProvinceSummary {
    /// Summary for a relation that was not expanded.
    pub fn from_id(id: EntityId) -> Self {
        Self {
            id,
            name: None,
            slug: None,
            code: None,
        }
    }
}

/// Minimal denormalized reference to an economic sector.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SectorSummary {
    pub id: EntityId,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub slug: Option<String>,
}

impl SectorSummary {
    /// Summary for a relation that was not expanded.
    pub fn from_id(id: EntityId) -> Self {
        Self {
            id,
            name: None,
            slug: None,
        }
    }
}

/// Indexable projection of a company.
///
/// `search_text` is the whitespace-joined concatenation of the display
/// attributes, used by engines that only do keyword matching on one field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CompanyDocument {
    pub id: EntityId,
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
    #[serde(default, deserialize_with = "lenient_f64")]
    pub trust_score: Option<f64>,
    #[serde(default)]
    pub capacities: Option<Value>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub locale: Option<String>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient")]
    pub province: Option<ProvinceSummary>,
    #[serde(default, deserialize_with = "lenient")]
    pub sector: Option<SectorSummary>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub search_text: String,
}

/// Indexable projection of a trade exchange.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeDocument {
    pub id: EntityId,
    #[serde(default, deserialize_with = "lenient_string")]
    pub unit: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub value: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub source_province: Option<ProvinceSummary>,
    #[serde(default, deserialize_with = "lenient")]
    pub target_province: Option<ProvinceSummary>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub search_text: String,
}

/// Parse a store timestamp, discarding anything that is not RFC 3339.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value.trim())
        .ok()
        .map(|at| at.with_timezone(&Utc))
}
