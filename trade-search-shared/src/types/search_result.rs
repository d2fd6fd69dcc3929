//! Search result types.
//!
//! This module defines the response structures returned from search operations.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::engine::SearchEngineInfo;
use crate::types::entity_document::{CompanyDocument, ExchangeDocument};

/// Field path (e.g. `name`, `province.name`) to a highlighted snippet.
pub type HighlightMap = BTreeMap<String, String>;

/// A document returned by a search, with the snippets that explain the match.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchHit<D> {
    #[serde(flatten)]
    pub document: D,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlights: Option<HighlightMap>,
}

impl<D> SearchHit<D> {
    /// Wrap a document; an empty highlight map is stored as `None`.
    pub fn new(document: D, highlights: HighlightMap) -> Self {
        Self {
            document,
            highlights: if highlights.is_empty() {
                None
            } else {
                Some(highlights)
            },
        }
    }
}

/// Result of a search against a single index.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchPage<D> {
    pub hits: Vec<SearchHit<D>>,
    /// Engine-reported processing time in milliseconds.
    pub took: u64,
    pub total: u64,
}

impl<D> SearchPage<D> {
    /// A page with no hits, as returned when nothing usable came back.
    pub fn empty() -> Self {
        Self {
            hits: Vec::new(),
            took: 0,
            total: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }
}

impl<D> Default for SearchPage<D> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Complete federated search response.
///
/// Always structurally valid: a disabled engine or blank query yields zeroed
/// numbers and empty lists.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResultPayload {
    pub query: String,
    /// Milliseconds of the slower of the per-index searches.
    pub took: u64,
    /// Sum of the per-index totals.
    pub total: u64,
    pub companies: Vec<SearchHit<CompanyDocument>>,
    pub exchanges: Vec<SearchHit<ExchangeDocument>>,
    pub engine: SearchEngineInfo,
}

impl SearchResultPayload {
    /// Create an empty payload.
    pub fn empty(query: impl Into<String>, engine: SearchEngineInfo) -> Self {
        Self {
            query: query.into(),
            took: 0,
            total: 0,
            companies: Vec::new(),
            exchanges: Vec::new(),
            engine,
        }
    }

    /// Merge two per-index pages into a payload.
    pub fn merge(
        query: impl Into<String>,
        companies: SearchPage<CompanyDocument>,
        exchanges: SearchPage<ExchangeDocument>,
        engine: SearchEngineInfo,
    ) -> Self {
        Self {
            query: query.into(),
            took: companies.took.max(exchanges.took),
            total: companies.total + exchanges.total,
            companies: companies.hits,
            exchanges: exchanges.hits,
            engine,
        }
    }
}
