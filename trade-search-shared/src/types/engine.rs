//! Search engine identity types.
//!
//! These describe which engine family is configured and which indexes it uses.
//! They are reported verbatim in every search payload.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Default name of the companies index.
pub const DEFAULT_COMPANIES_INDEX: &str = "companies";

/// Default name of the exchanges index.
pub const DEFAULT_EXCHANGES_INDEX: &str = "exchanges";

/// The search engine family a driver talks to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum DriverKind {
    /// Meilisearch-class engines (document arrays, `_formatted` highlights).
    #[default]
    Meilisearch,
    /// OpenSearch-class engines (`_doc` endpoints, bool query DSL).
    Opensearch,
}

impl DriverKind {
    /// Parse a configured driver name.
    ///
    /// Only `opensearch` (case-insensitive) selects OpenSearch; anything else,
    /// including an empty value, falls back to Meilisearch.
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("opensearch") {
            Self::Opensearch
        } else {
            Self::Meilisearch
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Meilisearch => "meilisearch",
            Self::Opensearch => "opensearch",
        }
    }
}

impl fmt::Display for DriverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Names of the two indexes maintained by the sync layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IndexNames {
    pub companies: String,
    pub exchanges: String,
}

impl Default for IndexNames {
    fn default() -> Self {
        Self {
            companies: DEFAULT_COMPANIES_INDEX.to_string(),
            exchanges: DEFAULT_EXCHANGES_INDEX.to_string(),
        }
    }
}

/// Static engine status, as reported to the HTTP layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SearchEngineInfo {
    pub enabled: bool,
    /// `None` when the engine is disabled.
    pub driver: Option<DriverKind>,
    pub index_names: IndexNames,
}
