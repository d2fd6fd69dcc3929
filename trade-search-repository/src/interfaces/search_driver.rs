//! Search driver trait definition.
//!
//! One implementation exists per engine family. The driver is selected once
//! from the configuration and shared as `Arc<dyn SearchDriver>`.

use async_trait::async_trait;
use serde_json::Value;
use trade_search_shared::{CompanyDocument, DriverKind, EntityId, ExchangeDocument, SearchPage};

use crate::types::IndexTarget;

/// Engine-specific document writes and query translation.
///
/// No method returns an error. Writes report whether the engine acknowledged
/// them and searches degrade to [`SearchPage::empty`]; the underlying failure
/// has already been logged by the transport.
#[async_trait]
pub trait SearchDriver: Send + Sync {
    /// The engine family this driver speaks to.
    fn kind(&self) -> DriverKind;

    /// Create both indexes and the settings searches rely on, if missing.
    ///
    /// Returns true when every bootstrap request succeeded.
    async fn prepare_indexes(&self) -> bool;

    /// Create or replace the document with the given id.
    async fn upsert(&self, target: IndexTarget, id: &EntityId, document: Value) -> bool;

    /// Remove the document with the given id. A missing document counts as removed.
    async fn delete(&self, target: IndexTarget, id: &EntityId) -> bool;

    /// Full-text search over companies, optionally restricted to a locale.
    async fn search_companies(
        &self,
        query: &str,
        limit: usize,
        locale: Option<&str>,
    ) -> SearchPage<CompanyDocument>;

    /// Full-text search over exchanges.
    async fn search_exchanges(&self, query: &str, limit: usize) -> SearchPage<ExchangeDocument>;
}
