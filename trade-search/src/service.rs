//! Public facade of the search layer.
//!
//! Lifecycle hooks call the `sync_*`/`remove_*` methods; query controllers call
//! [`SearchService::perform_search`]. All of them are safe to call whether or
//! not an engine is configured.

use std::sync::Arc;

use trade_search_repository::{build_driver, BatchOperationSummary, EngineConfig, SearchDriver};
use trade_search_shared::{
    CompanyEntity, ExchangeEntity, Reference, SearchEngineInfo, SearchOptions, SearchResultPayload,
};

use crate::config::SyncConfig;
use crate::errors::SyncError;
use crate::federator::QueryFederator;
use crate::orchestrator::SyncOrchestrator;
use crate::resolver::{EntityResolver, EntityStore};

/// Search indexing and federated query service.
pub struct SearchService {
    config: Arc<EngineConfig>,
    driver: Arc<dyn SearchDriver>,
    orchestrator: SyncOrchestrator,
    federator: QueryFederator,
}

impl SearchService {
    /// Create a service using the driver selected by the configuration.
    pub fn new(config: Arc<EngineConfig>, store: Arc<dyn EntityStore>) -> Self {
        let driver = build_driver(config.clone());
        Self::with_driver(config, driver, store, SyncConfig::default())
    }

    /// Create a service around an existing driver.
    pub fn with_driver(
        config: Arc<EngineConfig>,
        driver: Arc<dyn SearchDriver>,
        store: Arc<dyn EntityStore>,
        sync_config: SyncConfig,
    ) -> Self {
        let orchestrator = SyncOrchestrator::with_config(
            config.clone(),
            driver.clone(),
            EntityResolver::new(store),
            sync_config,
        );
        let federator = QueryFederator::new(config.clone(), driver.clone());
        Self {
            config,
            driver,
            orchestrator,
            federator,
        }
    }

    pub async fn sync_company_to_index(&self, input: Reference<CompanyEntity>) {
        self.orchestrator.sync_company(input).await;
    }

    pub async fn remove_company_from_index(&self, input: Reference<CompanyEntity>) {
        self.orchestrator.remove_company(&input).await;
    }

    pub async fn sync_exchange_to_index(&self, input: Reference<ExchangeEntity>) {
        self.orchestrator.sync_exchange(input).await;
    }

    pub async fn remove_exchange_from_index(&self, input: Reference<ExchangeEntity>) {
        self.orchestrator.remove_exchange(&input).await;
    }

    pub async fn perform_search(&self, query: &str, options: &SearchOptions) -> SearchResultPayload {
        self.federator.perform_search(query, options).await
    }

    /// Static engine status for the HTTP layer.
    pub fn search_engine_info(&self) -> SearchEngineInfo {
        self.config.engine_info()
    }

    pub async fn reindex_companies(
        &self,
        inputs: Vec<Reference<CompanyEntity>>,
    ) -> Result<BatchOperationSummary, SyncError> {
        self.orchestrator.reindex_companies(inputs).await
    }

    pub async fn reindex_exchanges(
        &self,
        inputs: Vec<Reference<ExchangeEntity>>,
    ) -> Result<BatchOperationSummary, SyncError> {
        self.orchestrator.reindex_exchanges(inputs).await
    }

    /// Create the indexes and their settings. Returns false when the engine is
    /// disabled or did not acknowledge every step.
    pub async fn prepare_indexes(&self) -> bool {
        if !self.config.enabled {
            self.config.log_disabled_once();
            return false;
        }
        self.driver.prepare_indexes().await
    }
}
