//! Dependency initialization and wiring for the trade search service.

use std::sync::Arc;

use tracing::info;
use trade_search_repository::{build_driver, EngineConfig, SearchDriver};

use crate::config::SyncConfig;
use crate::federator::QueryFederator;
use crate::resolver::EntityStore;
use crate::service::SearchService;

/// Container for the engine configuration and the driver it selects.
pub struct Dependencies {
    pub config: Arc<EngineConfig>,
    pub driver: Arc<dyn SearchDriver>,
}

impl Dependencies {
    /// Initialize dependencies from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `SEARCH_ENGINE_URL` (or `SEARCH_ENGINE_HOST`): engine base URL; unset disables the layer
    /// - `SEARCH_ENGINE_DRIVER`: `meilisearch` (default) or `opensearch`
    /// - `SEARCH_ENGINE_API_KEY`: API key sent in the auth header
    /// - `SEARCH_ENGINE_AUTH_HEADER`: custom auth header name
    /// - `SEARCH_ENGINE_AUTH_SCHEME`: custom auth scheme, may be empty
    /// - `SEARCH_INDEX_COMPANIES`, `SEARCH_INDEX_EXCHANGES`: index names
    pub fn from_env() -> Self {
        Self::from_config(EngineConfig::from_env())
    }

    pub fn from_config(config: EngineConfig) -> Self {
        let config = Arc::new(config);

        if config.enabled {
            info!(
                driver = %config.driver,
                base_url = %config.redacted_base_url(),
                companies_index = %config.index_names.companies,
                exchanges_index = %config.index_names.exchanges,
                authenticated = config.api_key.is_some(),
                "Search engine configured"
            );
        } else {
            config.log_disabled_once();
        }

        let driver = build_driver(config.clone());
        Self { config, driver }
    }

    /// A federator for query-only callers.
    pub fn federator(&self) -> QueryFederator {
        QueryFederator::new(self.config.clone(), self.driver.clone())
    }

    /// The full service, reading entities through `store`.
    pub fn service(&self, store: Arc<dyn EntityStore>) -> SearchService {
        SearchService::with_driver(
            self.config.clone(),
            self.driver.clone(),
            store,
            SyncConfig::default(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trade_search_shared::DriverKind;

    #[test]
    fn test_from_config_selects_driver() {
        let deps = Dependencies::from_config(EngineConfig::new(
            DriverKind::Opensearch,
            "http://localhost:9200",
        ));
        assert_eq!(deps.driver.kind(), DriverKind::Opensearch);
        assert!(deps.config.enabled);
    }

    #[test]
    fn test_disabled_config_logs_notice() {
        let deps = Dependencies::from_config(EngineConfig::disabled());
        assert!(!deps.config.enabled);
        assert!(deps.config.has_logged_disabled());
    }
}
