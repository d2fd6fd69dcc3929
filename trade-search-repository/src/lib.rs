//! # Trade Search Repository
//!
//! This crate talks to the external search engine. It resolves the engine
//! configuration, wraps HTTP in a transport that never raises, and provides one
//! [`SearchDriver`] per engine family (Meilisearch and OpenSearch).

pub mod config;
pub mod errors;
pub mod interfaces;
pub mod meilisearch;
pub mod opensearch;
pub mod transport;
pub mod types;
pub mod utils;

use std::sync::Arc;

pub use config::EngineConfig;
pub use errors::SearchIndexError;
pub use interfaces::SearchDriver;
pub use meilisearch::MeilisearchDriver;
pub use opensearch::OpenSearchDriver;
pub use transport::{HttpTransport, RequestOptions};
pub use types::{BatchOperationResult, BatchOperationSummary, IndexTarget};

use trade_search_shared::DriverKind;

/// Build the driver selected by the configuration.
pub fn build_driver(config: Arc<EngineConfig>) -> Arc<dyn SearchDriver> {
    let driver = config.driver;
    let transport = Arc::new(HttpTransport::new(config));
    match driver {
        DriverKind::Meilisearch => Arc::new(MeilisearchDriver::new(transport)),
        DriverKind::Opensearch => Arc::new(OpenSearchDriver::new(transport)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_driver_follows_config() {
        let driver = build_driver(Arc::new(EngineConfig::new(
            DriverKind::Opensearch,
            "http://os:9200",
        )));
        assert_eq!(driver.kind(), DriverKind::Opensearch);

        let driver = build_driver(Arc::new(EngineConfig::disabled()));
        assert_eq!(driver.kind(), DriverKind::Meilisearch);
    }
}
