//! Federated search across the companies and exchanges indexes.

use std::sync::Arc;

use tracing::debug;
use trade_search_repository::{EngineConfig, SearchDriver};
use trade_search_shared::{SearchOptions, SearchPage, SearchResultPayload};

/// Runs one query against both indexes and merges the results.
pub struct QueryFederator {
    config: Arc<EngineConfig>,
    driver: Arc<dyn SearchDriver>,
}

impl QueryFederator {
    pub fn new(config: Arc<EngineConfig>, driver: Arc<dyn SearchDriver>) -> Self {
        Self { config, driver }
    }

    /// Search both indexes concurrently.
    ///
    /// A blank query or a disabled engine returns the empty payload without
    /// touching the network. The payload is always structurally valid.
    pub async fn perform_search(&self, query: &str, options: &SearchOptions) -> SearchResultPayload {
        let query = query.trim();
        let engine = self.config.engine_info();

        if !self.config.enabled {
            self.config.log_disabled_once();
            return SearchResultPayload::empty(query, engine);
        }
        if query.is_empty() {
            return SearchResultPayload::empty(query, engine);
        }

        let limit = options.resolved_limit();
        let locale = options.resolved_locale();
        let scope = options.scope;

        let companies = async {
            if scope.includes_companies() {
                self.driver.search_companies(query, limit, locale).await
            } else {
                SearchPage::empty()
            }
        };
        let exchanges = async {
            if scope.includes_exchanges() {
                self.driver.search_exchanges(query, limit).await
            } else {
                SearchPage::empty()
            }
        };
        let (companies, exchanges) = tokio::join!(companies, exchanges);

        debug!(
            query,
            limit,
            companies = companies.total,
            exchanges = exchanges.total,
            "Federated search completed"
        );
        SearchResultPayload::merge(query, companies, exchanges, engine)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::Value;
    use std::sync::Mutex;
    use trade_search_repository::IndexTarget;
    use trade_search_shared::{
        CompanyDocument, DriverKind, EntityId, ExchangeDocument, SearchHit, SearchScope,
    };

    #[derive(Debug, Clone, PartialEq)]
    enum SearchCall {
        Companies { query: String, limit: usize, locale: Option<String> },
        Exchanges { query: String, limit: usize },
    }

    #[derive(Default)]
    struct MockDriver {
        calls: Mutex<Vec<SearchCall>>,
        companies: Option<SearchPage<CompanyDocument>>,
        exchanges: Option<SearchPage<ExchangeDocument>>,
    }

    impl MockDriver {
        fn calls(&self) -> Vec<SearchCall> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl SearchDriver for MockDriver {
        fn kind(&self) -> DriverKind {
            DriverKind::Opensearch
        }

        async fn prepare_indexes(&self) -> bool {
            true
        }

        async fn upsert(&self, _target: IndexTarget, _id: &EntityId, _document: Value) -> bool {
            true
        }

        async fn delete(&self, _target: IndexTarget, _id: &EntityId) -> bool {
            true
        }

        async fn search_companies(
            &self,
            query: &str,
            limit: usize,
            locale: Option<&str>,
        ) -> SearchPage<CompanyDocument> {
            self.calls.lock().unwrap().push(SearchCall::Companies {
                query: query.to_string(),
                limit,
                locale: locale.map(str::to_string),
            });
            self.companies.clone().unwrap_or_default()
        }

        async fn search_exchanges(&self, query: &str, limit: usize) -> SearchPage<ExchangeDocument> {
            self.calls.lock().unwrap().push(SearchCall::Exchanges {
                query: query.to_string(),
                limit,
            });
            self.exchanges.clone().unwrap_or_default()
        }
    }

    fn federator(driver: Arc<MockDriver>) -> QueryFederator {
        let config = EngineConfig::new(DriverKind::Opensearch, "http://engine:9200");
        QueryFederator::new(Arc::new(config), driver)
    }

    fn company_page(ids: &[i64], took: u64, total: u64) -> SearchPage<CompanyDocument> {
        let hits = ids
            .iter()
            .map(|id| {
                let document: CompanyDocument =
                    serde_json::from_value(serde_json::json!({ "id": id, "searchText": "" })).unwrap();
                SearchHit::new(document, Default::default())
            })
            .collect();
        SearchPage { hits, took, total }
    }

    fn limit_of(call: &SearchCall) -> usize {
        match call {
            SearchCall::Companies { limit, .. } | SearchCall::Exchanges { limit, .. } => *limit,
        }
    }

    #[tokio::test]
    async fn test_blank_query_makes_no_calls() {
        let driver = Arc::new(MockDriver::default());
        let federator = federator(driver.clone());

        for query in ["", "   "] {
            let payload = federator.perform_search(query, &SearchOptions::default()).await;
            assert_eq!(payload.total, 0);
            assert_eq!(payload.took, 0);
            assert!(payload.companies.is_empty());
            assert!(payload.exchanges.is_empty());
            assert_eq!(payload.query, "");
        }
        assert!(driver.calls().is_empty());
    }

    #[tokio::test]
    async fn test_disabled_engine_makes_no_calls() {
        let driver = Arc::new(MockDriver::default());
        let config = Arc::new(EngineConfig::disabled());
        let federator = QueryFederator::new(config.clone(), driver.clone());

        let payload = federator.perform_search("maize", &SearchOptions::default()).await;

        assert_eq!(payload.total, 0);
        assert!(!payload.engine.enabled);
        assert!(payload.engine.driver.is_none());
        assert!(driver.calls().is_empty());
        assert!(config.has_logged_disabled());
    }

    #[tokio::test]
    async fn test_limit_is_clamped_and_defaulted() {
        let cases = [(Some(0.0), 1), (Some(999.0), 50), (None, 5), (Some(f64::NAN), 5), (Some(7.9), 7)];

        for (limit, expected) in cases {
            let driver = Arc::new(MockDriver::default());
            let federator = federator(driver.clone());
            let mut options = SearchOptions::default();
            if let Some(limit) = limit {
                options = options.with_limit(limit);
            }

            federator.perform_search("maize", &options).await;

            let calls = driver.calls();
            assert_eq!(calls.len(), 2);
            assert!(
                calls.iter().all(|call| limit_of(call) == expected),
                "limit {:?} -> {:?}",
                limit,
                calls
            );
        }
    }

    #[tokio::test]
    async fn test_companies_scope_never_queries_exchanges() {
        let driver = Arc::new(MockDriver::default());
        let federator = federator(driver.clone());
        let options = SearchOptions::default()
            .with_scope(SearchScope::Companies)
            .with_locale("fr");

        federator.perform_search("  maize  ", &options).await;

        assert_eq!(
            driver.calls(),
            vec![SearchCall::Companies {
                query: "maize".to_string(),
                limit: 5,
                locale: Some("fr".to_string()),
            }]
        );
    }

    #[tokio::test]
    async fn test_exchanges_scope_never_queries_companies() {
        let driver = Arc::new(MockDriver::default());
        let federator = federator(driver.clone());
        let options = SearchOptions::default().with_scope(SearchScope::Exchanges);

        federator.perform_search("kivu", &options).await;

        assert_eq!(
            driver.calls(),
            vec![SearchCall::Exchanges {
                query: "kivu".to_string(),
                limit: 5,
            }]
        );
    }

    #[tokio::test]
    async fn test_merge_takes_max_took_and_sums_totals() {
        let driver = Arc::new(MockDriver {
            companies: Some(company_page(&[1, 2, 3], 10, 3)),
            exchanges: Some(SearchPage {
                hits: Vec::new(),
                took: 25,
                total: 2,
            }),
            ..Default::default()
        });
        let federator = federator(driver);

        let payload = federator.perform_search("acme", &SearchOptions::default()).await;

        assert_eq!(payload.took, 25);
        assert_eq!(payload.total, 5);
        assert_eq!(payload.companies.len(), 3);
        assert_eq!(payload.query, "acme");
        assert_eq!(payload.engine.driver, Some(DriverKind::Opensearch));
    }
}
