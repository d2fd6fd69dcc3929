//! Entity resolution.
//!
//! Lifecycle events carry either a full entity or a bare id. The resolver turns
//! both into a complete entity, re-fetching from the store when the input is
//! not already populated.

mod store;

pub use store::{ContentType, EntityStore, FetchRequest, PopulateRelation};

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use trade_search_shared::{CompanyEntity, EntityId, ExchangeEntity, Reference};

const PROVINCE_FIELDS: &[&str] = &["id", "name", "slug", "code"];
const SECTOR_FIELDS: &[&str] = &["id", "name", "slug"];

/// Entities that may carry an id.
pub trait Identified {
    fn entity_id(&self) -> Option<&EntityId>;
    fn locale(&self) -> Option<&str>;
}

impl Identified for CompanyEntity {
    fn entity_id(&self) -> Option<&EntityId> {
        self.id.as_ref()
    }

    fn locale(&self) -> Option<&str> {
        self.locale.as_deref()
    }
}

impl Identified for ExchangeEntity {
    fn entity_id(&self) -> Option<&EntityId> {
        self.id.as_ref()
    }

    fn locale(&self) -> Option<&str> {
        self.locale.as_deref()
    }
}

/// The id of a bare reference or of an expanded entity.
pub fn reference_id<T: Identified>(input: &Reference<T>) -> Option<EntityId> {
    match input {
        Reference::Id(id) => Some(id.clone()),
        Reference::Expanded(entity) => entity.entity_id().cloned(),
    }
}

/// Resolves lifecycle inputs into complete entities.
pub struct EntityResolver {
    store: Arc<dyn EntityStore>,
}

impl EntityResolver {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self { store }
    }

    /// Resolve a company.
    ///
    /// An input whose `province` is already populated is returned unchanged.
    /// Otherwise the company is fetched with `province` and `sector` populated,
    /// across every publication state so unpublishing is visible.
    pub async fn ensure_company_entity(
        &self,
        input: Reference<CompanyEntity>,
    ) -> Option<CompanyEntity> {
        if let Reference::Expanded(entity) = &input {
            if entity.province.as_ref().is_some_and(Reference::is_expanded) {
                return Some(entity.clone());
            }
        }

        let request = Self::fetch_request(ContentType::Company, &input)?
            .populate(PopulateRelation {
                relation: "province",
                fields: PROVINCE_FIELDS,
            })
            .populate(PopulateRelation {
                relation: "sector",
                fields: SECTOR_FIELDS,
            });
        self.fetch(request).await
    }

    /// Resolve an exchange. Either populated province counts as complete.
    pub async fn ensure_exchange_entity(
        &self,
        input: Reference<ExchangeEntity>,
    ) -> Option<ExchangeEntity> {
        if let Reference::Expanded(entity) = &input {
            let populated = [&entity.source_province, &entity.target_province]
                .into_iter()
                .any(|relation| relation.as_ref().is_some_and(Reference::is_expanded));
            if populated {
                return Some(entity.clone());
            }
        }

        let request = Self::fetch_request(ContentType::Exchange, &input)?
            .populate(PopulateRelation {
                relation: "sourceProvince",
                fields: PROVINCE_FIELDS,
            })
            .populate(PopulateRelation {
                relation: "targetProvince",
                fields: PROVINCE_FIELDS,
            });
        self.fetch(request).await
    }

    fn fetch_request<T: Identified>(
        content_type: ContentType,
        input: &Reference<T>,
    ) -> Option<FetchRequest> {
        let id = reference_id(input)?;
        let locale = match input {
            Reference::Expanded(entity) => entity.locale().map(str::to_string),
            Reference::Id(_) => None,
        };
        Some(FetchRequest::new(content_type, id).with_locale(locale))
    }

    async fn fetch<T: DeserializeOwned>(&self, request: FetchRequest) -> Option<T> {
        let content_type = request.content_type.as_str();
        let value = match self.store.find_one(&request).await {
            Ok(Some(value)) => value,
            Ok(None) => {
                debug!(content_type, id = %request.id, "Entity not found in store");
                return None;
            }
            Err(e) => {
                warn!(content_type, id = %request.id, error = %e, "Failed to fetch entity");
                return None;
            }
        };

        match serde_json::from_value(value) {
            Ok(entity) => Some(entity),
            Err(e) => {
                warn!(content_type, id = %request.id, error = %e, "Fetched entity has unexpected shape");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::StoreError;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::Mutex;

    struct MockStore {
        response: Result<Option<Value>, String>,
        requests: Mutex<Vec<FetchRequest>>,
    }

    impl MockStore {
        fn returning(value: Value) -> Self {
            Self {
                response: Ok(Some(value)),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                response: Err("connection reset".to_string()),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn requests(&self) -> Vec<FetchRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl EntityStore for MockStore {
        async fn find_one(&self, request: &FetchRequest) -> Result<Option<Value>, StoreError> {
            self.requests.lock().unwrap().push(request.clone());
            self.response.clone().map_err(StoreError::unavailable)
        }
    }

    fn company(value: Value) -> CompanyEntity {
        serde_json::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn test_expanded_company_is_returned_without_fetch() {
        let store = Arc::new(MockStore::returning(json!({})));
        let resolver = EntityResolver::new(store.clone());
        let input = company(json!({ "id": 1, "name": "Acme", "province": { "id": 2, "name": "Kivu" } }));

        let resolved = resolver
            .ensure_company_entity(Reference::Expanded(input.clone()))
            .await;

        assert_eq!(resolved, Some(input));
        assert!(store.requests().is_empty());
    }

    #[tokio::test]
    async fn test_bare_id_is_fetched_across_publication_states() {
        let store = Arc::new(MockStore::returning(json!({ "id": 3, "publishedAt": null })));
        let resolver = EntityResolver::new(store.clone());

        let resolved = resolver
            .ensure_company_entity(Reference::Id(EntityId::Number(3)))
            .await
            .unwrap();
        assert!(resolved.published_at.is_draft());

        let requests = store.requests();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.content_type, ContentType::Company);
        assert_eq!(request.id, EntityId::Number(3));
        assert_eq!(request.locale, None);
        let relations: Vec<_> = request.populate.iter().map(|p| p.relation).collect();
        assert_eq!(relations, vec!["province", "sector"]);
        assert_eq!(request.populate[0].fields, PROVINCE_FIELDS);
    }

    #[tokio::test]
    async fn test_partial_company_is_refetched_with_its_locale() {
        let store = Arc::new(MockStore::returning(json!({ "id": 4, "locale": "fr" })));
        let resolver = EntityResolver::new(store.clone());
        let input = company(json!({ "id": 4, "locale": "fr", "province": 9 }));

        resolver
            .ensure_company_entity(Reference::Expanded(input))
            .await
            .unwrap();

        assert_eq!(store.requests()[0].locale.as_deref(), Some("fr"));
    }

    #[tokio::test]
    async fn test_input_without_id_resolves_to_none() {
        let store = Arc::new(MockStore::returning(json!({ "id": 1 })));
        let resolver = EntityResolver::new(store.clone());

        let resolved = resolver
            .ensure_company_entity(Reference::Expanded(company(json!({ "name": "Acme" }))))
            .await;

        assert!(resolved.is_none());
        assert!(store.requests().is_empty());
    }

    #[tokio::test]
    async fn test_store_failure_is_absorbed() {
        let store = Arc::new(MockStore::failing());
        let resolver = EntityResolver::new(store.clone());

        let resolved = resolver
            .ensure_exchange_entity(Reference::Id(EntityId::from("x-1")))
            .await;

        assert!(resolved.is_none());
        assert_eq!(store.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_or_malformed_entity_resolves_to_none() {
        let resolver = EntityResolver::new(Arc::new(MockStore {
            response: Ok(None),
            requests: Mutex::new(Vec::new()),
        }));
        assert!(resolver
            .ensure_company_entity(Reference::Id(EntityId::Number(1)))
            .await
            .is_none());

        let resolver = EntityResolver::new(Arc::new(MockStore::returning(json!("not an object"))));
        assert!(resolver
            .ensure_company_entity(Reference::Id(EntityId::Number(1)))
            .await
            .is_none());
    }

    #[tokio::test]
    async fn test_exchange_with_populated_province_skips_fetch() {
        let store = Arc::new(MockStore::returning(json!({})));
        let resolver = EntityResolver::new(store.clone());
        let input: ExchangeEntity = serde_json::from_value(json!({
            "id": 5,
            "sourceProvince": 1,
            "targetProvince": { "id": 2, "name": "Kasai" }
        }))
        .unwrap();

        let resolved = resolver
            .ensure_exchange_entity(Reference::Expanded(input.clone()))
            .await;

        assert_eq!(resolved, Some(input));
        assert!(store.requests().is_empty());
    }

    #[tokio::test]
    async fn test_exchange_fetch_populates_both_provinces() {
        let store = Arc::new(MockStore::returning(json!({ "id": 5 })));
        let resolver = EntityResolver::new(store.clone());

        resolver
            .ensure_exchange_entity(Reference::Id(EntityId::Number(5)))
            .await
            .unwrap();

        let request = &store.requests()[0];
        assert_eq!(request.content_type, ContentType::Exchange);
        let relations: Vec<_> = request.populate.iter().map(|p| p.relation).collect();
        assert_eq!(relations, vec!["sourceProvince", "targetProvince"]);
    }

    #[test]
    fn test_reference_id() {
        assert_eq!(
            reference_id::<CompanyEntity>(&Reference::Id(EntityId::Number(1))),
            Some(EntityId::Number(1))
        );
        assert_eq!(
            reference_id(&Reference::Expanded(company(json!({ "id": "c-1" })))),
            Some(EntityId::from("c-1"))
        );
        assert_eq!(reference_id(&Reference::Expanded(CompanyEntity::default())), None);
    }
}
