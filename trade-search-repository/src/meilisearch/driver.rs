//! Meilisearch driver implementation.
//!
//! Documents are written as single-element arrays with string ids, which the
//! engine treats as create-or-replace. Highlights come from the `_formatted`
//! copy of each hit.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;
use trade_search_shared::{
    CompanyDocument, DriverKind, EntityId, ExchangeDocument, SearchHit, SearchPage,
};

use crate::interfaces::SearchDriver;
use crate::transport::{HttpTransport, RequestOptions};
use crate::types::IndexTarget;
use crate::utils::{self, COMPANY_HIGHLIGHT_FIELDS, EXCHANGE_HIGHLIGHT_FIELDS};

const FORMATTED_KEY: &str = "_formatted";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MeiliSearchResponse {
    #[serde(default)]
    hits: Vec<Value>,
    estimated_total_hits: Option<u64>,
    processing_time_ms: Option<u64>,
}

/// Driver for Meilisearch-class engines.
pub struct MeilisearchDriver {
    transport: Arc<HttpTransport>,
}

impl MeilisearchDriver {
    pub fn new(transport: Arc<HttpTransport>) -> Self {
        Self { transport }
    }

    fn index_name(&self, target: IndexTarget) -> &str {
        self.transport.config().index_name(target)
    }

    /// Build the body of a search request.
    pub(crate) fn search_body(
        query: &str,
        limit: usize,
        locale: Option<&str>,
        highlight_fields: &[&str],
    ) -> Value {
        let mut body = json!({
            "q": query,
            "limit": limit,
            "attributesToHighlight": highlight_fields,
        });
        if let Some(locale) = locale {
            body["filter"] = json!([locale_filter(locale)]);
        }
        body
    }

    /// Copy of the document with its id coerced to a string.
    pub(crate) fn with_string_id(id: &EntityId, mut document: Value) -> Value {
        if let Some(fields) = document.as_object_mut() {
            fields.insert("id".to_string(), Value::String(id.to_string()));
        }
        document
    }

    fn parse_page<D>(response: MeiliSearchResponse, highlight_fields: &[&str]) -> SearchPage<D>
    where
        D: DeserializeOwned,
    {
        let returned = response.hits.len() as u64;
        let hits: Vec<SearchHit<D>> = response
            .hits
            .into_iter()
            .filter_map(|mut hit| {
                let formatted = hit
                    .as_object_mut()
                    .and_then(|fields| fields.remove(FORMATTED_KEY));
                let highlights = formatted
                    .map(|formatted| utils::collect_highlights(&formatted, highlight_fields))
                    .unwrap_or_default();
                utils::decode_document(hit).map(|document| SearchHit::new(document, highlights))
            })
            .collect();

        SearchPage {
            hits,
            took: response.processing_time_ms.unwrap_or(0),
            total: response.estimated_total_hits.unwrap_or(returned),
        }
    }

    async fn search<D>(
        &self,
        target: IndexTarget,
        query: &str,
        limit: usize,
        locale: Option<&str>,
        highlight_fields: &[&str],
    ) -> SearchPage<D>
    where
        D: DeserializeOwned,
    {
        let path = format!("/indexes/{}/search", self.index_name(target));
        let body = Self::search_body(query, limit, locale, highlight_fields);

        match self
            .transport
            .send_request::<MeiliSearchResponse>(Method::POST, &path, RequestOptions::json(Some(body)))
            .await
        {
            Some(response) => Self::parse_page(response, highlight_fields),
            None => SearchPage::empty(),
        }
    }
}

fn locale_filter(locale: &str) -> String {
    format!("locale = \"{}\"", locale.replace('\\', "\\\\").replace('"', "\\\""))
}

#[async_trait]
impl SearchDriver for MeilisearchDriver {
    fn kind(&self) -> DriverKind {
        DriverKind::Meilisearch
    }

    async fn prepare_indexes(&self) -> bool {
        let mut ready = true;
        for target in [IndexTarget::Companies, IndexTarget::Exchanges] {
            let index = self.index_name(target).to_string();

            // Meilisearch queues index creation as a task; an existing index
            // only fails that task, not this request.
            ready &= self
                .transport
                .send_command(
                    Method::POST,
                    "/indexes",
                    Some(json!({ "uid": index, "primaryKey": "id" })),
                )
                .await;

            if target == IndexTarget::Companies {
                ready &= self
                    .transport
                    .send_command(
                        Method::PATCH,
                        &format!("/indexes/{}/settings", index),
                        Some(json!({ "filterableAttributes": ["locale"] })),
                    )
                    .await;
            }
        }
        debug!(ready = ready, "Prepared Meilisearch indexes");
        ready
    }

    async fn upsert(&self, target: IndexTarget, id: &EntityId, document: Value) -> bool {
        let path = format!("/indexes/{}/documents", self.index_name(target));
        let body = Value::Array(vec![Self::with_string_id(id, document)]);
        self.transport
            .send_command(Method::POST, &path, Some(body))
            .await
    }

    async fn delete(&self, target: IndexTarget, id: &EntityId) -> bool {
        let path = format!(
            "/indexes/{}/documents/{}",
            self.index_name(target),
            utils::id_segment(id)
        );
        self.transport.send_command(Method::DELETE, &path, None).await
    }

    async fn search_companies(
        &self,
        query: &str,
        limit: usize,
        locale: Option<&str>,
    ) -> SearchPage<CompanyDocument> {
        self.search(
            IndexTarget::Companies,
            query,
            limit,
            locale,
            COMPANY_HIGHLIGHT_FIELDS,
        )
        .await
    }

    async fn search_exchanges(&self, query: &str, limit: usize) -> SearchPage<ExchangeDocument> {
        self.search(
            IndexTarget::Exchanges,
            query,
            limit,
            None,
            EXCHANGE_HIGHLIGHT_FIELDS,
        )
        .await
    }
}
