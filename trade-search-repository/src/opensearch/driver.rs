//! OpenSearch driver implementation.
//!
//! Documents are written with `PUT /{index}/_doc/{id}` (create-or-replace) and
//! searched with a `bool` query: `must` holds the text match, `filter` the
//! optional locale term.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::{debug, warn};
use trade_search_shared::{
    CompanyDocument, DriverKind, EntityId, ExchangeDocument, SearchHit, SearchPage,
};

use crate::interfaces::SearchDriver;
use crate::opensearch::index_config::{company_index_settings, exchange_index_settings};
use crate::transport::{HttpTransport, RequestOptions};
use crate::types::IndexTarget;
use crate::utils::{self, COMPANY_HIGHLIGHT_FIELDS, EXCHANGE_HIGHLIGHT_FIELDS};

/// Boosted fields matched by company searches.
const COMPANY_MATCH_FIELDS: &[&str] = &[
    "name^3",
    "description^2",
    "province.name^2",
    "sector.name",
    "searchText",
];

/// Boosted fields matched by exchange searches.
const EXCHANGE_MATCH_FIELDS: &[&str] = &[
    "sourceProvince.name^2",
    "targetProvince.name^2",
    "unit",
    "searchText",
];

#[derive(Debug, Deserialize)]
struct OpenSearchResponse {
    took: Option<u64>,
    hits: Option<HitsEnvelope>,
}

#[derive(Debug, Deserialize)]
struct HitsEnvelope {
    total: Option<Value>,
    #[serde(default)]
    hits: Vec<RawHit>,
}

#[derive(Debug, Deserialize)]
struct RawHit {
    #[serde(rename = "_source")]
    source: Option<Value>,
    highlight: Option<BTreeMap<String, Vec<String>>>,
}

/// Driver for OpenSearch-class engines.
pub struct OpenSearchDriver {
    transport: Arc<HttpTransport>,
}

impl OpenSearchDriver {
    pub fn new(transport: Arc<HttpTransport>) -> Self {
        Self { transport }
    }

    fn index_name(&self, target: IndexTarget) -> &str {
        self.transport.config().index_name(target)
    }

    fn document_path(&self, target: IndexTarget, id: &EntityId) -> String {
        format!("/{}/_doc/{}", self.index_name(target), utils::id_segment(id))
    }

    /// Build the body of a search request.
    pub(crate) fn search_body(
        query: &str,
        limit: usize,
        locale: Option<&str>,
        match_fields: &[&str],
        highlight_fields: &[&str],
    ) -> Value {
        let must = if query.is_empty() {
            json!({ "match_all": {} })
        } else {
            json!({
                "multi_match": {
                    "query": query,
                    "fields": match_fields,
                    "fuzziness": "AUTO"
                }
            })
        };

        let filter: Vec<Value> = locale
            .map(|locale| json!({ "term": { "locale": locale } }))
            .into_iter()
            .collect();

        let highlight: Map<String, Value> = highlight_fields
            .iter()
            .map(|field| (field.to_string(), json!({})))
            .collect();

        json!({
            "size": limit,
            "query": {
                "bool": {
                    "must": [must],
                    "filter": filter
                }
            },
            "highlight": { "fields": highlight }
        })
    }

    /// Read `hits.total`, which is either a bare number or `{ "value": n }`.
    pub(crate) fn parse_total(total: Option<&Value>) -> Option<u64> {
        match total? {
            Value::Number(count) => count.as_u64(),
            Value::Object(fields) => fields.get("value").and_then(Value::as_u64),
            _ => None,
        }
    }

    fn parse_page<D>(response: OpenSearchResponse) -> SearchPage<D>
    where
        D: DeserializeOwned,
    {
        let took = response.took.unwrap_or(0);
        let Some(envelope) = response.hits else {
            return SearchPage {
                hits: Vec::new(),
                took,
                total: 0,
            };
        };

        let returned = envelope.hits.len() as u64;
        let total = Self::parse_total(envelope.total.as_ref()).unwrap_or(returned);
        let hits = envelope
            .hits
            .into_iter()
            .filter_map(|hit| {
                let highlights = hit.highlight.map(utils::first_snippets).unwrap_or_default();
                hit.source
                    .and_then(utils::decode_document::<D>)
                    .map(|document| SearchHit::new(document, highlights))
            })
            .collect();

        SearchPage { hits, took, total }
    }

    async fn search<D>(&self, target: IndexTarget, body: Value) -> SearchPage<D>
    where
        D: DeserializeOwned,
    {
        let path = format!("/{}/_search", self.index_name(target));
        match self
            .transport
            .send_request::<OpenSearchResponse>(Method::POST, &path, RequestOptions::json(Some(body)))
            .await
        {
            Some(response) => Self::parse_page(response),
            None => SearchPage::empty(),
        }
    }

    async fn ensure_index(&self, target: IndexTarget, settings: Value) -> bool {
        let path = format!("/{}", self.index_name(target));
        match self
            .transport
            .execute::<Value>(Method::HEAD, &path, &RequestOptions::command(None))
            .await
        {
            Ok(_) => {
                debug!(index = %self.index_name(target), "Index already exists");
                true
            }
            Err(e) if e.is_not_found() => {
                self.transport
                    .send_command(Method::PUT, &path, Some(settings))
                    .await
            }
            Err(e) => {
                warn!(index = %self.index_name(target), error = %e, "Failed to check index");
                false
            }
        }
    }
}

#[async_trait]
impl SearchDriver for OpenSearchDriver {
    fn kind(&self) -> DriverKind {
        DriverKind::Opensearch
    }

    async fn prepare_indexes(&self) -> bool {
        let companies = self
            .ensure_index(IndexTarget::Companies, company_index_settings())
            .await;
        let exchanges = self
            .ensure_index(IndexTarget::Exchanges, exchange_index_settings())
            .await;
        companies && exchanges
    }

    async fn upsert(&self, target: IndexTarget, id: &EntityId, document: Value) -> bool {
        let path = self.document_path(target, id);
        self.transport
            .send_command(Method::PUT, &path, Some(document))
            .await
    }

    async fn delete(&self, target: IndexTarget, id: &EntityId) -> bool {
        let path = self.document_path(target, id);
        match self
            .transport
            .execute::<Value>(Method::DELETE, &path, &RequestOptions::command(None))
            .await
        {
            Ok(_) => true,
            // The document may never have been indexed.
            Err(e) if e.is_not_found() => true,
            Err(e) => {
                self.transport.log_failure(&Method::DELETE, &path, &e);
                false
            }
        }
    }

    async fn search_companies(
        &self,
        query: &str,
        limit: usize,
        locale: Option<&str>,
    ) -> SearchPage<CompanyDocument> {
        let body = Self::search_body(
            query,
            limit,
            locale,
            COMPANY_MATCH_FIELDS,
            COMPANY_HIGHLIGHT_FIELDS,
        );
        self.search(IndexTarget::Companies, body).await
    }

    async fn search_exchanges(&self, query: &str, limit: usize) -> SearchPage<ExchangeDocument> {
        let body = Self::search_body(
            query,
            limit,
            None,
            EXCHANGE_MATCH_FIELDS,
            EXCHANGE_HIGHLIGHT_FIELDS,
        );
        self.search(IndexTarget::Exchanges, body).await
    }
}
