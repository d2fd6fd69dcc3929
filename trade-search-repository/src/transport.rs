//! HTTP transport shared by both drivers.
//!
//! Every failure (disabled engine, network error, non-2xx status, unparseable
//! body) is absorbed here: [`HttpTransport::send_request`] logs it and returns
//! `None`, so indexing can never fail the write that triggered it.

use std::sync::Arc;

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};
use url::form_urlencoded;

use crate::config::EngineConfig;
use crate::errors::SearchIndexError;

const APPLICATION_JSON: &str = "application/json";

/// Options of a single engine request.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub body: Option<Value>,
    pub expect_json: bool,
    pub query_params: Vec<(String, String)>,
}

impl RequestOptions {
    /// A request whose JSON response body is wanted.
    pub fn json(body: Option<Value>) -> Self {
        Self {
            body,
            expect_json: true,
            query_params: Vec::new(),
        }
    }

    /// A request whose response body is ignored.
    pub fn command(body: Option<Value>) -> Self {
        Self {
            body,
            expect_json: false,
            query_params: Vec::new(),
        }
    }

    /// Append a query parameter. Empty values are dropped when the URL is built.
    pub fn with_query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_params.push((key.into(), value.into()));
        self
    }
}

/// Thin HTTP client bound to the configured engine.
pub struct HttpTransport {
    client: Client,
    config: Arc<EngineConfig>,
}

impl HttpTransport {
    pub fn new(config: Arc<EngineConfig>) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Join the base URL and `path`, appending the non-empty query parameters.
    pub fn build_url(&self, path: &str, query_params: &[(String, String)]) -> String {
        let mut url = format!("{}{}", self.config.base_url, path);

        let mut serializer = form_urlencoded::Serializer::new(String::new());
        let mut has_params = false;
        for (key, value) in query_params.iter().filter(|(_, value)| !value.is_empty()) {
            serializer.append_pair(key, value);
            has_params = true;
        }

        if has_params {
            url.push('?');
            url.push_str(&serializer.finish());
        }
        url
    }

    /// Issue a request and surface every failure as an error.
    ///
    /// Returns `Ok(None)` for 204 responses and when no JSON body is expected.
    pub async fn execute<T>(
        &self,
        method: Method,
        path: &str,
        options: &RequestOptions,
    ) -> Result<Option<T>, SearchIndexError>
    where
        T: DeserializeOwned,
    {
        if !self.config.enabled {
            return Err(SearchIndexError::Disabled);
        }

        let url = self.build_url(path, &options.query_params);
        let mut request = self.client.request(method, &url);

        if let Some(body) = &options.body {
            let bytes = serde_json::to_vec(body)
                .map_err(|e| SearchIndexError::serialization(e.to_string()))?;
            request = request.header(CONTENT_TYPE, APPLICATION_JSON).body(bytes);
        }
        if options.expect_json {
            request = request.header(ACCEPT, APPLICATION_JSON);
        }
        if let Some((name, value)) = self.config.auth_header() {
            request = request.header(name, value);
        }

        let response = request
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchIndexError::status(status.as_u16(), body));
        }

        if status == StatusCode::NO_CONTENT || !options.expect_json {
            return Ok(None);
        }

        response
            .json::<T>()
            .await
            .map(Some)
            .map_err(|e| SearchIndexError::parse(e.to_string()))
    }

    /// Issue a request, logging and absorbing any failure.
    pub async fn send_request<T>(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> Option<T>
    where
        T: DeserializeOwned,
    {
        match self.execute(method.clone(), path, &options).await {
            Ok(value) => value,
            Err(e) => {
                self.log_failure(&method, path, &e);
                None
            }
        }
    }

    /// Issue a request whose body is irrelevant; returns whether it succeeded.
    pub async fn send_command(&self, method: Method, path: &str, body: Option<Value>) -> bool {
        match self
            .execute::<Value>(method.clone(), path, &RequestOptions::command(body))
            .await
        {
            Ok(_) => true,
            Err(e) => {
                self.log_failure(&method, path, &e);
                false
            }
        }
    }

    pub(crate) fn log_failure(&self, method: &Method, path: &str, error: &SearchIndexError) {
        match error {
            SearchIndexError::Disabled => {
                debug!(method = %method, path = %path, "Skipped request, search engine disabled")
            }
            _ => warn!(
                method = %method,
                path = %path,
                error = %error,
                "Search engine request failed"
            ),
        }
    }
}
