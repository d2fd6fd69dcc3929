//! Engine configuration.
//!
//! Resolved once at startup from environment-style inputs and shared read-only
//! afterwards. A missing base URL is not an error: the layer simply runs
//! disabled.

use std::env;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::info;
use url::Url;
use trade_search_shared::types::engine::{DEFAULT_COMPANIES_INDEX, DEFAULT_EXCHANGES_INDEX};
use trade_search_shared::{DriverKind, IndexNames, SearchEngineInfo};

use crate::types::IndexTarget;

/// Driver name (`meilisearch` or `opensearch`).
pub const ENV_DRIVER: &str = "SEARCH_ENGINE_DRIVER";
/// Base URL of the engine.
pub const ENV_URL: &str = "SEARCH_ENGINE_URL";
/// Fallback for [`ENV_URL`].
pub const ENV_HOST: &str = "SEARCH_ENGINE_HOST";
/// API key sent in the auth header.
pub const ENV_API_KEY: &str = "SEARCH_ENGINE_API_KEY";
/// Custom auth header name.
pub const ENV_AUTH_HEADER: &str = "SEARCH_ENGINE_AUTH_HEADER";
/// Custom auth scheme; may be set to an empty value.
pub const ENV_AUTH_SCHEME: &str = "SEARCH_ENGINE_AUTH_SCHEME";
/// Custom companies index name.
pub const ENV_INDEX_COMPANIES: &str = "SEARCH_INDEX_COMPANIES";
/// Custom exchanges index name.
pub const ENV_INDEX_EXCHANGES: &str = "SEARCH_INDEX_EXCHANGES";

const MEILISEARCH_AUTH_HEADER: &str = "X-Meili-API-Key";
const OPENSEARCH_AUTH_HEADER: &str = "Authorization";
const OPENSEARCH_AUTH_SCHEME: &str = "Bearer";

/// Process-wide search engine configuration.
///
/// `enabled` is true iff `base_url` is non-empty; every other field is
/// meaningless when it is false.
#[derive(Debug)]
pub struct EngineConfig {
    pub enabled: bool,
    pub driver: DriverKind,
    /// Base URL without a trailing slash.
    pub base_url: String,
    pub api_key: Option<String>,
    pub auth_header_name: String,
    /// Prefix of the auth header value; empty means the raw key is sent.
    pub auth_scheme: String,
    pub index_names: IndexNames,
    disabled_warned: AtomicBool,
}

impl EngineConfig {
    /// Create a configuration with the driver's default auth settings and
    /// index names.
    pub fn new(driver: DriverKind, base_url: impl Into<String>) -> Self {
        let base_url = normalize_base_url(&base_url.into());
        Self {
            enabled: !base_url.is_empty(),
            driver,
            base_url,
            api_key: None,
            auth_header_name: default_auth_header(driver).to_string(),
            auth_scheme: default_auth_scheme(driver).to_string(),
            index_names: IndexNames::default(),
            disabled_warned: AtomicBool::new(false),
        }
    }

    /// A configuration with no engine.
    pub fn disabled() -> Self {
        Self::new(DriverKind::default(), "")
    }

    /// Resolve the configuration from the process environment.
    ///
    /// See the `ENV_*` constants for the variables read.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Resolve the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).map(|value| value.trim().to_string());
        let read_non_empty = |key: &str| read(key).filter(|value| !value.is_empty());

        let driver = DriverKind::parse(&read(ENV_DRIVER).unwrap_or_default());
        let base_url = read_non_empty(ENV_URL)
            .or_else(|| read_non_empty(ENV_HOST))
            .unwrap_or_default();

        let mut config = Self::new(driver, base_url);
        config.api_key = read_non_empty(ENV_API_KEY);
        if let Some(header) = read_non_empty(ENV_AUTH_HEADER) {
            config.auth_header_name = header;
        }
        if let Some(scheme) = read(ENV_AUTH_SCHEME) {
            config.auth_scheme = scheme;
        }
        config.index_names = IndexNames {
            companies: read_non_empty(ENV_INDEX_COMPANIES)
                .unwrap_or_else(|| DEFAULT_COMPANIES_INDEX.to_string()),
            exchanges: read_non_empty(ENV_INDEX_EXCHANGES)
                .unwrap_or_else(|| DEFAULT_EXCHANGES_INDEX.to_string()),
        };
        config
    }

    /// Set the API key.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        let api_key = api_key.into();
        self.api_key = if api_key.trim().is_empty() {
            None
        } else {
            Some(api_key)
        };
        self
    }

    /// Set custom index names.
    pub fn with_index_names(mut self, index_names: IndexNames) -> Self {
        self.index_names = index_names;
        self
    }

    /// Name of the index backing `target`.
    pub fn index_name(&self, target: IndexTarget) -> &str {
        match target {
            IndexTarget::Companies => &self.index_names.companies,
            IndexTarget::Exchanges => &self.index_names.exchanges,
        }
    }

    /// The auth header to attach, if an API key is configured.
    pub fn auth_header(&self) -> Option<(&str, String)> {
        let api_key = self.api_key.as_deref()?;
        let value = if self.auth_scheme.is_empty() {
            api_key.to_string()
        } else {
            format!("{} {}", self.auth_scheme, api_key)
        };
        Some((self.auth_header_name.as_str(), value))
    }

    /// Static engine status for reporting.
    pub fn engine_info(&self) -> SearchEngineInfo {
        SearchEngineInfo {
            enabled: self.enabled,
            driver: self.enabled.then_some(self.driver),
            index_names: self.index_names.clone(),
        }
    }

    /// The base URL without credentials or query string, safe to log.
    pub fn redacted_base_url(&self) -> String {
        let Ok(mut url) = Url::parse(&self.base_url) else {
            return "<unparseable>".to_string();
        };
        if url.cannot_be_a_base() {
            return "<unparseable>".to_string();
        }
        // Only fails for cannot-be-a-base URLs, excluded above.
        let _ = url.set_username("");
        let _ = url.set_password(None);
        url.set_query(None);
        url.set_fragment(None);
        url.as_str().trim_end_matches('/').to_string()
    }

    /// Log that the engine is disabled, at most once per configuration.
    pub fn log_disabled_once(&self) {
        if !self.disabled_warned.swap(true, Ordering::Relaxed) {
            info!("Search engine is not configured; indexing and search are disabled");
        }
    }

    /// Returns true once the disabled notice has been logged.
    pub fn has_logged_disabled(&self) -> bool {
        self.disabled_warned.load(Ordering::Relaxed)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::disabled()
    }
}

fn normalize_base_url(base_url: &str) -> String {
    base_url.trim().trim_end_matches('/').to_string()
}

fn default_auth_header(driver: DriverKind) -> &'static str {
    match driver {
        DriverKind::Meilisearch => MEILISEARCH_AUTH_HEADER,
        DriverKind::Opensearch => OPENSEARCH_AUTH_HEADER,
    }
}

fn default_auth_scheme(driver: DriverKind) -> &'static str {
    match driver {
        DriverKind::Meilisearch => "",
        DriverKind::Opensearch => OPENSEARCH_AUTH_SCHEME,
    }
}
