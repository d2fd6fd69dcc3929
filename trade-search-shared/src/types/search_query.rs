//! Search query types.
//!
//! This module defines the options a controller passes to a federated search.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::types::lenient::{lenient_f64, lenient_string};

/// Number of hits per index when no limit is given.
pub const DEFAULT_LIMIT: usize = 5;

/// Smallest accepted limit.
pub const MIN_LIMIT: usize = 1;

/// Largest accepted limit.
pub const MAX_LIMIT: usize = 50;

/// Which indexes a search runs against.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SearchScope {
    Companies,
    Exchanges,
    /// Both indexes. This is the default scope.
    #[default]
    All,
}

impl SearchScope {
    /// Parse the `type` request parameter. Unknown or missing values mean `All`.
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("companies") => Self::Companies,
            Some("exchanges") => Self::Exchanges,
            _ => Self::All,
        }
    }

    pub fn includes_companies(&self) -> bool {
        matches!(self, Self::Companies | Self::All)
    }

    pub fn includes_exchanges(&self) -> bool {
        matches!(self, Self::Exchanges | Self::All)
    }
}

// Same fallback as `parse`: anything unrecognised is `All`.
impl<'de> Deserialize<'de> for SearchScope {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::parse(value.as_str()))
    }
}

/// Options of a federated search.
///
/// Deserialization never rejects a request: a non-numeric limit is absent and
/// an unknown `type` searches both indexes.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SearchOptions {
    /// Requested number of hits per index, before clamping.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub limit: Option<f64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub locale: Option<String>,
    #[serde(default, rename = "type")]
    pub scope: SearchScope,
}

impl SearchOptions {
    /// Build options from raw request parameters.
    ///
    /// A limit that does not parse as a number is treated as absent.
    pub fn from_params(limit: Option<&str>, locale: Option<&str>, scope: Option<&str>) -> Self {
        Self {
            limit: limit.and_then(|l| l.trim().parse::<f64>().ok()),
            locale: locale.map(str::to_string),
            scope: SearchScope::parse(scope),
        }
    }

    /// Set the requested limit.
    pub fn with_limit(mut self, limit: f64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Set the locale filter.
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    /// Set the index scope.
    pub fn with_scope(mut self, scope: SearchScope) -> Self {
        self.scope = scope;
        self
    }

    /// The limit actually used: truncated, clamped to `[1, 50]`, and `5` when
    /// unset or not finite.
    pub fn resolved_limit(&self) -> usize {
        match self.limit {
            Some(limit) if limit.is_finite() => {
                limit.trunc().clamp(MIN_LIMIT as f64, MAX_LIMIT as f64) as usize
            }
            _ => DEFAULT_LIMIT,
        }
    }

    /// The locale filter, if it is non-blank.
    pub fn resolved_locale(&self) -> Option<&str> {
        self.locale
            .as_deref()
            .map(str::trim)
            .filter(|locale| !locale.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_parse() {
        assert_eq!(SearchScope::parse(Some("companies")), SearchScope::Companies);
        assert_eq!(SearchScope::parse(Some("Exchanges")), SearchScope::Exchanges);
        assert_eq!(SearchScope::parse(Some("all")), SearchScope::All);
        assert_eq!(SearchScope::parse(Some("people")), SearchScope::All);
        assert_eq!(SearchScope::parse(None), SearchScope::All);
    }

    #[test]
    fn test_scope_includes() {
        assert!(SearchScope::Companies.includes_companies());
        assert!(!SearchScope::Companies.includes_exchanges());
        assert!(!SearchScope::Exchanges.includes_companies());
        assert!(SearchScope::All.includes_companies());
        assert!(SearchScope::All.includes_exchanges());
    }

    #[test]
    fn test_limit_defaults_to_five() {
        assert_eq!(SearchOptions::default().resolved_limit(), 5);
        assert_eq!(
            SearchOptions::default().with_limit(f64::NAN).resolved_limit(),
            5
        );
        assert_eq!(
            SearchOptions::default()
                .with_limit(f64::INFINITY)
                .resolved_limit(),
            5
        );
    }

    #[test]
    fn test_limit_clamped() {
        assert_eq!(SearchOptions::default().with_limit(0.0).resolved_limit(), 1);
        assert_eq!(SearchOptions::default().with_limit(-3.0).resolved_limit(), 1);
        assert_eq!(
            SearchOptions::default().with_limit(999.0).resolved_limit(),
            50
        );
        assert_eq!(SearchOptions::default().with_limit(12.9).resolved_limit(), 12);
    }

    #[test]
    fn test_from_params() {
        let options = SearchOptions::from_params(Some("20"), Some("fr"), Some("exchanges"));
        assert_eq!(options.resolved_limit(), 20);
        assert_eq!(options.resolved_locale(), Some("fr"));
        assert_eq!(options.scope, SearchScope::Exchanges);

        let options = SearchOptions::from_params(Some("many"), Some("  "), None);
        assert_eq!(options.limit, None);
        assert_eq!(options.resolved_limit(), 5);
        assert_eq!(options.resolved_locale(), None);
        assert_eq!(options.scope, SearchScope::All);
    }

    #[test]
    fn test_options_from_loose_json() {
        let options: SearchOptions =
            serde_json::from_value(serde_json::json!({ "limit": "20", "type": "people" })).unwrap();
        assert_eq!(options.resolved_limit(), 20);
        assert_eq!(options.scope, SearchScope::All);

        let options: SearchOptions = serde_json::from_value(
            serde_json::json!({ "limit": "many", "locale": "fr", "type": "Companies" }),
        )
        .unwrap();
        assert_eq!(options.limit, None);
        assert_eq!(options.resolved_limit(), 5);
        assert_eq!(options.resolved_locale(), Some("fr"));
        assert_eq!(options.scope, SearchScope::Companies);

        let options: SearchOptions =
            serde_json::from_value(serde_json::json!({ "limit": 7, "type": 3 })).unwrap();
        assert_eq!(options.resolved_limit(), 7);
        assert_eq!(options.scope, SearchScope::All);

        let options: SearchOptions = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(options, SearchOptions::default());
    }
}
