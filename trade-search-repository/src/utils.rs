//! Helpers shared by the drivers for reading engine responses.

use std::collections::BTreeMap;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;
use trade_search_shared::{EntityId, HighlightMap};

// RFC 3986 unreserved characters stay as-is.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Company fields highlighted in search results.
pub const COMPANY_HIGHLIGHT_FIELDS: &[&str] =
    &["name", "description", "province.name", "sector.name"];

/// Exchange fields highlighted in search results.
pub const EXCHANGE_HIGHLIGHT_FIELDS: &[&str] =
    &["sourceProvince.name", "targetProvince.name", "unit"];

/// Resolve a dotted path (`province.name`) inside a JSON object.
pub fn lookup_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(value, |current, key| current.get(key))
}

/// Build a highlight map from a formatted copy of a document, keeping only the
/// requested fields that hold a non-empty string.
pub fn collect_highlights(formatted: &Value, fields: &[&str]) -> HighlightMap {
    fields
        .iter()
        .filter_map(|field| {
            lookup_path(formatted, field)
                .and_then(Value::as_str)
                .filter(|snippet| !snippet.is_empty())
                .map(|snippet| (field.to_string(), snippet.to_string()))
        })
        .collect()
}

/// Keep the first non-empty snippet of each highlighted field.
pub fn first_snippets(highlight: BTreeMap<String, Vec<String>>) -> HighlightMap {
    highlight
        .into_iter()
        .filter_map(|(field, snippets)| {
            snippets
                .into_iter()
                .find(|snippet| !snippet.is_empty())
                .map(|snippet| (field, snippet))
        })
        .collect()
}

/// Encode a document id for use as a single URL path segment.
pub fn id_segment(id: &EntityId) -> String {
    utf8_percent_encode(&id.to_string(), PATH_SEGMENT).to_string()
}

/// Decode a stored document, skipping it when its shape does not match.
pub fn decode_document<D>(source: Value) -> Option<D>
where
    D: DeserializeOwned,
{
    match serde_json::from_value(source) {
        Ok(document) => Some(document),
        Err(e) => {
            debug!(error = %e, "Skipping search hit with unexpected shape");
            None
        }
    }
}
