//! OpenSearch index configuration and mappings.
//!
//! Only the fields that queries depend on are mapped explicitly; everything
//! else is left to dynamic mapping.

use serde_json::{json, Value};

/// Index settings and mappings for the companies index.
///
/// `locale` must be a `keyword` for the exact `term` filter to match.
pub fn company_index_settings() -> Value {
    json!({
        "settings": {
            "number_of_shards": 1,
            "number_of_replicas": 1
        },
        "mappings": {
            "properties": {
                "id": { "type": "keyword" },
                "slug": { "type": "keyword" },
                "locale": { "type": "keyword" },
                "status": { "type": "keyword" },
                "verificationStatus": { "type": "keyword" },
                "name": { "type": "text" },
                "description": { "type": "text" },
                "searchText": { "type": "text" },
                "trustScore": { "type": "float" },
                "capacities": { "type": "object", "enabled": false },
                "publishedAt": { "type": "date" },
                "updatedAt": { "type": "date" },
                "province": {
                    "properties": {
                        "id": { "type": "keyword" },
                        "name": { "type": "text" },
                        "slug": { "type": "keyword" },
                        "code": { "type": "keyword" }
                    }
                },
                "sector": {
                    "properties": {
                        "id": { "type": "keyword" },
                        "name": { "type": "text" },
                        "slug": { "type": "keyword" }
                    }
                }
            }
        }
    })
}

/// Index settings and mappings for the exchanges index.
pub fn exchange_index_settings() -> Value {
    let province = json!({
        "properties": {
            "id": { "type": "keyword" },
            "name": { "type": "text" },
            "slug": { "type": "keyword" },
            "code": { "type": "keyword" }
        }
    });

    json!({
        "settings": {
            "number_of_shards": 1,
            "number_of_replicas": 1
        },
        "mappings": {
            "properties": {
                "id": { "type": "keyword" },
                "unit": { "type": "text" },
                "value": { "type": "double" },
                "searchText": { "type": "text" },
                "sourceProvince": province.clone(),
                "targetProvince": province
            }
        }
    })
}
