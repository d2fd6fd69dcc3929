//! Projection of store entities into search documents.
//!
//! Pure functions: no I/O, no logging. An entity that must not be searchable
//! projects to `None`.

pub use trade_search_shared::parse_number;

use trade_search_shared::{
    parse_timestamp, CompanyDocument, CompanyEntity, ExchangeDocument, ExchangeEntity,
    ProvinceSummary, Reference, RelationRecord, SectorSummary,
};

/// Summary of a province relation.
///
/// A bare id yields a summary with only `id` set; a populated object without
/// an id yields `None`.
pub fn to_province_summary(reference: &Reference<RelationRecord>) -> Option<ProvinceSummary> {
    match reference {
        Reference::Id(id) => Some(ProvinceSummary::from_id(id.clone())),
        Reference::Expanded(record) => Some(ProvinceSummary {
            id: record.id.clone()?,
            name: record.name.clone(),
            slug: record.slug.clone(),
            code: record.code.clone(),
        }),
    }
}

/// Summary of a sector relation. Same rules as [`to_province_summary`].
pub fn to_sector_summary(reference: &Reference<RelationRecord>) -> Option<SectorSummary> {
    match reference {
        Reference::Id(id) => Some(SectorSummary::from_id(id.clone())),
        Reference::Expanded(record) => Some(SectorSummary {
            id: record.id.clone()?,
            name: record.name.clone(),
            slug: record.slug.clone(),
        }),
    }
}

/// Trim every fragment, drop the empty ones and join the rest with single spaces.
pub fn build_search_text<'a, I>(fragments: I) -> String
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    fragments
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Project a company into its search document.
///
/// Returns `None` for an entity without an id, and for an entity whose
/// publication field is present but unset. An entity with no publication
/// field at all is treated as published.
pub fn to_company_document(entity: &CompanyEntity) -> Option<CompanyDocument> {
    if entity.published_at.is_draft() {
        return None;
    }
    let id = entity.id.clone()?;

    let province = entity.province.as_ref().and_then(to_province_summary);
    let sector = entity.sector.as_ref().and_then(to_sector_summary);

    let search_text = build_search_text([
        entity.name.as_deref(),
        entity.description.as_deref(),
        province.as_ref().and_then(|p| p.name.as_deref()),
        province.as_ref().and_then(|p| p.code.as_deref()),
        sector.as_ref().and_then(|s| s.name.as_deref()),
    ]);

    Some(CompanyDocument {
        id,
        slug: entity.slug.clone(),
        name: entity.name.clone(),
        description: entity.description.clone(),
        website: entity.website.clone(),
        country: entity.country.clone(),
        status: entity.status.clone(),
        verification_status: entity.verification_status.clone(),
        trust_score: entity.trust_score.as_ref().and_then(parse_number),
        capacities: entity.capacities.clone(),
        locale: entity.locale.clone(),
        published_at: entity.published_at.published_at().and_then(parse_timestamp),
        updated_at: entity.updated_at.as_deref().and_then(parse_timestamp),
        province,
        sector,
        search_text,
    })
}

/// Project an exchange into its search document. Only a missing id yields `None`.
pub fn to_exchange_document(entity: &ExchangeEntity) -> Option<ExchangeDocument> {
    let id = entity.id.clone()?;

    let source = entity.source_province.as_ref().and_then(to_province_summary);
    let target = entity.target_province.as_ref().and_then(to_province_summary);
    let value = entity.value.as_ref().and_then(parse_number);
    let value_text = value.map(|value| value.to_string());

    let search_text = build_search_text([
        source.as_ref().and_then(|p| p.name.as_deref()),
        target.as_ref().and_then(|p| p.name.as_deref()),
        source.as_ref().and_then(|p| p.code.as_deref()),
        target.as_ref().and_then(|p| p.code.as_deref()),
        value_text.as_deref(),
        entity.unit.as_deref(),
    ]);

    Some(ExchangeDocument {
        id,
        unit: entity.unit.clone(),
        value,
        source_province: source,
        target_province: target,
        search_text,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use trade_search_shared::EntityId;

    fn company(value: Value) -> CompanyEntity {
        serde_json::from_value(value).unwrap()
    }

    fn exchange(value: Value) -> ExchangeEntity {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_unpublished_company_projects_to_none() {
        let entity = company(json!({ "id": 1, "name": "Acme", "publishedAt": null }));
        assert!(to_company_document(&entity).is_none());
    }

    #[test]
    fn test_company_without_publication_field_is_indexable() {
        let entity = company(json!({ "id": 1, "name": "Acme" }));
        let doc = to_company_document(&entity).unwrap();
        assert_eq!(doc.id, EntityId::Number(1));
        assert!(doc.published_at.is_none());
    }

    #[test]
    fn test_published_company_keeps_timestamp() {
        let entity = company(json!({
            "id": 1,
            "publishedAt": "2024-03-01T10:00:00.000Z",
            "updatedAt": "not a date"
        }));
        let doc = to_company_document(&entity).unwrap();
        assert!(doc.published_at.is_some());
        assert!(doc.updated_at.is_none());
    }

    #[test]
    fn test_company_without_id_projects_to_none() {
        let entity = company(json!({ "name": "Acme" }));
        assert!(to_company_document(&entity).is_none());
    }

    #[test]
    fn test_company_search_text_order() {
        let entity = company(json!({
            "id": 4,
            "name": "  Acme Foods ",
            "description": "Maize flour",
            "province": { "id": 2, "name": "Nord-Kivu", "slug": "nord-kivu", "code": "NK" },
            "sector": { "id": 9, "name": "Agriculture", "slug": "agriculture" }
        }));
        let doc = to_company_document(&entity).unwrap();
        assert_eq!(doc.search_text, "Acme Foods Maize flour Nord-Kivu NK Agriculture");
        assert_eq!(doc.province.unwrap().slug.as_deref(), Some("nord-kivu"));
        assert_eq!(doc.sector.unwrap().name.as_deref(), Some("Agriculture"));
    }

    #[test]
    fn test_company_search_text_never_has_stray_whitespace() {
        let names = [None, Some(""), Some("  "), Some(" Acme ")];
        let descriptions = [None, Some("\tflour\n"), Some("")];
        let provinces = [
            json!(null),
            json!(3),
            json!({ "id": 3, "name": " ", "code": "KN " }),
        ];

        for name in names {
            for description in descriptions {
                for province in &provinces {
                    let entity = company(json!({
                        "id": 1,
                        "name": name,
                        "description": description,
                        "province": province,
                        "sector": { "id": 2, "name": "" }
                    }));
                    let text = to_company_document(&entity).unwrap().search_text;
                    assert!(!text.contains("  "), "double space in {:?}", text);
                    assert_eq!(text, text.trim(), "untrimmed {:?}", text);
                }
            }
        }
    }

    #[test]
    fn test_trust_score_coercion() {
        let cases = [
            (json!(4.5), Some(4.5)),
            (json!("3.25"), Some(3.25)),
            (json!(" 7 "), Some(7.0)),
            (json!("high"), None),
            (json!(""), None),
            (json!(true), None),
            (json!("NaN"), None),
            (json!("inf"), None),
        ];
        for (raw, expected) in cases {
            let entity = company(json!({ "id": 1, "trustScore": raw }));
            assert_eq!(
                to_company_document(&entity).unwrap().trust_score,
                expected,
                "trustScore {:?}",
                raw
            );
        }
    }

    #[test]
    fn test_bare_relations_project_to_id_only_summaries() {
        let entity = company(json!({ "id": 1, "name": "Acme", "province": 5, "sector": "s-1" }));
        let doc = to_company_document(&entity).unwrap();

        let province = doc.province.unwrap();
        assert_eq!(province.id, EntityId::Number(5));
        assert!(province.name.is_none() && province.slug.is_none() && province.code.is_none());

        let sector = doc.sector.unwrap();
        assert_eq!(sector.id, EntityId::from("s-1"));
        assert!(sector.name.is_none());
        assert_eq!(doc.search_text, "Acme");
    }

    #[test]
    fn test_expanded_relation_without_id_is_dropped() {
        let reference = Reference::Expanded(RelationRecord {
            id: None,
            name: Some("Orphan".to_string()),
            slug: None,
            code: None,
        });
        assert!(to_province_summary(&reference).is_none());
        assert!(to_sector_summary(&reference).is_none());
    }

    #[test]
    fn test_exchange_document() {
        let entity = exchange(json!({
            "id": 8,
            "unit": "tonnes",
            "value": "100",
            "sourceProvince": { "id": 1, "name": "Kinshasa", "code": "KN" },
            "targetProvince": { "id": 2, "name": "Kongo-Central", "code": "KC" }
        }));
        let doc = to_exchange_document(&entity).unwrap();
        assert_eq!(doc.value, Some(100.0));
        assert_eq!(doc.search_text, "Kinshasa Kongo-Central KN KC 100 tonnes");
    }

    #[test]
    fn test_exchange_fractional_value_and_missing_parts() {
        let entity = exchange(json!({ "id": 8, "value": 12.5, "targetProvince": 2 }));
        let doc = to_exchange_document(&entity).unwrap();
        assert_eq!(doc.search_text, "12.5");
        assert_eq!(doc.target_province.unwrap().id, EntityId::Number(2));
        assert!(doc.source_province.is_none());
    }

    #[test]
    fn test_exchange_without_id_projects_to_none() {
        let entity = exchange(json!({ "unit": "t" }));
        assert!(to_exchange_document(&entity).is_none());
    }

    #[test]
    fn test_build_search_text() {
        assert_eq!(build_search_text([None, Some(""), Some(" a "), Some("b")]), "a b");
        assert_eq!(build_search_text(Vec::<Option<&str>>::new()), "");
    }
}
