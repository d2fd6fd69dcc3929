//! The persistence seam the resolver reads entities through.

use async_trait::async_trait;
use serde_json::Value;
use trade_search_shared::EntityId;

use crate::errors::StoreError;

/// Content types the search layer indexes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    Company,
    Exchange,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Company => "company",
            Self::Exchange => "exchange",
        }
    }
}

/// A relation to populate, with the fields to select on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PopulateRelation {
    pub relation: &'static str,
    pub fields: &'static [&'static str],
}

/// A request for a single entity by id.
///
/// Drafts and published entries alike must be returned so that an
/// unpublished entity can still be resolved and removed from the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub content_type: ContentType,
    pub id: EntityId,
    pub populate: Vec<PopulateRelation>,
    pub locale: Option<String>,
}

impl FetchRequest {
    pub fn new(content_type: ContentType, id: EntityId) -> Self {
        Self {
            content_type,
            id,
            populate: Vec::new(),
            locale: None,
        }
    }

    pub fn populate(mut self, relation: PopulateRelation) -> Self {
        self.populate.push(relation);
        self
    }

    pub fn with_locale(mut self, locale: Option<String>) -> Self {
        self.locale = locale;
        self
    }
}

/// Fetches one entity by id with the named relations populated.
///
/// `Ok(None)` means the entity does not exist.
#[async_trait]
pub trait EntityStore: Send + Sync {
    async fn find_one(&self, request: &FetchRequest) -> Result<Option<Value>, StoreError>;
}
