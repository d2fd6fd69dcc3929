//! # Trade Search Shared
//!
//! This crate defines the data structures shared across the trade search layer:
//! the entity shapes handed over by the content store, the flat documents sent to
//! the search engine, and the payload returned by federated searches.

pub mod types;

pub use types::engine::{DriverKind, IndexNames, SearchEngineInfo};
pub use types::entity::{
    CompanyEntity, EntityId, ExchangeEntity, Publication, Reference, RelationRecord,
};
pub use types::entity_document::{
    parse_timestamp, CompanyDocument, ExchangeDocument, ProvinceSummary, SectorSummary,
};
pub use types::lenient::{
    lenient, lenient_f64, lenient_string, lenient_text, lenient_timestamp, parse_number,
};
pub use types::search_query::{SearchOptions, SearchScope};
pub use types::search_result::{HighlightMap, SearchHit, SearchPage, SearchResultPayload};
