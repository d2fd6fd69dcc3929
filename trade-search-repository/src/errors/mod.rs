//! Error types for the trade search repository.
//!
//! These errors never leave the transport boundary: drivers log them and
//! degrade to empty or unacknowledged results.

mod search_index_error;

pub use search_index_error::SearchIndexError;
