//! Error types for the trade search service layer.
//!
//! None of these reach the lifecycle write path: store errors are absorbed by
//! the resolver and sync failures are reported as outcomes. Only the admin
//! reindex path returns [`SyncError`].

use thiserror::Error;

/// Errors raised by an [`EntityStore`](crate::resolver::EntityStore) implementation.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The store could not be reached.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// The store rejected or failed the query.
    #[error("Query error: {0}")]
    QueryError(String),
}

impl StoreError {
    /// Create an unavailable error.
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }
}

/// Errors from the batch reindex path.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SyncError {
    /// The batch is larger than the configured maximum.
    #[error("Batch size {size} exceeds maximum of {max}")]
    BatchSizeExceeded { size: usize, max: usize },
}
