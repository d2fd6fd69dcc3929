//! Search index error types.

use thiserror::Error;

/// Errors from a single exchange with the search engine.
#[derive(Debug, Clone, Error)]
pub enum SearchIndexError {
    /// No engine is configured; no request was attempted.
    #[error("Search engine is disabled")]
    Disabled,

    /// The request could not be sent or no response was received.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The engine answered with a non-success status.
    #[error("Unexpected status {status}: {body}")]
    StatusError { status: u16, body: String },

    /// The response body could not be parsed.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// The request body could not be serialized.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl SearchIndexError {
    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create a status error.
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self::StatusError {
            status,
            body: body.into(),
        }
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Create a serialization error.
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::SerializationError(msg.into())
    }

    /// Returns true when the engine reported that the target does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::StatusError { status: 404, .. })
    }
}
