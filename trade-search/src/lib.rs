//! # Trade Search
//!
//! Keeps an external search engine in step with the company and exchange
//! content of the trade platform, and answers federated queries across both
//! indexes.
//!
//! ## Architecture
//!
//! 1. **Resolver**: turns lifecycle inputs (entity or bare id) into complete entities
//! 2. **Projector**: maps entities to search documents
//! 3. **Orchestrator**: upserts or deletes documents through the driver
//! 4. **Federator**: runs one query against both indexes and merges the results
//!
//! ## Modules
//!
//! - [`config`]: Sync configuration and dependency wiring
//! - [`resolver`]: Entity resolution and the [`EntityStore`] seam
//! - [`projector`]: Entity to document projection
//! - [`orchestrator`]: Index synchronization
//! - [`federator`]: Federated search
//! - [`service`]: The public facade
//! - [`errors`]: Error types

pub mod config;
pub mod errors;
pub mod federator;
pub mod orchestrator;
pub mod projector;
pub mod resolver;
pub mod service;

pub use config::{Dependencies, SyncConfig};
pub use errors::{StoreError, SyncError};
pub use federator::QueryFederator;
pub use orchestrator::{SyncOrchestrator, SyncOutcome};
pub use resolver::{EntityResolver, EntityStore, FetchRequest};
pub use service::SearchService;

use thiserror::Error;

/// Errors of the `search-probe` binary.
#[derive(Error, Debug)]
pub enum ProbeError {
    /// Invalid command line or configuration.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Failed to render output.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl ProbeError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
