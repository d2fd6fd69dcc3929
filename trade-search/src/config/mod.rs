//! Configuration and dependency wiring for the trade search service.

mod dependencies;

pub use dependencies::Dependencies;

/// Default maximum number of entities accepted by one reindex call.
pub const DEFAULT_MAX_BATCH_SIZE: usize = 1000;

/// Configuration for the sync orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// Maximum batch size for reindex calls. `None` means unlimited.
    pub max_batch_size: Option<usize>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            max_batch_size: Some(DEFAULT_MAX_BATCH_SIZE),
        }
    }
}

impl SyncConfig {
    /// A configuration without a batch size limit.
    pub fn unlimited() -> Self {
        Self {
            max_batch_size: None,
        }
    }

    /// A configuration with a custom batch size limit.
    pub fn with_max_batch_size(max_batch_size: usize) -> Self {
        Self {
            max_batch_size: Some(max_batch_size),
        }
    }
}
