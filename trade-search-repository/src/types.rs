//! Request and response types for search index operations.

use std::fmt;

/// The index a document operation or search is aimed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexTarget {
    Companies,
    Exchanges,
}

impl fmt::Display for IndexTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Companies => f.write_str("companies"),
            Self::Exchanges => f.write_str("exchanges"),
        }
    }
}

/// Result of a batch operation for a single item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOperationResult {
    /// The entity's identifier, or `None` when the input carried none.
    pub id: Option<String>,
    /// Whether the engine acknowledged the operation.
    pub success: bool,
}

/// Summary of a batch operation containing aggregate statistics and individual results.
///
/// Individual failures are reported here rather than failing the whole batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOperationSummary {
    /// Total number of items in the batch.
    pub total: usize,
    /// Number of successful operations.
    pub succeeded: usize,
    /// Number of failed operations.
    pub failed: usize,
    /// Individual results for each item.
    pub results: Vec<BatchOperationResult>,
}

impl BatchOperationSummary {
    /// Record the outcome of one item.
    pub fn record(&mut self, id: Option<String>, success: bool) {
        self.total += 1;
        if success {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
        self.results.push(BatchOperationResult { id, success });
    }
}
