//! Sync orchestrator.
//!
//! Translates entity lifecycle events into index upserts and deletes. Every
//! operation is best-effort: failures end up in the logs and in the returned
//! [`SyncOutcome`], never in an error the caller has to handle.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, instrument, warn};
use trade_search_repository::{BatchOperationSummary, EngineConfig, IndexTarget, SearchDriver};
use trade_search_shared::{CompanyEntity, EntityId, ExchangeEntity, Reference};

use crate::config::SyncConfig;
use crate::errors::SyncError;
use crate::projector;
use crate::resolver::{reference_id, EntityResolver, Identified};

/// What a single sync or remove call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The document was upserted.
    Indexed,
    /// The document was deleted.
    Removed,
    /// Nothing to do: no id, or the entity could not be resolved.
    Skipped,
    /// The engine is not configured.
    Disabled,
    /// The engine did not acknowledge the write.
    Failed,
}

impl SyncOutcome {
    /// Returns true when the engine acknowledged a write.
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Indexed | Self::Removed)
    }
}

/// Keeps the search indexes in step with the content store.
pub struct SyncOrchestrator {
    config: Arc<EngineConfig>,
    driver: Arc<dyn SearchDriver>,
    resolver: EntityResolver,
    sync_config: SyncConfig,
}

impl SyncOrchestrator {
    pub fn new(
        config: Arc<EngineConfig>,
        driver: Arc<dyn SearchDriver>,
        resolver: EntityResolver,
    ) -> Self {
        Self::with_config(config, driver, resolver, SyncConfig::default())
    }

    pub fn with_config(
        config: Arc<EngineConfig>,
        driver: Arc<dyn SearchDriver>,
        resolver: EntityResolver,
        sync_config: SyncConfig,
    ) -> Self {
        Self {
            config,
            driver,
            resolver,
            sync_config,
        }
    }

    /// Upsert a company, or delete its document when it is unpublished.
    #[instrument(skip_all)]
    pub async fn sync_company(&self, input: Reference<CompanyEntity>) -> SyncOutcome {
        if !self.ensure_enabled() {
            return SyncOutcome::Disabled;
        }
        let Some(entity) = self.resolver.ensure_company_entity(input).await else {
            return SyncOutcome::Skipped;
        };
        let Some(id) = entity.id.clone() else {
            return SyncOutcome::Skipped;
        };

        match projector::to_company_document(&entity) {
            Some(document) => self.upsert(IndexTarget::Companies, &id, &document).await,
            None => {
                debug!(id = %id, "Company is unpublished, removing from index");
                self.delete(IndexTarget::Companies, &id).await
            }
        }
    }

    /// Delete a company's document unconditionally.
    #[instrument(skip_all)]
    pub async fn remove_company(&self, input: &Reference<CompanyEntity>) -> SyncOutcome {
        self.remove(IndexTarget::Companies, input).await
    }

    /// Upsert an exchange.
    #[instrument(skip_all)]
    pub async fn sync_exchange(&self, input: Reference<ExchangeEntity>) -> SyncOutcome {
        if !self.ensure_enabled() {
            return SyncOutcome::Disabled;
        }
        let Some(entity) = self.resolver.ensure_exchange_entity(input).await else {
            return SyncOutcome::Skipped;
        };
        let Some(id) = entity.id.clone() else {
            return SyncOutcome::Skipped;
        };

        match projector::to_exchange_document(&entity) {
            Some(document) => self.upsert(IndexTarget::Exchanges, &id, &document).await,
            None => SyncOutcome::Skipped,
        }
    }

    /// Delete an exchange's document unconditionally.
    #[instrument(skip_all)]
    pub async fn remove_exchange(&self, input: &Reference<ExchangeEntity>) -> SyncOutcome {
        self.remove(IndexTarget::Exchanges, input).await
    }

    /// Re-sync a batch of companies one after another.
    pub async fn reindex_companies(
        &self,
        inputs: Vec<Reference<CompanyEntity>>,
    ) -> Result<BatchOperationSummary, SyncError> {
        self.check_batch_size(inputs.len())?;

        let mut summary = BatchOperationSummary::default();
        for input in inputs {
            let id = reference_id(&input).map(|id| id.to_string());
            let outcome = self.sync_company(input).await;
            summary.record(id, outcome.is_applied());
        }
        info!(
            index = %IndexTarget::Companies,
            total = summary.total,
            succeeded = summary.succeeded,
            failed = summary.failed,
            "Reindexed companies"
        );
        Ok(summary)
    }

    /// Re-sync a batch of exchanges one after another.
    pub async fn reindex_exchanges(
        &self,
        inputs: Vec<Reference<ExchangeEntity>>,
    ) -> Result<BatchOperationSummary, SyncError> {
        self.check_batch_size(inputs.len())?;

        let mut summary = BatchOperationSummary::default();
        for input in inputs {
            let id = reference_id(&input).map(|id| id.to_string());
            let outcome = self.sync_exchange(input).await;
            summary.record(id, outcome.is_applied());
        }
        info!(
            index = %IndexTarget::Exchanges,
            total = summary.total,
            succeeded = summary.succeeded,
            failed = summary.failed,
            "Reindexed exchanges"
        );
        Ok(summary)
    }

    fn check_batch_size(&self, size: usize) -> Result<(), SyncError> {
        match self.sync_config.max_batch_size {
            Some(max) if size > max => Err(SyncError::BatchSizeExceeded { size, max }),
            _ => Ok(()),
        }
    }

    fn ensure_enabled(&self) -> bool {
        if !self.config.enabled {
            self.config.log_disabled_once();
        }
        self.config.enabled
    }

    async fn remove<T: Identified>(&self, target: IndexTarget, input: &Reference<T>) -> SyncOutcome {
        if !self.ensure_enabled() {
            return SyncOutcome::Disabled;
        }
        match reference_id(input) {
            Some(id) => self.delete(target, &id).await,
            None => SyncOutcome::Skipped,
        }
    }

    async fn upsert<D: Serialize>(
        &self,
        target: IndexTarget,
        id: &EntityId,
        document: &D,
    ) -> SyncOutcome {
        let document = match serde_json::to_value(document) {
            Ok(document) => document,
            Err(e) => {
                warn!(index = %target, id = %id, error = %e, "Failed to serialize document");
                return SyncOutcome::Failed;
            }
        };

        if self.driver.upsert(target, id, document).await {
            debug!(index = %target, id = %id, "Indexed document");
            SyncOutcome::Indexed
        } else {
            SyncOutcome::Failed
        }
    }

    async fn delete(&self, target: IndexTarget, id: &EntityId) -> SyncOutcome {
        if self.driver.delete(target, id).await {
            debug!(index = %target, id = %id, "Removed document");
            SyncOutcome::Removed
        } else {
            SyncOutcome::Failed
        }
    }
}
