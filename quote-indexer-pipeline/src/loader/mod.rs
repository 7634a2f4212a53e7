//! Loader module for the quote indexer pipeline.
//!
//! Replaces the content of the staging collection with the current records.

use std::sync::Arc;

use tracing::{error, info, instrument};

use crate::errors::PipelineError;
use crate::progress::ProgressReporter;
use crate::summary::{ItemResult, Stage, StageSummary};
use quote_indexer_repository::{DeletedCount, StagingStore};
use quote_indexer_shared::{Record, StagedDocument};

/// Writes records into the staging collection.
///
/// The loader is responsible for:
/// - Flushing the collection before a reload (full refresh)
/// - Inserting each record under its synthetic id
/// - Isolating per-record failures
pub struct StagingLoader {
    store: Arc<dyn StagingStore>,
    progress: Arc<dyn ProgressReporter>,
}

impl StagingLoader {
    pub fn new(store: Arc<dyn StagingStore>, progress: Arc<dyn ProgressReporter>) -> Self {
        Self { store, progress }
    }

    /// Remove every document from the collection.
    ///
    /// A failure here is fatal: loading into a collection that was not
    /// emptied would mix two runs. The store may not report how many
    /// documents it removed.
    #[instrument(skip(self))]
    pub async fn flush(&self) -> Result<DeletedCount, PipelineError> {
        let deleted = self.store.delete_all().await?;
        info!(deleted = %deleted, "Collection has been flushed");
        Ok(deleted)
    }

    /// Insert every record, one call at a time.
    ///
    /// Expects the collection to have been flushed in the same run. A failed
    /// insert is logged and recorded and the next record is attempted; no
    /// rollback happens. Progress is reported after each record.
    #[instrument(skip(self, records), fields(record_count = records.len()))]
    pub async fn load(&self, records: &[Record]) -> StageSummary {
        let total = records.len() as u64;
        let mut summary = StageSummary::new(Stage::Load);
        self.progress.stage_started(Stage::Load, Some(total));

        for (processed, record) in records.iter().enumerate() {
            let document = StagedDocument::from(record);
            let id = document.id.to_string();

            let result = match self.store.insert_one(&document).await {
                Ok(()) => ItemResult::succeeded(id),
                Err(e) => {
                    error!(id = %id, error = %e, "Error while inserting document");
                    ItemResult::failed(id, e)
                }
            };

            self.progress
                .item_finished(Stage::Load, &result, processed as u64 + 1, Some(total));
            summary.record(result);
        }

        info!(
            succeeded = summary.succeeded,
            failed = summary.failed,
            "Load finished"
        );
        self.progress.stage_finished(&summary);
        summary
    }

    /// Flush the collection, then load `records`.
    ///
    /// # Returns
    ///
    /// * `Ok((deleted, summary))` - Documents removed by the flush and the load summary
    /// * `Err(PipelineError)` - If the flush failed; nothing was inserted
    pub async fn refresh(
        &self,
        records: &[Record],
    ) -> Result<(DeletedCount, StageSummary), PipelineError> {
        let deleted = self.flush().await?;
        let summary = self.load(records).await;
        Ok((deleted, summary))
    }
}
