//! Sync driver for the quote indexer pipeline.
//!
//! Reads the staging collection back and publishes every document to the
//! indexing service.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};

use crate::errors::PipelineError;
use crate::progress::ProgressReporter;
use crate::summary::{ItemResult, Stage, StageSummary};
use quote_indexer_repository::{IndexingService, StagingStore};
use quote_indexer_shared::{IndexedDocument, StagedDocument};

/// Publishes staged documents to the indexing service.
///
/// Each document goes `PENDING -> INDEXED` or `PENDING -> FAILED` exactly
/// once; there are no retries. The only state kept between documents is the
/// read cursor.
pub struct SyncDriver {
    store: Arc<dyn StagingStore>,
    index: Arc<dyn IndexingService>,
    progress: Arc<dyn ProgressReporter>,
    datasource: String,
    view_url_base: String,
}

impl SyncDriver {
    pub fn new(
        store: Arc<dyn StagingStore>,
        index: Arc<dyn IndexingService>,
        progress: Arc<dyn ProgressReporter>,
        datasource: impl Into<String>,
        view_url_base: impl Into<String>,
    ) -> Self {
        Self {
            store,
            index,
            progress,
            datasource: datasource.into(),
            view_url_base: view_url_base.into(),
        }
    }

    /// Index every document present in the collection.
    ///
    /// The count is only used for progress; iteration ends when the cursor
    /// is exhausted. A failure to read a page ends the stage early and is
    /// recorded in [`StageSummary::interrupted`].
    #[instrument(skip(self), fields(datasource = %self.datasource))]
    pub async fn sync(&self) -> StageSummary {
        let total = match self.store.estimated_count().await {
            Ok(count) => Some(count),
            Err(e) => {
                warn!(error = %e, "Could not count staged documents");
                None
            }
        };

        let mut summary = StageSummary::new(Stage::Index);
        self.progress.stage_started(Stage::Index, total);

        let mut page_state: Option<String> = None;
        let mut processed = 0u64;

        loop {
            let page = match self.store.find_page(page_state.as_deref()).await {
                Ok(page) => page,
                Err(e) => {
                    error!(error = %e, processed = processed, "Failed to read staged documents");
                    summary.interrupted = Some(e.to_string());
                    break;
                }
            };

            for raw in &page.documents {
                let result = self.index_one(raw).await;
                processed += 1;
                self.progress
                    .item_finished(Stage::Index, &result, processed, total);
                summary.record(result);
            }

            match page.next_page_state {
                Some(next) => page_state = Some(next),
                None => break,
            }
        }

        info!(
            succeeded = summary.succeeded,
            failed = summary.failed,
            "Indexing finished"
        );
        self.progress.stage_finished(&summary);
        summary
    }

    /// Derive and submit one document.
    async fn index_one(&self, raw: &Value) -> ItemResult {
        let id = StagedDocument::id_hint(raw);

        let staged = match StagedDocument::from_json(raw) {
            Ok(staged) => staged,
            Err(e) => {
                error!(id = %id, error = %e, "Malformed staged document");
                return ItemResult::failed(id, e);
            }
        };

        let document = self.derive(&staged);
        match self.index.index_document(&document).await {
            Ok(()) => {
                debug!(id = %id, "Indexed document");
                ItemResult::succeeded(id)
            }
            Err(e) => {
                let e = PipelineError::from(e);
                error!(id = %id, error = %e, "Error indexing document");
                ItemResult::failed(id, e)
            }
        }
    }

    /// Published form of a staged document.
    pub fn derive(&self, staged: &StagedDocument) -> IndexedDocument {
        IndexedDocument::from_staged(staged, &self.datasource, &self.view_url_base)
    }
}
