//! Orchestrator module for the quote indexer pipeline.
//!
//! Coordinates the source, loader, registrar, and sync driver.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::driver::SyncDriver;
use crate::errors::PipelineError;
use crate::loader::StagingLoader;
use crate::progress::ProgressReporter;
use crate::registrar::DatasourceRegistrar;
use crate::source::RecordSource;
use crate::summary::{RegistrationReport, RunSummary};
use quote_indexer_repository::{IndexingService, StagingStore};
use quote_indexer_shared::{into_records, DatasourceConfig};

/// Row logged as a sample once the dataset is in memory.
const SAMPLE_ROW: usize = 16;

/// Configuration for the orchestrator.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Datasource the documents are published under.
    pub datasource: DatasourceConfig,
    /// Prefix of every document view URL.
    pub view_url_base: String,
    /// Abort when the datasource registration is rejected or fails.
    pub strict_datasource: bool,
    /// Keep the staging collection as is and only index it.
    pub skip_load: bool,
    /// Stop after loading the staging collection.
    pub skip_index: bool,
}

impl OrchestratorConfig {
    pub fn new(datasource: DatasourceConfig, view_url_base: impl Into<String>) -> Self {
        Self {
            datasource,
            view_url_base: view_url_base.into(),
            strict_datasource: false,
            skip_load: false,
            skip_index: false,
        }
    }
}

/// Orchestrator that runs the pipeline stages once, in order.
///
/// The orchestrator:
/// - Reads the dataset and assigns record ids
/// - Flushes and reloads the staging collection
/// - Registers the datasource
/// - Indexes everything found in the staging collection
pub struct Orchestrator {
    source: Box<dyn RecordSource>,
    loader: StagingLoader,
    registrar: DatasourceRegistrar,
    driver: SyncDriver,
    config: OrchestratorConfig,
}

impl Orchestrator {
    pub fn new(
        source: Box<dyn RecordSource>,
        store: Arc<dyn StagingStore>,
        index: Arc<dyn IndexingService>,
        progress: Arc<dyn ProgressReporter>,
        config: OrchestratorConfig,
    ) -> Self {
        let loader = StagingLoader::new(store.clone(), progress.clone());
        let registrar = DatasourceRegistrar::new(index.clone());
        let driver = SyncDriver::new(
            store,
            index,
            progress,
            config.datasource.name.clone(),
            config.view_url_base.clone(),
        );

        Self {
            source,
            loader,
            registrar,
            driver,
            config,
        }
    }

    /// Run the pipeline.
    ///
    /// Only a dataset that cannot be read, a collection that cannot be
    /// flushed, or (in strict mode) an unusable datasource ends the run
    /// with an error. Everything else is reported in the [`RunSummary`].
    #[instrument(skip(self), fields(datasource = %self.config.datasource.name))]
    pub async fn run(&self) -> Result<RunSummary, PipelineError> {
        let mut summary = RunSummary::new(Uuid::new_v4(), Utc::now());
        info!(run_id = %summary.run_id, "Starting quote indexer run");

        if self.config.skip_load {
            info!("Skipping load, indexing the current staging collection");
        } else {
            self.load(&mut summary).await?;
        }

        if self.config.skip_index {
            info!("Skipping datasource registration and indexing");
        } else {
            let report = self.registrar.register(&self.config.datasource).await;
            if self.config.strict_datasource {
                match &report {
                    RegistrationReport::Rejected(reason) | RegistrationReport::Failed(reason) => {
                        return Err(PipelineError::registration(reason.clone()));
                    }
                    _ => {}
                }
            } else if !report.is_healthy() {
                warn!("Continuing without a confirmed datasource");
            }
            summary.registration = Some(report);
            summary.index = Some(self.driver.sync().await);
        }

        summary.finished_at = Utc::now();
        info!(
            run_id = %summary.run_id,
            elapsed_ms = summary.elapsed().num_milliseconds(),
            failures = summary.has_failures(),
            "Quote indexer run complete"
        );
        Ok(summary)
    }

    async fn load(&self, summary: &mut RunSummary) -> Result<(), PipelineError> {
        info!(source = %self.source.describe(), "Reading dataset");
        let rows = self.source.fetch().await?;
        if let Some(sample) = rows.get(SAMPLE_ROW).or_else(|| rows.first()) {
            info!(author = %sample.author, quote = %sample.quote, "Sample row");
        }
        summary.fetched = Some(rows.len());

        let records = into_records(rows);
        let (flushed, load) = self.loader.refresh(&records).await?;
        summary.flushed = Some(flushed);
        summary.load = Some(load);
        Ok(())
    }
}
