//! Dependency initialization and wiring for the quote indexer.

use std::sync::Arc;

use tracing::{info, warn};

use super::{AppConfig, RunOptions};
use crate::IndexingError;
use quote_indexer_pipeline::{
    orchestrator::{Orchestrator, OrchestratorConfig},
    progress::ProgressReporter,
    source::RecordSource,
};
use quote_indexer_repository::{DataApiClient, DatabaseInfo, IndexingApiClient};

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The configured orchestrator ready to run.
    pub orchestrator: Orchestrator,
    /// The database holding the staging collection.
    pub database: DatabaseInfo,
}

impl Dependencies {
    /// Connect to both services and build the orchestrator.
    ///
    /// Unreachable services and rejected database credentials are fatal
    /// here, before any data is touched. The indexing token is only checked
    /// by the first call the pipeline makes.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(IndexingError)` - If initialization fails
    pub async fn new(
        config: &AppConfig,
        source: Box<dyn RecordSource>,
        progress: Arc<dyn ProgressReporter>,
        options: RunOptions,
    ) -> Result<Self, IndexingError> {
        info!(
            endpoint = %config.db_endpoint,
            keyspace = %config.db_keyspace,
            collection = %config.db_collection,
            customer = %config.index_customer,
            datasource = %config.datasource_name,
            "Initializing dependencies"
        );

        // Verify the database credentials
        let client = DataApiClient::connect(&config.db_endpoint, &config.db_token, &config.db_keyspace)
            .await
            .map_err(|e| IndexingError::config(format!("Failed to connect to the database: {}", e)))?;

        let database = match client.database_info().await {
            Ok(database) => database,
            Err(e) => {
                warn!(error = %e, "Could not look up database info");
                DatabaseInfo {
                    id: None,
                    name: client.endpoint().host_str().unwrap_or_default().to_string(),
                    region: None,
                    keyspace: client.keyspace().to_string(),
                }
            }
        };
        info!(database = %database.name, "Database connection verified");

        // An indexing-only run works on whatever is already staged
        let collection = if options.skip_load {
            client.collection(&config.db_collection)
        } else {
            client.create_collection(&config.db_collection).await?
        };

        let index = IndexingApiClient::new(&config.index_customer, &config.index_token)?;

        let mut orchestrator_config =
            OrchestratorConfig::new(config.datasource_config(), config.view_url_base.clone());
        orchestrator_config.strict_datasource = options.strict_datasource;
        orchestrator_config.skip_load = options.skip_load;
        orchestrator_config.skip_index = options.skip_index;

        let orchestrator = Orchestrator::new(
            source,
            Arc::new(collection),
            Arc::new(index),
            progress,
            orchestrator_config,
        );

        Ok(Self {
            orchestrator,
            database,
        })
    }
}
