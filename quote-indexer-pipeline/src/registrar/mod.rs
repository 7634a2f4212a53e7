//! Registrar module for the quote indexer pipeline.
//!
//! Makes sure the datasource exists in the indexing service.

use std::sync::Arc;

use tracing::{error, info, instrument, warn};

use crate::summary::RegistrationReport;
use quote_indexer_repository::{IndexingService, RegistrationOutcome};
use quote_indexer_shared::DatasourceConfig;

/// Registers the datasource documents are published under.
pub struct DatasourceRegistrar {
    index: Arc<dyn IndexingService>,
}

impl DatasourceRegistrar {
    pub fn new(index: Arc<dyn IndexingService>) -> Self {
        Self { index }
    }

    /// Create or update the datasource.
    ///
    /// Never fails: every error is logged and reported in the returned
    /// [`RegistrationReport`], classified so the caller can tell a duplicate
    /// from a configuration problem.
    #[instrument(skip(self, config), fields(datasource = %config.name))]
    pub async fn register(&self, config: &DatasourceConfig) -> RegistrationReport {
        match self.index.create_or_update_datasource(config).await {
            Ok(RegistrationOutcome::Registered) => {
                info!("DataSource has been created");
                RegistrationReport::Registered
            }
            Ok(RegistrationOutcome::AlreadyExists) => {
                info!("DataSource already exists");
                RegistrationReport::AlreadyExists
            }
            Err(e) if e.is_already_exists() => {
                info!(error = %e, "DataSource already exists");
                RegistrationReport::AlreadyExists
            }
            Err(e) if e.is_rejection() => {
                error!(error = %e, "Datasource configuration was rejected");
                RegistrationReport::Rejected(e.to_string())
            }
            Err(e) => {
                warn!(error = %e, "Error creating datasource");
                RegistrationReport::Failed(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::RecordingIndex;
    use quote_indexer_repository::IndexApiError;

    fn config() -> DatasourceConfig {
        DatasourceConfig::new("philosophers", "https://db.example.com")
    }

    #[tokio::test]
    async fn test_register_twice_does_not_fail() {
        let index = Arc::new(RecordingIndex::new());
        let registrar = DatasourceRegistrar::new(index.clone());

        let first = registrar.register(&config()).await;
        let second = registrar.register(&config()).await;

        assert_eq!(first, RegistrationReport::Registered);
        assert_eq!(second, RegistrationReport::AlreadyExists);
        assert_eq!(index.datasource_calls(), 2);
    }

    #[tokio::test]
    async fn test_rejected_config_is_reported() {
        let index = Arc::new(RecordingIndex::new().with_datasource_error(
            IndexApiError::from_status(400, "urlRegex is not a valid regex".to_string()),
        ));
        let registrar = DatasourceRegistrar::new(index);

        let report = registrar.register(&config()).await;

        assert!(matches!(report, RegistrationReport::Rejected(_)));
        assert!(!report.is_healthy());
    }

    #[tokio::test]
    async fn test_unreachable_service_is_reported() {
        let index = Arc::new(
            RecordingIndex::new().with_datasource_error(IndexApiError::connection("timed out")),
        );
        let registrar = DatasourceRegistrar::new(index);

        let report = registrar.register(&config()).await;

        assert!(matches!(report, RegistrationReport::Failed(_)));
    }
}
