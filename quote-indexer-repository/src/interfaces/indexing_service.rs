//! Indexing service trait definition.

use async_trait::async_trait;

use crate::errors::IndexApiError;
use crate::types::RegistrationOutcome;
use quote_indexer_shared::{DatasourceConfig, IndexedDocument};

/// Downstream enterprise search indexing service.
#[async_trait]
pub trait IndexingService: Send + Sync {
    /// Create the datasource, or update it when the service supports it.
    ///
    /// Implementations report a duplicate as
    /// `Ok(RegistrationOutcome::AlreadyExists)` when they can tell it apart
    /// from other rejections.
    async fn create_or_update_datasource(
        &self,
        config: &DatasourceConfig,
    ) -> Result<RegistrationOutcome, IndexApiError>;

    /// Create or overwrite a single document.
    async fn index_document(&self, document: &IndexedDocument) -> Result<(), IndexApiError>;
}
