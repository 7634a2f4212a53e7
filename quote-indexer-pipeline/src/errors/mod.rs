//! Error types for the quote indexer pipeline.

use quote_indexer_repository::{IndexApiError, StagingError};
use thiserror::Error;

/// Errors that end a pipeline run.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The dataset could not be read.
    #[error("Dataset error: {0}")]
    DatasetError(String),

    /// Error from the staging store.
    #[error("Staging error: {0}")]
    StagingError(#[from] StagingError),

    /// Error from the indexing service.
    #[error("Indexing error: {0}")]
    IndexingError(#[from] IndexApiError),

    /// Datasource registration failed and the run requires it.
    #[error("Registration error: {0}")]
    RegistrationError(String),
}

impl PipelineError {
    /// Create a dataset error.
    pub fn dataset(msg: impl Into<String>) -> Self {
        Self::DatasetError(msg.into())
    }

    /// Create a registration error.
    pub fn registration(msg: impl Into<String>) -> Self {
        Self::RegistrationError(msg.into())
    }
}
