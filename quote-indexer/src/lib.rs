//! # Quote Indexer
//!
//! Main library for the quote indexer batch sync.
//!
//! This crate provides the configuration, dependency wiring and console
//! output for running the quote indexer pipeline once.

pub mod config;
pub mod console;

pub use config::{AppConfig, Dependencies, RunOptions};

use thiserror::Error;

/// Errors that can occur during indexer initialization or execution.
#[derive(Error, Debug)]
pub enum IndexingError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Pipeline error.
    #[error("Pipeline error: {0}")]
    PipelineError(#[from] quote_indexer_pipeline::PipelineError),

    /// Staging store error.
    #[error("Staging store error: {0}")]
    StagingError(#[from] quote_indexer_repository::StagingError),

    /// Indexing service error.
    #[error("Indexing service error: {0}")]
    IndexApiError(#[from] quote_indexer_repository::IndexApiError),
}

impl IndexingError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
