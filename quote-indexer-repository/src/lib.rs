//! # Quote Indexer Repository
//!
//! This crate provides the traits the pipeline uses to reach its two
//! external services, the errors they report, and concrete implementations:
//! a JSON Data API client for the staging collection and a REST client for
//! the indexing service.

pub mod data_api;
pub mod errors;
pub mod indexing_api;
pub mod interfaces;
pub mod types;

#[cfg(test)]
mod test_support;

pub use data_api::{DataApiClient, DataApiCollection, DatabaseInfo};
pub use errors::{IndexApiError, StagingError};
pub use indexing_api::IndexingApiClient;
pub use interfaces::{IndexingService, StagingStore};
pub use types::{DeletedCount, DocumentPage, RegistrationOutcome};
