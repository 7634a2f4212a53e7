//! Interface definitions for the external services.
//!
//! The pipeline only talks to these traits, so the concrete clients can be
//! swapped for in-memory fakes in tests.

mod indexing_service;
mod staging_store;

pub use indexing_service::IndexingService;
pub use staging_store::StagingStore;
