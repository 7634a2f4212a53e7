//! Error types for the quote indexer repository.

mod index_api_error;
mod staging_error;

pub use index_api_error::IndexApiError;
pub use staging_error::StagingError;
