//! Staging store trait definition.

use async_trait::async_trait;

use crate::errors::StagingError;
use crate::types::{DeletedCount, DocumentPage};
use quote_indexer_shared::StagedDocument;

/// A document collection used as the staging area between the raw dataset
/// and the indexing service.
///
/// Every call blocks the caller until the backend answers; there is no
/// batching or retry at this level.
#[async_trait]
pub trait StagingStore: Send + Sync {
    /// Remove every document in the collection.
    ///
    /// # Returns
    ///
    /// * `Ok(DeletedCount::Exact(n))` - Number of documents removed
    /// * `Ok(DeletedCount::Unreported)` - If the backend emptied the collection without counting
    /// * `Err(StagingError)` - If the flush fails
    async fn delete_all(&self) -> Result<DeletedCount, StagingError>;

    /// Insert a single document keyed by its `_id`.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the document was inserted
    /// * `Err(StagingError::DuplicateKey)` - If the id is already taken
    /// * `Err(StagingError)` - For any other failure
    async fn insert_one(&self, document: &StagedDocument) -> Result<(), StagingError>;

    /// Read one page of documents.
    ///
    /// Pass `None` for the first page, then the `next_page_state` of the
    /// previous page until it comes back empty. Order is backend-defined.
    /// Documents are returned undecoded so a malformed one can be handled
    /// on its own.
    async fn find_page(&self, page_state: Option<&str>) -> Result<DocumentPage, StagingError>;

    /// Approximate number of documents in the collection.
    async fn estimated_count(&self) -> Result<u64, StagingError>;
}
