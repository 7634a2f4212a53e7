//! Data API collection implementation of [`StagingStore`].

use async_trait::async_trait;
use tracing::debug;

use crate::data_api::client::DataApiClient;
use crate::data_api::commands;
use crate::errors::StagingError;
use crate::interfaces::StagingStore;
use crate::types::{DeletedCount, DocumentPage};
use quote_indexer_shared::StagedDocument;

/// Upper bound on `deleteMany` round trips during a flush.
const MAX_DELETE_ROUNDS: usize = 100_000;

/// Handle to one collection.
#[derive(Clone)]
pub struct DataApiCollection {
    client: DataApiClient,
    name: String,
}

impl DataApiCollection {
    pub(crate) fn new(client: DataApiClient, name: &str) -> Self {
        Self {
            client,
            name: name.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

#[async_trait]
impl StagingStore for DataApiCollection {
    /// Delete every document.
    ///
    /// The API may stop early and report `moreData`; the command is repeated
    /// until it does not. An unfiltered delete can empty the collection in
    /// one go and answer `deletedCount: -1`, in which case the total is
    /// [`DeletedCount::Unreported`].
    async fn delete_all(&self) -> Result<DeletedCount, StagingError> {
        let mut deleted = 0u64;
        let mut unreported = false;

        for _ in 0..MAX_DELETE_ROUNDS {
            let response = self
                .client
                .run_command(Some(&self.name), commands::DELETE_MANY, commands::delete_many())
                .await?;

            match response.status_i64("deletedCount") {
                Some(count) if count >= 0 => deleted += count as u64,
                Some(_) => unreported = true,
                None => {}
            }

            if !response.status_flag("moreData") {
                let total = if unreported {
                    DeletedCount::Unreported
                } else {
                    DeletedCount::Exact(deleted)
                };
                debug!(collection = %self.name, deleted = %total, "Collection flushed");
                return Ok(total);
            }
        }

        Err(StagingError::command(
            commands::DELETE_MANY,
            None,
            format!("collection still not empty after {} rounds", MAX_DELETE_ROUNDS),
        ))
    }

    async fn insert_one(&self, document: &StagedDocument) -> Result<(), StagingError> {
        let body = commands::insert_one(document)?;
        self.client
            .run_command(Some(&self.name), commands::INSERT_ONE, body)
            .await?;
        Ok(())
    }

    async fn find_page(&self, page_state: Option<&str>) -> Result<DocumentPage, StagingError> {
        let response = self
            .client
            .run_command(Some(&self.name), commands::FIND, commands::find(page_state))
            .await?;
        response.into_page()
    }

    async fn estimated_count(&self) -> Result<u64, StagingError> {
        let response = self
            .client
            .run_command(
                Some(&self.name),
                commands::ESTIMATED_DOCUMENT_COUNT,
                commands::estimated_document_count(),
            )
            .await?;

        response
            .status_u64("count")
            .ok_or_else(|| StagingError::parse("estimatedDocumentCount response has no count"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::StubServer;

    fn collection(server: &StubServer) -> DataApiCollection {
        DataApiClient::new(server.url(), "AstraCS:token", "ks")
            .unwrap()
            .collection("quotes")
    }

    #[tokio::test]
    async fn test_delete_all_repeats_while_more_data() {
        let server = StubServer::start(vec![
            (200, r#"{"status":{"deletedCount":20,"moreData":true}}"#),
            (200, r#"{"status":{"deletedCount":20,"moreData":true}}"#),
            (200, r#"{"status":{"deletedCount":7}}"#),
        ]);

        let deleted = collection(&server).delete_all().await.unwrap();

        assert_eq!(deleted, DeletedCount::Exact(47));
        let requests = server.requests();
        assert_eq!(requests.len(), 3);
        assert!(requests.iter().all(|r| r.path == "/api/json/v1/ks/quotes"));
        assert!(requests[0].body.contains("deleteMany"));
    }

    #[tokio::test]
    async fn test_delete_all_without_reported_count() {
        let server = StubServer::start(vec![(200, r#"{"status":{"deletedCount":-1}}"#)]);

        let deleted = collection(&server).delete_all().await.unwrap();

        assert_eq!(deleted, DeletedCount::Unreported);
        assert_eq!(server.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_all_error_is_returned() {
        let server = StubServer::start(vec![(
            200,
            r#"{"errors":[{"message":"collection not found","errorCode":"COLLECTION_NOT_EXIST"}]}"#,
        )]);

        let result = collection(&server).delete_all().await;

        assert!(matches!(result, Err(StagingError::CommandError { .. })));
    }

    #[tokio::test]
    async fn test_insert_duplicate_key() {
        let server = StubServer::start(vec![(
            200,
            r#"{"errors":[{"message":"Document already exists with the given _id","errorCode":"DOCUMENT_ALREADY_EXISTS"}]}"#,
        )]);
        let document = StagedDocument {
            id: 0,
            author: "Plato".to_string(),
            quote: "...".to_string(),
            tags: vec![],
        };

        let result = collection(&server).insert_one(&document).await;

        assert!(matches!(result, Err(StagingError::DuplicateKey(_))));
        assert!(server.requests()[0].body.contains("\"_id\":0"));
    }
}
