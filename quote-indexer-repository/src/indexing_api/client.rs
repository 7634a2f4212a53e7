//! Indexing REST API client.
//!
//! Provides the concrete implementation of `IndexingService` over the
//! service's push-indexing endpoints.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::errors::IndexApiError;
use crate::interfaces::IndexingService;
use crate::types::RegistrationOutcome;
use quote_indexer_shared::{DatasourceConfig, IndexedDocument};

const ADD_DATASOURCE_PATH: &str = "adddatasource";
const INDEX_DOCUMENT_PATH: &str = "indexdocument";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Base URL of the indexing API for a customer tenant.
pub fn customer_endpoint(customer: &str) -> String {
    format!("https://{}-be.glean.com/api/index/v1", customer)
}

#[derive(Serialize)]
struct IndexDocumentRequest<'a> {
    document: &'a IndexedDocument,
}

/// Client for the indexing REST API.
pub struct IndexingApiClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl IndexingApiClient {
    /// Create a client for the tenant named `customer`.
    pub fn new(customer: &str, token: &str) -> Result<Self, IndexApiError> {
        Self::with_base_url(&customer_endpoint(customer), token)
    }

    /// Create a client against an explicit base URL.
    pub fn with_base_url(base_url: &str, token: &str) -> Result<Self, IndexApiError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| IndexApiError::connection(e.to_string()))?;

        let base_url = base_url.trim_end_matches('/').to_string();
        info!(endpoint = %base_url, "Created indexing API client");

        Ok(Self {
            http,
            base_url,
            token: token.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn post<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<(), IndexApiError> {
        let response = self
            .http
            .post(self.url(path))
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await
            .map_err(|e| IndexApiError::connection(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(IndexApiError::from_status(status.as_u16(), body))
    }
}

#[async_trait]
impl IndexingService for IndexingApiClient {
    async fn create_or_update_datasource(
        &self,
        config: &DatasourceConfig,
    ) -> Result<RegistrationOutcome, IndexApiError> {
        match self.post(ADD_DATASOURCE_PATH, config).await {
            Ok(()) => {
                debug!(datasource = %config.name, "Datasource registered");
                Ok(RegistrationOutcome::Registered)
            }
            Err(e) if e.is_already_exists() => {
                warn!(datasource = %config.name, error = %e, "Datasource already exists");
                Ok(RegistrationOutcome::AlreadyExists)
            }
            Err(e) => Err(e),
        }
    }

    async fn index_document(&self, document: &IndexedDocument) -> Result<(), IndexApiError> {
        self.post(INDEX_DOCUMENT_PATH, &IndexDocumentRequest { document })
            .await
    }
}
