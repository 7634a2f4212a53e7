//! Data API database client.
//!
//! Wraps the HTTP transport and credentials for one database and hands out
//! [`DataApiCollection`] handles.

use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, instrument};
use url::Url;
use uuid::Uuid;

use crate::data_api::collection::DataApiCollection;
use crate::data_api::commands::{self, CommandResponse};
use crate::errors::StagingError;

/// Keyspace used when none is configured.
pub const DEFAULT_KEYSPACE: &str = "default_keyspace";

/// Header carrying the application token.
const TOKEN_HEADER: &str = "Token";

/// Path prefix of the JSON API.
const API_PATH: &str = "api/json/v1";

/// DevOps API used to look up database metadata.
const DEVOPS_URL: &str = "https://api.astra.datastax.com/v2/databases";

/// Host suffix of hosted database endpoints.
const ASTRA_HOST_SUFFIX: &str = ".apps.astra.datastax.com";

/// Caller identification sent with every request.
const USER_AGENT: &str = concat!("quote-indexer/", env!("CARGO_PKG_VERSION"));

/// Basic facts about the connected database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseInfo {
    /// Database id, when the endpoint is a hosted one.
    pub id: Option<Uuid>,
    /// Human-readable database name.
    pub name: String,
    /// Cloud region, when known.
    pub region: Option<String>,
    /// Keyspace commands run against.
    pub keyspace: String,
}

#[derive(Debug, Deserialize)]
struct DevOpsDatabase {
    info: DevOpsDatabaseInfo,
}

#[derive(Debug, Deserialize)]
struct DevOpsDatabaseInfo {
    name: String,
    #[serde(default)]
    region: Option<String>,
}

/// Client for a single database behind the JSON Data API.
///
/// Cheap to clone; clones share the HTTP connection pool.
///
/// # Example
///
/// ```ignore
/// let client = DataApiClient::connect(&endpoint, &token, DEFAULT_KEYSPACE).await?;
/// let collection = client.create_collection("philosophers").await?;
/// collection.delete_all().await?;
/// ```
#[derive(Clone)]
pub struct DataApiClient {
    http: reqwest::Client,
    endpoint: Url,
    token: String,
    keyspace: String,
}

impl DataApiClient {
    /// Build a client without contacting the database.
    pub fn new(endpoint: &str, token: &str, keyspace: &str) -> Result<Self, StagingError> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| StagingError::connection(format!("Invalid endpoint {}: {}", endpoint, e)))?;

        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| StagingError::connection(e.to_string()))?;

        Ok(Self {
            http,
            endpoint,
            token: token.to_string(),
            keyspace: keyspace.to_string(),
        })
    }

    /// Build a client and check that the credentials are accepted.
    ///
    /// # Returns
    ///
    /// * `Ok(DataApiClient)` - A client whose token was accepted
    /// * `Err(StagingError)` - If the endpoint is unreachable or the token is rejected
    pub async fn connect(endpoint: &str, token: &str, keyspace: &str) -> Result<Self, StagingError> {
        let client = Self::new(endpoint, token, keyspace)?;
        let collections = client.list_collections().await?;

        info!(
            endpoint = %client.endpoint,
            keyspace = %client.keyspace,
            collections = collections.len(),
            "Connected to Data API"
        );

        Ok(client)
    }

    pub fn keyspace(&self) -> &str {
        &self.keyspace
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Names of the collections in the keyspace.
    pub async fn list_collections(&self) -> Result<Vec<String>, StagingError> {
        let response = self
            .run_command(None, commands::FIND_COLLECTIONS, commands::find_collections())
            .await?;
        Ok(response.status_strings("collections"))
    }

    /// Look up the database name.
    ///
    /// Hosted endpoints are resolved through the DevOps API; any other
    /// endpoint is named after its host.
    #[instrument(skip(self))]
    pub async fn database_info(&self) -> Result<DatabaseInfo, StagingError> {
        let Some((id, region)) = parse_hosted_endpoint(&self.endpoint) else {
            let name = self.endpoint.host_str().unwrap_or_default().to_string();
            debug!(name = %name, "Endpoint is not a hosted database, using host as name");
            return Ok(DatabaseInfo {
                id: None,
                name,
                region: None,
                keyspace: self.keyspace.clone(),
            });
        };

        let response = self
            .http
            .get(format!("{}/{}", DEVOPS_URL, id))
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| StagingError::connection(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| StagingError::connection(e.to_string()))?;
        check_status(status, &body)?;

        let database: DevOpsDatabase = serde_json::from_str(&body)
            .map_err(|e| StagingError::parse(format!("database info: {}", e)))?;

        Ok(DatabaseInfo {
            id: Some(id),
            name: database.info.name,
            region: database.info.region.or(Some(region)),
            keyspace: self.keyspace.clone(),
        })
    }

    /// Create a collection and return a handle to it.
    ///
    /// No existence check is made first; the API accepts re-creating an
    /// existing collection with the same settings.
    #[instrument(skip(self))]
    pub async fn create_collection(&self, name: &str) -> Result<DataApiCollection, StagingError> {
        self.run_command(None, commands::CREATE_COLLECTION, commands::create_collection(name))
            .await?;
        info!(collection = %name, "Collection is ready");
        Ok(self.collection(name))
    }

    /// Handle to an existing collection.
    pub fn collection(&self, name: &str) -> DataApiCollection {
        DataApiCollection::new(self.clone(), name)
    }

    /// URL for a keyspace-level command, or a collection command when
    /// `collection` is given.
    pub(crate) fn command_url(&self, collection: Option<&str>) -> String {
        let base = self.endpoint.as_str().trim_end_matches('/');
        match collection {
            Some(collection) => format!("{}/{}/{}/{}", base, API_PATH, self.keyspace, collection),
            None => format!("{}/{}/{}", base, API_PATH, self.keyspace),
        }
    }

    /// Send one command and decode its response.
    pub(crate) async fn run_command(
        &self,
        collection: Option<&str>,
        command: &str,
        body: Value,
    ) -> Result<CommandResponse, StagingError> {
        let response = self
            .http
            .post(self.command_url(collection))
            .header(TOKEN_HEADER, &self.token)
            .json(&body)
            .send()
            .await
            .map_err(|e| StagingError::connection(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| StagingError::connection(e.to_string()))?;
        check_status(status, &text)?;

        CommandResponse::parse(command, &text)
    }
}

fn check_status(status: StatusCode, body: &str) -> Result<(), StagingError> {
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(StagingError::unauthorized(format!("status {}: {}", status, body)));
    }
    if !status.is_success() {
        return Err(StagingError::HttpStatus {
            status: status.as_u16(),
            body: body.to_string(),
        });
    }
    Ok(())
}

/// Extract the database id and region from a hosted endpoint of the form
/// `https://<uuid>-<region>.apps.astra.datastax.com`.
pub fn parse_hosted_endpoint(endpoint: &Url) -> Option<(Uuid, String)> {
    let host = endpoint.host_str()?;
    let prefix = host.strip_suffix(ASTRA_HOST_SUFFIX)?;
    if prefix.len() <= 37 || !prefix.is_char_boundary(36) {
        return None;
    }

    let (id, rest) = prefix.split_at(36);
    let id = Uuid::parse_str(id).ok()?;
    let region = rest.strip_prefix('-')?;

    Some((id, region.to_string()))
}
