//! Configuration for the quote indexer.
//!
//! Settings come from the process environment, after `.env` has been
//! loaded. Each variable also accepts a legacy name.

mod dependencies;

use std::env;

use crate::IndexingError;
use quote_indexer_repository::data_api::DEFAULT_KEYSPACE;
use quote_indexer_shared::DatasourceConfig;

pub use dependencies::Dependencies;

/// `(name, legacy name)` of every required variable.
const DB_TOKEN: (&str, &str) = ("DB_TOKEN", "ASTRA_DB_APPLICATION_TOKEN");
const DB_ENDPOINT: (&str, &str) = ("DB_ENDPOINT", "ASTRA_DB_API_ENDPOINT");
const DB_COLLECTION_NAME: (&str, &str) = ("DB_COLLECTION_NAME", "ASTRA_DB_COLLECTION_NAME");
const INDEX_API_TOKEN: (&str, &str) = ("INDEX_API_TOKEN", "GLEAN_API_TOKEN");
const INDEX_CUSTOMER: (&str, &str) = ("INDEX_CUSTOMER", "GLEAN_CUSTOMER");
const INDEX_DATASOURCE_NAME: (&str, &str) = ("INDEX_DATASOURCE_NAME", "GLEAN_DATASOURCE_NAME");

/// Settings read from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_token: String,
    pub db_endpoint: String,
    pub db_keyspace: String,
    pub db_collection: String,
    pub index_token: String,
    pub index_customer: String,
    pub datasource_name: String,
    /// Prefix of the document view URLs. Defaults to the database endpoint.
    pub view_url_base: String,
    pub url_regex: Option<String>,
    pub display_name: Option<String>,
    pub hf_token: Option<String>,
}

/// Switches that change which stages run, set from the command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    pub strict_datasource: bool,
    pub skip_load: bool,
    pub skip_index: bool,
}

impl AppConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, IndexingError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read the configuration through `lookup`.
    ///
    /// Empty values count as missing. Every missing required variable is
    /// listed in the returned error.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, IndexingError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let aliased = |(name, legacy): (&str, &str)| optional(name).or_else(|| optional(legacy));

        let mut missing = Vec::new();
        let mut required = |pair: (&'static str, &'static str)| {
            aliased(pair).unwrap_or_else(|| {
                missing.push(pair.0);
                String::new()
            })
        };

        let db_token = required(DB_TOKEN);
        let db_endpoint = required(DB_ENDPOINT);
        let db_collection = required(DB_COLLECTION_NAME);
        let index_token = required(INDEX_API_TOKEN);
        let index_customer = required(INDEX_CUSTOMER);
        let datasource_name = required(INDEX_DATASOURCE_NAME);

        if !missing.is_empty() {
            return Err(IndexingError::config(format!(
                "missing required environment variables: {}",
                missing.join(", ")
            )));
        }

        let view_url_base = optional("INDEX_VIEW_URL").unwrap_or_else(|| db_endpoint.clone());

        Ok(Self {
            db_token,
            db_endpoint,
            db_keyspace: optional("DB_KEYSPACE").unwrap_or_else(|| DEFAULT_KEYSPACE.to_string()),
            db_collection,
            index_token,
            index_customer,
            datasource_name,
            view_url_base,
            url_regex: optional("INDEX_URL_REGEX"),
            display_name: optional("INDEX_DISPLAY_NAME"),
            hf_token: optional("HF_TOKEN"),
        })
    }

    /// Datasource to register, with the overrides applied.
    pub fn datasource_config(&self) -> DatasourceConfig {
        let mut config = DatasourceConfig::new(self.datasource_name.clone(), &self.view_url_base);
        if let Some(display_name) = &self.display_name {
            config = config.with_display_name(display_name.clone());
        }
        if let Some(url_regex) = &self.url_regex {
            config = config.with_url_regex(url_regex.clone());
        }
        config
    }
}
