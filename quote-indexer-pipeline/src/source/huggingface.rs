//! Dataset source backed by the Hugging Face dataset viewer rows API.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use super::RecordSource;
use crate::errors::PipelineError;
use quote_indexer_shared::RawQuote;

/// Dataset published with the quotes used by default.
pub const DEFAULT_DATASET: &str = "datastax/philosopher-quotes";

/// Rows endpoint of the dataset viewer.
pub const ROWS_API_URL: &str = "https://datasets-server.huggingface.co/rows";

/// Largest page the rows endpoint serves.
const PAGE_LENGTH: usize = 100;

/// Which dataset, config and split to read.
#[derive(Clone, Debug)]
pub struct HuggingFaceRowsConfig {
    /// Dataset id, e.g. `datastax/philosopher-quotes`.
    pub dataset: String,
    /// Dataset config name, e.g. `default`.
    pub config: String,
    /// Split name, e.g. `train`.
    pub split: String,
    /// Optional access token for gated datasets.
    pub token: Option<String>,
    /// Optional cap on the number of rows read.
    pub max_rows: Option<usize>,
    /// Rows endpoint, overridable for mirrors.
    pub rows_url: String,
}

impl HuggingFaceRowsConfig {
    pub fn new(dataset: impl Into<String>) -> Self {
        Self {
            dataset: dataset.into(),
            config: "default".to_string(),
            split: "train".to_string(),
            token: None,
            max_rows: None,
            rows_url: ROWS_API_URL.to_string(),
        }
    }

    pub fn with_split(mut self, split: impl Into<String>) -> Self {
        self.split = split.into();
        self
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn with_max_rows(mut self, max_rows: Option<usize>) -> Self {
        self.max_rows = max_rows;
        self
    }
}

impl Default for HuggingFaceRowsConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DATASET)
    }
}

#[derive(Debug, Deserialize)]
struct RowsPage {
    #[serde(default)]
    rows: Vec<RowEntry>,
    #[serde(default)]
    num_rows_total: usize,
}

#[derive(Debug, Deserialize)]
struct RowEntry {
    row_idx: usize,
    row: Value,
}

fn parse_rows_page(body: &str) -> Result<RowsPage, PipelineError> {
    serde_json::from_str(body).map_err(|e| PipelineError::dataset(format!("invalid rows page: {}", e)))
}

/// Reads a dataset split page by page.
pub struct HuggingFaceRowsSource {
    http: reqwest::Client,
    config: HuggingFaceRowsConfig,
}

impl HuggingFaceRowsSource {
    pub fn new(config: HuggingFaceRowsConfig) -> Result<Self, PipelineError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| PipelineError::dataset(e.to_string()))?;
        Ok(Self { http, config })
    }

    async fn fetch_page(&self, offset: usize, length: usize) -> Result<RowsPage, PipelineError> {
        let offset_param = offset.to_string();
        let length_param = length.to_string();
        let mut request = self.http.get(&self.config.rows_url).query(&[
            ("dataset", self.config.dataset.as_str()),
            ("config", self.config.config.as_str()),
            ("split", self.config.split.as_str()),
            ("offset", offset_param.as_str()),
            ("length", length_param.as_str()),
        ]);
        if let Some(token) = &self.config.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| PipelineError::dataset(format!("rows request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PipelineError::dataset(e.to_string()))?;
        if !status.is_success() {
            return Err(PipelineError::dataset(format!(
                "rows request returned {}: {}",
                status, body
            )));
        }

        parse_rows_page(&body)
    }
}

/// Decode the rows of a page, skipping the malformed ones.
fn collect_rows(page: RowsPage, into: &mut Vec<RawQuote>) {
    for entry in page.rows {
        match serde_json::from_value::<RawQuote>(entry.row) {
            Ok(quote) => into.push(quote),
            Err(e) => warn!(row = entry.row_idx, error = %e, "Skipping malformed dataset row"),
        }
    }
}

#[async_trait]
impl RecordSource for HuggingFaceRowsSource {
    fn describe(&self) -> String {
        format!("{} ({}/{})", self.config.dataset, self.config.config, self.config.split)
    }

    #[instrument(skip(self), fields(dataset = %self.config.dataset))]
    async fn fetch(&self) -> Result<Vec<RawQuote>, PipelineError> {
        let limit = self.config.max_rows.unwrap_or(usize::MAX);
        let mut quotes = Vec::new();
        let mut offset = 0;

        while offset < limit {
            let length = PAGE_LENGTH.min(limit - offset);
            let page = self.fetch_page(offset, length).await?;
            let received = page.rows.len();
            let total = page.num_rows_total;

            collect_rows(page, &mut quotes);
            offset += received;
            debug!(offset = offset, total = total, "Fetched rows page");

            if received == 0 || offset >= total {
                break;
            }
        }

        info!(rows = quotes.len(), "Dataset loaded in memory");
        Ok(quotes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"{
        "features": [],
        "rows": [
            {"row_idx": 0, "row": {"author": "aristotle", "quote": "True happiness comes from gaining insight.", "tags": "knowledge;ethics"}, "truncated_cells": []},
            {"row_idx": 1, "row": {"author": "kant", "quote": "Dare to know.", "tags": null}, "truncated_cells": []},
            {"row_idx": 2, "row": {"author": null, "quote": 12}, "truncated_cells": []}
        ],
        "num_rows_total": 450,
        "num_rows_per_page": 100,
        "partial": false
    }"#;

    #[test]
    fn test_parse_rows_page() {
        let page = parse_rows_page(PAGE).unwrap();
        assert_eq!(page.num_rows_total, 450);
        assert_eq!(page.rows.len(), 3);
    }

    #[test]
    fn test_collect_rows_skips_malformed() {
        let page = parse_rows_page(PAGE).unwrap();
        let mut quotes = Vec::new();

        collect_rows(page, &mut quotes);

        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes[0].author, "aristotle");
        assert_eq!(quotes[0].tags.as_deref(), Some("knowledge;ethics"));
        assert!(quotes[1].tags.is_none());
    }

    #[test]
    fn test_parse_rows_page_error() {
        assert!(matches!(
            parse_rows_page("{\"error\": "),
            Err(PipelineError::DatasetError(_))
        ));
    }

    #[test]
    fn test_config_defaults() {
        let config = HuggingFaceRowsConfig::default().with_max_rows(Some(10));
        assert_eq!(config.dataset, DEFAULT_DATASET);
        assert_eq!(config.config, "default");
        assert_eq!(config.split, "train");
        assert_eq!(config.max_rows, Some(10));
    }

    #[test]
    fn test_describe() {
        let source = HuggingFaceRowsSource::new(HuggingFaceRowsConfig::default()).unwrap();
        assert_eq!(source.describe(), "datastax/philosopher-quotes (default/train)");
    }
}
