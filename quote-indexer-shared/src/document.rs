//! Staged and indexed document types.
//!
//! A [`StagedDocument`] is a [`Record`] as persisted in the staging
//! collection. An [`IndexedDocument`] is derived from it deterministically
//! and has no lifecycle of its own.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::record::Record;

/// Mime type of every published document body.
pub const TEXT_PLAIN: &str = "text/plain";

/// A record as stored in the staging collection, keyed by `_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagedDocument {
    #[serde(rename = "_id")]
    pub id: u64,
    pub author: String,
    pub quote: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl StagedDocument {
    /// Decode a document read back from the store.
    pub fn from_json(value: &Value) -> Result<Self, serde_json::Error> {
        Self::deserialize(value)
    }

    /// Best-effort id of a raw stored document, for logging.
    pub fn id_hint(value: &Value) -> String {
        match value.get("_id") {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => "<unknown>".to_string(),
        }
    }

    /// Title published for this document: `"<author> quote_<id>"`.
    pub fn title(&self) -> String {
        format!("{} quote_{}", self.author, self.id)
    }

    /// Plain-text body published for this document.
    pub fn body(&self) -> &str {
        &self.quote
    }
}

impl From<Record> for StagedDocument {
    fn from(record: Record) -> Self {
        Self {
            id: record.id,
            author: record.author,
            quote: record.quote,
            tags: record.tags,
        }
    }
}

impl From<&Record> for StagedDocument {
    fn from(record: &Record) -> Self {
        record.clone().into()
    }
}

/// Document body as sent to the indexing service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentDefinition {
    pub mime_type: String,
    pub text_content: String,
}

/// Access permissions of a published document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentPermissions {
    pub allow_anonymous_access: bool,
}

/// Document as published to the indexing service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexedDocument {
    pub id: String,
    pub datasource: String,
    pub title: String,
    #[serde(rename = "viewURL")]
    pub view_url: String,
    pub body: ContentDefinition,
    pub permissions: DocumentPermissions,
}

impl IndexedDocument {
    /// Derive the published form of a staged document.
    ///
    /// `view_url_base` is the prefix every document's view URL starts with;
    /// it must match the datasource URL pattern.
    pub fn from_staged(doc: &StagedDocument, datasource: &str, view_url_base: &str) -> Self {
        let id = doc.id.to_string();
        Self {
            view_url: format!("{}/{}", view_url_base.trim_end_matches('/'), id),
            id,
            datasource: datasource.to_string(),
            title: doc.title(),
            body: ContentDefinition {
                mime_type: TEXT_PLAIN.to_string(),
                text_content: doc.body().to_string(),
            },
            permissions: DocumentPermissions {
                allow_anonymous_access: true,
            },
        }
    }
}
