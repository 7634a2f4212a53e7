//! Input records.
//!
//! A [`RawQuote`] is one row as the dataset provider hands it over. The
//! pipeline turns the ordered rows into [`Record`]s, assigning each a
//! synthetic id from its position.

use serde::{Deserialize, Serialize};

/// Separator used by the dataset between tags.
pub const TAG_SEPARATOR: char = ';';

/// A single row from the quotes dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawQuote {
    pub author: String,
    pub quote: String,
    /// Delimited tag string, e.g. `"ethics;knowledge"`.
    #[serde(default)]
    pub tags: Option<String>,
}

impl RawQuote {
    pub fn new(author: impl Into<String>, quote: impl Into<String>, tags: Option<&str>) -> Self {
        Self {
            author: author.into(),
            quote: quote.into(),
            tags: tags.map(str::to_string),
        }
    }
}

/// A quote with its synthetic identifier.
///
/// `id` is unique within a sync run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: u64,
    pub author: String,
    pub quote: String,
    pub tags: Vec<String>,
}

impl Record {
    /// Build a record from a raw row and the id assigned to it.
    pub fn from_raw(id: u64, raw: RawQuote) -> Self {
        Self {
            id,
            author: raw.author,
            quote: raw.quote,
            tags: split_tags(raw.tags.as_deref()),
        }
    }
}

/// Split a delimited tag string. Missing or empty input gives no tags.
pub fn split_tags(tags: Option<&str>) -> Vec<String> {
    match tags {
        Some(tags) if !tags.is_empty() => tags.split(TAG_SEPARATOR).map(str::to_string).collect(),
        _ => Vec::new(),
    }
}

/// Assign sequential ids, starting at 0, in input order.
pub fn into_records(rows: Vec<RawQuote>) -> Vec<Record> {
    rows.into_iter()
        .enumerate()
        .map(|(i, raw)| Record::from_raw(i as u64, raw))
        .collect()
}
