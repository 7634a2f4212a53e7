//! # Quote Indexer Shared
//!
//! Shared data model for the quote indexer: the dataset rows, the records
//! staged in the document store, and the documents published to the
//! indexing service.

pub mod datasource;
pub mod document;
pub mod record;

pub use datasource::{DatasourceConfig, ObjectDefinition};
pub use document::{ContentDefinition, DocumentPermissions, IndexedDocument, StagedDocument};
pub use record::{into_records, split_tags, RawQuote, Record};
