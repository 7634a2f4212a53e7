//! JSON Data API implementation of the staging store.
//!
//! This module provides a client for a document database exposing the JSON
//! Data API, and a collection handle implementing `StagingStore`.

mod client;
mod collection;
mod commands;

pub use client::{parse_hosted_endpoint, DataApiClient, DatabaseInfo, DEFAULT_KEYSPACE};
pub use collection::DataApiCollection;
