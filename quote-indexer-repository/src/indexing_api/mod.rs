//! REST implementation of the indexing service.

mod client;

pub use client::{customer_endpoint, IndexingApiClient};
