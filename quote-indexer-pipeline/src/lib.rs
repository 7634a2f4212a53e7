//! # Quote Indexer Pipeline
//!
//! This crate provides the pipeline that copies a quotes dataset into a
//! staging collection and republishes it to the indexing service.
//!
//! ## Architecture
//!
//! The pipeline runs these stages in order, one call at a time:
//!
//! 1. **Source**: Reads the ordered dataset rows
//! 2. **Loader**: Flushes the staging collection and inserts every record
//! 3. **Registrar**: Makes sure the datasource exists downstream
//! 4. **Driver**: Reads the collection back and indexes every document
//! 5. **Orchestrator**: Runs the stages and collects the run summary
//!
//! Failures of single records or documents are recorded and skipped; only
//! failures that leave nothing to work on end the run.

pub mod driver;
pub mod errors;
pub mod loader;
pub mod orchestrator;
pub mod progress;
pub mod registrar;
pub mod source;
pub mod summary;

#[cfg(test)]
mod test_support;

pub use errors::PipelineError;
