//! Source module for the quote indexer pipeline.
//!
//! Reads the ordered rows of the quotes dataset.

mod csv_file;
mod huggingface;

use async_trait::async_trait;

use crate::errors::PipelineError;
use quote_indexer_shared::RawQuote;

pub use csv_file::CsvFileSource;
pub use huggingface::{HuggingFaceRowsConfig, HuggingFaceRowsSource, DEFAULT_DATASET};

/// Provider of the dataset rows, in a stable order.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Short description for logs, e.g. the dataset name or file path.
    fn describe(&self) -> String;

    /// Read every row.
    ///
    /// Rows that cannot be decoded are skipped and logged; an error means
    /// the dataset as a whole could not be read.
    async fn fetch(&self) -> Result<Vec<RawQuote>, PipelineError>;
}
