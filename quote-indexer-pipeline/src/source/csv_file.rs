//! Dataset source reading a local CSV export.

use std::io;
use std::path::PathBuf;

use async_trait::async_trait;
use tracing::{info, warn};

use super::RecordSource;
use crate::errors::PipelineError;
use quote_indexer_shared::RawQuote;

/// Reads `author,quote,tags` rows from a CSV file with a header line.
pub struct CsvFileSource {
    path: PathBuf,
    max_rows: Option<usize>,
}

impl CsvFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            max_rows: None,
        }
    }

    /// Stop after `max_rows` well-formed rows.
    pub fn with_max_rows(mut self, max_rows: Option<usize>) -> Self {
        self.max_rows = max_rows;
        self
    }
}

/// Read at most `limit` quotes from any CSV reader. Empty `tags` cells
/// become `None`; malformed rows are skipped and do not count.
pub(crate) fn read_quotes<R: io::Read>(
    reader: R,
    limit: Option<usize>,
) -> Result<Vec<RawQuote>, PipelineError> {
    let limit = limit.unwrap_or(usize::MAX);
    let mut reader = csv::Reader::from_reader(reader);
    let mut quotes = Vec::new();

    for (line, row) in reader.deserialize::<RawQuote>().enumerate() {
        if quotes.len() >= limit {
            break;
        }
        match row {
            Ok(quote) => quotes.push(quote),
            Err(e) if e.is_io_error() => {
                return Err(PipelineError::dataset(format!("failed reading CSV: {}", e)));
            }
            Err(e) => warn!(row = line, error = %e, "Skipping malformed CSV row"),
        }
    }

    Ok(quotes)
}

#[async_trait]
impl RecordSource for CsvFileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch(&self) -> Result<Vec<RawQuote>, PipelineError> {
        let file = std::fs::File::open(&self.path).map_err(|e| {
            PipelineError::dataset(format!("cannot open {}: {}", self.path.display(), e))
        })?;

        let quotes = read_quotes(file, self.max_rows)?;
        info!(path = %self.path.display(), rows = quotes.len(), "Dataset loaded in memory");
        Ok(quotes)
    }
}
