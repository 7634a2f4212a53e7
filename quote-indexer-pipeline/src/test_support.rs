//! In-memory fakes of the external services, shared by the unit tests.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::errors::PipelineError;
use crate::progress::ProgressReporter;
use crate::source::RecordSource;
use crate::summary::{ItemResult, Stage, StageSummary};
use quote_indexer_repository::{
    DeletedCount, DocumentPage, IndexApiError, IndexingService, RegistrationOutcome, StagingError,
    StagingStore,
};
use quote_indexer_shared::{DatasourceConfig, IndexedDocument, RawQuote, StagedDocument};

/// Staging store keeping documents in insertion order.
pub struct MemoryStore {
    documents: Mutex<Vec<Value>>,
    failing_inserts: HashSet<u64>,
    failing_delete: bool,
    failing_count: bool,
    failing_page: Option<usize>,
    page_size: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            documents: Mutex::new(Vec::new()),
            failing_inserts: HashSet::new(),
            failing_delete: false,
            failing_count: false,
            failing_page: None,
            page_size: 20,
        }
    }

    pub fn failing_inserts(mut self, ids: impl IntoIterator<Item = u64>) -> Self {
        self.failing_inserts = ids.into_iter().collect();
        self
    }

    pub fn failing_delete(mut self) -> Self {
        self.failing_delete = true;
        self
    }

    pub fn failing_count(mut self) -> Self {
        self.failing_count = true;
        self
    }

    /// Make reading the page at `index` (zero based) fail.
    pub fn failing_page(mut self, index: usize) -> Self {
        self.failing_page = Some(index);
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Store a document as is, bypassing validation.
    pub fn put_raw(&self, document: Value) {
        self.documents.lock().unwrap().push(document);
    }

    pub fn len(&self) -> usize {
        self.documents.lock().unwrap().len()
    }

    pub fn get(&self, id: u64) -> Option<StagedDocument> {
        self.documents
            .lock()
            .unwrap()
            .iter()
            .find(|doc| doc.get("_id") == Some(&json!(id)))
            .and_then(|doc| StagedDocument::from_json(doc).ok())
    }
}

#[async_trait]
impl StagingStore for MemoryStore {
    async fn delete_all(&self) -> Result<DeletedCount, StagingError> {
        if self.failing_delete {
            return Err(StagingError::connection("connection reset"));
        }
        let mut documents = self.documents.lock().unwrap();
        let deleted = documents.len() as u64;
        documents.clear();
        Ok(DeletedCount::Exact(deleted))
    }

    async fn insert_one(&self, document: &StagedDocument) -> Result<(), StagingError> {
        if self.failing_inserts.contains(&document.id) {
            return Err(StagingError::command("insertOne", None, "write rejected"));
        }
        let mut documents = self.documents.lock().unwrap();
        if documents
            .iter()
            .any(|doc| doc.get("_id") == Some(&json!(document.id)))
        {
            return Err(StagingError::DuplicateKey(document.id.to_string()));
        }
        documents.push(serde_json::to_value(document).unwrap());
        Ok(())
    }

    async fn find_page(&self, page_state: Option<&str>) -> Result<DocumentPage, StagingError> {
        let offset: usize = match page_state {
            Some(state) => state.parse().map_err(|_| StagingError::parse("bad page state"))?,
            None => 0,
        };
        if self.failing_page == Some(offset / self.page_size) {
            return Err(StagingError::connection("cursor lost"));
        }

        let documents = self.documents.lock().unwrap();
        let end = (offset + self.page_size).min(documents.len());
        let next_page_state = (end < documents.len()).then(|| end.to_string());

        Ok(DocumentPage {
            documents: documents[offset.min(end)..end].to_vec(),
            next_page_state,
        })
    }

    async fn estimated_count(&self) -> Result<u64, StagingError> {
        if self.failing_count {
            return Err(StagingError::HttpStatus {
                status: 500,
                body: "count unavailable".to_string(),
            });
        }
        Ok(self.len() as u64)
    }
}

/// Indexing service remembering what it was sent.
pub struct RecordingIndex {
    indexed: Mutex<Vec<IndexedDocument>>,
    failing_documents: HashSet<String>,
    datasource_error: Option<IndexApiError>,
    datasource_calls: AtomicUsize,
}

impl RecordingIndex {
    pub fn new() -> Self {
        Self {
            indexed: Mutex::new(Vec::new()),
            failing_documents: HashSet::new(),
            datasource_error: None,
            datasource_calls: AtomicUsize::new(0),
        }
    }

    pub fn failing_documents<'a>(mut self, ids: impl IntoIterator<Item = &'a str>) -> Self {
        self.failing_documents = ids.into_iter().map(str::to_string).collect();
        self
    }

    /// Answer every datasource call with `error`.
    pub fn with_datasource_error(mut self, error: IndexApiError) -> Self {
        self.datasource_error = Some(error);
        self
    }

    pub fn indexed(&self) -> Vec<IndexedDocument> {
        self.indexed.lock().unwrap().clone()
    }

    pub fn indexed_ids(&self) -> Vec<String> {
        self.indexed().into_iter().map(|doc| doc.id).collect()
    }

    pub fn datasource_calls(&self) -> usize {
        self.datasource_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IndexingService for RecordingIndex {
    async fn create_or_update_datasource(
        &self,
        config: &DatasourceConfig,
    ) -> Result<RegistrationOutcome, IndexApiError> {
        let previous = self.datasource_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = &self.datasource_error {
            return Err(error.clone());
        }
        if previous > 0 {
            return Err(IndexApiError::from_status(
                400,
                format!("Datasource {} already exists", config.name),
            ));
        }
        Ok(RegistrationOutcome::Registered)
    }

    async fn index_document(&self, document: &IndexedDocument) -> Result<(), IndexApiError> {
        if self.failing_documents.contains(&document.id) {
            return Err(IndexApiError::from_status(500, "internal error".to_string()));
        }
        self.indexed.lock().unwrap().push(document.clone());
        Ok(())
    }
}

/// Progress reporter keeping every event.
#[derive(Default)]
pub struct RecordingProgress {
    items: Mutex<Vec<(Stage, u64, Option<u64>, bool)>>,
    finished: Mutex<Vec<Stage>>,
}

impl RecordingProgress {
    /// `(processed, total, success)` of every item of `stage`.
    pub fn items(&self, stage: Stage) -> Vec<(u64, Option<u64>, bool)> {
        self.items
            .lock()
            .unwrap()
            .iter()
            .filter(|(s, ..)| *s == stage)
            .map(|(_, processed, total, ok)| (*processed, *total, *ok))
            .collect()
    }

    pub fn finished_stages(&self) -> Vec<Stage> {
        self.finished.lock().unwrap().clone()
    }
}

impl ProgressReporter for RecordingProgress {
    fn stage_started(&self, _stage: Stage, _total: Option<u64>) {}

    fn item_finished(&self, stage: Stage, result: &ItemResult, processed: u64, total: Option<u64>) {
        self.items
            .lock()
            .unwrap()
            .push((stage, processed, total, result.success));
    }

    fn stage_finished(&self, summary: &StageSummary) {
        self.finished.lock().unwrap().push(summary.stage);
    }
}

/// Source returning a fixed list of rows, or an error.
pub struct StaticSource {
    rows: Result<Vec<RawQuote>, String>,
}

impl StaticSource {
    pub fn new(rows: Vec<RawQuote>) -> Self {
        Self { rows: Ok(rows) }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            rows: Err(message.to_string()),
        }
    }
}

#[async_trait]
impl RecordSource for StaticSource {
    fn describe(&self) -> String {
        "static".to_string()
    }

    async fn fetch(&self) -> Result<Vec<RawQuote>, PipelineError> {
        self.rows.clone().map_err(PipelineError::dataset)
    }
}
