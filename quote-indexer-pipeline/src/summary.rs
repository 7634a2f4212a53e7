//! Per-item results and run summaries.

use std::fmt;

use chrono::{DateTime, Utc};
use quote_indexer_repository::DeletedCount;
use uuid::Uuid;

/// Pipeline stage that processes items one by one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Inserting records into the staging collection.
    Load,
    /// Publishing staged documents to the indexing service.
    Index,
}

impl Stage {
    /// Label used in progress output.
    pub fn description(&self) -> &'static str {
        match self {
            Stage::Load => "Inserting documents",
            Stage::Index => "Indexing documents",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Load => write!(f, "load"),
            Stage::Index => write!(f, "index"),
        }
    }
}

/// Outcome of processing a single item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemResult {
    /// Id of the record or document.
    pub id: String,
    /// Whether the operation succeeded.
    pub success: bool,
    /// Error message if the operation failed.
    pub error: Option<String>,
}

impl ItemResult {
    pub fn succeeded(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            success: true,
            error: None,
        }
    }

    pub fn failed(id: impl Into<String>, error: impl fmt::Display) -> Self {
        Self {
            id: id.into(),
            success: false,
            error: Some(error.to_string()),
        }
    }
}

/// Aggregate of every item result in one stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageSummary {
    pub stage: Stage,
    /// Number of items processed.
    pub total: usize,
    /// Number of successful items.
    pub succeeded: usize,
    /// Number of failed items.
    pub failed: usize,
    /// Individual results, in processing order.
    pub results: Vec<ItemResult>,
    /// Set when the stage stopped before visiting every item.
    pub interrupted: Option<String>,
}

impl StageSummary {
    pub fn new(stage: Stage) -> Self {
        Self {
            stage,
            total: 0,
            succeeded: 0,
            failed: 0,
            results: Vec::new(),
            interrupted: None,
        }
    }

    /// Add one item result.
    pub fn record(&mut self, result: ItemResult) {
        self.total += 1;
        if result.success {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
        self.results.push(result);
    }

    /// Results of the items that failed.
    pub fn failures(&self) -> impl Iterator<Item = &ItemResult> {
        self.results.iter().filter(|r| !r.success)
    }

    /// No item failed and the stage ran to the end.
    pub fn is_clean(&self) -> bool {
        self.failed == 0 && self.interrupted.is_none()
    }
}

/// What happened when registering the datasource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationReport {
    /// Created or updated.
    Registered,
    /// Already present, left as is.
    AlreadyExists,
    /// Rejected by the service: bad configuration or credentials.
    Rejected(String),
    /// The service could not be reached or failed internally.
    Failed(String),
}

impl RegistrationReport {
    /// Whether the datasource can be assumed to exist.
    pub fn is_healthy(&self) -> bool {
        matches!(self, Self::Registered | Self::AlreadyExists)
    }
}

/// Summary of a complete run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Rows read from the dataset, when the load stage ran.
    pub fetched: Option<usize>,
    /// Documents removed by the flush, when the load stage ran.
    pub flushed: Option<DeletedCount>,
    pub load: Option<StageSummary>,
    pub registration: Option<RegistrationReport>,
    pub index: Option<StageSummary>,
}

impl RunSummary {
    pub fn new(run_id: Uuid, started_at: DateTime<Utc>) -> Self {
        Self {
            run_id,
            started_at,
            finished_at: started_at,
            fetched: None,
            flushed: None,
            load: None,
            registration: None,
            index: None,
        }
    }

    /// Whether any item failed, a stage was interrupted, or the
    /// registration was not healthy.
    pub fn has_failures(&self) -> bool {
        let stage_failed = |s: &Option<StageSummary>| s.as_ref().is_some_and(|s| !s.is_clean());
        let registration_failed = self
            .registration
            .as_ref()
            .is_some_and(|r| !r.is_healthy());

        stage_failed(&self.load) || stage_failed(&self.index) || registration_failed
    }

    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}
