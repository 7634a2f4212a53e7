//! Progress reporting for the item-by-item stages.

use tracing::{debug, info};

use crate::summary::{ItemResult, Stage, StageSummary};

/// Receives a signal before, during and after each item-by-item stage.
///
/// `total` is `None` when the stage could not learn how many items to expect.
pub trait ProgressReporter: Send + Sync {
    fn stage_started(&self, stage: Stage, total: Option<u64>);

    /// Called once per item, whatever its outcome.
    fn item_finished(&self, stage: Stage, result: &ItemResult, processed: u64, total: Option<u64>);

    fn stage_finished(&self, summary: &StageSummary);
}

/// Reports progress as `tracing` events.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogProgress;

impl ProgressReporter for LogProgress {
    fn stage_started(&self, stage: Stage, total: Option<u64>) {
        info!(stage = %stage, total = ?total, "{}", stage.description());
    }

    fn item_finished(&self, stage: Stage, result: &ItemResult, processed: u64, total: Option<u64>) {
        debug!(
            stage = %stage,
            id = %result.id,
            success = result.success,
            processed = processed,
            total = ?total,
            "Item processed"
        );
    }

    fn stage_finished(&self, summary: &StageSummary) {
        info!(
            stage = %summary.stage,
            total = summary.total,
            succeeded = summary.succeeded,
            failed = summary.failed,
            "Stage finished"
        );
    }
}
