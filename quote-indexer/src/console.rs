//! Colored console output for interactive runs.

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};

use colored::*;

use quote_indexer_pipeline::progress::ProgressReporter;
use quote_indexer_pipeline::summary::{
    ItemResult, RegistrationReport, RunSummary, Stage, StageSummary,
};
use quote_indexer_repository::DatabaseInfo;

/// Prints a live progress counter per stage and one line per failure.
#[derive(Debug, Default)]
pub struct ConsoleProgress {
    counter_open: AtomicBool,
}

impl ConsoleProgress {
    pub fn new() -> Self {
        Self::default()
    }

    fn close_counter(&self) {
        if self.counter_open.swap(false, Ordering::SeqCst) {
            eprintln!();
        }
    }
}

impl ProgressReporter for ConsoleProgress {
    fn stage_started(&self, stage: Stage, total: Option<u64>) {
        self.close_counter();
        let total = total.map(|t| t.to_string()).unwrap_or_else(|| "?".to_string());
        println!("{} {} ({} expected)", "[INFO]".blue(), stage.description(), total);
    }

    fn item_finished(&self, stage: Stage, result: &ItemResult, processed: u64, total: Option<u64>) {
        if !result.success {
            self.close_counter();
            eprintln!(
                "{} {} {}: {}",
                "[ERROR]".red(),
                stage,
                result.id,
                result.error.as_deref().unwrap_or("unknown error")
            );
        }

        let mut stderr = io::stderr();
        let _ = write!(stderr, "\r{}", progress_line(stage, processed, total));
        let _ = stderr.flush();
        self.counter_open.store(true, Ordering::SeqCst);
    }

    fn stage_finished(&self, summary: &StageSummary) {
        self.close_counter();
        let line = stage_line(summary);
        if summary.is_clean() {
            println!("{} {}", "[ OK ]".green(), line);
        } else {
            println!("{} {}", "[WARN]".yellow(), line);
        }
    }
}

/// `"Indexing documents: 12/450 (2%)"`, or without a percentage when the
/// total is unknown.
pub fn progress_line(stage: Stage, processed: u64, total: Option<u64>) -> String {
    match total {
        Some(total) if total > 0 => format!(
            "{}: {}/{} ({}%)",
            stage.description(),
            processed,
            total,
            processed.saturating_mul(100) / total
        ),
        _ => format!("{}: {}", stage.description(), processed),
    }
}

fn stage_line(summary: &StageSummary) -> String {
    let mut line = format!(
        "{}: {} succeeded, {} failed",
        summary.stage.description(),
        summary.succeeded,
        summary.failed
    );
    if let Some(reason) = &summary.interrupted {
        line.push_str(&format!(" (interrupted: {})", reason));
    }
    line
}

/// Print what the run is connected to.
pub fn print_banner(database: &DatabaseInfo, collection: &str, datasource: &str) {
    println!("{}", "=".repeat(60));
    println!("{} Connected to DB {}", "[ OK ]".green(), database.name.bold());
    if let Some(region) = &database.region {
        println!("       region: {}", region);
    }
    println!("       keyspace: {}", database.keyspace);
    println!("       collection: {}", collection);
    println!("       datasource: {}", datasource);
    println!("{}", "=".repeat(60));
}

/// Plain-text lines describing a finished run.
pub fn summary_lines(summary: &RunSummary) -> Vec<String> {
    let mut lines = vec![
        format!("Run {}", summary.run_id),
        format!("  Duration: {:.1}s", summary.elapsed().num_milliseconds() as f64 / 1000.0),
    ];

    if let Some(fetched) = summary.fetched {
        lines.push(format!("  Rows read: {}", fetched));
    }
    if let Some(flushed) = summary.flushed {
        lines.push(format!("  Documents flushed: {}", flushed));
    }
    if let Some(load) = &summary.load {
        lines.push(format!("  {}", stage_line(load)));
    }
    if let Some(registration) = &summary.registration {
        let text = match registration {
            RegistrationReport::Registered => "registered".to_string(),
            RegistrationReport::AlreadyExists => "already exists".to_string(),
            RegistrationReport::Rejected(reason) => format!("rejected: {}", reason),
            RegistrationReport::Failed(reason) => format!("failed: {}", reason),
        };
        lines.push(format!("  Datasource: {}", text));
    }
    if let Some(index) = &summary.index {
        lines.push(format!("  {}", stage_line(index)));
    }

    lines
}

/// Print the run summary with a status line.
pub fn print_summary(summary: &RunSummary) {
    println!();
    for line in summary_lines(summary) {
        println!("{}", line);
    }
    if summary.has_failures() {
        println!("{} Finished with failures", "[WARN]".yellow());
    } else {
        println!("{} Finished", "[ OK ]".green());
    }
}
