use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::*;
use tracing::{error, info};

use quote_indexer::{console, AppConfig, Dependencies, RunOptions};
use quote_indexer_pipeline::progress::{LogProgress, ProgressReporter};
use quote_indexer_pipeline::source::{
    CsvFileSource, HuggingFaceRowsConfig, HuggingFaceRowsSource, RecordSource, DEFAULT_DATASET,
};
use quote_indexer_pipeline::summary::RunSummary;

/// Exit status of a run that completed with item failures, with `--fail-on-errors`.
const EXIT_ITEM_FAILURES: i32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SourceKind {
    /// Hugging Face dataset viewer
    HuggingFace,
    /// Local CSV file with author,quote,tags columns
    Csv,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "quote-indexer")]
#[command(about = "Load a quotes dataset into a staging collection and index it", long_about = None)]
struct Cli {
    /// Where to read the dataset from
    #[arg(long, value_enum, default_value = "hugging-face")]
    source: SourceKind,

    /// Path of the CSV file, with `--source csv`
    #[arg(long, required_if_eq("source", "csv"))]
    csv_path: Option<PathBuf>,

    /// Hugging Face dataset id
    #[arg(long, default_value = DEFAULT_DATASET)]
    dataset: String,

    /// Dataset split
    #[arg(long, default_value = "train")]
    split: String,

    /// Read at most this many rows
    #[arg(long)]
    max_rows: Option<usize>,

    /// Abort when the datasource cannot be registered
    #[arg(long)]
    strict_datasource: bool,

    /// Exit with status 2 when any record or document failed
    #[arg(long)]
    fail_on_errors: bool,

    /// Log output format
    #[arg(long, value_enum, default_value = "text")]
    log_format: LogFormat,

    /// Index what is already staged without reloading the collection
    #[arg(long, conflicts_with = "skip_index")]
    skip_load: bool,

    /// Load the staging collection without indexing it
    #[arg(long)]
    skip_index: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.log_format);

    match run(&cli).await {
        Ok(summary) => {
            if cli.log_format == LogFormat::Text {
                console::print_summary(&summary);
            }
            if cli.fail_on_errors && summary.has_failures() {
                std::process::exit(EXIT_ITEM_FAILURES);
            }
        }
        Err(e) => {
            error!(error = %e, "Quote indexer failed");
            eprintln!("\n{} {}", "[ERROR]".red(), e);

            // Print error chain for debugging
            for cause in e.chain().skip(1) {
                eprintln!("  Caused by: {}", cause);
            }

            std::process::exit(1);
        }
    }
}

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    match format {
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
        LogFormat::Json => tracing_subscriber::fmt().json().with_env_filter(filter).init(),
    }
}

async fn run(cli: &Cli) -> Result<RunSummary> {
    let config = AppConfig::from_env().context("Invalid configuration")?;
    let source = build_source(cli, &config)?;

    let progress: Arc<dyn ProgressReporter> = match cli.log_format {
        LogFormat::Text => Arc::new(console::ConsoleProgress::new()),
        LogFormat::Json => Arc::new(LogProgress),
    };

    let options = RunOptions {
        strict_datasource: cli.strict_datasource,
        skip_load: cli.skip_load,
        skip_index: cli.skip_index,
    };

    let dependencies = Dependencies::new(&config, source, progress, options)
        .await
        .context("Failed to initialize dependencies")?;

    if cli.log_format == LogFormat::Text {
        console::print_banner(
            &dependencies.database,
            &config.db_collection,
            &config.datasource_name,
        );
    }

    info!("Starting quote indexer");
    let summary = dependencies.orchestrator.run().await?;
    Ok(summary)
}

fn build_source(cli: &Cli, config: &AppConfig) -> Result<Box<dyn RecordSource>> {
    match cli.source {
        SourceKind::HuggingFace => {
            let rows_config = HuggingFaceRowsConfig::new(cli.dataset.clone())
                .with_split(cli.split.clone())
                .with_token(config.hf_token.clone())
                .with_max_rows(cli.max_rows);
            Ok(Box::new(HuggingFaceRowsSource::new(rows_config)?))
        }
        SourceKind::Csv => {
            let path = cli
                .csv_path
                .clone()
                .context("--csv-path is required with --source csv")?;
            Ok(Box::new(CsvFileSource::new(path).with_max_rows(cli.max_rows)))
        }
    }
}
