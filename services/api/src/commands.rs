use clap::Args;
use fundability::batch::{records_from_path, write_report, BatchReport, BatchRunner};
use fundability::config::AppConfig;
use fundability::error::AppError;
use fundability::intake::{self, ValidationErrors};
use fundability::scoring::{self, Snapshot};
use serde::Serialize;
use serde_json::Value;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// JSON file containing one applicant record
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Pretty-print the snapshot
    #[arg(long, default_value_t = false)]
    pub(crate) pretty: bool,
}

#[derive(Args, Debug)]
pub(crate) struct BatchArgs {
    /// CSV file whose headers are applicant field names
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Where to write the report CSV (stdout when omitted)
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
    /// Records scored concurrently per chunk (defaults to BATCH_CHUNK_SIZE)
    #[arg(long)]
    pub(crate) chunk_size: Option<usize>,
    /// Pause between chunks in milliseconds (defaults to BATCH_CHUNK_DELAY_MS)
    #[arg(long)]
    pub(crate) delay_ms: Option<u64>,
}

#[derive(Debug, Serialize, PartialEq)]
pub(crate) struct BatchSummary {
    pub(crate) total: usize,
    pub(crate) succeeded: usize,
    pub(crate) failed: usize,
    pub(crate) success_rate_pct: f64,
}

impl BatchSummary {
    fn from_report(report: &BatchReport) -> Self {
        Self {
            total: report.total,
            succeeded: report.succeeded.len(),
            failed: report.failed.len(),
            success_rate_pct: (report.success_rate() * 1000.0).round() / 10.0,
        }
    }
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let raw = read_record(&args.input)?;
    let snapshot = score_record(&raw)?;
    let rendered = if args.pretty {
        serde_json::to_string_pretty(&snapshot)
    } else {
        serde_json::to_string(&snapshot)
    }
    .map_err(io::Error::other)?;
    println!("{rendered}");
    Ok(())
}

fn read_record(path: &Path) -> Result<Value, AppError> {
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|err| {
        AppError::from(ValidationErrors::single(format!(
            "{} is not valid JSON: {err}",
            path.display()
        )))
    })
}

pub(crate) fn score_record(raw: &Value) -> Result<Snapshot, AppError> {
    let input = intake::validate(raw)?;
    Ok(scoring::score(&input))
}

pub(crate) async fn run_batch(args: BatchArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let runner = BatchRunner::new(
        args.chunk_size.unwrap_or(config.batch.chunk_size),
        args.delay_ms
            .map(Duration::from_millis)
            .unwrap_or(config.batch.chunk_delay),
    );

    let summary = match &args.output {
        Some(path) => process_batch(&runner, &args.input, File::create(path)?).await?,
        None => process_batch(&runner, &args.input, io::stdout()).await?,
    };

    let rendered = serde_json::to_string(&summary).map_err(io::Error::other)?;
    eprintln!("{rendered}");
    Ok(())
}

pub(crate) async fn process_batch<W: Write>(
    runner: &BatchRunner,
    input: &Path,
    writer: W,
) -> Result<BatchSummary, AppError> {
    let records = records_from_path(input)?;
    let report = runner.run(records).await;
    write_report(writer, &report)?;
    Ok(BatchSummary::from_report(&report))
}
