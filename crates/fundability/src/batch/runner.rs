use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

use crate::intake;
use crate::scoring::{self, Snapshot};

pub const DEFAULT_CHUNK_SIZE: usize = 5;
pub const DEFAULT_CHUNK_DELAY: Duration = Duration::from_millis(1_000);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchSuccess {
    pub row: usize,
    pub email: Option<String>,
    pub snapshot: Snapshot,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchFailure {
    pub row: usize,
    pub email: Option<String>,
    pub errors: Vec<String>,
}

/// Per-record outcomes of a batch run; `row` is the zero-based input position.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchReport {
    pub total: usize,
    pub succeeded: Vec<BatchSuccess>,
    pub failed: Vec<BatchFailure>,
}

impl BatchReport {
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.succeeded.len() as f64 / self.total as f64
        }
    }
}

/// Scores records in fixed-size concurrent chunks with a courtesy pause
/// between chunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchRunner {
    chunk_size: usize,
    delay: Duration,
}

impl Default for BatchRunner {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE, DEFAULT_CHUNK_DELAY)
    }
}

impl BatchRunner {
    /// A chunk size of zero is raised to one.
    pub fn new(chunk_size: usize, delay: Duration) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
            delay,
        }
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Validate and score every record.
    pub async fn run(&self, records: Vec<Value>) -> BatchReport {
        self.run_with(records, |record| {
            intake::validate(record)
                .map(|input| scoring::score(&input))
                .map_err(|errors| errors.into_details())
        })
        .await
    }

    /// Run a custom evaluation per record; panics become per-record failures.
    pub async fn run_with<F>(&self, records: Vec<Value>, evaluate: F) -> BatchReport
    where
        F: Fn(&Value) -> Result<Snapshot, Vec<String>> + Send + Sync + 'static,
    {
        let evaluate = Arc::new(evaluate);
        let mut report = BatchReport {
            total: records.len(),
            ..BatchReport::default()
        };

        let mut pending = records.into_iter().enumerate().peekable();
        let mut chunk_index = 0usize;

        while pending.peek().is_some() {
            if chunk_index > 0 && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }

            let handles: Vec<_> = pending
                .by_ref()
                .take(self.chunk_size)
                .map(|(row, record)| {
                    let email = record
                        .get("email")
                        .and_then(Value::as_str)
                        .map(str::to_string);
                    let evaluate = Arc::clone(&evaluate);
                    let handle = tokio::spawn(async move { (*evaluate)(&record) });
                    (row, email, handle)
                })
                .collect();

            for (row, email, handle) in handles {
                match handle.await {
                    Ok(Ok(snapshot)) => report.succeeded.push(BatchSuccess {
                        row,
                        email,
                        snapshot,
                    }),
                    Ok(Err(errors)) => report.failed.push(BatchFailure { row, email, errors }),
                    Err(join_error) => {
                        tracing::error!(row, error = %join_error, "batch record evaluation aborted");
                        report.failed.push(BatchFailure {
                            row,
                            email,
                            errors: vec!["Internal server error".to_string()],
                        });
                    }
                }
            }

            tracing::debug!(
                chunk = chunk_index,
                succeeded = report.succeeded.len(),
                failed = report.failed.len(),
                "batch chunk complete"
            );
            chunk_index += 1;
        }

        report
    }
}
