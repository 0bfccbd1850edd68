//! Parallel batch driver: one blocking task per document.

use crate::record::CorpusRecord;
use pc_core::BatchConfig;
use pc_rewriter::{OptimizationResult, PromptPipeline};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "reason")]
pub enum BatchStatus {
    Ok,
    TimedOut,
    Failed(String),
}

/// Result for one input record, at the same index as the input.
#[derive(Debug, Clone, Serialize)]
pub struct BatchOutcome {
    pub index: usize,
    pub text: String,
    #[serde(flatten)]
    pub status: BatchStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<OptimizationResult>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchSummary {
    pub documents: usize,
    pub failures: usize,
    pub original_tokens: usize,
    pub optimized_tokens: usize,
    pub diagnostics: usize,
}

impl BatchSummary {
    pub fn token_savings(&self) -> i64 {
        self.original_tokens as i64 - self.optimized_tokens as i64
    }

    pub fn savings_pct(&self) -> f64 {
        if self.original_tokens == 0 {
            return 0.0;
        }
        self.token_savings() as f64 / self.original_tokens as f64 * 100.0
    }

    fn record(&mut self, outcome: &BatchOutcome) {
        self.documents += 1;
        match &outcome.result {
            Some(result) => {
                self.original_tokens += result.savings.original_tokens;
                self.optimized_tokens += result.savings.optimized_tokens;
                self.diagnostics += result.diagnostics.len();
            }
            None => self.failures += 1,
        }
    }
}

/// Optimize every record on the blocking pool, at most
/// `config.concurrency` at a time. Outcomes come back in input order.
pub async fn compress_batch(
    pipeline: Arc<PromptPipeline>,
    records: Vec<CorpusRecord>,
    config: &BatchConfig,
) -> (Vec<BatchOutcome>, BatchSummary) {
    run_batch(records, config, move |text: &str| pipeline.optimize(text)).await
}

/// Batch driver over any per-document job. The semaphore permit is moved
/// into the blocking job, so a timed-out document keeps its slot until the
/// job returns.
pub(crate) async fn run_batch<F>(
    records: Vec<CorpusRecord>,
    config: &BatchConfig,
    job: F,
) -> (Vec<BatchOutcome>, BatchSummary)
where
    F: Fn(&str) -> OptimizationResult + Send + Sync + 'static,
{
    let job = Arc::new(job);
    let semaphore = Arc::new(Semaphore::new(config.concurrency.max(1)));
    let timeout = config.timeout_ms.map(Duration::from_millis);

    let handles: Vec<_> = records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            let job = Arc::clone(&job);
            let semaphore = Arc::clone(&semaphore);
            tokio::spawn(async move {
                let permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(e) => return failed(index, record.text, e.to_string()),
                };
                run_one(job, permit, index, record.text, timeout).await
            })
        })
        .collect();

    let mut outcomes = Vec::with_capacity(handles.len());
    let mut summary = BatchSummary::default();
    for (index, handle) in handles.into_iter().enumerate() {
        let outcome = match handle.await {
            Ok(outcome) => outcome,
            Err(e) => failed(index, String::new(), e.to_string()),
        };
        summary.record(&outcome);
        outcomes.push(outcome);
    }

    tracing::info!(
        documents = summary.documents,
        failures = summary.failures,
        token_savings = summary.token_savings(),
        "batch complete"
    );
    (outcomes, summary)
}

async fn run_one<F>(
    job: Arc<F>,
    permit: OwnedSemaphorePermit,
    index: usize,
    text: String,
    timeout: Option<Duration>,
) -> BatchOutcome
where
    F: Fn(&str) -> OptimizationResult + Send + Sync + 'static,
{
    let input = text.clone();
    let task = tokio::task::spawn_blocking(move || {
        let _permit = permit;
        (*job)(&input)
    });

    let joined = match timeout {
        Some(limit) => match tokio::time::timeout(limit, task).await {
            Ok(joined) => joined,
            Err(_) => {
                tracing::warn!(index, ?limit, "document timed out");
                return BatchOutcome { index, text, status: BatchStatus::TimedOut, result: None };
            }
        },
        None => task.await,
    };

    match joined {
        Ok(result) => BatchOutcome { index, text, status: BatchStatus::Ok, result: Some(result) },
        Err(e) => {
            tracing::warn!(index, error = %e, "document failed");
            failed(index, text, e.to_string())
        }
    }
}

fn failed(index: usize, text: String, reason: String) -> BatchOutcome {
    BatchOutcome { index, text, status: BatchStatus::Failed(reason), result: None }
}
