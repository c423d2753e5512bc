//! # Batch Converter Main Orchestrator
//!
//! Fans every discovered file out as its own task, bounded by an admission
//! gate, and waits for all of them before reporting.
//!
//! ## Flow per file:
//! 1. Pending: task spawned, waiting for a gate permit
//! 2. Running: permit held, `TaskConverter` does the work
//! 3. Succeeded / Failed: outcome sent to the collector, permit released
//!
//! ## Guarantees:
//! - At most `workers` files are converting at any instant
//! - A failing (or panicking) file never affects the others
//! - `run` returns only after every file reached a terminal state

use crate::{
    converter::{
        batch_job::BatchJob,
        progress_tracker::{ItemOutcome, ItemState, ProgressTracker},
        task_converter::TaskConverter,
    },
    encoder::Encoder,
    progress::{BatchResult, ProgressManager},
};
use futures::future::join_all;
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};
use tracing::{debug, error, info};

/// Main orchestrator
pub struct BatchConverter {
    job: Arc<BatchJob>,
    encoder: Arc<dyn Encoder>,
    progress: Option<ProgressManager>,
}

impl BatchConverter {
    pub fn new(job: BatchJob, encoder: Arc<dyn Encoder>) -> Self {
        Self {
            job: Arc::new(job),
            encoder,
            progress: None,
        }
    }

    /// Report progress on `progress` instead of staying silent
    pub fn with_progress(mut self, progress: ProgressManager) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Convert every file of the job
    pub async fn run(&self) -> BatchResult {
        let inputs = self.job.files().to_vec();
        let total = inputs.len();

        if total == 0 {
            info!("No supported files found in {}", self.job.source_root().display());
            return BatchResult::new(0);
        }

        info!(
            "Converting {} files with {} workers (quality: {:?})",
            total,
            self.job.workers(),
            self.job.quality()
        );

        let progress = self.progress.clone().unwrap_or_else(ProgressManager::hidden);
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        let collector = ProgressTracker::new(total, progress).spawn_collector(outcome_rx);

        let gate = Arc::new(Semaphore::new(self.job.workers()));
        let mut tasks = Vec::with_capacity(total);

        for input_path in inputs.iter().cloned() {
            let gate = gate.clone();
            let outcome_tx = outcome_tx.clone();
            let task_converter = TaskConverter::new(self.job.clone(), self.encoder.clone());

            tasks.push(tokio::spawn(async move {
                debug!("{}: {}", input_path.display(), ItemState::Pending);

                let outcome = match gate.acquire_owned().await {
                    Ok(permit) => {
                        debug!("{}: {}", input_path.display(), ItemState::Running);
                        info!("Converting {}...", input_path.display());

                        let result = task_converter.convert_single_file(&input_path).await;
                        drop(permit);

                        match result {
                            Ok(output_path) => ItemOutcome::succeeded(input_path, output_path),
                            Err(e) => ItemOutcome::failed(input_path, e.to_string()),
                        }
                    }
                    Err(e) => {
                        ItemOutcome::failed(input_path, format!("admission gate closed: {}", e))
                    }
                };

                // The collector outlives every worker.
                let _ = outcome_tx.send(outcome);
            }));
        }

        // Join barrier
        let joined = join_all(tasks).await;
        for (input_path, joined) in inputs.into_iter().zip(joined) {
            if let Err(e) = joined {
                let _ = outcome_tx.send(ItemOutcome::failed(
                    input_path,
                    format!("worker panicked: {}", e),
                ));
            }
        }
        drop(outcome_tx);

        match collector.await {
            Ok(result) => result,
            Err(e) => {
                error!("Result collector failed: {}", e);
                BatchResult::new(total)
            }
        }
    }
}
