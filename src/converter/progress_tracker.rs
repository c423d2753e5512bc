//! # Progress Tracking Module
//!
//! Single collector for per-file outcomes. Workers never touch shared
//! counters: each one sends its terminal `ItemOutcome` over a channel and the
//! tracker folds them into the `BatchResult` and the progress bar.

use crate::progress::{BatchResult, ProgressManager};
use std::fmt;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Lifecycle of one file in a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemState {
    Pending,
    Running,
    Succeeded,
    Failed,
}

impl fmt::Display for ItemState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        };
        f.write_str(label)
    }
}

/// Terminal report sent by a worker
#[derive(Debug, Clone)]
pub struct ItemOutcome {
    pub input_path: PathBuf,
    /// Produced file on success, failure cause otherwise
    pub result: Result<PathBuf, String>,
}

impl ItemOutcome {
    pub fn succeeded(input_path: PathBuf, output_path: PathBuf) -> Self {
        Self {
            input_path,
            result: Ok(output_path),
        }
    }

    pub fn failed(input_path: PathBuf, reason: impl Into<String>) -> Self {
        Self {
            input_path,
            result: Err(reason.into()),
        }
    }

    pub fn state(&self) -> ItemState {
        match self.result {
            Ok(_) => ItemState::Succeeded,
            Err(_) => ItemState::Failed,
        }
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or(path.as_os_str())
        .to_string_lossy()
        .into_owned()
}

/// Folds outcomes into the batch result
pub struct ProgressTracker {
    result: BatchResult,
    progress: ProgressManager,
}

impl ProgressTracker {
    pub fn new(total_files: usize, progress: ProgressManager) -> Self {
        Self {
            result: BatchResult::new(total_files),
            progress,
        }
    }

    /// Record one terminal outcome
    pub fn record(&mut self, outcome: ItemOutcome) {
        let name = display_name(&outcome.input_path);

        match outcome.result {
            Ok(output_path) => {
                info!(
                    "Converted {} -> {}",
                    outcome.input_path.display(),
                    output_path.display()
                );
                self.result.add_success();
                self.progress.update(&format!("[OK] {}", name));
            }
            Err(reason) => {
                error!("Failed to convert {}: {}", outcome.input_path.display(), reason);
                self.result.add_failure(outcome.input_path, reason);
                self.progress.update(&format!("[ERROR] {}", name));
            }
        }
    }

    /// Close the progress bar and hand back the counters
    pub fn finish(self) -> BatchResult {
        self.progress.finish();
        self.result
    }

    /// Run the tracker as a task consuming `outcomes` until every sender is dropped
    pub fn spawn_collector(
        mut self,
        mut outcomes: mpsc::UnboundedReceiver<ItemOutcome>,
    ) -> JoinHandle<BatchResult> {
        tokio::spawn(async move {
            while let Some(outcome) = outcomes.recv().await {
                self.record(outcome);
            }
            self.finish()
        })
    }
}
