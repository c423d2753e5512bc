//! # Progress Tracking and Statistics Module
//!
//! Progress bar and final counters of a batch.
//!
//! ## Components:
//! - `ProgressManager`: `indicatif` bar, one tick per file that reached a
//!   terminal state
//! - `BatchResult`: total/success counters plus the list of failures
//! - `LogWriter`: stderr log sink that hides the bar while a line is written
//!
//! ## Visual feedback:
//! ```text
//! ⠋ [00:02:15] [=========================>--------------] 12/20 (60%) [OK] clip.mp4
//! ```
//!
//! ## Invariant:
//! `success_count <= total_count`, and `total_count` is fixed when the batch
//! is created.

use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing_subscriber::fmt::MakeWriter;

/// Manages progress reporting for a batch
#[derive(Clone)]
pub struct ProgressManager {
    bar: ProgressBar,
}

impl ProgressManager {
    /// Create a new progress manager
    pub fn new(total_files: u64) -> Self {
        let bar = ProgressBar::new(total_files);

        // The template is a literal, so this only fails on a typo in it.
        if let Ok(style) = ProgressStyle::default_bar().template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
        ) {
            bar.set_style(style.progress_chars("=>-"));
        }

        bar.enable_steady_tick(Duration::from_millis(100));

        Self { bar }
    }

    /// A manager that never draws anything
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    /// Update progress with a message
    pub fn update(&self, message: &str) {
        self.bar.inc(1);
        self.bar.set_message(message.to_string());
    }

    /// Remove the bar from the terminal; the summary is printed by the caller
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }
}

/// `MakeWriter` for the tracing subscriber.
///
/// Each log line is buffered and written to stderr inside
/// `ProgressBar::suspend` once a bar is attached, so lines never land on top
/// of the bar.
#[derive(Clone, Default)]
pub struct LogWriter {
    bar: Arc<Mutex<Option<ProgressBar>>>,
}

impl LogWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route subsequent log lines around `progress`
    pub fn attach(&self, progress: &ProgressManager) {
        if let Ok(mut bar) = self.bar.lock() {
            *bar = Some(progress.bar.clone());
        }
    }

    fn current_bar(&self) -> Option<ProgressBar> {
        self.bar.lock().ok().and_then(|bar| bar.clone())
    }
}

impl<'a> MakeWriter<'a> for LogWriter {
    type Writer = LogLine;

    fn make_writer(&'a self) -> Self::Writer {
        LogLine {
            bar: self.current_bar(),
            buffer: Vec::new(),
        }
    }
}

/// One log event, flushed to stderr when dropped
pub struct LogLine {
    bar: Option<ProgressBar>,
    buffer: Vec<u8>,
}

impl Write for LogLine {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for LogLine {
    fn drop(&mut self) {
        if self.buffer.is_empty() {
            return;
        }
        let write = || {
            let _ = io::stderr().lock().write_all(&self.buffer);
        };
        match self.bar {
            Some(ref bar) => bar.suspend(write),
            None => write(),
        }
    }
}

/// A file that did not convert, with the reason
#[derive(Debug, Clone, PartialEq)]
pub struct FailedItem {
    pub path: PathBuf,
    pub reason: String,
}

/// Final counters of a batch
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchResult {
    total_count: usize,
    success_count: usize,
    failures: Vec<FailedItem>,
}

impl BatchResult {
    pub fn new(total_count: usize) -> Self {
        Self {
            total_count,
            ..Default::default()
        }
    }

    pub fn total_count(&self) -> usize {
        self.total_count
    }

    pub fn success_count(&self) -> usize {
        self.success_count
    }

    pub fn failed_count(&self) -> usize {
        self.failures.len()
    }

    pub fn failures(&self) -> &[FailedItem] {
        &self.failures
    }

    pub fn add_success(&mut self) {
        if self.success_count + self.failures.len() < self.total_count {
            self.success_count += 1;
        }
    }

    pub fn add_failure(&mut self, path: PathBuf, reason: String) {
        self.failures.push(FailedItem { path, reason });
    }

    /// Items that never reported a terminal state
    pub fn unaccounted(&self) -> usize {
        self.total_count
            .saturating_sub(self.success_count + self.failures.len())
    }

    pub fn all_succeeded(&self) -> bool {
        self.success_count == self.total_count
    }

    pub fn format_summary(&self) -> String {
        format!(
            "{}/{} files converted successfully",
            self.success_count, self.total_count
        )
    }
}
