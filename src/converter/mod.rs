//! # Converter Module
//!
//! Batch conversion split into submodules:
//! - `batch_job`: what to convert and with which settings
//! - `batch_converter`: main orchestrator (admission gate, fan-out, join)
//! - `task_converter`: worker for a single file
//! - `progress_tracker`: collector folding per-file outcomes
//! - `path_resolver`: destination path mirroring

pub mod batch_converter;
pub mod batch_job;
pub mod path_resolver;
pub mod progress_tracker;
pub mod task_converter;

pub use batch_converter::BatchConverter;
pub use batch_job::BatchJob;
pub use path_resolver::PathResolver;
pub use progress_tracker::{ItemOutcome, ItemState, ProgressTracker};
pub use task_converter::TaskConverter;
