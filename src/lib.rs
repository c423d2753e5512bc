//! # WebM Converter Library
//!
//! Batch conversion of video and GIF trees to WebM through an external
//! encoder (ffmpeg).
//!
//! ## Module layout:
//! - `config`: run configuration and its validation
//! - `error`: error types, fatal and per-file
//! - `time_range`: `--range` parsing
//! - `file_manager`: discovery of convertible files
//! - `encoder`: argument building and the `Encoder` abstraction
//! - `converter`: bounded concurrent orchestration of a batch
//! - `platform`: encoder binary lookup
//! - `progress`: progress bar and batch counters
//!
//! ## Usage:
//! ```ignore
//! use webm_converter::{BatchConverter, BatchJob, Config, FfmpegEncoder};
//!
//! let config = Config::default();
//! let job = BatchJob::discover(&path, &config)?;
//! let result = BatchConverter::new(job, Arc::new(FfmpegEncoder::new("ffmpeg"))).run().await;
//! println!("{}", result.format_summary());
//! ```

pub mod config;
pub mod converter;
pub mod encoder;
pub mod error;
pub mod file_manager;
pub mod platform;
pub mod progress;
pub mod time_range;

pub use config::Config;
pub use converter::{BatchConverter, BatchJob};
pub use encoder::{ConversionRequest, Encoder, EncoderInvocation, FfmpegEncoder, Quality};
pub use error::{ConvertError, TimeParseError};
pub use progress::BatchResult;
pub use time_range::TimeRange;
