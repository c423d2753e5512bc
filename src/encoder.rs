//! # Encoder Module
//!
//! Builds the ffmpeg command line for one file and runs it.
//!
//! ## Responsibilities:
//! - Map the quality tier to a VP9 CRF value
//! - Normalize the output path to a `.webm` file
//! - Inject the optional seek/cutoff pair
//! - Run the encoder as a child process and map its exit status
//!
//! ## Encoder command line (argument order is fixed):
//! ```text
//! -i <input> [-ss <start> -to <end>] -c:v libvpx-vp9 -crf <crf> -b:v 0 -b:a 128k -c:a libopus <output>
//! ```
//!
//! ## Quality tiers (CRF, lower = better quality):
//! - `max`: 15
//! - `medium`: 30
//! - `low`: 45
//!
//! ## Example:
//! ```ignore
//! let request = ConversionRequest::new(input, output, Quality::Medium, None);
//! let invocation = request.build();
//! FfmpegEncoder::new("ffmpeg").execute(&invocation).await?;
//! ```

use crate::error::ConvertError;
use crate::time_range::TimeRange;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

/// Extension of the produced container
pub const TARGET_EXTENSION: &str = "webm";

const VIDEO_CODEC: &str = "libvpx-vp9";
const AUDIO_CODEC: &str = "libopus";
const AUDIO_BITRATE: &str = "128k";

/// Encoder quality preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    Max,
    #[default]
    Medium,
    Low,
}

impl Quality {
    /// Constant rate factor passed to the VP9 encoder
    pub fn crf(&self) -> u8 {
        match self {
            Self::Max => 15,
            Self::Medium => 30,
            Self::Low => 45,
        }
    }
}

/// Everything needed to convert one file
#[derive(Debug, Clone)]
pub struct ConversionRequest {
    input_path: PathBuf,
    output_path: PathBuf,
    quality: Quality,
    range: Option<TimeRange>,
}

impl ConversionRequest {
    pub fn new(
        input_path: PathBuf,
        output_path: PathBuf,
        quality: Quality,
        range: Option<TimeRange>,
    ) -> Self {
        Self {
            input_path,
            output_path,
            quality,
            range,
        }
    }

    /// Output path with the target extension enforced.
    ///
    /// A caller path that already ends in `.webm` is kept. Anything else is
    /// replaced by `<dir of caller path>/<input file name>.webm`, so
    /// `out/clip.mp4` becomes `out/clip.mp4.webm`.
    pub fn effective_output_path(&self) -> PathBuf {
        if self.output_path.extension() == Some(OsStr::new(TARGET_EXTENSION)) {
            return self.output_path.clone();
        }

        let mut file_name = self
            .input_path
            .file_name()
            .map(OsStr::to_os_string)
            .unwrap_or_default();
        file_name.push(".");
        file_name.push(TARGET_EXTENSION);

        let dir = self.output_path.parent().unwrap_or(Path::new(""));
        dir.join(file_name)
    }

    /// Build the encoder argument list
    pub fn build(&self) -> EncoderInvocation {
        let output_path = self.effective_output_path();
        let mut args: Vec<OsString> = vec!["-i".into(), self.input_path.clone().into()];

        if let Some(range) = self.range {
            args.push("-ss".into());
            args.push(format!("{:.6}", range.start_seconds()).into());
            args.push("-to".into());
            args.push(format!("{:.6}", range.end_seconds()).into());
        }

        let crf = self.quality.crf().to_string();
        for arg in [
            "-c:v",
            VIDEO_CODEC,
            "-crf",
            crf.as_str(),
            "-b:v",
            "0",
            "-b:a",
            AUDIO_BITRATE,
            "-c:a",
            AUDIO_CODEC,
        ] {
            args.push(arg.into());
        }
        args.push(output_path.clone().into());

        EncoderInvocation {
            input_path: self.input_path.clone(),
            output_path,
            args,
        }
    }
}

/// A fully built encoder command line
#[derive(Debug, Clone, PartialEq)]
pub struct EncoderInvocation {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub args: Vec<OsString>,
}

impl EncoderInvocation {
    /// Arguments as a single printable string, for logs
    pub fn display_args(&self) -> String {
        self.args
            .iter()
            .map(|arg| arg.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Runs one encoder invocation to completion.
///
/// Implementations must be shareable across worker tasks.
#[async_trait]
pub trait Encoder: Send + Sync {
    async fn execute(&self, invocation: &EncoderInvocation) -> Result<(), ConvertError>;
}

/// Encoder backed by an ffmpeg child process
#[derive(Debug, Clone)]
pub struct FfmpegEncoder {
    program: PathBuf,
    timeout: Option<Duration>,
}

impl FfmpegEncoder {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            timeout: None,
        }
    }

    /// Kill the child and fail the item when it runs longer than `timeout`
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    async fn run(&self, invocation: &EncoderInvocation) -> Result<(), ConvertError> {
        let status = Command::new(&self.program)
            .args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .status()
            .await
            .map_err(|e| {
                ConvertError::EncoderFailed(format!(
                    "failed to execute {}: {}",
                    self.program.display(),
                    e
                ))
            })?;

        if !status.success() {
            return Err(ConvertError::EncoderFailed(format!(
                "error converting {}: {}",
                invocation.input_path.display(),
                status
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl Encoder for FfmpegEncoder {
    async fn execute(&self, invocation: &EncoderInvocation) -> Result<(), ConvertError> {
        debug!("{} {}", self.program.display(), invocation.display_args());

        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.run(invocation))
                .await
                .map_err(|_| {
                    ConvertError::EncoderFailed(format!(
                        "timed out after {:?} converting {}",
                        limit,
                        invocation.input_path.display()
                    ))
                })?,
            None => self.run(invocation).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args_of(invocation: &EncoderInvocation) -> Vec<String> {
        invocation
            .args
            .iter()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_quality_crf() {
        assert_eq!(Quality::Max.crf(), 15);
        assert_eq!(Quality::Medium.crf(), 30);
        assert_eq!(Quality::Low.crf(), 45);
        assert_eq!(Quality::default(), Quality::Medium);
    }

    #[test]
    fn test_build_without_range() {
        let request = ConversionRequest::new(
            PathBuf::from("in/clip.mp4"),
            PathBuf::from("out/clip.webm"),
            Quality::Max,
            None,
        );
        let invocation = request.build();

        assert_eq!(
            args_of(&invocation),
            vec![
                "-i", "in/clip.mp4", "-c:v", "libvpx-vp9", "-crf", "15", "-b:v", "0", "-b:a",
                "128k", "-c:a", "libopus", "out/clip.webm",
            ]
        );
        assert_eq!(invocation.output_path, PathBuf::from("out/clip.webm"));
    }

    #[test]
    fn test_build_with_range() {
        let request = ConversionRequest::new(
            PathBuf::from("clip.gif"),
            PathBuf::from("clip.webm"),
            Quality::Low,
            Some(TimeRange::new(62.0, 150.5)),
        );

        assert_eq!(
            args_of(&request.build()),
            vec![
                "-i", "clip.gif", "-ss", "62.000000", "-to", "150.500000", "-c:v", "libvpx-vp9",
                "-crf", "45", "-b:v", "0", "-b:a", "128k", "-c:a", "libopus", "clip.webm",
            ]
        );
    }

    #[test]
    fn test_wrong_extension_uses_input_base_name() {
        let request = ConversionRequest::new(
            PathBuf::from("videos/clip.mp4"),
            PathBuf::from("dest/out.mp4"),
            Quality::Medium,
            None,
        );
        let output = request.build().output_path;

        assert_eq!(output, PathBuf::from("dest/clip.mp4.webm"));
        assert_eq!(output.extension(), Some(OsStr::new("webm")));
        assert!(output
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("clip"));
    }

    #[test]
    fn test_uppercase_webm_is_not_target_extension() {
        let request = ConversionRequest::new(
            PathBuf::from("a.WEBM"),
            PathBuf::from("dest/a.WEBM"),
            Quality::Medium,
            None,
        );
        assert_eq!(
            request.effective_output_path(),
            PathBuf::from("dest/a.WEBM.webm")
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_ffmpeg_encoder_maps_exit_status() {
        let request = ConversionRequest::new(
            PathBuf::from("clip.mp4"),
            PathBuf::from("clip.webm"),
            Quality::Medium,
            None,
        );
        let invocation = request.build();

        tokio_test::assert_ok!(FfmpegEncoder::new("true").execute(&invocation).await);

        let err = FfmpegEncoder::new("false")
            .execute(&invocation)
            .await
            .unwrap_err();
        assert!(matches!(err, ConvertError::EncoderFailed(_)));
    }

    #[tokio::test]
    async fn test_missing_program_is_encoder_failure() {
        let invocation = ConversionRequest::new(
            PathBuf::from("clip.mp4"),
            PathBuf::from("clip.webm"),
            Quality::Medium,
            None,
        )
        .build();

        let err = FfmpegEncoder::new("definitely-not-an-encoder-binary")
            .execute(&invocation)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("failed to execute"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_timeout_fails_item() {
        let invocation = EncoderInvocation {
            input_path: PathBuf::from("clip.mp4"),
            output_path: PathBuf::from("clip.webm"),
            args: vec!["5".into()],
        };

        let err = FfmpegEncoder::new("sleep")
            .with_timeout(Some(Duration::from_millis(100)))
            .execute(&invocation)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("timed out"));
    }
}
