//! # Task Converter Module
//!
//! Worker for a single file: destination path, directory creation, range
//! parsing, argument building and encoder execution. Every error here only
//! fails the file being converted.

use crate::{
    converter::{batch_job::BatchJob, path_resolver::PathResolver},
    encoder::{ConversionRequest, Encoder},
    error::ConvertError,
    time_range::parse_range,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// Converts one file of a batch
#[derive(Clone)]
pub struct TaskConverter {
    job: Arc<BatchJob>,
    encoder: Arc<dyn Encoder>,
}

impl TaskConverter {
    pub fn new(job: Arc<BatchJob>, encoder: Arc<dyn Encoder>) -> Self {
        Self { job, encoder }
    }

    /// Build the request converting `input_path` into `dest_path`
    pub fn build_request(
        &self,
        input_path: &Path,
        dest_path: PathBuf,
    ) -> Result<ConversionRequest, ConvertError> {
        let range = match self.job.range() {
            Some(option) => parse_range(option)?,
            None => None,
        };

        if let Some(range) = range {
            if range.is_inverted() {
                warn!(
                    "Range {} ends before it starts for {}, passing it to the encoder as-is",
                    range,
                    input_path.display()
                );
            }
        }

        Ok(ConversionRequest::new(
            input_path.to_path_buf(),
            dest_path,
            self.job.quality(),
            range,
        ))
    }

    /// Convert a single file, returning the produced output path
    pub async fn convert_single_file(&self, input_path: &Path) -> Result<PathBuf, ConvertError> {
        let dest_path =
            PathResolver::mirror_path(input_path, self.job.source_root(), self.job.dest_root());
        PathResolver::ensure_parent_dirs(&dest_path).await?;

        let invocation = self.build_request(input_path, dest_path)?.build();
        debug!(
            "Encoding {} -> {}",
            input_path.display(),
            invocation.output_path.display()
        );

        self.encoder.execute(&invocation).await?;
        Ok(invocation.output_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::Config, encoder::EncoderInvocation, encoder::Quality};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Records every invocation and always succeeds
    #[derive(Default)]
    struct RecordingEncoder {
        seen: Mutex<Vec<EncoderInvocation>>,
    }

    #[async_trait]
    impl Encoder for RecordingEncoder {
        async fn execute(&self, invocation: &EncoderInvocation) -> Result<(), ConvertError> {
            self.seen.lock().unwrap().push(invocation.clone());
            Ok(())
        }
    }

    fn job(source: &Path, dest: &Path, range: Option<&str>) -> Arc<BatchJob> {
        let config = Config {
            quality: Quality::Max,
            range: range.map(str::to_string),
            ..Default::default()
        };
        Arc::new(BatchJob::new(
            vec![],
            source.to_path_buf(),
            dest.to_path_buf(),
            &config,
        ))
    }

    #[tokio::test]
    async fn test_convert_mirrors_into_destination() {
        let source = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        let input = source.path().join("trips/2024/clip.mp4");

        let encoder = Arc::new(RecordingEncoder::default());
        let task = TaskConverter::new(
            job(source.path(), dest.path(), Some("1:00-1:30")),
            encoder.clone(),
        );

        let output = task.convert_single_file(&input).await.unwrap();

        assert_eq!(output, dest.path().join("trips/2024/clip.mp4.webm"));
        assert!(dest.path().join("trips/2024").is_dir());

        let seen = encoder.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        let args: Vec<String> = seen[0]
            .args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(&args[2..6], &["-ss", "60.000000", "-to", "90.000000"]);
        assert!(args.contains(&"15".to_string()));
    }

    #[tokio::test]
    async fn test_bad_range_fails_item_before_encoding() {
        let source = TempDir::new().unwrap();
        let encoder = Arc::new(RecordingEncoder::default());
        let task = TaskConverter::new(
            job(source.path(), source.path(), Some("abc-10")),
            encoder.clone(),
        );

        let err = task
            .convert_single_file(&source.path().join("clip.mp4"))
            .await
            .unwrap_err();

        assert!(matches!(err, ConvertError::TimeRange(_)));
        assert!(encoder.seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_malformed_range_is_ignored() {
        let source = TempDir::new().unwrap();
        let task = TaskConverter::new(
            job(source.path(), source.path(), Some("1-2-3")),
            Arc::new(RecordingEncoder::default()),
        );

        let args = task
            .build_request(
                &source.path().join("clip.mp4"),
                source.path().join("clip.mp4"),
            )
            .unwrap()
            .build()
            .display_args();
        assert!(!args.contains("-ss"));
    }
}
