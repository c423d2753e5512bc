//! # Batch Job Module
//!
//! The read-only description of a batch: discovered inputs, source and
//! destination roots, and the settings every worker shares.

use crate::{
    config::Config, encoder::Quality, error::ConvertError, file_manager::FileManager,
};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Inputs and shared settings of one conversion run
#[derive(Debug, Clone)]
pub struct BatchJob {
    files: Vec<PathBuf>,
    source_root: PathBuf,
    dest_root: PathBuf,
    quality: Quality,
    range: Option<String>,
    workers: usize,
}

impl BatchJob {
    pub fn new(
        files: Vec<PathBuf>,
        source_root: PathBuf,
        dest_root: PathBuf,
        config: &Config,
    ) -> Self {
        Self {
            files,
            source_root,
            dest_root,
            quality: config.quality,
            range: config.range.clone(),
            workers: config.workers.max(1),
        }
    }

    /// Discover the files under `source` and build the job.
    ///
    /// A directory source is its own root. A file source uses its parent
    /// directory as root. The destination defaults to the root.
    pub fn discover(source: &Path, config: &Config) -> Result<Self, ConvertError> {
        if !source.exists() {
            return Err(ConvertError::Configuration(format!(
                "Source {} does not exist",
                source.display()
            )));
        }

        let source_root = if source.is_dir() {
            source.to_path_buf()
        } else {
            source.parent().map(Path::to_path_buf).unwrap_or_default()
        };

        let files = FileManager::find_media_files(source)?;
        let dest_root = config
            .output_path
            .clone()
            .unwrap_or_else(|| source_root.clone());

        debug!(
            "Discovered {} files under {} (destination: {})",
            files.len(),
            source_root.display(),
            dest_root.display()
        );

        Ok(Self::new(files, source_root, dest_root, config))
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    pub fn dest_root(&self) -> &Path {
        &self.dest_root
    }

    pub fn quality(&self) -> Quality {
        self.quality
    }

    pub fn range(&self) -> Option<&str> {
        self.range.as_deref()
    }

    pub fn workers(&self) -> usize {
        self.workers
    }
}
