//! # Path Resolution Module
//!
//! Maps an input file onto the destination tree, keeping its position
//! relative to the source root.

use crate::error::ConvertError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Utility for computing destination paths
pub struct PathResolver;

impl PathResolver {
    /// `<dest_root>/<input relative to source_root>`.
    ///
    /// Inputs outside `source_root` land directly under `dest_root`.
    pub fn mirror_path(input_path: &Path, source_root: &Path, dest_root: &Path) -> PathBuf {
        let relative = match input_path.strip_prefix(source_root) {
            Ok(rel) if !rel.as_os_str().is_empty() => rel.to_path_buf(),
            _ => {
                debug!(
                    "{} is not under {}, using its file name",
                    input_path.display(),
                    source_root.display()
                );
                input_path
                    .file_name()
                    .map(PathBuf::from)
                    .unwrap_or_default()
            }
        };

        dest_root.join(relative)
    }

    /// Create the parent directories of `path` if necessary.
    ///
    /// Safe to call concurrently for the same directory.
    pub async fn ensure_parent_dirs(path: &Path) -> Result<(), ConvertError> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| ConvertError::DestinationDir {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }
        Ok(())
    }
}
