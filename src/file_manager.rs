//! # File Management Module
//!
//! Discovery of convertible files under a source path.
//!
//! ## Supported input formats:
//! MP4, AVI, MOV, MKV, WMV, FLV, GIF, M4V, 3GP, WebM (extension compared
//! case-insensitively). WebM inputs are kept so an existing WebM can be
//! re-encoded at another quality or trimmed to a range.
//!
//! ## Discovery rules:
//! - A directory is walked recursively, directories themselves are never returned
//! - Symlinked files are returned like regular files
//! - A single file is returned as-is, without checking its extension
//! - Any traversal error aborts the whole discovery, no partial list is returned
//! - Order is the filesystem enumeration order
//!
//! ## Example:
//! ```ignore
//! let files = FileManager::find_media_files(Path::new("/path/to/videos"))?;
//! ```

use crate::error::ConvertError;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extensions picked up by directory discovery (lowercase, without dot)
pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    "mp4", "avi", "mov", "mkv", "wmv", "flv", "gif", "m4v", "3gp", "webm",
];

/// Manages file discovery
pub struct FileManager;

impl FileManager {
    /// Find all supported media files under `root`.
    ///
    /// When `root` is a file, it is returned as the only element.
    pub fn find_media_files(root: &Path) -> Result<Vec<PathBuf>, ConvertError> {
        if root.is_file() {
            return Ok(vec![root.to_path_buf()]);
        }

        let mut files = Vec::new();

        for entry in WalkDir::new(root) {
            let entry = entry.map_err(|source| ConvertError::Discovery {
                path: source
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| root.to_path_buf()),
                source,
            })?;

            // Follows symlinks, so a linked file counts while a linked directory does not.
            if entry.path().is_file() && Self::is_supported_format(entry.path()) {
                files.push(entry.into_path());
            }
        }

        Ok(files)
    }

    /// Check if a file format is supported
    pub fn is_supported_format(path: &Path) -> bool {
        match path.extension() {
            Some(ext) => {
                let ext_lower = ext.to_string_lossy().to_lowercase();
                SUPPORTED_EXTENSIONS.contains(&ext_lower.as_str())
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::fs;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, b"").unwrap();
    }

    #[test]
    fn test_is_supported_format() {
        for ext in SUPPORTED_EXTENSIONS {
            assert!(FileManager::is_supported_format(Path::new(&format!("a.{}", ext))));
        }
        assert!(FileManager::is_supported_format(Path::new("CLIP.MP4")));
        assert!(FileManager::is_supported_format(Path::new("anim.Gif")));
        assert!(!FileManager::is_supported_format(Path::new("notes.txt")));
        assert!(!FileManager::is_supported_format(Path::new("README")));
    }

    #[test]
    fn test_find_media_files_filters_and_recurses() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        touch(&root.join("a.mp4"));
        touch(&root.join("b.MP4"));
        touch(&root.join("notes.txt"));
        touch(&root.join("nested/deep/c.webm"));
        touch(&root.join("nested/d.3gp"));
        fs::create_dir_all(root.join("folder.mkv")).unwrap();

        let found: HashSet<PathBuf> = FileManager::find_media_files(root)
            .unwrap()
            .into_iter()
            .collect();

        let expected: HashSet<PathBuf> = [
            root.join("a.mp4"),
            root.join("b.MP4"),
            root.join("nested/deep/c.webm"),
            root.join("nested/d.3gp"),
        ]
        .into_iter()
        .collect();

        assert_eq!(found, expected);
    }

    #[test]
    fn test_find_media_files_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        for ext in SUPPORTED_EXTENSIONS {
            touch(&temp_dir.path().join(format!("sub/{}/clip.{}", ext, ext)));
        }

        let first = FileManager::find_media_files(temp_dir.path()).unwrap();
        let second = FileManager::find_media_files(temp_dir.path()).unwrap();

        assert_eq!(first.len(), SUPPORTED_EXTENSIONS.len());
        assert_eq!(
            first.into_iter().collect::<HashSet<_>>(),
            second.into_iter().collect::<HashSet<_>>()
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_file_is_discovered() {
        let temp_dir = TempDir::new().unwrap();
        let outside = TempDir::new().unwrap();
        let root = temp_dir.path();

        let real = outside.path().join("real.mp4");
        touch(&real);
        touch(&root.join("plain.mp4"));
        std::os::unix::fs::symlink(&real, root.join("link.mp4")).unwrap();
        std::os::unix::fs::symlink(outside.path(), root.join("linked_dir.mkv")).unwrap();

        let found: HashSet<PathBuf> = FileManager::find_media_files(root)
            .unwrap()
            .into_iter()
            .collect();

        let expected: HashSet<PathBuf> = [root.join("plain.mp4"), root.join("link.mp4")]
            .into_iter()
            .collect();
        assert_eq!(found, expected);
    }

    #[test]
    fn test_single_file_bypasses_walk() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("movie.unknown");
        touch(&file);

        let found = FileManager::find_media_files(&file).unwrap();
        assert_eq!(found, vec![file]);
    }

    #[test]
    fn test_missing_root_is_discovery_error() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("does-not-exist");

        let err = FileManager::find_media_files(&missing).unwrap_err();
        match err {
            ConvertError::Discovery { path, .. } => assert_eq!(path, missing),
            other => panic!("unexpected error: {}", other),
        }
    }
}
