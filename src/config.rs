//! # Configuration Management Module
//!
//! All the knobs of a conversion run.
//!
//! ## Parameters:
//! - `quality`: encoder quality preset (default: medium)
//! - `range`: raw `<start>-<end>` option, parsed per file (default: none)
//! - `workers`: maximum concurrent encoder processes (default: 4)
//! - `output_path`: destination root (default: None = next to the sources)
//! - `encoder`: encoder binary name or path (default: "ffmpeg")
//! - `encoder_timeout_secs`: per-file limit (default: None = wait forever)
//! - `show_progress`: draw the batch progress bar (default: true)
//!
//! ## Sources:
//! Values come from `Config::default()`, optionally replaced by a JSON file
//! (`--config`, or `<config dir>/webmconv/config.json` when it exists), then
//! overridden by command-line flags.
//!
//! ## Example:
//! ```ignore
//! let config = Config {
//!     quality: Quality::Max,
//!     workers: 8,
//!     ..Default::default()
//! };
//! config.validate()?;
//! ```

use crate::encoder::Quality;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration for batch conversion
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Encoder quality preset
    pub quality: Quality,
    /// Time range option, `<start>-<end>`
    pub range: Option<String>,
    /// Number of concurrent conversions
    pub workers: usize,
    /// Destination root (None = same directory as the source)
    pub output_path: Option<PathBuf>,
    /// Encoder binary
    pub encoder: String,
    /// Per-file encoder timeout in seconds
    pub encoder_timeout_secs: Option<u64>,
    /// Draw a progress bar while converting
    pub show_progress: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            quality: Quality::Medium,
            range: None,
            workers: 4,
            output_path: None,
            encoder: "ffmpeg".to_string(),
            encoder_timeout_secs: None,
            show_progress: true,
        }
    }
}

impl Config {
    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(anyhow::anyhow!("Number of workers must be greater than 0"));
        }

        if self.encoder.trim().is_empty() {
            return Err(anyhow::anyhow!("Encoder binary must not be empty"));
        }

        if self.encoder_timeout_secs == Some(0) {
            return Err(anyhow::anyhow!("Encoder timeout must be greater than 0"));
        }

        if let Some(ref output_path) = self.output_path {
            if output_path.exists() && !output_path.is_dir() {
                return Err(anyhow::anyhow!(
                    "Output path is not a directory: {}",
                    output_path.display()
                ));
            }
        }

        Ok(())
    }

    pub fn encoder_timeout(&self) -> Option<Duration> {
        self.encoder_timeout_secs.map(Duration::from_secs)
    }

    /// Default location of the configuration file
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("webmconv").join("config.json"))
    }

    /// Load configuration from file, falling back to defaults when it is missing.
    ///
    /// Not validated here: command-line overrides are applied on top first.
    pub async fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = tokio::fs::read_to_string(path).await?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Invalid config file {}: {}", path.display(), e))?;
        Ok(config)
    }

    /// Save configuration to file
    pub async fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let content = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, content).await?;
        Ok(())
    }
}
