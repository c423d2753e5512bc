//! # Platform-specific utilities
//!
//! Resolves the encoder binary on the current platform and checks that it is
//! reachable before any work starts.

use crate::error::ConvertError;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::debug;

/// Platform-specific command manager
pub struct PlatformCommands {
    executable_suffix: &'static str,
}

impl PlatformCommands {
    /// Get the singleton instance
    pub fn instance() -> &'static Self {
        static INSTANCE: OnceLock<PlatformCommands> = OnceLock::new();
        INSTANCE.get_or_init(Self::new)
    }

    fn new() -> Self {
        Self {
            executable_suffix: if cfg!(windows) { ".exe" } else { "" },
        }
    }

    /// Get the platform-specific command name (`ffmpeg` -> `ffmpeg.exe` on Windows)
    pub fn get_command(&self, base_name: &str) -> String {
        if self.executable_suffix.is_empty() || Path::new(base_name).extension().is_some() {
            base_name.to_string()
        } else {
            format!("{}{}", base_name, self.executable_suffix)
        }
    }

    /// Locate a command on `PATH` (or check an explicit path)
    pub fn resolve(&self, base_name: &str) -> Result<PathBuf, ConvertError> {
        let command = self.get_command(base_name);
        let path = which::which(&command).map_err(|e| {
            ConvertError::MissingDependency(format!(
                "{} not found in the system ({}). Please ensure it is installed and in your PATH.",
                command, e
            ))
        })?;
        debug!("Resolved {} -> {}", base_name, path.display());
        Ok(path)
    }

    /// Get system information for debugging
    pub fn system_info() -> SystemInfo {
        SystemInfo {
            os: std::env::consts::OS,
            arch: std::env::consts::ARCH,
            family: std::env::consts::FAMILY,
        }
    }
}

/// System information structure
#[derive(Debug, Clone)]
pub struct SystemInfo {
    pub os: &'static str,
    pub arch: &'static str,
    pub family: &'static str,
}

impl std::fmt::Display for SystemInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} ({})", self.os, self.arch, self.family)
    }
}
