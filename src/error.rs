//! # Error Types Module
//!
//! Custom error types for the whole conversion pipeline.
//!
//! ## Categories:
//! - `Configuration` / `MissingDependency`: fatal, detected before any work starts
//! - `Discovery`: directory traversal failure, fatal
//! - `DestinationDir` / `TimeRange` / `EncoderFailed`: per-item, the item is
//!   marked failed and the batch carries on
//!
//! ## Example:
//! ```ignore
//! if which::which("ffmpeg").is_err() {
//!     return Err(ConvertError::MissingDependency("ffmpeg".to_string()));
//! }
//! ```

use std::path::PathBuf;

/// Errors produced while parsing a time or a time range
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum TimeParseError {
    #[error("invalid time format: {0}")]
    InvalidFormat(String),

    #[error("invalid start time format: {0}")]
    InvalidStart(String),

    #[error("invalid end time format: {0}")]
    InvalidEnd(String),
}

/// Custom error types for batch conversion
#[derive(thiserror::Error, Debug)]
pub enum ConvertError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Dependency missing: {0}")]
    MissingDependency(String),

    #[error("Error scanning {}: {source}", .path.display())]
    Discovery {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Could not create destination directory {}: {source}", .path.display())]
    DestinationDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    TimeRange(#[from] TimeParseError),

    #[error("Encoder failed: {0}")]
    EncoderFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_parse_error_messages() {
        let err = TimeParseError::InvalidStart("abc".to_string());
        assert_eq!(err.to_string(), "invalid start time format: abc");

        let wrapped: ConvertError = err.into();
        assert_eq!(wrapped.to_string(), "invalid start time format: abc");
        assert!(matches!(wrapped, ConvertError::TimeRange(_)));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ConvertError::MissingDependency("ffmpeg".into()).to_string(),
            "Dependency missing: ffmpeg"
        );
        assert_eq!(
            ConvertError::EncoderFailed("exit status: 1".into()).to_string(),
            "Encoder failed: exit status: 1"
        );
    }
}
