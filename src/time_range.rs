//! # Time Range Module
//!
//! Parsing of the `--range` option into a pair of second offsets.
//!
//! ## Accepted time forms (each side of the range):
//! - `30s`: seconds with suffix
//! - `30` / `12.5`: bare seconds
//! - `1:30`: minutes and seconds
//! - `1:10:30`: hours, minutes and seconds
//!
//! A range is written `<start>-<end>`, e.g. `0-30s`, `1:02-2:30` or
//! `1:10:30-2:15:20`. A range string that does not split into exactly two
//! non-empty sides is treated as "no range" rather than as an error.

use crate::error::TimeParseError;
use std::fmt;

/// Start/end offsets in seconds, derived once from the range option
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeRange {
    start_seconds: f64,
    end_seconds: f64,
}

impl TimeRange {
    pub fn new(start_seconds: f64, end_seconds: f64) -> Self {
        Self { start_seconds, end_seconds }
    }

    pub fn start_seconds(&self) -> f64 {
        self.start_seconds
    }

    pub fn end_seconds(&self) -> f64 {
        self.end_seconds
    }

    /// End before start. Passed through to the encoder untouched.
    pub fn is_inverted(&self) -> bool {
        self.end_seconds < self.start_seconds
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}s-{:.6}s", self.start_seconds, self.end_seconds)
    }
}

/// Parse a single time value (`30`, `30s`, `MM:SS` or `HH:MM:SS`) into seconds.
///
/// Negative and non-finite values are rejected as `InvalidFormat`.
pub fn parse_time_string(text: &str) -> Result<f64, TimeParseError> {
    let trimmed = text.trim();
    let invalid = || TimeParseError::InvalidFormat(trimmed.to_string());
    let field = |value: &str| value.parse::<f64>().map_err(|_| invalid());

    let seconds = if let Some(bare) = trimmed.strip_suffix('s') {
        field(bare)?
    } else {
        let fields: Vec<&str> = trimmed.split(':').collect();
        match fields.as_slice() {
            &[seconds] => field(seconds)?,
            &[minutes, seconds] => field(minutes)? * 60.0 + field(seconds)?,
            &[hours, minutes, seconds] => {
                field(hours)? * 3600.0 + field(minutes)? * 60.0 + field(seconds)?
            }
            _ => return Err(invalid()),
        }
    };

    if !seconds.is_finite() || seconds < 0.0 {
        return Err(invalid());
    }

    Ok(seconds)
}

/// Parse a `<start>-<end>` range option.
///
/// Returns `Ok(None)` when the option does not split into exactly two
/// non-empty sides on `-`.
pub fn parse_range(option: &str) -> Result<Option<TimeRange>, TimeParseError> {
    let parts: Vec<&str> = option.split('-').collect();
    let &[start, end] = parts.as_slice() else {
        return Ok(None);
    };
    if start.is_empty() || end.is_empty() {
        return Ok(None);
    }

    let (start, end) = (start.trim(), end.trim());

    let start_seconds =
        parse_time_string(start).map_err(|_| TimeParseError::InvalidStart(start.to_string()))?;
    let end_seconds =
        parse_time_string(end).map_err(|_| TimeParseError::InvalidEnd(end.to_string()))?;

    Ok(Some(TimeRange::new(start_seconds, end_seconds)))
}
