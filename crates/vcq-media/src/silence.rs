//! Silence interval parsing for FFmpeg's `silencedetect` filter.

use serde::{Deserialize, Serialize};
use tracing::debug;
use vcq_models::SilenceInterval;

/// Noise floor below which audio counts as silence (dB).
pub const DEFAULT_NOISE_FLOOR_DB: f64 = -40.0;

/// Minimum silence length that counts as a pause (seconds).
pub const DEFAULT_MIN_SILENCE_SECS: f64 = 0.5;

/// Configuration for silence detection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SilenceDetectConfig {
    /// Noise floor in dB
    pub noise_floor_db: f64,
    /// Minimum silence duration in seconds
    pub min_duration_secs: f64,
}

impl Default for SilenceDetectConfig {
    fn default() -> Self {
        Self {
            noise_floor_db: DEFAULT_NOISE_FLOOR_DB,
            min_duration_secs: DEFAULT_MIN_SILENCE_SECS,
        }
    }
}

/// Parse `silencedetect` output into intervals.
///
/// Expected lines:
///
/// ```text
/// [silencedetect @ 0x7f] silence_start: 1.234
/// [silencedetect @ 0x7f] silence_end: 2.5 | silence_duration: 1.266
/// ```
///
/// A trailing `silence_start` without a matching end is dropped.
pub fn parse_silence_intervals(log: &str) -> Vec<SilenceInterval> {
    let mut intervals = Vec::new();
    let mut pending_start: Option<f64> = None;

    for line in log.lines() {
        if let Some(start) = field_value(line, "silence_start:") {
            pending_start = Some(start);
            continue;
        }

        let Some(end) = field_value(line, "silence_end:") else {
            continue;
        };

        let duration = field_value(line, "silence_duration:");
        let start = pending_start
            .take()
            .or_else(|| duration.map(|d| end - d))
            .unwrap_or(0.0);
        let duration = duration.unwrap_or(end - start).max(0.0);

        intervals.push(SilenceInterval {
            start,
            end,
            duration,
        });
    }

    if let Some(start) = pending_start {
        debug!(start, "Dropping silence interval without an end");
    }

    intervals
}

/// Numeric value that follows `key` on a line.
fn field_value(line: &str, key: &str) -> Option<f64> {
    let idx = line.find(key)?;
    line[idx + key.len()..]
        .split_whitespace()
        .next()?
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_intervals() {
        let log = "\
[silencedetect @ 0x55] silence_start: 0
[silencedetect @ 0x55] silence_end: 1.5 | silence_duration: 1.5
size=N/A time=00:00:10.00 bitrate=N/A speed= 500x
[silencedetect @ 0x55] silence_start: 4.25
[silencedetect @ 0x55] silence_end: 5.0 | silence_duration: 0.75
";
        let intervals = parse_silence_intervals(log);
        assert_eq!(intervals.len(), 2);
        assert_eq!(intervals[0].start, 0.0);
        assert_eq!(intervals[0].end, 1.5);
        assert_eq!(intervals[0].duration, 1.5);
        assert_eq!(intervals[1].start, 4.25);
        assert_eq!(intervals[1].duration, 0.75);
    }

    #[test]
    fn test_unmatched_start_dropped() {
        let log = "\
[silencedetect @ 0x55] silence_start: 1
[silencedetect @ 0x55] silence_end: 2 | silence_duration: 1
[silencedetect @ 0x55] silence_start: 9.5
";
        let intervals = parse_silence_intervals(log);
        assert_eq!(intervals.len(), 1);
    }

    #[test]
    fn test_end_without_start_uses_duration() {
        let log = "[silencedetect @ 0x55] silence_end: 3.0 | silence_duration: 0.8\n";
        let intervals = parse_silence_intervals(log);
        assert_eq!(intervals.len(), 1);
        assert!((intervals[0].start - 2.2).abs() < 1e-9);
    }

    #[test]
    fn test_no_silence() {
        assert!(parse_silence_intervals("").is_empty());
        assert!(parse_silence_intervals("Stream mapping:\n  Stream #0:0 -> #0:0\n").is_empty());
    }

    #[test]
    fn test_default_config() {
        let config = SilenceDetectConfig::default();
        assert_eq!(config.noise_floor_db, -40.0);
        assert_eq!(config.min_duration_secs, 0.5);
    }
}
