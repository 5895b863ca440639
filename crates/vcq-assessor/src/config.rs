//! Assessor configuration.

use std::path::PathBuf;
use std::time::Duration;

use vcq_media::toolkit::{DEFAULT_PROBE_TIMEOUT, DEFAULT_TRANSCODE_TIMEOUT};
use vcq_media::{FfmpegToolkit, SilenceDetectConfig};

use crate::error::{AssessError, AssessResult};

/// Assessor configuration.
#[derive(Debug, Clone)]
pub struct AssessorConfig {
    /// Maximum concurrent assessments in a batch
    pub max_concurrent: usize,
    /// Directory for temporary transcoded audio
    pub work_dir: PathBuf,
    /// Timeout for transcoding media into the canonical stream
    pub transcode_timeout: Duration,
    /// Timeout for each analysis filter pass
    pub filter_timeout: Duration,
    /// Timeout for metadata probing
    pub probe_timeout: Duration,
    /// Length of one statistics window in seconds
    pub window_seconds: f64,
    /// Silence detector parameters
    pub silence: SilenceDetectConfig,
}

impl Default for AssessorConfig {
    fn default() -> Self {
        Self {
            max_concurrent: 3,
            work_dir: std::env::temp_dir(),
            transcode_timeout: DEFAULT_TRANSCODE_TIMEOUT,
            filter_timeout: DEFAULT_TRANSCODE_TIMEOUT,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            window_seconds: 0.5,
            silence: SilenceDetectConfig::default(),
        }
    }
}

impl AssessorConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let secs = |key: &str, default: Duration| {
            lookup(key)
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(default)
        };

        Self {
            max_concurrent: lookup("VCQ_MAX_CONCURRENT")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_concurrent),
            work_dir: lookup("VCQ_WORK_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.work_dir),
            transcode_timeout: secs("VCQ_TRANSCODE_TIMEOUT_SECS", defaults.transcode_timeout),
            filter_timeout: secs("VCQ_FILTER_TIMEOUT_SECS", defaults.filter_timeout),
            probe_timeout: secs("VCQ_PROBE_TIMEOUT_SECS", defaults.probe_timeout),
            window_seconds: lookup("VCQ_WINDOW_SECONDS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.window_seconds),
            silence: defaults.silence,
        }
    }

    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> AssessResult<()> {
        if self.max_concurrent == 0 {
            return Err(AssessError::config("max_concurrent must be at least 1"));
        }
        if !(self.window_seconds.is_finite() && self.window_seconds > 0.0) {
            return Err(AssessError::config("window_seconds must be positive"));
        }
        if self.silence.min_duration_secs <= 0.0 {
            return Err(AssessError::config("silence minimum duration must be positive"));
        }
        Ok(())
    }

    pub fn with_max_concurrent(mut self, max: usize) -> Self {
        self.max_concurrent = max;
        self
    }

    pub fn with_work_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.work_dir = dir.into();
        self
    }

    pub fn with_window_seconds(mut self, secs: f64) -> Self {
        self.window_seconds = secs;
        self
    }

    /// FFmpeg-backed toolkit carrying this config's timeouts.
    pub fn ffmpeg_toolkit(&self) -> FfmpegToolkit {
        FfmpegToolkit::new()
            .with_transcode_timeout(self.transcode_timeout)
            .with_filter_timeout(self.filter_timeout)
            .with_probe_timeout(self.probe_timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AssessorConfig::default();
        assert_eq!(config.max_concurrent, 3);
        assert_eq!(config.transcode_timeout, Duration::from_secs(300));
        assert_eq!(config.probe_timeout, Duration::from_secs(30));
        assert_eq!(config.window_seconds, 0.5);
        assert_eq!(config.silence.noise_floor_db, -40.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = AssessorConfig::from_lookup(lookup(&[
            ("VCQ_MAX_CONCURRENT", "8"),
            ("VCQ_WORK_DIR", "/var/tmp/vcq"),
            ("VCQ_PROBE_TIMEOUT_SECS", "5"),
            ("VCQ_WINDOW_SECONDS", "1.0"),
        ]));
        assert_eq!(config.max_concurrent, 8);
        assert_eq!(config.work_dir, PathBuf::from("/var/tmp/vcq"));
        assert_eq!(config.probe_timeout, Duration::from_secs(5));
        assert_eq!(config.filter_timeout, Duration::from_secs(300));
        assert_eq!(config.window_seconds, 1.0);
    }

    #[test]
    fn test_unparseable_values_fall_back() {
        let config = AssessorConfig::from_lookup(lookup(&[
            ("VCQ_MAX_CONCURRENT", "many"),
            ("VCQ_TRANSCODE_TIMEOUT_SECS", "-1"),
        ]));
        assert_eq!(config.max_concurrent, 3);
        assert_eq!(config.transcode_timeout, Duration::from_secs(300));
    }

    #[test]
    fn test_validate_rejects_zero_concurrency() {
        let config = AssessorConfig::default().with_max_concurrent(0);
        assert!(matches!(config.validate(), Err(AssessError::Config(_))));

        let config = AssessorConfig::default().with_window_seconds(0.0);
        assert!(config.validate().is_err());
    }
}
