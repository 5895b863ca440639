//! The external-tool boundary used by the assessor.
//!
//! `AudioToolkit` is the narrow interface the analysis core calls through:
//! transcode, probe, filter statistics and silence detection. `FfmpegToolkit`
//! implements it with FFmpeg/FFprobe subprocesses; tests can substitute
//! canned readings.

use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;
use tracing::debug;
use vcq_models::{MediaInfo, SilenceInterval};

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};
use crate::filters;
use crate::probe;
use crate::readings::FilterReadings;
use crate::silence::{parse_silence_intervals, SilenceDetectConfig};

/// Sample rate of the canonical analysis stream.
pub const CANONICAL_SAMPLE_RATE: u32 = 44100;

/// Default timeout for transcoding and filter passes.
pub const DEFAULT_TRANSCODE_TIMEOUT: Duration = Duration::from_secs(300);

/// Default timeout for metadata probing.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(30);

/// Capabilities the analysis core consumes from external audio tools.
#[async_trait]
pub trait AudioToolkit: Send + Sync {
    /// Decode any media into a mono, 16-bit, 44.1 kHz PCM WAV at `output`.
    async fn transcode(&self, media: &Path, output: &Path) -> MediaResult<()>;

    /// Best-effort technical metadata.
    async fn probe(&self, audio: &Path) -> MediaResult<MediaInfo>;

    /// Duration only, used when the full probe did not yield one.
    async fn probe_duration(&self, audio: &Path) -> MediaResult<f64> {
        self.probe(audio)
            .await?
            .duration
            .ok_or_else(|| MediaError::invalid_audio("no duration reported"))
    }

    /// Run an audio filter graph and collect its labeled numeric readings.
    async fn filter_statistics(&self, audio: &Path, filter_spec: &str) -> MediaResult<FilterReadings>;

    /// Silence intervals below a noise floor lasting at least a minimum duration.
    async fn detect_silence(
        &self,
        audio: &Path,
        config: &SilenceDetectConfig,
    ) -> MediaResult<Vec<SilenceInterval>>;
}

/// `AudioToolkit` backed by FFmpeg and FFprobe subprocesses.
#[derive(Debug, Clone)]
pub struct FfmpegToolkit {
    transcode_timeout: Duration,
    filter_timeout: Duration,
    probe_timeout: Duration,
}

impl Default for FfmpegToolkit {
    fn default() -> Self {
        Self {
            transcode_timeout: DEFAULT_TRANSCODE_TIMEOUT,
            filter_timeout: DEFAULT_TRANSCODE_TIMEOUT,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }
}

impl FfmpegToolkit {
    /// Create a toolkit with default timeouts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter for the transcode timeout.
    pub fn with_transcode_timeout(mut self, timeout: Duration) -> Self {
        self.transcode_timeout = timeout;
        self
    }

    /// Builder-style setter for the analysis filter timeout.
    pub fn with_filter_timeout(mut self, timeout: Duration) -> Self {
        self.filter_timeout = timeout;
        self
    }

    /// Builder-style setter for the probe timeout.
    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    fn filter_runner(&self) -> FfmpegRunner {
        FfmpegRunner::new().with_timeout(self.filter_timeout.as_secs().max(1))
    }

    async fn run_filter(&self, audio: &Path, filter_spec: &str) -> MediaResult<String> {
        let cmd = FfmpegCommand::analyze(audio).no_video().audio_filter(filter_spec);
        let output = self.filter_runner().run(&cmd).await?;
        Ok(output.stderr)
    }
}

#[async_trait]
impl AudioToolkit for FfmpegToolkit {
    async fn transcode(&self, media: &Path, output: &Path) -> MediaResult<()> {
        let cmd = FfmpegCommand::new(media, output)
            .no_video()
            .audio_channels(1)
            .sample_rate(CANONICAL_SAMPLE_RATE)
            .audio_codec("pcm_s16le")
            .format("wav");

        FfmpegRunner::new()
            .with_timeout(self.transcode_timeout.as_secs().max(1))
            .run(&cmd)
            .await?;

        Ok(())
    }

    async fn probe(&self, audio: &Path) -> MediaResult<MediaInfo> {
        probe::probe_audio(audio, Some(self.probe_timeout.as_secs().max(1))).await
    }

    async fn probe_duration(&self, audio: &Path) -> MediaResult<f64> {
        probe::probe_duration(audio, Some(self.probe_timeout.as_secs().max(1))).await
    }

    async fn filter_statistics(&self, audio: &Path, filter_spec: &str) -> MediaResult<FilterReadings> {
        let log = self.run_filter(audio, filter_spec).await?;
        let readings = FilterReadings::parse(&log);

        debug!(
            filter = filter_spec,
            readings = readings.len(),
            "Collected filter readings"
        );

        Ok(readings)
    }

    async fn detect_silence(
        &self,
        audio: &Path,
        config: &SilenceDetectConfig,
    ) -> MediaResult<Vec<SilenceInterval>> {
        let filter = filters::silence_detect(config.noise_floor_db, config.min_duration_secs);
        let log = self.run_filter(audio, &filter).await?;
        let intervals = parse_silence_intervals(&log);

        debug!(intervals = intervals.len(), "Parsed silence intervals");

        Ok(intervals)
    }
}
