//! The assessment orchestrator.
//!
//! One call extracts the canonical audio stream, runs every analyzer stage
//! against it, merges the typed partial results into a [`QualityMetrics`]
//! record and scores it. Only extraction failures reach the caller.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use futures::FutureExt;
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;
use vcq_media::filters::{self, KEY_PEAK_LEVEL, KEY_RMS_LEVEL};
use vcq_media::{extract_audio, AudioToolkit, MediaError, CANONICAL_SAMPLE_RATE};
use vcq_models::quality::UNKNOWN_CODEC;
use vcq_models::{
    DistortionCheck, FrequencyResponse, MediaInfo, QualityMetrics, SignalQuality, SpeechPattern,
    TranscriptAlignment, VolumeQuality,
};

use crate::analyzers::{
    analyze_distortion, analyze_frequency, analyze_signal, analyze_speech, analyze_transcript,
    analyze_volume, VolumeLevels,
};
use crate::config::AssessorConfig;
use crate::error::{AssessError, AssessResult};
use crate::scoring;
use crate::telemetry::{self, Outcome};

/// Prefix of the issue recorded when analysis fails unexpectedly.
pub const ASSESSMENT_ERROR_PREFIX: &str = "Assessment error";

/// Stateless voice-clone audio quality assessor.
///
/// Holds only the toolkit and configuration; every call owns its own
/// record and temporary files, so one instance can serve concurrent calls.
#[derive(Clone)]
pub struct Assessor {
    toolkit: Arc<dyn AudioToolkit>,
    config: AssessorConfig,
}

impl std::fmt::Debug for Assessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Assessor").field("config", &self.config).finish_non_exhaustive()
    }
}

impl Assessor {
    /// Create an assessor backed by FFmpeg/FFprobe.
    pub fn new(config: AssessorConfig) -> Self {
        let toolkit = Arc::new(config.ffmpeg_toolkit());
        Self { toolkit, config }
    }

    /// Create an assessor with a custom toolkit.
    pub fn with_toolkit(toolkit: Arc<dyn AudioToolkit>, config: AssessorConfig) -> Self {
        Self { toolkit, config }
    }

    pub fn config(&self) -> &AssessorConfig {
        &self.config
    }

    /// Assess one media file, optionally cross-checking a transcript.
    ///
    /// Returns `Err` only when the audio could not be extracted (including a
    /// nonexistent path). Every other failure degrades the returned record.
    pub async fn assess(
        &self,
        media_path: &Path,
        transcript: Option<&str>,
    ) -> AssessResult<QualityMetrics> {
        let assessment_id = Uuid::new_v4();
        let span = info_span!(
            "assessment",
            assessment_id = %assessment_id,
            media = %media_path.display()
        );

        self.assess_inner(media_path, transcript).instrument(span).await
    }

    async fn assess_inner(
        &self,
        media_path: &Path,
        transcript: Option<&str>,
    ) -> AssessResult<QualityMetrics> {
        let started = Instant::now();
        info!(with_transcript = transcript.is_some(), "Starting assessment");

        let audio = match extract_audio(self.toolkit.as_ref(), media_path, &self.config.work_dir).await {
            Ok(audio) => audio,
            Err(e) => {
                error!(error = %e, "Audio extraction failed");
                telemetry::record_assessment(Outcome::Failed, started.elapsed().as_secs_f64(), None);
                return Err(e.into());
            }
        };

        debug!(
            audio = %audio.path().display(),
            temporary = audio.is_temporary(),
            "Canonical audio ready"
        );

        let mut metrics = QualityMetrics::default();
        let mut tracker = StageTracker::default();

        let body = AssertUnwindSafe(self.run_stages(audio.path(), transcript, &mut metrics, &mut tracker))
            .catch_unwind()
            .await;

        let unexpected = match body {
            Ok(Ok(())) => None,
            Ok(Err(e)) => Some(e.to_string()),
            Err(payload) => Some(panic_message(payload.as_ref())),
        };

        if let Some(message) = &unexpected {
            error!(error = %message, "Analysis failed unexpectedly, returning partial record");
            metrics
                .issues
                .push(format!("{ASSESSMENT_ERROR_PREFIX}: {message}"));
        }

        scoring::finalize(&mut metrics);

        if let Err(e) = audio.cleanup() {
            warn!(error = %e, "Failed to remove temporary audio");
        }

        let outcome = if unexpected.is_none() && tracker.failed.is_empty() {
            Outcome::Completed
        } else {
            Outcome::Degraded
        };
        telemetry::record_assessment(
            outcome,
            started.elapsed().as_secs_f64(),
            Some(metrics.overall_score),
        );

        info!(
            overall_score = metrics.overall_score,
            suitability = %metrics.suitability,
            failed_stages = ?tracker.failed,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Assessment complete"
        );

        Ok(metrics)
    }

    async fn run_stages(
        &self,
        audio: &Path,
        transcript: Option<&str>,
        metrics: &mut QualityMetrics,
        tracker: &mut StageTracker,
    ) -> AssessResult<()> {
        let toolkit = self.toolkit.as_ref();

        // Metadata first: the silence stage needs the duration
        let info = match toolkit.probe(audio).await {
            Ok(info) => info,
            Err(e) => {
                tracker.absorb("probe", e)?;
                MediaInfo::default()
            }
        };
        apply_media_info(metrics, &info);

        let duration = match info.duration.filter(|d| d.is_finite() && *d > 0.0) {
            Some(d) => Some(d),
            None => match toolkit.probe_duration(audio).await {
                Ok(d) if d.is_finite() && d > 0.0 => Some(d),
                Ok(d) => {
                    warn!(duration = d, "Fallback probe returned no usable duration");
                    None
                }
                Err(e) => {
                    tracker.absorb("duration", e)?;
                    None
                }
            },
        };
        if let Some(d) = duration {
            metrics.duration = d;
        }

        let sample_rate = info.sample_rate.unwrap_or(CANONICAL_SAMPLE_RATE);
        let window = filters::window_samples(self.config.window_seconds, sample_rate);
        let stats_filter = filters::windowed_stats(window);
        let band_filter = filters::voice_band_stats(window);
        let volume_filter = filters::volume_stats();
        let silence_config = self.config.silence;

        let silence_pass = async {
            match duration {
                Some(_) => Some(toolkit.detect_silence(audio, &silence_config).await),
                None => None,
            }
        };

        let (stats, band, volume, silence) = tokio::join!(
            toolkit.filter_statistics(audio, &stats_filter),
            toolkit.filter_statistics(audio, &band_filter),
            toolkit.filter_statistics(audio, &volume_filter),
            silence_pass,
        );

        // One statistics pass feeds both signal quality and distortion
        match stats {
            Ok(readings) => {
                let rms = readings.values(KEY_RMS_LEVEL);
                if rms.is_empty() {
                    warn!(readings = readings.len(), "No measurable RMS windows");
                }
                apply_signal(metrics, analyze_signal(&rms));
                apply_distortion(metrics, analyze_distortion(&readings.values(KEY_PEAK_LEVEL)));
            }
            Err(e) => tracker.absorb("signal", e)?,
        }

        match band {
            Ok(readings) => {
                let band_rms = readings.values(KEY_RMS_LEVEL);
                if band_rms.is_empty() {
                    warn!(readings = readings.len(), "No measurable voice band windows");
                }
                apply_frequency(metrics, analyze_frequency(&band_rms));
            }
            Err(e) => tracker.absorb("frequency", e)?,
        }

        match volume {
            Ok(readings) => {
                let levels = VolumeLevels::from_readings(&readings);
                if levels == VolumeLevels::default() {
                    warn!(readings = readings.len(), "No volume levels reported");
                }
                apply_volume(metrics, analyze_volume(levels));
            }
            Err(e) => tracker.absorb("volume", e)?,
        }

        match (silence, duration) {
            (Some(Ok(intervals)), Some(d)) => {
                if let Some(pattern) = analyze_speech(&intervals, d) {
                    apply_speech(metrics, pattern);
                }
            }
            (Some(Err(e)), _) => tracker.absorb("silence", e)?,
            _ => {
                warn!("Duration unavailable, skipping silence analysis");
                tracker.skip("silence");
            }
        }

        if let Some(text) = transcript {
            apply_transcript(metrics, analyze_transcript(text, metrics.duration));
        }

        Ok(())
    }
}

/// Which stages were absorbed as failures during one assessment.
#[derive(Debug, Default)]
struct StageTracker {
    failed: Vec<&'static str>,
}

impl StageTracker {
    /// Absorb a stage failure, or escalate it when it is not a tool failure.
    fn absorb(&mut self, stage: &'static str, err: MediaError) -> AssessResult<()> {
        if let MediaError::Internal(message) = err {
            return Err(AssessError::unexpected(message));
        }

        warn!(stage, error = %err, "Stage failed, continuing with degraded metrics");
        self.skip(stage);
        Ok(())
    }

    fn skip(&mut self, stage: &'static str) {
        telemetry::record_stage_failure(stage);
        self.failed.push(stage);
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "analysis panicked".to_string()
    }
}

// =============================================================================
// Field mapping
// =============================================================================

fn apply_media_info(metrics: &mut QualityMetrics, info: &MediaInfo) {
    if let Some(duration) = info.duration.filter(|d| d.is_finite()) {
        metrics.duration = duration.max(0.0);
    }
    metrics.sample_rate = info.sample_rate;
    metrics.bitrate = info.bitrate_kbps;
    metrics.channels = info.channels.filter(|&c| c > 0).unwrap_or(1);
    metrics.codec = info
        .codec
        .clone()
        .unwrap_or_else(|| UNKNOWN_CODEC.to_string());
}

fn apply_signal(metrics: &mut QualityMetrics, signal: SignalQuality) {
    metrics.snr_db = signal.snr_db;
    metrics.background_noise_db = signal.noise_floor_db;
    metrics.speech_clarity = signal.clarity;
}

fn apply_volume(metrics: &mut QualityMetrics, volume: VolumeQuality) {
    metrics.mean_volume_db = volume.mean_db;
    metrics.dynamic_range_db = volume.dynamic_range_db;
    metrics.volume_consistency = volume.consistency;
}

fn apply_frequency(metrics: &mut QualityMetrics, response: FrequencyResponse) {
    metrics.frequency_score = response.score;
    metrics.voice_range_covered = response.voice_range_covered;
    metrics.fundamental_frequency_hz = response.fundamental_hz;
}

fn apply_speech(metrics: &mut QualityMetrics, pattern: SpeechPattern) {
    metrics.silence_percentage = pattern.silence_percentage;
    metrics.speech_percentage = pattern.speech_percentage;
    metrics.pause_count = pattern.pause_count;
    metrics.avg_pause_duration = pattern.avg_pause_duration;
}

fn apply_distortion(metrics: &mut QualityMetrics, check: DistortionCheck) {
    metrics.has_clipping = check.has_clipping;
    metrics.has_distortion = check.has_distortion;
    metrics.distortion_score = check.score;
}

fn apply_transcript(metrics: &mut QualityMetrics, alignment: TranscriptAlignment) {
    metrics.transcript = Some(alignment);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panic_message() {
        let payload: Box<dyn Any + Send> = Box::new("static boom");
        assert_eq!(panic_message(payload.as_ref()), "static boom");

        let payload: Box<dyn Any + Send> = Box::new(String::from("owned boom"));
        assert_eq!(panic_message(payload.as_ref()), "owned boom");

        let payload: Box<dyn Any + Send> = Box::new(42u8);
        assert_eq!(panic_message(payload.as_ref()), "analysis panicked");
    }

    #[test]
    fn test_tracker_escalates_internal_errors() {
        let mut tracker = StageTracker::default();

        assert!(tracker.absorb("probe", MediaError::Timeout(30)).is_ok());
        assert_eq!(tracker.failed, vec!["probe"]);

        let err = tracker
            .absorb("signal", MediaError::internal("broken invariant"))
            .unwrap_err();
        assert!(matches!(err, AssessError::Unexpected(ref m) if m == "broken invariant"));
        assert_eq!(tracker.failed, vec!["probe"]);
    }

    #[test]
    fn test_apply_media_info_defaults() {
        let mut metrics = QualityMetrics::default();
        apply_media_info(
            &mut metrics,
            &MediaInfo {
                channels: Some(0),
                ..Default::default()
            },
        );
        assert_eq!(metrics.channels, 1);
        assert_eq!(metrics.codec, UNKNOWN_CODEC);
        assert!(metrics.sample_rate.is_none());
    }

    #[test]
    fn test_apply_media_info_maps_fields() {
        let mut metrics = QualityMetrics::default();
        apply_media_info(
            &mut metrics,
            &MediaInfo {
                duration: Some(12.5),
                sample_rate: Some(48000),
                bitrate_kbps: Some(128),
                channels: Some(2),
                codec: Some("aac".into()),
            },
        );
        assert_eq!(metrics.duration, 12.5);
        assert_eq!(metrics.sample_rate, Some(48000));
        assert_eq!(metrics.bitrate, Some(128));
        assert_eq!(metrics.channels, 2);
        assert_eq!(metrics.codec, "aac");
    }
}
