//! Typed partial results produced by the analyzer stages.
//!
//! Each stage fills exactly one of these structs. Fields that a stage could
//! not measure stay `None`; scores fall back to the documented defaults.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Technical metadata reported by the media probe.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MediaInfo {
    /// Duration in seconds
    pub duration: Option<f64>,
    /// Sample rate in Hz
    pub sample_rate: Option<u32>,
    /// Bitrate in kbps
    pub bitrate_kbps: Option<u32>,
    /// Channel count
    pub channels: Option<u32>,
    /// Codec name (e.g. "pcm_s16le")
    pub codec: Option<String>,
}

/// One silence interval reported by the silence detector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SilenceInterval {
    /// Start time in seconds
    pub start: f64,
    /// End time in seconds
    pub end: f64,
    /// Duration in seconds
    pub duration: f64,
}

/// Signal-to-noise estimate derived from windowed RMS levels.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SignalQuality {
    /// SNR estimate in dB, absent when no RMS window was measurable
    pub snr_db: Option<f64>,
    /// Quietest window RMS in dB
    pub noise_floor_db: Option<f64>,
    /// Speech clarity (0.0 - 1.0)
    pub clarity: f64,
}

/// Global level statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct VolumeQuality {
    /// Mean volume in dB
    pub mean_db: Option<f64>,
    /// Loudest RMS window in dB
    pub max_db: Option<f64>,
    /// Quietest RMS window in dB (digital silence held at -96 dB)
    pub min_db: Option<f64>,
    /// `max - min` in dB
    pub dynamic_range_db: Option<f64>,
    /// Volume consistency (0.0 - 1.0, higher is steadier)
    pub consistency: f64,
}

/// Energy in the human voice fundamental band.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FrequencyResponse {
    /// Mean band-limited RMS in dB
    pub band_energy_db: Option<f64>,
    /// Voice band energy score (0.0 - 1.0)
    pub score: f64,
    /// Whether the voice fundamental band is adequately present
    pub voice_range_covered: bool,
    /// Fundamental frequency estimate in Hz (no pitch tracker, always absent)
    pub fundamental_hz: Option<f64>,
}

/// Silence/speech segmentation summary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SpeechPattern {
    /// Percentage of the recording that is silence
    pub silence_percentage: f64,
    /// Percentage of the recording that is speech (`100 - silence_percentage`)
    pub speech_percentage: f64,
    /// Number of detected pauses
    pub pause_count: u32,
    /// Average pause length in seconds
    pub avg_pause_duration: f64,
}

/// Clipping / distortion check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DistortionCheck {
    /// Any window peaked at or above -0.1 dBFS
    pub has_clipping: bool,
    /// Currently identical to `has_clipping`
    pub has_distortion: bool,
    /// 1.0 = clean, 0.3 = clipped
    pub score: f64,
}

impl Default for DistortionCheck {
    fn default() -> Self {
        Self {
            has_clipping: false,
            has_distortion: false,
            score: 1.0,
        }
    }
}

/// Transcript versus audio duration cross-check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TranscriptAlignment {
    /// Character count of the transcript
    pub char_count: usize,
    /// Whitespace-delimited word count
    pub word_count: usize,
    /// Speaking rate implied by the transcript and audio duration
    pub words_per_minute: f64,
    /// Alignment score (0.0 - 1.0)
    pub alignment_score: f64,
}
