//! The quality metrics record produced by one assessment run.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::stages::TranscriptAlignment;
use crate::suitability::Suitability;

/// Codec tag used when the probe could not identify the stream.
pub const UNKNOWN_CODEC: &str = "unknown";

/// Audio quality metrics for voice-clone training material.
///
/// Built once per assessment and never mutated by the assessor afterwards.
/// The record does not retain the media path it was computed from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct QualityMetrics {
    // Technical
    /// Duration in seconds
    pub duration: f64,
    /// Sample rate in Hz
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_rate: Option<u32>,
    /// Bitrate in kbps
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bitrate: Option<u32>,
    /// Channel count
    pub channels: u32,
    /// Codec / format tag
    pub codec: String,

    // Signal
    /// SNR estimate in dB
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snr_db: Option<f64>,
    /// Background noise floor in dB
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_noise_db: Option<f64>,
    /// Speech clarity (0.0 - 1.0)
    pub speech_clarity: f64,

    // Levels
    /// Mean volume in dB
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean_volume_db: Option<f64>,
    /// Dynamic range in dB
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dynamic_range_db: Option<f64>,
    /// Volume consistency (0.0 - 1.0)
    pub volume_consistency: f64,

    // Frequency
    /// Voice band energy score (0.0 - 1.0)
    pub frequency_score: f64,
    /// Whether the 85-255 Hz voice band is adequately present
    pub voice_range_covered: bool,
    /// Fundamental frequency estimate in Hz
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fundamental_frequency_hz: Option<f64>,

    // Temporal
    /// Percentage of silence
    pub silence_percentage: f64,
    /// Percentage of speech
    pub speech_percentage: f64,
    /// Number of pauses longer than the detection threshold
    pub pause_count: u32,
    /// Average pause length in seconds
    pub avg_pause_duration: f64,

    // Distortion
    /// Clipping detected
    pub has_clipping: bool,
    /// Distortion detected (currently identical to clipping)
    pub has_distortion: bool,
    /// Distortion score (1.0 = clean)
    pub distortion_score: f64,

    // Transcript
    /// Transcript cross-check, present only when a transcript was supplied
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcript: Option<TranscriptAlignment>,

    // Derived
    /// Weighted overall score (0.0 - 1.0)
    pub overall_score: f64,
    /// Verdict derived from `overall_score`
    pub suitability: Suitability,
    /// Ordered list of recommendations
    pub recommendations: Vec<String>,
    /// Ordered list of serious issues
    pub issues: Vec<String>,
}

impl Default for QualityMetrics {
    fn default() -> Self {
        Self {
            duration: 0.0,
            sample_rate: None,
            bitrate: None,
            channels: 1,
            codec: UNKNOWN_CODEC.to_string(),
            snr_db: None,
            background_noise_db: None,
            speech_clarity: 0.0,
            mean_volume_db: None,
            dynamic_range_db: None,
            volume_consistency: 0.0,
            frequency_score: 0.0,
            voice_range_covered: false,
            fundamental_frequency_hz: None,
            silence_percentage: 0.0,
            speech_percentage: 0.0,
            pause_count: 0,
            avg_pause_duration: 0.0,
            has_clipping: false,
            has_distortion: false,
            distortion_score: 1.0,
            transcript: None,
            overall_score: 0.0,
            suitability: Suitability::Poor,
            recommendations: Vec::new(),
            issues: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_record() {
        let metrics = QualityMetrics::default();
        assert_eq!(metrics.channels, 1);
        assert_eq!(metrics.codec, UNKNOWN_CODEC);
        assert_eq!(metrics.suitability, Suitability::Poor);
        assert!(metrics.transcript.is_none());
        assert!(metrics.issues.is_empty());
    }

    #[test]
    fn test_optional_fields_skipped_in_json() {
        let json = serde_json::to_value(QualityMetrics::default()).unwrap();
        assert!(json.get("snr_db").is_none());
        assert!(json.get("transcript").is_none());
        assert_eq!(json["suitability"], "poor");
        assert_eq!(json["channels"], 1);
    }

    #[test]
    fn test_json_round_trip_preserves_record() {
        let metrics = QualityMetrics {
            duration: 42.5,
            snr_db: Some(24.0),
            transcript: Some(TranscriptAlignment {
                char_count: 10,
                word_count: 2,
                words_per_minute: 2.8,
                alignment_score: 0.02,
            }),
            issues: vec!["Audio too short".to_string()],
            ..Default::default()
        };

        let json = serde_json::to_string(&metrics).unwrap();
        let parsed: QualityMetrics = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, metrics);
    }
}
