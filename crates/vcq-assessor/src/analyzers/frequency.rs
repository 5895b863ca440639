//! Voice-band frequency response.
//!
//! Energy heuristic only: the band-limited (85-255 Hz) RMS tells whether a
//! voice fundamental is present. There is no pitch tracker, so the
//! fundamental frequency estimate is never populated.

use vcq_models::FrequencyResponse;

use super::{mean, unit};

/// Mean band RMS above which the voice range counts as covered (dB).
pub const VOICE_PRESENCE_DB: f64 = -40.0;

/// Band RMS mapped to a score of 0.0 (dB).
const SCORE_FLOOR_DB: f64 = -60.0;

/// Width of the band RMS range mapped onto 0.0 - 1.0.
const SCORE_SPAN_DB: f64 = 40.0;

/// Score the voice band from per-window band-limited RMS levels (dB).
pub fn analyze_frequency(band_rms_levels: &[f64]) -> FrequencyResponse {
    let Some(band_mean) = mean(band_rms_levels) else {
        return FrequencyResponse::default();
    };

    FrequencyResponse {
        band_energy_db: Some(band_mean),
        score: unit((band_mean - SCORE_FLOOR_DB) / SCORE_SPAN_DB),
        voice_range_covered: band_mean > VOICE_PRESENCE_DB,
        fundamental_hz: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_covered_voice_band() {
        let response = analyze_frequency(&[-28.0, -32.0]);
        assert_eq!(response.band_energy_db, Some(-30.0));
        assert!((response.score - 0.75).abs() < 1e-12);
        assert!(response.voice_range_covered);
        assert!(response.fundamental_hz.is_none());
    }

    #[test]
    fn test_presence_threshold_is_exclusive() {
        let response = analyze_frequency(&[-40.0]);
        assert!(!response.voice_range_covered);
        assert!((response.score - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_score_clamped() {
        assert_eq!(analyze_frequency(&[-80.0]).score, 0.0);
        assert_eq!(analyze_frequency(&[-10.0]).score, 1.0);
    }

    #[test]
    fn test_no_windows() {
        let response = analyze_frequency(&[]);
        assert!(response.band_energy_db.is_none());
        assert_eq!(response.score, 0.0);
        assert!(!response.voice_range_covered);
    }
}
