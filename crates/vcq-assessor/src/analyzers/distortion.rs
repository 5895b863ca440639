//! Clipping check from per-window peak levels.

use vcq_models::DistortionCheck;

/// Peak level at or above which a window counts as clipped (dBFS).
pub const CLIPPING_THRESHOLD_DB: f64 = -0.1;

/// Score assigned to a clipped recording.
pub const CLIPPED_SCORE: f64 = 0.3;

/// Flag clipping when any window peaks at or above [`CLIPPING_THRESHOLD_DB`].
///
/// No peak readings leaves the check clean. Distortion is reported as
/// clipping; there is no separate harmonic-distortion measure.
pub fn analyze_distortion(peak_levels: &[f64]) -> DistortionCheck {
    let clipped = peak_levels.iter().any(|&peak| peak >= CLIPPING_THRESHOLD_DB);

    DistortionCheck {
        has_clipping: clipped,
        has_distortion: clipped,
        score: if clipped { CLIPPED_SCORE } else { 1.0 },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_peaks() {
        let check = analyze_distortion(&[-3.0, -2.0, -0.2]);
        assert!(!check.has_clipping);
        assert!(!check.has_distortion);
        assert_eq!(check.score, 1.0);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let check = analyze_distortion(&[-6.0, -0.1]);
        assert!(check.has_clipping);
        assert!(check.has_distortion);
        assert_eq!(check.score, CLIPPED_SCORE);
    }

    #[test]
    fn test_just_below_threshold_is_clean() {
        let check = analyze_distortion(&[-0.11]);
        assert!(!check.has_clipping);
        assert_eq!(check.score, 1.0);
    }

    #[test]
    fn test_full_scale_peak() {
        assert!(analyze_distortion(&[0.0]).has_clipping);
    }

    #[test]
    fn test_no_readings_is_clean() {
        assert_eq!(analyze_distortion(&[]), DistortionCheck::default());
    }
}
