//! Scoring and recommendation engine.
//!
//! Combines the partial scores on a merged [`QualityMetrics`] record into a
//! weighted overall score, a suitability verdict and ordered
//! recommendation/issue lists. Pure and deterministic.

use vcq_models::{QualityMetrics, Suitability};

use crate::analyzers::unit;

/// Component weights.
pub mod weights {
    pub const SNR: f64 = 0.30;
    pub const CLARITY: f64 = 0.20;
    pub const VOLUME_CONSISTENCY: f64 = 0.10;
    pub const FREQUENCY: f64 = 0.15;
    pub const DISTORTION: f64 = 0.15;
    pub const SILENCE: f64 = 0.10;
    pub const DURATION_BONUS: f64 = 0.05;
}

/// SNR mapped to a score of 0.0 (dB).
pub const SNR_SCORE_FLOOR_DB: f64 = 20.0;
/// SNR mapped to a score of 1.0 (dB).
pub const SNR_SCORE_CEILING_DB: f64 = 35.0;
/// Silence percentage at which the silence score reaches 0.0.
pub const SILENCE_SCORE_LIMIT_PCT: f64 = 20.0;
/// Duration at which the duration bonus saturates (seconds).
pub const TARGET_DURATION_SECS: f64 = 300.0;
/// Shortest recording that earns a duration bonus, and the hard minimum (seconds).
pub const MIN_DURATION_SECS: f64 = 30.0;

// Recommendation thresholds
const RECOMMENDED_SNR_DB: f64 = 20.0;
const RECOMMENDED_MAX_SILENCE_PCT: f64 = 20.0;
const RECOMMENDED_CONSISTENCY: f64 = 0.7;
const RECOMMENDED_SAMPLE_RATE: u32 = 22050;

// Issue thresholds
const MIN_SNR_DB: f64 = 15.0;
const MAX_SILENCE_PCT: f64 = 40.0;
const MAX_NOISE_FLOOR_DB: f64 = -30.0;

/// Message emitted when no recommendation fires.
pub const SUITABLE_MESSAGE: &str = "Audio quality is suitable for voice cloning";

/// One weighted term of the overall score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreComponent {
    pub name: &'static str,
    pub score: f64,
    pub weight: f64,
}

impl ScoreComponent {
    fn new(name: &'static str, score: f64, weight: f64) -> Self {
        Self {
            name,
            score: unit(score),
            weight,
        }
    }
}

/// The terms that enter the weighted average for this record.
///
/// SNR only contributes when it was measured, and the duration bonus only
/// for recordings of at least [`MIN_DURATION_SECS`].
pub fn score_components(metrics: &QualityMetrics) -> Vec<ScoreComponent> {
    let mut components = Vec::with_capacity(7);

    if let Some(snr) = metrics.snr_db {
        let snr_score = (snr - SNR_SCORE_FLOOR_DB) / (SNR_SCORE_CEILING_DB - SNR_SCORE_FLOOR_DB);
        components.push(ScoreComponent::new("snr", snr_score, weights::SNR));
    }

    components.push(ScoreComponent::new("clarity", metrics.speech_clarity, weights::CLARITY));
    components.push(ScoreComponent::new(
        "volume_consistency",
        metrics.volume_consistency,
        weights::VOLUME_CONSISTENCY,
    ));
    components.push(ScoreComponent::new("frequency", metrics.frequency_score, weights::FREQUENCY));
    components.push(ScoreComponent::new("distortion", metrics.distortion_score, weights::DISTORTION));
    components.push(ScoreComponent::new(
        "silence",
        (1.0 - metrics.silence_percentage / SILENCE_SCORE_LIMIT_PCT).max(0.0),
        weights::SILENCE,
    ));

    if metrics.duration >= MIN_DURATION_SECS {
        components.push(ScoreComponent::new(
            "duration",
            (metrics.duration / TARGET_DURATION_SECS).min(1.0),
            weights::DURATION_BONUS,
        ));
    }

    components
}

/// Weighted average of the components, renormalized by the weight used.
pub fn overall_score(components: &[ScoreComponent]) -> f64 {
    let weight_used: f64 = components.iter().map(|c| c.weight).sum();
    if weight_used <= 0.0 {
        return 0.0;
    }
    let weighted: f64 = components.iter().map(|c| c.score * c.weight).sum();
    unit(weighted / weight_used)
}

/// Recommendations in fixed evaluation order; a single affirmative message
/// when nothing fires.
pub fn recommendations(metrics: &QualityMetrics) -> Vec<String> {
    let mut out = Vec::new();

    if metrics.snr_db.is_some_and(|snr| snr < RECOMMENDED_SNR_DB) {
        out.push("Improve signal-to-noise ratio: record in a quieter environment or apply noise reduction".to_string());
    }
    if metrics.silence_percentage > RECOMMENDED_MAX_SILENCE_PCT {
        out.push("Trim long silences: more than 20% of the recording is silence".to_string());
    }
    if metrics.volume_consistency < RECOMMENDED_CONSISTENCY {
        out.push("Normalize volume: levels vary too much across the recording".to_string());
    }
    if metrics.has_clipping {
        out.push("Reduce input gain or apply a limiter to avoid clipping".to_string());
    }
    if metrics.duration < TARGET_DURATION_SECS {
        out.push("Record more audio: at least 5 minutes is recommended for voice cloning".to_string());
    }
    if !metrics.voice_range_covered {
        out.push("Re-record with better microphone placement: the voice fundamental range is weak".to_string());
    }
    if metrics.sample_rate.is_some_and(|sr| sr < RECOMMENDED_SAMPLE_RATE) {
        out.push("Use a higher sample rate (at least 22050 Hz, ideally 44100 Hz)".to_string());
    }
    if metrics.channels > 1 {
        out.push("Convert to mono: voice cloning expects a single channel".to_string());
    }

    if out.is_empty() {
        out.push(SUITABLE_MESSAGE.to_string());
    }
    out
}

/// Serious defects, evaluated against stricter thresholds.
pub fn issues(metrics: &QualityMetrics) -> Vec<String> {
    let mut out = Vec::new();

    if let Some(snr) = metrics.snr_db.filter(|&snr| snr < MIN_SNR_DB) {
        out.push(format!("Very low signal-to-noise ratio ({snr:.1} dB)"));
    }
    if metrics.silence_percentage > MAX_SILENCE_PCT {
        out.push(format!(
            "Excessive silence ({:.1}% of the recording)",
            metrics.silence_percentage
        ));
    }
    if metrics.has_clipping {
        out.push("Clipping detected".to_string());
    }
    if metrics.duration < MIN_DURATION_SECS {
        out.push(format!(
            "Audio too short ({:.1}s, minimum is {MIN_DURATION_SECS:.0}s)",
            metrics.duration
        ));
    }
    if let Some(noise) = metrics.background_noise_db.filter(|&db| db > MAX_NOISE_FLOOR_DB) {
        out.push(format!("High background noise ({noise:.1} dB)"));
    }

    out
}

/// Fill the derived fields of a merged record.
///
/// Issues produced here are prepended to any already recorded, so an
/// "Assessment error" added by the orchestrator stays last.
pub fn finalize(metrics: &mut QualityMetrics) {
    let components = score_components(metrics);
    metrics.overall_score = overall_score(&components);
    metrics.suitability = Suitability::from_score(metrics.overall_score);
    metrics.recommendations = recommendations(metrics);

    let mut all_issues = issues(metrics);
    all_issues.append(&mut metrics.issues);
    metrics.issues = all_issues;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clean_record() -> QualityMetrics {
        QualityMetrics {
            duration: 600.0,
            sample_rate: Some(44100),
            channels: 1,
            snr_db: Some(40.0),
            background_noise_db: Some(-60.0),
            speech_clarity: 1.0,
            volume_consistency: 1.0,
            frequency_score: 1.0,
            voice_range_covered: true,
            distortion_score: 1.0,
            silence_percentage: 0.0,
            speech_percentage: 100.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_perfect_record_scores_one() {
        let mut metrics = clean_record();
        finalize(&mut metrics);

        assert!((metrics.overall_score - 1.0).abs() < 1e-12);
        assert_eq!(metrics.suitability, Suitability::Excellent);
        assert_eq!(metrics.recommendations, vec![SUITABLE_MESSAGE.to_string()]);
        assert!(metrics.issues.is_empty());
    }

    #[test]
    fn test_missing_snr_is_excluded_not_zeroed() {
        let mut metrics = clean_record();
        metrics.snr_db = None;

        let components = score_components(&metrics);
        assert!(components.iter().all(|c| c.name != "snr"));
        let weight: f64 = components.iter().map(|c| c.weight).sum();
        assert!((weight - 0.75).abs() < 1e-12);
        assert!((overall_score(&components) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_duration_bonus_requires_30_seconds() {
        let mut metrics = clean_record();
        metrics.duration = 29.9;
        assert!(score_components(&metrics).iter().all(|c| c.name != "duration"));

        metrics.duration = 30.0;
        let bonus = score_components(&metrics)
            .into_iter()
            .find(|c| c.name == "duration")
            .unwrap();
        assert!((bonus.score - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_hand_computed_overall() {
        let metrics = QualityMetrics {
            duration: 600.0,
            sample_rate: Some(44100),
            snr_db: Some(-12.0),
            background_noise_db: Some(-12.0),
            speech_clarity: 0.2,
            volume_consistency: 0.4,
            frequency_score: 0.75,
            voice_range_covered: true,
            distortion_score: 1.0,
            silence_percentage: 5.0,
            speech_percentage: 95.0,
            ..Default::default()
        };

        // 0.3*0 + 0.2*0.2 + 0.1*0.4 + 0.15*0.75 + 0.15*1 + 0.1*0.75 + 0.05*1
        let expected = 0.4675 / 1.05;
        assert!((overall_score(&score_components(&metrics)) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_silence_score_floors_at_zero() {
        let mut metrics = clean_record();
        metrics.silence_percentage = 55.0;
        let silence = score_components(&metrics)
            .into_iter()
            .find(|c| c.name == "silence")
            .unwrap();
        assert_eq!(silence.score, 0.0);
    }

    #[test]
    fn test_recommendation_order() {
        let metrics = QualityMetrics {
            duration: 10.0,
            sample_rate: Some(16000),
            channels: 2,
            snr_db: Some(5.0),
            silence_percentage: 30.0,
            volume_consistency: 0.2,
            has_clipping: true,
            voice_range_covered: false,
            ..Default::default()
        };

        let recs = recommendations(&metrics);
        assert_eq!(recs.len(), 8);
        assert!(recs[0].contains("signal-to-noise"));
        assert!(recs[1].contains("silence"));
        assert!(recs[2].contains("Normalize"));
        assert!(recs[3].contains("clipping"));
        assert!(recs[4].contains("Record more"));
        assert!(recs[5].contains("microphone"));
        assert!(recs[6].contains("sample rate"));
        assert!(recs[7].contains("mono"));
    }

    #[test]
    fn test_unknown_sample_rate_does_not_recommend() {
        let mut metrics = clean_record();
        metrics.sample_rate = None;
        assert_eq!(recommendations(&metrics), vec![SUITABLE_MESSAGE.to_string()]);
    }

    #[test]
    fn test_issues() {
        let metrics = QualityMetrics {
            duration: 12.0,
            snr_db: Some(10.0),
            background_noise_db: Some(-25.0),
            silence_percentage: 45.0,
            has_clipping: true,
            ..Default::default()
        };

        let found = issues(&metrics);
        assert_eq!(found.len(), 5);
        assert!(found[0].contains("signal-to-noise"));
        assert!(found[1].contains("silence"));
        assert_eq!(found[2], "Clipping detected");
        assert!(found[3].contains("too short"));
        assert!(found[4].contains("background noise"));
    }

    #[test]
    fn test_finalize_keeps_existing_issues_last() {
        let mut metrics = QualityMetrics {
            duration: 5.0,
            issues: vec!["Assessment error: boom".to_string()],
            ..Default::default()
        };
        finalize(&mut metrics);

        assert_eq!(metrics.issues.last().unwrap(), "Assessment error: boom");
        assert!(metrics.issues[0].contains("too short"));
    }

    #[test]
    fn test_finalize_is_idempotent_on_scores() {
        let mut metrics = clean_record();
        finalize(&mut metrics);
        let first = metrics.overall_score;
        finalize(&mut metrics);
        assert_eq!(metrics.overall_score, first);
    }
}
