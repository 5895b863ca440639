//! Silence/speech segmentation summary.

use vcq_models::{SilenceInterval, SpeechPattern};

/// Summarize silence intervals over a recording of `total_duration` seconds.
///
/// Returns `None` when the duration is unknown or not positive; the stage is
/// then skipped. Silence is capped at 100% so speech and silence always sum
/// to 100.
pub fn analyze_speech(intervals: &[SilenceInterval], total_duration: f64) -> Option<SpeechPattern> {
    if !total_duration.is_finite() || total_duration <= 0.0 {
        return None;
    }

    let total_silence: f64 = intervals.iter().map(|i| i.duration.max(0.0)).sum();
    let silence_percentage = (total_silence / total_duration * 100.0).clamp(0.0, 100.0);
    let pause_count = intervals.len() as u32;

    let avg_pause_duration = if pause_count > 0 {
        total_silence / pause_count as f64
    } else {
        0.0
    };

    Some(SpeechPattern {
        silence_percentage,
        speech_percentage: 100.0 - silence_percentage,
        pause_count,
        avg_pause_duration,
    })
}
