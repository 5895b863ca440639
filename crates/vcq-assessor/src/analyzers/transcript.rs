//! Transcript versus audio duration cross-check.

use vcq_models::TranscriptAlignment;

use super::unit;

/// Typical conversational speaking rate used to predict duration.
pub const TYPICAL_WPM: f64 = 150.0;

/// Compare a transcript's implied speaking time with the measured duration.
///
/// Words are whitespace-delimited tokens. A zero duration yields 0 words per
/// minute, and an alignment of 0.0 when neither side has any length.
pub fn analyze_transcript(transcript: &str, audio_duration: f64) -> TranscriptAlignment {
    let char_count = transcript.chars().count();
    let word_count = transcript.split_whitespace().count();
    let duration = if audio_duration.is_finite() {
        audio_duration.max(0.0)
    } else {
        0.0
    };

    let words_per_minute = if duration > 0.0 {
        word_count as f64 / duration * 60.0
    } else {
        0.0
    };

    let expected_duration = word_count as f64 / TYPICAL_WPM * 60.0;
    let longest = duration.max(expected_duration);
    let alignment_score = if longest > 0.0 {
        unit(1.0 - (duration - expected_duration).abs() / longest)
    } else {
        0.0
    };

    TranscriptAlignment {
        char_count,
        word_count,
        words_per_minute,
        alignment_score,
    }
}
