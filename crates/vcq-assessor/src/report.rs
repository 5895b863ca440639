//! Human-readable assessment report.

use std::fmt::Write;

use vcq_models::QualityMetrics;

fn opt_db(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.1} dB"))
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

/// Render a metrics record as a plain-text report.
pub fn render_text(metrics: &QualityMetrics) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_report(&mut out, metrics);
    out
}

fn write_report(out: &mut String, m: &QualityMetrics) -> std::fmt::Result {
    writeln!(out, "Voice Clone Audio Quality Report")?;
    writeln!(out, "================================")?;

    writeln!(out, "\nTechnical")?;
    writeln!(out, "  Duration:          {:.1}s", m.duration)?;
    match m.sample_rate {
        Some(sr) => writeln!(out, "  Sample rate:       {sr} Hz")?,
        None => writeln!(out, "  Sample rate:       n/a")?,
    }
    match m.bitrate {
        Some(kbps) => writeln!(out, "  Bitrate:           {kbps} kbps")?,
        None => writeln!(out, "  Bitrate:           n/a")?,
    }
    writeln!(out, "  Channels:          {}", m.channels)?;
    writeln!(out, "  Codec:             {}", m.codec)?;

    writeln!(out, "\nSignal")?;
    writeln!(out, "  SNR:               {}", opt_db(m.snr_db))?;
    writeln!(out, "  Noise floor:       {}", opt_db(m.background_noise_db))?;
    writeln!(out, "  Clarity:           {:.2}", m.speech_clarity)?;

    writeln!(out, "\nLevels")?;
    writeln!(out, "  Mean volume:       {}", opt_db(m.mean_volume_db))?;
    writeln!(out, "  Dynamic range:     {}", opt_db(m.dynamic_range_db))?;
    writeln!(out, "  Consistency:       {:.2}", m.volume_consistency)?;

    writeln!(out, "\nFrequency")?;
    writeln!(out, "  Voice band score:  {:.2}", m.frequency_score)?;
    writeln!(out, "  Voice range:       {}", if m.voice_range_covered { "covered" } else { "weak" })?;
    if let Some(f0) = m.fundamental_frequency_hz {
        writeln!(out, "  Fundamental:       {f0:.0} Hz")?;
    }

    writeln!(out, "\nTemporal")?;
    writeln!(out, "  Speech:            {:.1}%", m.speech_percentage)?;
    writeln!(out, "  Silence:           {:.1}%", m.silence_percentage)?;
    writeln!(out, "  Pauses:            {} (avg {:.2}s)", m.pause_count, m.avg_pause_duration)?;

    writeln!(out, "\nDistortion")?;
    writeln!(out, "  Clipping:          {}", yes_no(m.has_clipping))?;
    writeln!(out, "  Distortion score:  {:.2}", m.distortion_score)?;

    if let Some(t) = &m.transcript {
        writeln!(out, "\nTranscript")?;
        writeln!(out, "  Words:             {} ({} chars)", t.word_count, t.char_count)?;
        writeln!(out, "  Words per minute:  {:.1}", t.words_per_minute)?;
        writeln!(out, "  Alignment:         {:.2}", t.alignment_score)?;
    }

    writeln!(out, "\nVerdict")?;
    writeln!(out, "  Overall score:     {:.3}", m.overall_score)?;
    writeln!(out, "  Suitability:       {}", m.suitability.as_str().to_uppercase())?;

    if !m.issues.is_empty() {
        writeln!(out, "\nIssues")?;
        for issue in &m.issues {
            writeln!(out, "  ! {issue}")?;
        }
    }

    writeln!(out, "\nRecommendations")?;
    for rec in &m.recommendations {
        writeln!(out, "  - {rec}")?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use vcq_models::{Suitability, TranscriptAlignment};

    #[test]
    fn test_render_includes_verdict_and_lists() {
        let metrics = QualityMetrics {
            duration: 42.0,
            sample_rate: Some(44100),
            snr_db: Some(18.25),
            overall_score: 0.712,
            suitability: Suitability::Good,
            issues: vec!["Clipping detected".into()],
            recommendations: vec!["Normalize volume".into()],
            ..Default::default()
        };

        let text = render_text(&metrics);
        assert!(text.contains("Sample rate:       44100 Hz"));
        assert!(text.contains("SNR:               18.2 dB") || text.contains("SNR:               18.3 dB"));
        assert!(text.contains("Suitability:       GOOD"));
        assert!(text.contains("! Clipping detected"));
        assert!(text.contains("- Normalize volume"));
        assert!(!text.contains("Transcript"));
    }

    #[test]
    fn test_render_missing_fields() {
        let text = render_text(&QualityMetrics::default());
        assert!(text.contains("Sample rate:       n/a"));
        assert!(text.contains("Noise floor:       n/a"));
        assert!(!text.contains("Issues"));
    }

    #[test]
    fn test_render_transcript_section() {
        let metrics = QualityMetrics {
            transcript: Some(TranscriptAlignment {
                char_count: 11,
                word_count: 2,
                words_per_minute: 120.0,
                alignment_score: 0.8,
            }),
            ..Default::default()
        };
        let text = render_text(&metrics);
        assert!(text.contains("Words:             2 (11 chars)"));
        assert!(text.contains("Alignment:         0.80"));
    }
}
