//! FFmpeg audio filter graph definitions for the analysis passes.

/// Lower edge of the human voice fundamental band (Hz).
pub const VOICE_BAND_LOW_HZ: u32 = 85;

/// Upper edge of the human voice fundamental band (Hz).
pub const VOICE_BAND_HIGH_HZ: u32 = 255;

/// Metadata key of the per-window RMS level.
pub const KEY_RMS_LEVEL: &str = "lavfi.astats.Overall.RMS_level";

/// Metadata key of the per-window peak level.
pub const KEY_PEAK_LEVEL: &str = "lavfi.astats.Overall.Peak_level";

/// Label of the global mean volume reported by `volumedetect`.
pub const KEY_MEAN_VOLUME: &str = "mean_volume";

/// Label of the loudest RMS window in the `astats` summary.
pub const KEY_RMS_PEAK: &str = "RMS peak dB";

/// Label of the quietest RMS window in the `astats` summary.
pub const KEY_RMS_TROUGH: &str = "RMS trough dB";

/// Windowed RMS/peak statistics, one metadata report per window.
///
/// `asetnsamples` fixes the window length and `reset=1` restarts the
/// statistics on every frame, so each printed reading covers one window.
/// Only the overall peak and RMS levels are exported.
pub fn windowed_stats(window_samples: u32) -> String {
    format!(
        "asetnsamples=n={}:p=0,astats=metadata=1:reset=1:measure_perchannel=none:measure_overall=Peak_level+RMS_level,ametadata=mode=print",
        window_samples.max(1)
    )
}

/// Windowed statistics restricted to the voice fundamental band.
pub fn voice_band_stats(window_samples: u32) -> String {
    format!(
        "highpass=f={},lowpass=f={},{}",
        VOICE_BAND_LOW_HZ,
        VOICE_BAND_HIGH_HZ,
        windowed_stats(window_samples)
    )
}

/// Global mean volume plus the `astats` summary (for the RMS peak and trough).
pub fn volume_stats() -> String {
    "volumedetect,astats".to_string()
}

/// Silence detection with a fixed noise floor and minimum duration.
pub fn silence_detect(noise_floor_db: f64, min_duration_secs: f64) -> String {
    format!("silencedetect=noise={}dB:d={}", noise_floor_db, min_duration_secs)
}

/// Window length in samples for a window duration at a given sample rate.
pub fn window_samples(window_seconds: f64, sample_rate: u32) -> u32 {
    ((window_seconds * sample_rate as f64).round() as u32).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_windowed_stats_filter() {
        assert_eq!(
            windowed_stats(22050),
            "asetnsamples=n=22050:p=0,astats=metadata=1:reset=1:measure_perchannel=none:measure_overall=Peak_level+RMS_level,ametadata=mode=print"
        );
        assert!(windowed_stats(0).contains("n=1:"));
    }

    #[test]
    fn test_windowed_stats_exports_only_read_keys() {
        let filter = windowed_stats(22050);
        assert!(filter.contains("measure_perchannel=none"));
        assert!(filter.contains("measure_overall=Peak_level+RMS_level"));
        assert!(KEY_PEAK_LEVEL.ends_with(".Overall.Peak_level"));
        assert!(KEY_RMS_LEVEL.ends_with(".Overall.RMS_level"));
    }

    #[test]
    fn test_voice_band_filter() {
        let filter = voice_band_stats(4410);
        assert!(filter.starts_with("highpass=f=85,lowpass=f=255,"));
        assert!(filter.ends_with(&windowed_stats(4410)));
    }

    #[test]
    fn test_silence_detect_filter() {
        assert_eq!(silence_detect(-40.0, 0.5), "silencedetect=noise=-40dB:d=0.5");
    }

    #[test]
    fn test_window_samples() {
        assert_eq!(window_samples(0.5, 44100), 22050);
        assert_eq!(window_samples(0.1, 16000), 1600);
        assert_eq!(window_samples(0.0, 44100), 1);
    }
}
