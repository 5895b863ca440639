//! Signal quality: SNR estimate and noise floor from windowed RMS levels.

use vcq_models::SignalQuality;

use super::{mean, std_dev, unit};

/// SNR mapped to a clarity of 0.0.
const CLARITY_FLOOR_DB: f64 = -20.0;

/// Width of the SNR range mapped onto clarity 0.0 - 1.0.
const CLARITY_SPAN_DB: f64 = 40.0;

/// Estimate signal quality from per-window RMS levels (dB).
///
/// A tight level distribution means consistent speech well above the noise,
/// so the SNR is the mean level minus its spread. The quietest window stands
/// in for the noise floor. No windows means nothing is measured and clarity
/// stays 0.0.
pub fn analyze_signal(rms_levels: &[f64]) -> SignalQuality {
    let (Some(mean_rms), Some(spread)) = (mean(rms_levels), std_dev(rms_levels)) else {
        return SignalQuality::default();
    };

    let snr = if spread > 0.0 { mean_rms - spread } else { mean_rms };
    let noise_floor = rms_levels.iter().copied().fold(f64::INFINITY, f64::min);

    SignalQuality {
        snr_db: Some(snr),
        noise_floor_db: Some(noise_floor),
        clarity: clarity_from_snr(snr),
    }
}

/// Linear rescale of SNR: -20 dB -> 0.0, +20 dB -> 1.0.
pub fn clarity_from_snr(snr_db: f64) -> f64 {
    unit((snr_db - CLARITY_FLOOR_DB) / CLARITY_SPAN_DB)
}
