//! Analyzer stages.
//!
//! Every stage is a pure function from parsed tool output to one typed
//! partial result. Stages never read each other's results.

pub mod distortion;
pub mod frequency;
pub mod signal;
pub mod silence;
pub mod transcript;
pub mod volume;

pub use distortion::analyze_distortion;
pub use frequency::analyze_frequency;
pub use signal::analyze_signal;
pub use silence::analyze_speech;
pub use transcript::analyze_transcript;
pub use volume::{analyze_volume, VolumeLevels};

/// Arithmetic mean, `None` for an empty slice.
pub(crate) fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population standard deviation, `None` for an empty slice.
pub(crate) fn std_dev(values: &[f64]) -> Option<f64> {
    let mean = mean(values)?;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    Some(variance.sqrt())
}

/// Clamp into [0, 1], mapping NaN to 0.
pub(crate) fn unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
