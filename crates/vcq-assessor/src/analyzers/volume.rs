//! Volume levels and consistency.

use vcq_media::filters::{KEY_MEAN_VOLUME, KEY_RMS_PEAK, KEY_RMS_TROUGH};
use vcq_media::FilterReadings;
use vcq_models::VolumeQuality;

use super::unit;

/// Dynamic range at which consistency reaches 0.0 (dB).
pub const INCONSISTENT_RANGE_DB: f64 = 30.0;

/// Level reported for digital silence (`-inf`), the 16-bit PCM floor (dB).
pub const SILENCE_FLOOR_DB: f64 = -96.0;

/// Global level readings for one recording.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VolumeLevels {
    pub mean_db: Option<f64>,
    pub max_db: Option<f64>,
    pub min_db: Option<f64>,
}

impl VolumeLevels {
    /// Pick the levels out of a `volumedetect,astats` pass.
    ///
    /// Maximum and minimum are the loudest and quietest RMS windows from the
    /// `astats` summary, so both sides of the range are the same measure.
    /// The overall block is printed last, so the last value wins. A window
    /// of digital silence reports `-inf`, which is held at
    /// [`SILENCE_FLOOR_DB`].
    pub fn from_readings(readings: &FilterReadings) -> Self {
        Self {
            mean_db: readings.last(KEY_MEAN_VOLUME),
            max_db: readings.last_raw(KEY_RMS_PEAK).and_then(floored),
            min_db: readings.last_raw(KEY_RMS_TROUGH).and_then(floored),
        }
    }
}

fn floored(level_db: f64) -> Option<f64> {
    if level_db.is_nan() || level_db == f64::INFINITY {
        None
    } else {
        Some(level_db.max(SILENCE_FLOOR_DB))
    }
}

/// Dynamic range and consistency from global levels.
pub fn analyze_volume(levels: VolumeLevels) -> VolumeQuality {
    let dynamic_range = match (levels.max_db, levels.min_db) {
        (Some(max), Some(min)) => Some(max - min),
        _ => None,
    };

    VolumeQuality {
        mean_db: levels.mean_db,
        max_db: levels.max_db,
        min_db: levels.min_db,
        dynamic_range_db: dynamic_range,
        consistency: dynamic_range.map(consistency_from_range).unwrap_or(0.0),
    }
}

/// 0 dB range -> 1.0, 30 dB or more -> 0.0.
pub fn consistency_from_range(dynamic_range_db: f64) -> f64 {
    unit(1.0 - dynamic_range_db / INCONSISTENT_RANGE_DB)
}
