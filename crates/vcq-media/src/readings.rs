//! Labeled numeric readings parsed from FFmpeg filter logs.
//!
//! FFmpeg filters report through stderr in two shapes:
//!
//! ```text
//! [Parsed_ametadata_2 @ 0x55d1c8] lavfi.astats.Overall.RMS_level=-23.41
//! [Parsed_volumedetect_0 @ 0x55d1c8] mean_volume: -20.5 dB
//! ```
//!
//! Both become a `Reading { label, value }`. Lines without a numeric value
//! are skipped.

/// One labeled numeric value from a filter log.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    /// Label, e.g. `lavfi.astats.Overall.RMS_level` or `mean_volume`
    pub label: String,
    /// Parsed value; may be non-finite (`-inf` for digital silence)
    pub value: f64,
}

/// Ordered sequence of readings from one filter run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterReadings {
    readings: Vec<Reading>,
}

impl FilterReadings {
    /// Wrap already-parsed readings.
    pub fn new(readings: Vec<Reading>) -> Self {
        Self { readings }
    }

    /// Parse every reading out of a filter log.
    pub fn parse(log: &str) -> Self {
        Self {
            readings: log.lines().filter_map(parse_reading).collect(),
        }
    }

    /// Finite values for a label, in log order.
    pub fn values(&self, label: &str) -> Vec<f64> {
        self.readings
            .iter()
            .filter(|r| r.label == label && r.value.is_finite())
            .map(|r| r.value)
            .collect()
    }

    /// Last finite value for a label.
    pub fn last(&self, label: &str) -> Option<f64> {
        self.readings
            .iter()
            .rev()
            .find(|r| r.label == label && r.value.is_finite())
            .map(|r| r.value)
    }

    /// Last value for a label, including `-inf` for digital silence.
    pub fn last_raw(&self, label: &str) -> Option<f64> {
        self.readings
            .iter()
            .rev()
            .find(|r| r.label == label)
            .map(|r| r.value)
    }

    /// Number of readings.
    pub fn len(&self) -> usize {
        self.readings.len()
    }

    /// Returns true if nothing was parsed.
    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }
}

/// Parse a single log line into a reading.
pub fn parse_reading(line: &str) -> Option<Reading> {
    let body = strip_context_prefix(line.trim());

    let sep = body.find(&['=', ':'][..])?;
    let label = body[..sep].trim();
    if label.is_empty() {
        return None;
    }

    let value = body[sep + 1..].split_whitespace().next()?.parse::<f64>().ok()?;

    Some(Reading {
        label: label.to_string(),
        value,
    })
}

/// Remove the `[Parsed_xxx @ 0x...] ` context prefix FFmpeg puts on filter logs.
fn strip_context_prefix(line: &str) -> &str {
    if line.starts_with('[') {
        if let Some(end) = line.find("] ") {
            return line[end + 2..].trim_start();
        }
    }
    line
}
