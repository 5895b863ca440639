//! Suitability verdict for voice cloning.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Four-level qualitative bucket derived from the overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum Suitability {
    /// Overall score below 0.50
    #[default]
    Poor,
    /// Overall score in [0.50, 0.65)
    Fair,
    /// Overall score in [0.65, 0.80)
    Good,
    /// Overall score of 0.80 or above
    Excellent,
}

impl Suitability {
    /// Lower bound (inclusive) of the excellent band.
    pub const EXCELLENT_MIN: f64 = 0.80;
    /// Lower bound (inclusive) of the good band.
    pub const GOOD_MIN: f64 = 0.65;
    /// Lower bound (inclusive) of the fair band.
    pub const FAIR_MIN: f64 = 0.50;

    /// Map an overall score onto its verdict.
    ///
    /// NaN maps to `Poor`.
    pub fn from_score(score: f64) -> Self {
        if score >= Self::EXCELLENT_MIN {
            Self::Excellent
        } else if score >= Self::GOOD_MIN {
            Self::Good
        } else if score >= Self::FAIR_MIN {
            Self::Fair
        } else {
            Self::Poor
        }
    }

    /// Returns the verdict as a string for display.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Poor => "poor",
            Self::Fair => "fair",
            Self::Good => "good",
            Self::Excellent => "excellent",
        }
    }
}

impl fmt::Display for Suitability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
