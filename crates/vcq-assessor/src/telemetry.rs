//! Assessment metrics.
//!
//! Recorded through the `metrics` facade; installing an exporter is left to
//! the embedding application.

use metrics::{counter, histogram};

// =============================================================================
// Metric Names
// =============================================================================

/// Metric name constants for consistency.
pub mod names {
    /// Total assessments by outcome.
    pub const ASSESSMENTS_TOTAL: &str = "vcq_assessments_total";

    /// Absorbed stage failures by stage.
    pub const STAGE_FAILURES_TOTAL: &str = "vcq_stage_failures_total";

    /// Wall-clock assessment time in seconds.
    pub const ASSESSMENT_DURATION_SECONDS: &str = "vcq_assessment_duration_seconds";

    /// Distribution of overall scores.
    pub const OVERALL_SCORE: &str = "vcq_overall_score";
}

/// How an assessment ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Every stage produced its result.
    Completed,
    /// A record was returned but at least one stage failed.
    Degraded,
    /// Extraction failed; no record.
    Failed,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Degraded => "degraded",
            Self::Failed => "failed",
        }
    }
}

// =============================================================================
// Recording Functions
// =============================================================================

/// Record the end of one assessment.
pub fn record_assessment(outcome: Outcome, elapsed_secs: f64, overall_score: Option<f64>) {
    counter!(names::ASSESSMENTS_TOTAL, "outcome" => outcome.as_str()).increment(1);
    histogram!(names::ASSESSMENT_DURATION_SECONDS).record(elapsed_secs);

    if let Some(score) = overall_score {
        histogram!(names::OVERALL_SCORE).record(score);
    }
}

/// Record a stage failure that was absorbed into a degraded record.
pub fn record_stage_failure(stage: &'static str) {
    counter!(names::STAGE_FAILURES_TOTAL, "stage" => stage).increment(1);
}
