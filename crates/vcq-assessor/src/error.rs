//! Assessor error types.

use thiserror::Error;
use vcq_media::MediaError;

pub type AssessResult<T> = Result<T, AssessError>;

/// Errors raised to the caller of an assessment.
///
/// Stage failures never appear here; they degrade the record instead.
#[derive(Debug, Error)]
pub enum AssessError {
    /// The media could not be turned into the canonical audio stream.
    #[error("Audio extraction failed: {0}")]
    Extraction(#[from] MediaError),

    #[error("Configuration error: {0}")]
    Config(String),

    /// Failure that escaped stage handling. Recorded as an issue by the
    /// orchestrator rather than returned.
    #[error("{0}")]
    Unexpected(String),
}

impl AssessError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn unexpected(msg: impl Into<String>) -> Self {
        Self::Unexpected(msg.into())
    }

    /// Returns true for the fatal extraction failure.
    pub fn is_extraction(&self) -> bool {
        matches!(self, Self::Extraction(_))
    }
}
