//! Bounded batch assessment.

use std::path::PathBuf;

use futures::future::join_all;
use tokio::sync::Semaphore;
use tracing::info;
use vcq_models::QualityMetrics;

use crate::assessor::Assessor;
use crate::error::{AssessError, AssessResult};

/// One file to assess.
#[derive(Debug, Clone)]
pub struct AssessmentRequest {
    pub media_path: PathBuf,
    pub transcript: Option<String>,
}

impl AssessmentRequest {
    pub fn new(media_path: impl Into<PathBuf>) -> Self {
        Self {
            media_path: media_path.into(),
            transcript: None,
        }
    }

    pub fn with_transcript(mut self, transcript: impl Into<String>) -> Self {
        self.transcript = Some(transcript.into());
        self
    }
}

/// Result for one request of a batch.
#[derive(Debug)]
pub struct BatchOutcome {
    pub media_path: PathBuf,
    pub result: AssessResult<QualityMetrics>,
}

impl Assessor {
    /// Assess many files with at most `max_concurrent` running at once.
    ///
    /// Every request runs to completion; outcomes come back in submission
    /// order.
    pub async fn assess_batch(&self, requests: Vec<AssessmentRequest>) -> Vec<BatchOutcome> {
        let semaphore = Semaphore::new(self.config().max_concurrent.max(1));
        info!(
            requests = requests.len(),
            max_concurrent = self.config().max_concurrent,
            "Starting batch assessment"
        );

        let futures = requests.into_iter().map(|request| {
            let semaphore = &semaphore;
            async move {
                let result = match semaphore.acquire().await {
                    Ok(_permit) => {
                        self.assess(&request.media_path, request.transcript.as_deref())
                            .await
                    }
                    Err(_) => Err(AssessError::unexpected("Failed to acquire assessment permit")),
                };
                BatchOutcome {
                    media_path: request.media_path,
                    result,
                }
            }
        });

        let outcomes = join_all(futures).await;

        let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
        info!(
            total = outcomes.len(),
            failed, "Batch assessment complete"
        );

        outcomes
    }
}
