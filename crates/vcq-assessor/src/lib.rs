//! Voice-clone audio quality assessment.
//!
//! This crate provides:
//! - Pure analyzer stages (signal, volume, frequency, speech, distortion, transcript)
//! - The weighted scoring and recommendation engine
//! - The `Assessor` orchestrator and bounded batch assessment
//! - Configuration, logging, metrics and text report rendering

pub mod analyzers;
pub mod assessor;
pub mod batch;
pub mod config;
pub mod error;
pub mod logging;
pub mod report;
pub mod scoring;
pub mod telemetry;

pub use assessor::{Assessor, ASSESSMENT_ERROR_PREFIX};
pub use batch::{AssessmentRequest, BatchOutcome};
pub use config::AssessorConfig;
pub use error::{AssessError, AssessResult};
pub use report::render_text;
