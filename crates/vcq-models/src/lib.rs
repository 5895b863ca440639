//! Shared data models for voice-clone audio quality assessment.
//!
//! This crate provides Serde-serializable types for:
//! - The per-run quality metrics record
//! - Typed partial results produced by each analyzer stage
//! - The categorical suitability verdict

pub mod quality;
pub mod stages;
pub mod suitability;

// Re-export common types
pub use quality::QualityMetrics;
pub use stages::{
    DistortionCheck, FrequencyResponse, MediaInfo, SignalQuality, SilenceInterval, SpeechPattern,
    TranscriptAlignment, VolumeQuality,
};
pub use suitability::Suitability;
