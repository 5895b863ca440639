#![deny(unreachable_patterns)]
//! FFmpeg/FFprobe CLI wrapper for voice-clone audio quality analysis.
//!
//! This crate provides:
//! - Type-safe FFmpeg command building with timeout-bounded execution
//! - The `AudioToolkit` boundary (transcode, probe, filter statistics, silence detection)
//! - Extraction of arbitrary media into a canonical mono PCM stream
//! - Typed parsers for FFprobe JSON and FFmpeg filter logs

pub mod command;
pub mod error;
pub mod extract;
pub mod filters;
pub mod probe;
pub mod readings;
pub mod silence;
pub mod toolkit;

pub use command::{check_ffmpeg, check_ffprobe, FfmpegCommand, FfmpegRunner, ToolOutput};
pub use error::{MediaError, MediaResult};
pub use extract::{extract_audio, is_audio_only, ExtractedAudio, AUDIO_EXTENSIONS};
pub use probe::{parse_probe_output, probe_audio, probe_duration};
pub use readings::{FilterReadings, Reading};
pub use silence::{parse_silence_intervals, SilenceDetectConfig};
pub use toolkit::{AudioToolkit, FfmpegToolkit, CANONICAL_SAMPLE_RATE};
