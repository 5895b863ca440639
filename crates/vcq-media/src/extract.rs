//! Audio extraction into the canonical analysis stream.
//!
//! Audio-only inputs pass through untouched. Anything else (video
//! containers, unknown extensions) is transcoded to a temporary mono
//! 16-bit 44.1 kHz WAV that is deleted when the `ExtractedAudio` is dropped.
//! Passthrough inputs are never deleted.

use std::path::{Path, PathBuf};
use tempfile::TempPath;
use tracing::{debug, info};

use crate::error::{MediaError, MediaResult};
use crate::toolkit::AudioToolkit;

/// Extensions analysed directly without transcoding.
pub const AUDIO_EXTENSIONS: &[&str] = &["wav", "mp3", "flac", "m4a", "aac", "ogg", "opus"];

/// Returns true if the path has a recognized audio-only extension.
pub fn is_audio_only(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| AUDIO_EXTENSIONS.iter().any(|a| a.eq_ignore_ascii_case(e)))
        .unwrap_or(false)
}

/// The canonical audio stream handed to the analyzers.
#[derive(Debug)]
pub enum ExtractedAudio {
    /// Caller-owned input, used as-is
    Passthrough(PathBuf),
    /// Temporary WAV owned by this value, removed on drop
    Transcoded(TempPath),
}

impl ExtractedAudio {
    /// Path of the audio to analyse.
    pub fn path(&self) -> &Path {
        match self {
            Self::Passthrough(path) => path.as_path(),
            Self::Transcoded(temp) => temp.as_ref(),
        }
    }

    /// Returns true if this value owns a temporary file.
    pub fn is_temporary(&self) -> bool {
        matches!(self, Self::Transcoded(_))
    }

    /// Remove the temporary file now, reporting any IO error.
    ///
    /// A passthrough input is left in place.
    pub fn cleanup(self) -> MediaResult<()> {
        match self {
            Self::Passthrough(_) => Ok(()),
            Self::Transcoded(temp) => {
                debug!(path = %temp.display(), "Removing temporary analysis audio");
                temp.close()?;
                Ok(())
            }
        }
    }
}

/// Normalize `media` into the canonical stream.
///
/// Fails if the input does not exist or the transcoder fails or times out.
/// There is no fallback on failure.
pub async fn extract_audio(
    toolkit: &dyn AudioToolkit,
    media: &Path,
    work_dir: &Path,
) -> MediaResult<ExtractedAudio> {
    if !media.is_file() {
        return Err(MediaError::FileNotFound(media.to_path_buf()));
    }

    if is_audio_only(media) {
        debug!(path = %media.display(), "Audio input, skipping transcode");
        return Ok(ExtractedAudio::Passthrough(media.to_path_buf()));
    }

    tokio::fs::create_dir_all(work_dir).await?;

    let temp_path = tempfile::Builder::new()
        .prefix("vcq_")
        .suffix(".wav")
        .tempfile_in(work_dir)?
        .into_temp_path();

    info!(
        input = %media.display(),
        output = %temp_path.display(),
        "Extracting canonical audio"
    );

    // On error `temp_path` is dropped here, removing the partial file
    toolkit.transcode(media, &temp_path).await?;

    let metadata = tokio::fs::metadata(&temp_path).await?;
    if metadata.len() == 0 {
        return Err(MediaError::invalid_audio(format!(
            "transcoder produced no audio for {}",
            media.display()
        )));
    }

    debug!(output_size = metadata.len(), "Audio extraction complete");

    Ok(ExtractedAudio::Transcoded(temp_path))
}
