//! FFprobe audio information.

use serde::Deserialize;
use std::path::Path;
use vcq_models::MediaInfo;

use crate::command::run_ffprobe;
use crate::error::{MediaError, MediaResult};

/// FFprobe JSON output format.
#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    format: Option<FfprobeFormat>,
    #[serde(default)]
    streams: Vec<FfprobeStream>,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    duration: Option<String>,
    bit_rate: Option<String>,
    format_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    codec_type: Option<String>,
    codec_name: Option<String>,
    sample_rate: Option<String>,
    channels: Option<u32>,
    bit_rate: Option<String>,
    duration: Option<String>,
}

/// Probe an audio file for duration, sample rate, channels, bitrate and codec
/// in a single FFprobe pass.
pub async fn probe_audio(path: impl AsRef<Path>, timeout_secs: Option<u64>) -> MediaResult<MediaInfo> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(MediaError::FileNotFound(path.to_path_buf()));
    }

    let args = vec![
        "-v".to_string(),
        "quiet".to_string(),
        "-print_format".to_string(),
        "json".to_string(),
        "-show_format".to_string(),
        "-show_streams".to_string(),
        "-select_streams".to_string(),
        "a:0".to_string(),
        path.to_string_lossy().to_string(),
    ];

    let output = run_ffprobe(&args, timeout_secs).await?;
    parse_probe_output(&output.stdout)
}

/// Get audio duration in seconds with a minimal FFprobe query.
pub async fn probe_duration(path: impl AsRef<Path>, timeout_secs: Option<u64>) -> MediaResult<f64> {
    let path = path.as_ref();

    let args = vec![
        "-v".to_string(),
        "error".to_string(),
        "-show_entries".to_string(),
        "format=duration".to_string(),
        "-of".to_string(),
        "default=noprint_wrappers=1:nokey=1".to_string(),
        path.to_string_lossy().to_string(),
    ];

    let output = run_ffprobe(&args, timeout_secs).await?;
    let text = String::from_utf8_lossy(&output.stdout);

    parse_seconds(text.trim())
        .ok_or_else(|| MediaError::invalid_audio(format!("unparseable duration: {:?}", text.trim())))
}

/// Parse FFprobe's JSON into `MediaInfo`.
///
/// Every field is optional; only malformed JSON is an error.
pub fn parse_probe_output(json: &[u8]) -> MediaResult<MediaInfo> {
    let probe: FfprobeOutput = serde_json::from_slice(json)?;

    let stream = probe
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref().map_or(true, |t| t == "audio"));
    let format = probe.format.as_ref();

    let duration = format
        .and_then(|f| f.duration.as_deref())
        .and_then(parse_seconds)
        .or_else(|| stream.and_then(|s| s.duration.as_deref()).and_then(parse_seconds));

    let bitrate_kbps = format
        .and_then(|f| f.bit_rate.as_deref())
        .or_else(|| stream.and_then(|s| s.bit_rate.as_deref()))
        .and_then(|b| b.parse::<u64>().ok())
        .map(|bps| (bps / 1000) as u32);

    let sample_rate = stream
        .and_then(|s| s.sample_rate.as_deref())
        .and_then(|r| r.parse::<u32>().ok())
        .filter(|r| *r > 0);

    let codec = stream
        .and_then(|s| s.codec_name.clone())
        .or_else(|| format.and_then(|f| f.format_name.clone()));

    Ok(MediaInfo {
        duration,
        sample_rate,
        bitrate_kbps,
        channels: stream.and_then(|s| s.channels).filter(|c| *c > 0),
        codec,
    })
}

/// Parse a non-negative, finite seconds value.
fn parse_seconds(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|d| d.is_finite() && *d >= 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_probe() {
        let json = br#"{
            "streams": [{
                "index": 0,
                "codec_name": "pcm_s16le",
                "codec_type": "audio",
                "sample_rate": "44100",
                "channels": 1,
                "bit_rate": "705600"
            }],
            "format": {
                "format_name": "wav",
                "duration": "600.000000",
                "bit_rate": "705644"
            }
        }"#;

        let info = parse_probe_output(json).unwrap();
        assert_eq!(info.duration, Some(600.0));
        assert_eq!(info.sample_rate, Some(44100));
        assert_eq!(info.channels, Some(1));
        assert_eq!(info.bitrate_kbps, Some(705));
        assert_eq!(info.codec.as_deref(), Some("pcm_s16le"));
    }

    #[test]
    fn test_parse_partial_probe() {
        let json = br#"{ "format": { "format_name": "mp3", "duration": "N/A" } }"#;

        let info = parse_probe_output(json).unwrap();
        assert!(info.duration.is_none());
        assert!(info.sample_rate.is_none());
        assert!(info.channels.is_none());
        assert_eq!(info.codec.as_deref(), Some("mp3"));
    }

    #[test]
    fn test_stream_duration_fallback() {
        let json = br#"{ "streams": [{ "codec_type": "audio", "duration": "12.5" }] }"#;
        let info = parse_probe_output(json).unwrap();
        assert_eq!(info.duration, Some(12.5));
    }

    #[test]
    fn test_malformed_json_is_error() {
        assert!(matches!(
            parse_probe_output(b"not json"),
            Err(MediaError::JsonParse(_))
        ));
    }

    #[test]
    fn test_parse_seconds() {
        assert_eq!(parse_seconds("30.5"), Some(30.5));
        assert_eq!(parse_seconds("N/A"), None);
        assert_eq!(parse_seconds("-1"), None);
    }

    #[tokio::test]
    async fn test_probe_missing_file() {
        let result = probe_audio("/nonexistent/voice.wav", Some(5)).await;
        assert!(matches!(result, Err(MediaError::FileNotFound(_))));
    }
}
