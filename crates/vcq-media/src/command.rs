//! FFmpeg command builder and timeout-bounded runners.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::{MediaError, MediaResult};

/// Maximum number of stderr bytes kept on a failure error.
const STDERR_TAIL_BYTES: usize = 2000;

/// Where FFmpeg writes its result.
#[derive(Debug, Clone, PartialEq)]
enum Output {
    /// Write to a file
    File(PathBuf),
    /// Discard through the null muxer (analysis passes)
    Null,
}

/// Builder for FFmpeg commands.
#[derive(Debug, Clone)]
pub struct FfmpegCommand {
    /// Input file path
    input: PathBuf,
    /// Output target
    output: Output,
    /// Output arguments (after -i)
    output_args: Vec<String>,
    /// Whether to overwrite output
    overwrite: bool,
    /// Log level
    log_level: String,
}

impl FfmpegCommand {
    /// Create a new FFmpeg command writing to a file.
    pub fn new(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Self {
        Self {
            input: input.as_ref().to_path_buf(),
            output: Output::File(output.as_ref().to_path_buf()),
            output_args: Vec::new(),
            overwrite: true,
            log_level: "error".to_string(),
        }
    }

    /// Create an analysis-only command whose output is discarded.
    ///
    /// Filters report through the log at `info` level, so that is the default here.
    pub fn analyze(input: impl AsRef<Path>) -> Self {
        Self {
            input: input.as_ref().to_path_buf(),
            output: Output::Null,
            output_args: Vec::new(),
            overwrite: false,
            log_level: "info".to_string(),
        }
    }

    /// Add output arguments (after -i).
    pub fn output_arg(mut self, arg: impl Into<String>) -> Self {
        self.output_args.push(arg.into());
        self
    }

    /// Drop any video streams.
    pub fn no_video(self) -> Self {
        self.output_arg("-vn")
    }

    /// Set audio filter graph.
    pub fn audio_filter(self, filter: impl Into<String>) -> Self {
        self.output_arg("-af").output_arg(filter)
    }

    /// Set audio codec.
    pub fn audio_codec(self, codec: impl Into<String>) -> Self {
        self.output_arg("-c:a").output_arg(codec)
    }

    /// Set output channel count.
    pub fn audio_channels(self, channels: u32) -> Self {
        self.output_arg("-ac").output_arg(channels.to_string())
    }

    /// Set output sample rate.
    pub fn sample_rate(self, hz: u32) -> Self {
        self.output_arg("-ar").output_arg(hz.to_string())
    }

    /// Force output container format.
    pub fn format(self, format: impl Into<String>) -> Self {
        self.output_arg("-f").output_arg(format)
    }

    /// Build the command arguments.
    pub fn build_args(&self) -> Vec<String> {
        let mut args = Vec::new();

        if self.overwrite {
            args.push("-y".to_string());
        }

        args.push("-hide_banner".to_string());
        args.push("-nostats".to_string());

        args.push("-v".to_string());
        args.push(self.log_level.clone());

        args.push("-i".to_string());
        args.push(self.input.to_string_lossy().to_string());

        args.extend(self.output_args.clone());

        match &self.output {
            Output::File(path) => args.push(path.to_string_lossy().to_string()),
            Output::Null => {
                args.push("-f".to_string());
                args.push("null".to_string());
                args.push("-".to_string());
            }
        }

        args
    }
}

/// Captured output of a finished tool invocation.
#[derive(Debug, Clone, Default)]
pub struct ToolOutput {
    /// Raw stdout bytes
    pub stdout: Vec<u8>,
    /// Lossily decoded stderr
    pub stderr: String,
}

/// Runner for FFmpeg commands with a timeout.
#[derive(Debug, Clone, Default)]
pub struct FfmpegRunner {
    /// Timeout in seconds
    timeout_secs: Option<u64>,
}

impl FfmpegRunner {
    /// Create a new runner without a timeout.
    pub fn new() -> Self {
        Self { timeout_secs: None }
    }

    /// Set timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Run an FFmpeg command and capture its output.
    pub async fn run(&self, cmd: &FfmpegCommand) -> MediaResult<ToolOutput> {
        check_ffmpeg()?;

        let args = cmd.build_args();
        debug!("Running FFmpeg: ffmpeg {}", args.join(" "));

        let output = run_captured("ffmpeg", &args, self.timeout_secs).await?;

        if output.status.success() {
            Ok(output.captured)
        } else {
            Err(MediaError::ffmpeg_failed(
                "FFmpeg exited with non-zero status",
                Some(stderr_tail(&output.captured.stderr)),
                output.status.code(),
            ))
        }
    }
}

/// Run FFprobe with the given arguments and capture its output.
pub async fn run_ffprobe(args: &[String], timeout_secs: Option<u64>) -> MediaResult<ToolOutput> {
    check_ffprobe()?;

    debug!("Running FFprobe: ffprobe {}", args.join(" "));

    let output = run_captured("ffprobe", args, timeout_secs).await?;

    if output.status.success() {
        Ok(output.captured)
    } else {
        Err(MediaError::ffprobe_failed(
            format!("FFprobe exited with status {:?}", output.status.code()),
            Some(stderr_tail(&output.captured.stderr)),
        ))
    }
}

struct Finished {
    status: std::process::ExitStatus,
    captured: ToolOutput,
}

/// Spawn a tool, wait for it with an optional timeout and collect its output.
///
/// The child is killed if the timeout elapses.
async fn run_captured(program: &str, args: &[String], timeout_secs: Option<u64>) -> MediaResult<Finished> {
    let child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()?;

    let wait_future = child.wait_with_output();

    let output = match timeout_secs {
        Some(secs) => match tokio::time::timeout(Duration::from_secs(secs), wait_future).await {
            Ok(result) => result?,
            Err(_) => {
                // Dropping the future drops the child, which kills it
                warn!("{} timed out after {} seconds, killing process", program, secs);
                return Err(MediaError::Timeout(secs));
            }
        },
        None => wait_future.await?,
    };

    Ok(Finished {
        status: output.status,
        captured: ToolOutput {
            stdout: output.stdout,
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        },
    })
}

/// Keep the last part of a stderr dump, on a char boundary.
fn stderr_tail(stderr: &str) -> String {
    if stderr.len() <= STDERR_TAIL_BYTES {
        return stderr.to_string();
    }
    let mut start = stderr.len() - STDERR_TAIL_BYTES;
    while !stderr.is_char_boundary(start) {
        start += 1;
    }
    stderr[start..].to_string()
}

/// Check if FFmpeg is available.
pub fn check_ffmpeg() -> MediaResult<PathBuf> {
    which::which("ffmpeg").map_err(|_| MediaError::FfmpegNotFound)
}

/// Check if FFprobe is available.
pub fn check_ffprobe() -> MediaResult<PathBuf> {
    which::which("ffprobe").map_err(|_| MediaError::FfprobeNotFound)
}
