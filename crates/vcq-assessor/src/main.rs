//! Voice-clone audio quality assessment CLI.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context};
use tracing::{error, info};

use vcq_assessor::logging::init_tracing;
use vcq_assessor::{render_text, AssessmentRequest, Assessor, AssessorConfig, BatchOutcome};
use vcq_models::QualityMetrics;

const USAGE: &str = "\
Usage:
  vcq-assess [--json] [--transcript <file>] <media>...
  vcq-assess --check
  vcq-assess --schema";

#[derive(Debug, PartialEq)]
enum Command {
    Assess {
        json: bool,
        transcript: Option<PathBuf>,
        media: Vec<PathBuf>,
    },
    Check,
    Schema,
    Help,
}

impl Command {
    /// Whether the command reads the runtime configuration.
    fn needs_config(&self) -> bool {
        matches!(self, Command::Assess { .. } | Command::Check)
    }
}

fn parse_args<I>(args: I) -> anyhow::Result<Command>
where
    I: IntoIterator<Item = String>,
{
    let mut json = false;
    let mut transcript = None;
    let mut media = Vec::new();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--check" => return Ok(Command::Check),
            "--schema" => return Ok(Command::Schema),
            "-h" | "--help" => return Ok(Command::Help),
            "--json" => json = true,
            "--transcript" => {
                let file = args
                    .next()
                    .ok_or_else(|| anyhow!("--transcript requires a file argument"))?;
                transcript = Some(PathBuf::from(file));
            }
            flag if flag.starts_with("--") => bail!("unknown option: {flag}"),
            path => media.push(PathBuf::from(path)),
        }
    }

    if media.is_empty() {
        bail!("no media files given");
    }

    Ok(Command::Assess {
        json,
        transcript,
        media,
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let command = match parse_args(std::env::args().skip(1)) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("error: {e}\n\n{USAGE}");
            std::process::exit(2);
        }
    };

    if !command.needs_config() {
        match command {
            Command::Schema => {
                let schema = schemars::schema_for!(QualityMetrics);
                println!("{}", serde_json::to_string_pretty(&schema)?);
            }
            _ => println!("{USAGE}"),
        }
        return Ok(());
    }

    let config = AssessorConfig::from_env();
    config.validate()?;

    match command {
        Command::Help | Command::Schema => {}
        Command::Check => self_check(&config).await?,
        Command::Assess {
            json,
            transcript,
            media,
        } => {
            let transcript = match transcript {
                Some(path) => Some(
                    tokio::fs::read_to_string(&path)
                        .await
                        .with_context(|| format!("reading transcript {}", path.display()))?,
                ),
                None => None,
            };

            info!(files = media.len(), "Starting vcq-assess");
            let assessor = Assessor::new(config);
            let outcomes = assess_all(&assessor, media, transcript).await;

            let mut failed = false;
            for outcome in &outcomes {
                match &outcome.result {
                    Ok(metrics) => print_metrics(&outcome.media_path, metrics, json, outcomes.len() > 1)?,
                    Err(e) => {
                        failed = true;
                        error!(media = %outcome.media_path.display(), error = %e, "Assessment failed");
                        eprintln!("{}: {e}", outcome.media_path.display());
                    }
                }
            }

            if failed {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

async fn assess_all(
    assessor: &Assessor,
    media: Vec<PathBuf>,
    transcript: Option<String>,
) -> Vec<BatchOutcome> {
    if let [single] = media.as_slice() {
        let result = assessor.assess(single, transcript.as_deref()).await;
        return vec![BatchOutcome {
            media_path: single.clone(),
            result,
        }];
    }

    let requests = media
        .into_iter()
        .map(|path| AssessmentRequest {
            media_path: path,
            transcript: transcript.clone(),
        })
        .collect();
    assessor.assess_batch(requests).await
}

fn print_metrics(
    path: &Path,
    metrics: &QualityMetrics,
    json: bool,
    with_header: bool,
) -> anyhow::Result<()> {
    if json {
        let mut value = serde_json::to_value(metrics)?;
        if with_header {
            value = serde_json::json!({ "media": path.display().to_string(), "metrics": value });
        }
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        if with_header {
            println!("# {}", path.display());
        }
        println!("{}", render_text(metrics));
    }
    Ok(())
}

async fn self_check(config: &AssessorConfig) -> anyhow::Result<()> {
    println!(
        "vcq-assess self-check: work_dir={}",
        config.work_dir.display()
    );

    let ffmpeg = vcq_media::check_ffmpeg()?;
    let ffprobe = vcq_media::check_ffprobe()?;
    println!("  ffmpeg:  {}", ffmpeg.display());
    println!("  ffprobe: {}", ffprobe.display());

    tokio::fs::create_dir_all(&config.work_dir)
        .await
        .with_context(|| format!("creating work dir {}", config.work_dir.display()))?;
    let scratch = tempfile::NamedTempFile::new_in(&config.work_dir)
        .with_context(|| format!("work dir {} is not writable", config.work_dir.display()))?;
    drop(scratch);

    println!("vcq-assess self-check: ok");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_single_file() {
        let command = parse_args(args(&["take1.wav"])).unwrap();
        assert_eq!(
            command,
            Command::Assess {
                json: false,
                transcript: None,
                media: vec![PathBuf::from("take1.wav")],
            }
        );
    }

    #[test]
    fn test_parse_flags_and_multiple_files() {
        let command =
            parse_args(args(&["--json", "--transcript", "script.txt", "a.mp4", "b.wav"])).unwrap();
        assert_eq!(
            command,
            Command::Assess {
                json: true,
                transcript: Some(PathBuf::from("script.txt")),
                media: vec![PathBuf::from("a.mp4"), PathBuf::from("b.wav")],
            }
        );
    }

    #[test]
    fn test_parse_modes() {
        assert_eq!(parse_args(args(&["--check"])).unwrap(), Command::Check);
        assert_eq!(parse_args(args(&["--schema"])).unwrap(), Command::Schema);
        assert_eq!(parse_args(args(&["--help"])).unwrap(), Command::Help);
    }

    #[test]
    fn test_only_runtime_commands_need_config() {
        assert!(parse_args(args(&["a.wav"])).unwrap().needs_config());
        assert!(Command::Check.needs_config());
        assert!(!Command::Schema.needs_config());
        assert!(!Command::Help.needs_config());
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_args(args(&[])).is_err());
        assert!(parse_args(args(&["--transcript"])).is_err());
        assert!(parse_args(args(&["--verbose", "a.wav"])).is_err());
    }
}
