//! pdf-audio - Convert PDF documents to a single narrated WAV file

mod audio;
mod config;
mod document;
mod error;
mod pipeline;
mod text;
mod tts;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::PdfAudioConfig;
use indicatif::{ProgressBar, ProgressStyle};
use log::debug;
use pipeline::Pipeline;
use speech_client::{ProviderKind, get_provider};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "pdf-audio")]
#[command(about = "Convert PDF documents to narrated audio using Deepgram text-to-speech", long_about = None)]
#[command(version)]
struct Args {
    /// Path to the PDF (or .txt) file
    input: Option<PathBuf>,

    /// Output file path (default: <input-name>.wav in the current directory)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Playback speed factor (below 1.0 slows narration down)
    #[arg(long)]
    speed: Option<f64>,

    /// Attempts per chunk before giving up
    #[arg(long)]
    retries: Option<u32>,

    /// Seconds to wait between attempts
    #[arg(long)]
    delay: Option<u64>,

    /// Grow the wait between attempts instead of keeping it fixed
    #[arg(long)]
    exponential_backoff: bool,

    /// Maximum characters per synthesis request (1-2000)
    #[arg(long)]
    chunk_size: Option<usize>,

    /// Deepgram voice model (e.g. aura-orpheus-en)
    #[arg(long)]
    model: Option<String>,

    /// More log output (-v info, -vv debug); hides the progress bar
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Subcommands
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Show current configuration
    Show,
    /// Set default speed factor
    SetSpeed {
        /// Value (0.9 = 10% slower)
        value: f64,
    },
    /// Set default attempts per chunk
    SetRetries {
        /// Value (at least 1)
        value: u32,
    },
    /// Set default wait between attempts
    SetDelay {
        /// Seconds
        value: u64,
    },
    /// Set default chunk size
    SetChunkSize {
        /// Characters (1-2000)
        value: usize,
    },
    /// Set default voice model
    SetModel {
        /// Deepgram model name
        model: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Credentials and RUST_LOG may live in a .env file next to the documents
    let dotenv = dotenvy::dotenv();
    init_logging(args.verbose);
    if let Ok(path) = dotenv {
        debug!("Loaded environment from {}", path.display());
    }

    if let Some(Commands::Config { action }) = &args.command {
        return handle_config_command(action);
    }

    let input = args
        .input
        .clone()
        .ok_or_else(|| anyhow::anyhow!("Input file path is required. Run 'pdf-audio --help' for usage."))?;

    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }

    let config = PdfAudioConfig::load().context("Failed to load configuration")?;
    let config = apply_overrides(config, &args);
    config.validate()?;

    let output_path = args
        .output
        .clone()
        .unwrap_or_else(|| audio::output_path_for(&input));

    debug!("Input: {}", input.display());
    debug!("Output: {}", output_path.display());
    debug!("Config: {:?}", config);

    eprintln!("Extracting text: {}", input.display());
    let raw_text = document::load_text(&input)?;
    let text = text::clean_text(&raw_text);
    eprintln!("Characters: {}", text.chars().count());

    // One client for the whole run
    let provider = get_provider(ProviderKind::Deepgram, &config.deepgram)
        .context("Failed to initialize speech provider")?;
    let pipeline = Pipeline::new(provider.as_ref(), config.pipeline_config());

    let total = pipeline.chunk_count(&text)?;
    eprintln!(
        "Creating audio from {} chunk(s), this may take some time...",
        total
    );

    let pb = if args.verbose > 0 {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(total as u64)
    };
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} chunks ({eta}) {msg}")?
            .progress_chars("#>-"),
    );

    let result = pipeline
        .run(&text, &output_path, |progress| {
            pb.set_length(progress.total as u64);
            pb.set_position(progress.completed as u64);
        })
        .await;

    let summary = match result {
        Ok(summary) => {
            pb.finish_with_message("done");
            summary
        }
        Err(e) => {
            pb.abandon();
            return Err(e).context(format!(
                "Audio generation failed, no output written to {}",
                output_path.display()
            ));
        }
    };

    let size_mb = std::fs::metadata(&summary.output_path)?.len() as f64 / (1024.0 * 1024.0);
    eprintln!(
        "Output: {} ({} chunks, {:.1} MB, {:.1} min of audio)",
        summary.output_path.display(),
        summary.chunks,
        size_mb,
        summary.duration.as_secs_f64() / 60.0
    );

    Ok(())
}

/// Log filter for this run: `RUST_LOG` (including one set in `.env`), else
/// the level picked by `-v`.
fn log_filter(verbose: u8) -> String {
    std::env::var("RUST_LOG").unwrap_or_else(|_| {
        match verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
        .to_string()
    })
}

fn init_logging(verbose: u8) {
    env_logger::Builder::new()
        .parse_filters(&log_filter(verbose))
        .format_timestamp(None)
        .init();
}

/// Layer command-line flags over the loaded configuration.
fn apply_overrides(mut config: PdfAudioConfig, args: &Args) -> PdfAudioConfig {
    if let Some(speed) = args.speed {
        config.speed_factor = speed;
    }
    if let Some(retries) = args.retries {
        config.retries = retries;
    }
    if let Some(delay) = args.delay {
        config.retry_delay_secs = delay;
    }
    if args.exponential_backoff {
        config.backoff = tts::Backoff::Exponential;
    }
    if let Some(chunk_size) = args.chunk_size {
        config.chunk_size = chunk_size;
    }
    if let Some(ref model) = args.model {
        config.voice.model = model.clone();
    }
    config
}

fn handle_config_command(action: &ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = PdfAudioConfig::load()?;
            println!("Configuration file: {:?}", PdfAudioConfig::config_path()?);
            println!();
            println!("speed_factor = {}", config.speed_factor);
            println!("retries = {}", config.retries);
            println!("retry_delay_secs = {}", config.retry_delay_secs);
            println!("backoff = {:?}", config.backoff);
            println!("chunk_size = {}", config.chunk_size);
            println!("model = \"{}\"", config.voice.model);
            println!(
                "api_key = {}",
                if config.deepgram.api_key.is_some() {
                    "(set)"
                } else {
                    "(from environment)"
                }
            );
        }
        ConfigAction::SetSpeed { value } => {
            let mut config = PdfAudioConfig::load()?;
            config.speed_factor = *value;
            config.save()?;
            println!("Default speed factor set to: {}", config.speed_factor);
        }
        ConfigAction::SetRetries { value } => {
            let mut config = PdfAudioConfig::load()?;
            config.retries = *value;
            config.save()?;
            println!("Default retries set to: {}", config.retries);
        }
        ConfigAction::SetDelay { value } => {
            let mut config = PdfAudioConfig::load()?;
            config.retry_delay_secs = *value;
            config.save()?;
            println!("Default retry delay set to: {}s", config.retry_delay_secs);
        }
        ConfigAction::SetChunkSize { value } => {
            let mut config = PdfAudioConfig::load()?;
            config.chunk_size = *value;
            config.save()?;
            println!("Default chunk size set to: {}", config.chunk_size);
        }
        ConfigAction::SetModel { model } => {
            let mut config = PdfAudioConfig::load()?;
            config.voice.model = model.clone();
            config.save()?;
            println!("Default model set to: {}", config.voice.model);
        }
    }
    Ok(())
}
