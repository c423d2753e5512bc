//! # WebM Converter - Main Entry Point
//!
//! ## Execution flow:
//! 1. Parse CLI arguments (source, dest, quality, range, workers, ...)
//! 2. Set up `tracing` logging (INFO, DEBUG with `--verbose`, or `RUST_LOG`)
//! 3. Load the configuration file and apply CLI overrides
//! 4. Check that the encoder binary is reachable
//! 5. Discover files and run the batch
//! 6. Print the `{success}/{total}` summary once the bar is cleared
//!
//! Configuration and discovery errors exit with a non-zero status. Failed
//! files are reported but do not change the exit status.
//!
//! ## Examples:
//! ```bash
//! webmconv --source /path/to/videos --dest /path/to/output --quality max
//! webmconv --source /path/to/video.mp4 --quality medium --range 1:02-2:30
//! webmconv -s /path/to/videos -q low -r 0-30s
//! ```

use anyhow::Result;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use webm_converter::{
    platform::PlatformCommands,
    progress::{LogWriter, ProgressManager},
    BatchConverter, BatchJob, Config, FfmpegEncoder, Quality,
};

#[derive(Parser)]
#[command(name = "webmconv")]
#[command(about = "Convert video and GIF files to WebM format using FFmpeg")]
struct Args {
    /// File to convert, or directory containing the files to convert
    #[arg(short, long)]
    source: PathBuf,

    /// Directory to save the converted files (default: same directory as the source)
    #[arg(short, long)]
    dest: Option<PathBuf>,

    /// Quality level for conversion [default: medium]
    #[arg(short, long, value_enum)]
    quality: Option<Quality>,

    /// Time range start-end (e.g. 0-100s, 10-50s, 1:02-2:30, 1:10:30-2:15:20)
    #[arg(short, long, allow_hyphen_values = true)]
    range: Option<String>,

    /// Number of concurrent conversions [default: 4]
    #[arg(short, long)]
    workers: Option<usize>,

    /// Encoder binary name or path [default: ffmpeg]
    #[arg(long)]
    encoder: Option<String>,

    /// Give up on a file after this many seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Configuration file (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Do not draw the progress bar
    #[arg(long)]
    no_progress: bool,

    /// Write the effective settings to the configuration file, then convert
    #[arg(long)]
    save_config: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    /// Flags given on the command line win over the configuration file
    fn apply(&self, config: &mut Config) {
        if let Some(ref dest) = self.dest {
            config.output_path = Some(dest.clone());
        }
        if let Some(quality) = self.quality {
            config.quality = quality;
        }
        if let Some(ref range) = self.range {
            config.range = Some(range.clone());
        }
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        if let Some(ref encoder) = self.encoder {
            config.encoder = encoder.clone();
        }
        if self.timeout.is_some() {
            config.encoder_timeout_secs = self.timeout;
        }
        if self.no_progress {
            config.show_progress = false;
        }
    }
}

fn init_logging(verbose: bool, writer: LogWriter) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// An explicit `--config` must exist, unless it is about to be written
async fn load_config(explicit: Option<&Path>, allow_missing: bool) -> Result<Config> {
    match explicit {
        Some(path) => {
            if !path.exists() && !allow_missing {
                return Err(anyhow::anyhow!("Config file does not exist: {}", path.display()));
            }
            Config::from_file(path).await
        }
        None => match Config::default_path() {
            Some(path) => Config::from_file(&path).await,
            None => Ok(Config::default()),
        },
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let log_writer = LogWriter::new();
    init_logging(args.verbose, log_writer.clone())?;

    let mut config = load_config(args.config.as_deref(), args.save_config).await?;
    args.apply(&mut config);
    config.validate()?;

    if args.save_config {
        match args.config.clone().or_else(Config::default_path) {
            Some(path) => {
                config.save_to_file(&path).await?;
                info!("Saved configuration to {}", path.display());
            }
            None => warn!("No configuration directory on this system, settings not saved"),
        }
    }

    let platform = PlatformCommands::instance();
    debug!("System: {}", PlatformCommands::system_info());
    let encoder_path = platform.resolve(&config.encoder)?;

    let job = BatchJob::discover(&args.source, &config)?;
    info!("Starting conversion in: {}", job.source_root().display());
    info!("Output directory: {}", job.dest_root().display());

    let progress = if config.show_progress && !job.files().is_empty() {
        ProgressManager::new(job.files().len() as u64)
    } else {
        ProgressManager::hidden()
    };
    log_writer.attach(&progress);

    let encoder = FfmpegEncoder::new(encoder_path).with_timeout(config.encoder_timeout());
    let result = BatchConverter::new(job, Arc::new(encoder))
        .with_progress(progress)
        .run()
        .await;

    println!("\nConversion finished. {}.", result.format_summary());
    if !result.all_succeeded() {
        eprintln!("Failed files:");
        for failure in result.failures() {
            eprintln!("  {}: {}", failure.path.display(), failure.reason);
        }
        if result.unaccounted() > 0 {
            warn!("{} files never reported a result", result.unaccounted());
        }
    }

    Ok(())
}
