// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow, Context};
use log::{error, warn, info, debug, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::{Path, PathBuf};
use std::io::Write;
use clap::{Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use captionsync::app_config::{self, Config};
use captionsync::caption_processor::Track;
use captionsync::caption_service::CaptionService;
use captionsync::file_utils::{FileManager, FileType, CAPTION_EXTENSION};
use captionsync::time_codec;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse a caption file, or every .vtt file in a directory
    Parse {
        /// Caption file or directory
        #[arg(value_name = "PATH")]
        path: PathBuf,

        /// Fail on malformed lines instead of skipping them
        #[arg(long)]
        strict: bool,

        /// Print the cues as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the caption active at a playback time
    Lookup {
        /// Caption file
        #[arg(value_name = "PATH")]
        path: PathBuf,

        /// Playback time in seconds
        #[arg(short, long)]
        time: f64,
    },

    /// Convert seconds to a HH:MM:SS.mmm timestamp
    Format {
        /// Seconds
        #[arg(allow_negative_numbers = true)]
        seconds: f64,
    },

    /// Convert a HH:MM:SS.mmm timestamp to seconds
    Timestamp {
        /// Timestamp text
        text: String,
    },

    /// Write a plain-text transcript of a caption file
    Transcript {
        /// Caption file
        #[arg(value_name = "PATH")]
        path: PathBuf,

        /// Title for the transcript header (defaults to the file name)
        #[arg(long)]
        title: Option<String>,

        /// Output file (defaults to <name>.transcript.txt next to the input)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate shell completions for captionsync
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// captionsync - WebVTT caption parsing and playback-time lookup
#[derive(Parser, Debug)]
#[command(name = "captionsync")]
#[command(version)]
#[command(about = "WebVTT caption parsing and playback-time lookup")]
#[command(long_about = "captionsync parses WebVTT caption tracks and resolves the caption shown at a playback time.

EXAMPLES:
    captionsync parse lecture.vtt                 # Summarize a caption file
    captionsync parse --json lecture.vtt          # Dump cues as JSON
    captionsync parse --strict captions/          # Validate every track in a folder
    captionsync lookup lecture.vtt --time 12.5    # Caption shown at 12.5s
    captionsync format 3725.5                     # 01:02:05.500
    captionsync timestamp 01:02:05.500            # 3725.5
    captionsync transcript lecture.vtt            # Write lecture.transcript.txt
    captionsync completions bash > captionsync.bash

CONFIGURATION:
    Configuration is stored in captionsync.json by default. If the file does
    not exist, a default one is created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "captionsync.json", global = true)]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(LevelFilter::Trace));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI colour for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let color = Self::color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {:<5} {}\x1B[0m",
                color, now, record.level(), record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    // Applied before loading the config so config problems are reported at this level
    if let Some(level) = cli.log_level {
        log::set_max_level(app_config::LogLevel::from(level).to_level_filter());
    }

    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "captionsync", &mut std::io::stdout());
        return Ok(());
    }

    let mut config = Config::load_or_create(&cli.config_path)?;
    match cli.log_level {
        Some(level) => config.log_level = level.into(),
        None => log::set_max_level(config.log_level.to_level_filter()),
    }

    match cli.command {
        Commands::Parse { path, strict, json } => {
            if strict {
                config.parser.strict = true;
            }
            let service = CaptionService::new(&config);
            run_parse(&service, &path, json).await
        }
        Commands::Lookup { path, time } => {
            let service = CaptionService::new(&config);
            run_lookup(&service, &path, time).await
        }
        Commands::Format { seconds } => {
            println!("{}", time_codec::format_timestamp(seconds));
            Ok(())
        }
        Commands::Timestamp { text } => {
            let seconds = time_codec::try_parse_timestamp(&text)?;
            println!("{}", seconds);
            Ok(())
        }
        Commands::Transcript { path, title, output } => {
            let service = CaptionService::new(&config);
            run_transcript(&service, &path, title, output).await
        }
        Commands::Completions { .. } => Ok(()),
    }
}

// Parse one file through the service
async fn load_track(service: &CaptionService, path: &Path) -> Result<Track> {
    let source = FileManager::read_track_file(path).await?;
    let track = service
        .parse_track(&source)
        .with_context(|| format!("Failed to parse caption file: {:?}", path))?;
    debug!("{:?}: {} cues", path, track.len());
    Ok(track)
}

async fn run_parse(service: &CaptionService, path: &Path, json: bool) -> Result<()> {
    let files = if path.is_dir() {
        FileManager::find_files(path, CAPTION_EXTENSION)?
    } else if path.is_file() {
        if FileManager::detect_file_type(path)? != FileType::Caption {
            warn!("{:?} does not look like a WebVTT file, parsing anyway", path);
        }
        vec![path.to_path_buf()]
    } else {
        return Err(anyhow!("Input path does not exist: {:?}", path));
    };

    if files.is_empty() {
        warn!("No caption files found in {:?}", path);
        return Ok(());
    }

    let mut failed = 0;
    for file in &files {
        match load_track(service, file).await {
            Ok(track) if json => {
                println!("{}", serde_json::to_string_pretty(&track)?);
            }
            Ok(track) => {
                info!(
                    "{:?}: {} cues, ends at {}",
                    file,
                    track.len(),
                    time_codec::format_timestamp(track.duration())
                );
            }
            Err(e) => {
                error!("{:#}", e);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        return Err(anyhow!("{} of {} caption files failed to parse", failed, files.len()));
    }
    Ok(())
}

async fn run_lookup(service: &CaptionService, path: &Path, time: f64) -> Result<()> {
    let track = load_track(service, path).await?;
    let lookup = service.lookup(&track);

    match lookup.caption_for_time(time) {
        Some(cue) => {
            if let Some(speaker) = &cue.speaker {
                println!("{}: {}", speaker, cue.text.trim());
            } else {
                println!("{}", cue.text.trim());
            }
        }
        None => info!("No active caption at {}", time_codec::format_timestamp(time)),
    }
    Ok(())
}

async fn run_transcript(
    service: &CaptionService,
    path: &Path,
    title: Option<String>,
    output: Option<PathBuf>,
) -> Result<()> {
    let track = load_track(service, path).await?;

    let title = title.unwrap_or_else(|| {
        path.file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_else(|| "Untitled".to_string())
    });

    let output = output.unwrap_or_else(|| {
        let dir = path.parent().unwrap_or(Path::new("."));
        FileManager::generate_output_path(path, dir, "transcript", "txt")
    });

    FileManager::write_to_file(&output, &track.transcript(&title))?;
    info!("Transcript written: {:?}", output);
    Ok(())
}
