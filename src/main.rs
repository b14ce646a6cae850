// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;

use crate::app_config::Config;
use crate::app_controller::Controller;

mod app_config;
mod app_controller;
mod document;
mod errors;
mod extractor;
mod file_utils;
mod merger;
mod pairs;
mod providers;
mod translator;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
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

fn level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

/// Options shared by every subcommand
#[derive(Args, Debug)]
struct CommonArgs {
    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Number of units per backend request
    #[arg(short, long)]
    batch_size: Option<usize>,

    /// Maximum number of units to extract and translate
    #[arg(short, long)]
    max_units: Option<usize>,

    /// API key for the translation backend
    #[arg(short, long, env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Source language code (e.g. 'de')
    #[arg(short, long)]
    source_language: Option<String>,

    /// Target language code (e.g. 'en')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Use the offline mock backend instead of the real API
    #[arg(short, long)]
    debug_mode: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the full extract -> translate -> merge workflow for one document
    Run {
        /// Input .ipe document
        #[arg(value_name = "INPUT_FILE")]
        input_file: PathBuf,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Run the full workflow over slidesNN.ipe files in a directory
    RunRange {
        /// Directory containing slidesNN.ipe files
        #[arg(value_name = "SLIDES_DIR")]
        slides_dir: PathBuf,

        /// First slide number (inclusive)
        #[arg(value_name = "START")]
        start: u32,

        /// Last slide number (inclusive)
        #[arg(value_name = "END")]
        end: u32,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Extract text units and write the masked document and pairs file
    Extract {
        /// Input .ipe document
        #[arg(value_name = "INPUT_FILE")]
        input_file: PathBuf,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Translate an extracted pairs file
    Translate {
        /// Extracted pairs file
        #[arg(value_name = "PAIRS_FILE")]
        pairs_file: PathBuf,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Merge a translated pairs file back into a masked document
    Merge {
        /// Masked .ipe document
        #[arg(value_name = "MASKED_FILE")]
        masked_file: PathBuf,

        /// Translated pairs file
        #[arg(value_name = "TRANSLATED_FILE")]
        translated_file: PathBuf,

        #[command(flatten)]
        common: CommonArgs,
    },
}

/// ipetrans - AI-powered translation for Ipe slide documents
///
/// Extracts text labels from Ipe documents, translates them with an LLM
/// while preserving LaTeX markup, and merges them back without disturbing
/// any graphical layout.
#[derive(Parser, Debug)]
#[command(name = "ipetrans")]
#[command(version = "1.0.0")]
#[command(about = "AI-powered translation for Ipe slide documents")]
#[command(long_about = "ipetrans translates the text labels of Ipe slide decks using an LLM.

EXAMPLES:
    ipetrans run slides/slides07.ipe              # Full workflow with default config
    ipetrans run -d slides/slides07.ipe           # Offline run with the mock backend
    ipetrans run -b 50 -m 10 slides/slides07.ipe  # Small batches, first 10 units only
    ipetrans run-range slides 4 23                # Translate slides04.ipe .. slides23.ipe
    ipetrans extract slides/slides07.ipe          # Masking and extraction only
    ipetrans translate slides/slides07_extracted.txt
    ipetrans merge slides/slides07_en.ipe slides/slides07_extracted_translated.txt

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default
    one will be created automatically. The API key can also be supplied via the
    OPENAI_API_KEY environment variable.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,
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
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color code for log level
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
            let now = chrono::Local::now().format("%H:%M:%S%.3f");
            let color = Self::color_for_level(record.level());
            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {:5} {}\x1B[0m", color, now, record.level(), record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default.
    // The level is updated after the config is loaded.
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Commands::Run { input_file, common } => {
            let (controller, debug_mode) = build_controller(&common)?;
            controller.run(&input_file, debug_mode).await?;
        }
        Commands::RunRange {
            slides_dir,
            start,
            end,
            common,
        } => {
            let (controller, debug_mode) = build_controller(&common)?;
            controller.run_range(&slides_dir, start, end, debug_mode).await?;
        }
        Commands::Extract { input_file, common } => {
            let (controller, _) = build_controller(&common)?;
            controller.extract(&input_file)?;
        }
        Commands::Translate { pairs_file, common } => {
            let (controller, debug_mode) = build_controller(&common)?;
            controller.translate(&pairs_file, debug_mode).await?;
        }
        Commands::Merge {
            masked_file,
            translated_file,
            common,
        } => {
            let (controller, _) = build_controller(&common)?;
            controller.merge(&masked_file, &translated_file)?;
        }
    }

    Ok(())
}

fn build_controller(common: &CommonArgs) -> Result<(Controller, bool)> {
    let config = load_config(common)?;
    log::set_max_level(level_filter(&config.log_level));
    let controller = Controller::with_config(config).context("Configuration validation failed")?;
    Ok((controller, common.debug_mode))
}

fn load_config(common: &CommonArgs) -> Result<Config> {
    let mut config = Config::load_or_create(&common.config_path)?;

    // Override config with CLI options if provided
    if let Some(batch_size) = common.batch_size {
        config.translation.batch_size = batch_size;
    }
    if let Some(max_units) = common.max_units {
        config.translation.max_units = Some(max_units);
    }
    if let Some(api_key) = &common.api_key {
        config.translation.api_key = api_key.clone();
    }
    if let Some(source_language) = &common.source_language {
        config.source_language = source_language.clone();
    }
    if let Some(target_language) = &common.target_language {
        config.target_language = target_language.clone();
    }
    if let Some(log_level) = &common.log_level {
        config.log_level = log_level.clone().into();
    }

    Ok(config)
}
