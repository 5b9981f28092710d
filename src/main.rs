// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow, Context};
use log::{info, warn, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::PathBuf;
use std::io::Write;
use clap::{Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use srtai::app_config::{self, BackendKind, Config};
use srtai::Controller;

/// CLI Wrapper for BackendKind to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliProvider {
    Anthropic,
    Ollama,
}

impl From<CliProvider> for BackendKind {
    fn from(cli_provider: CliProvider) -> Self {
        match cli_provider {
            CliProvider::Anthropic => BackendKind::Anthropic,
            CliProvider::Ollama => BackendKind::Ollama,
        }
    }
}

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

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate SRT files or zip archives of SRT files
    Translate(TranslateArgs),

    /// Generate shell completions for srtai
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct TranslateArgs {
    /// Subtitle files, zip archives or directories to process
    #[arg(value_name = "FILES", required = true)]
    files: Vec<PathBuf>,

    /// Target language code (e.g., 'es', 'fr', 'pt-br')
    #[arg(short = 't', long = "to")]
    to: String,

    /// Model identifier to invoke
    #[arg(short, long, env = "SRTAI_MODEL_ID")]
    model: Option<String>,

    /// Service region passed to the backend
    #[arg(short, long, env = "SRTAI_REGION")]
    region: Option<String>,

    /// Translation backend to use
    #[arg(short, long, value_enum)]
    provider: Option<CliProvider>,

    /// Backend endpoint URL
    #[arg(long)]
    endpoint: Option<String>,

    /// API key for hosted backends
    #[arg(long, env = "SRTAI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Cues per backend request
    #[arg(short, long)]
    batch_size: Option<usize>,

    /// Maximum concurrent requests (or archive entries)
    #[arg(short, long)]
    concurrency: Option<usize>,

    /// Retries per batch after the first attempt
    #[arg(long)]
    retries: Option<u32>,

    /// Output directory
    #[arg(short, long, default_value = "translated")]
    output: PathBuf,

    /// Tag texts with the target language instead of calling a backend
    #[arg(long)]
    dry_run: bool,

    /// Shortcut for --log-level debug
    #[arg(short, long)]
    verbose: bool,

    /// Set logging level
    #[arg(long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Configuration file path
    #[arg(long)]
    config: Option<PathBuf>,
}

/// srtai - Subtitle translation with AI
///
/// Translates SRT subtitle files, or zip archives of them, with a language
/// model while keeping cue numbering, timing and inline tags intact.
#[derive(Parser, Debug)]
#[command(name = "srtai")]
#[command(version = "0.1.0")]
#[command(about = "AI-powered SRT subtitle translation tool")]
#[command(long_about = "srtai translates SRT subtitle files using a language model backend.

EXAMPLES:
    srtai translate movie.en.srt -t es -m llama3         # Writes translated/movie.es.srt
    srtai translate season1.zip -t fr -c 4               # Translates every .srt in the archive
    srtai translate subs/ -t de -p anthropic -m <model>  # Processes a whole directory
    srtai translate movie.srt -t es --dry-run            # No backend calls
    srtai completions bash > srtai.bash                  # Generate bash completions

CONFIGURATION:
    Options can also be read from a JSON file given with --config. Command
    line options override the file. SRTAI_MODEL_ID, SRTAI_REGION and
    SRTAI_API_KEY are read from the environment when the matching option
    is not given.

SUPPORTED PROVIDERS:
    ollama    - Local Ollama server (default: http://localhost:11434)
    anthropic - Anthropic Messages API (requires API key)")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,
}

// @struct: Custom logger implementation
// Filtering follows the global max level so it can change after init
struct CustomLogger;

impl CustomLogger {
    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color code for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "1;31",
            Level::Warn => "1;33",
            Level::Info => "1;32",
            Level::Debug => "1;36",
            Level::Trace => "1;35",
        }
    }

    // @returns: Short marker for log level
    fn marker_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "✗",
            Level::Warn => "!",
            Level::Info => " ",
            Level::Debug => "·",
            Level::Trace => "…",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {} {}\x1B[0m",
                Self::color_for_level(record.level()),
                now,
                Self::marker_for_level(record.level()),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // The level is updated after the config is loaded
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "srtai", &mut std::io::stdout());
            Ok(())
        }
        Commands::Translate(args) => run_translate(args).await,
    }
}

async fn run_translate(options: TranslateArgs) -> Result<()> {
    let mut config = match &options.config {
        Some(path) => Config::load_from_file(path)?,
        None => Config::default(),
    };
    apply_overrides(&mut config, &options);

    let level: LevelFilter = config.log_level.into();
    log::set_max_level(level);

    let controller = Controller::with_config(config)
        .context("Failed to set up translation")?;

    info!(
        "Using {} backend, model '{}'",
        controller.config().backend.provider.display_name(),
        controller.config().job.model_id
    );

    let summary = controller.run(&options.files, &options.output).await?;
    for path in &summary.written {
        println!("Wrote {}", path.display());
    }

    if !summary.failed.is_empty() {
        for (path, reason) in &summary.failed {
            warn!("Not translated: {} ({})", path.display(), reason);
        }
        return Err(anyhow!("{} input(s) could not be translated", summary.failed.len()));
    }

    Ok(())
}

/// Apply command line options on top of the loaded configuration
fn apply_overrides(config: &mut Config, options: &TranslateArgs) {
    config.job.target_language = options.to.clone();

    if let Some(model) = &options.model {
        config.job.model_id = model.clone();
    }
    if let Some(region) = &options.region {
        config.job.region = Some(region.clone());
    }
    if let Some(batch_size) = options.batch_size {
        config.job.batch_size = batch_size;
    }
    if let Some(concurrency) = options.concurrency {
        config.job.concurrency = concurrency;
    }
    if let Some(retries) = options.retries {
        config.job.retries = retries;
    }
    if options.dry_run {
        config.job.dry_run = true;
    }

    if let Some(provider) = &options.provider {
        config.backend.provider = provider.clone().into();
    }
    if let Some(endpoint) = &options.endpoint {
        config.backend.endpoint = Some(endpoint.clone());
    }
    if let Some(api_key) = &options.api_key {
        config.backend.api_key = Some(api_key.clone());
    }

    if options.verbose {
        config.log_level = app_config::LogLevel::Debug;
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }
}
