// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, info};
use std::io::Write;
use std::path::PathBuf;

use lingo::app_config::{self, CapabilityBackend, Config};
use lingo::app_controller::Controller;
use lingo::capabilities::Capabilities;

/// CLI Wrapper for CapabilityBackend to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliBackend {
    Ollama,
    Disabled,
}

impl From<CliBackend> for CapabilityBackend {
    fn from(cli_backend: CliBackend) -> Self {
        match cli_backend {
            CliBackend::Ollama => CapabilityBackend::Ollama,
            CliBackend::Disabled => CapabilityBackend::Disabled,
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
    /// Generate shell completions for lingo
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Lingo - interactive translator
///
/// Type text and get it translated as you go, using a local model served by Ollama.
#[derive(Parser, Debug)]
#[command(name = "lingo")]
#[command(version)]
#[command(about = "Interactive translator with automatic language detection")]
#[command(long_about = "Lingo translates what you type, detecting the source language when it is set to 'auto'.

EXAMPLES:
    lingo                                  # Start with the default config
    lingo -s auto -t fr                    # Detect the source, translate to French
    lingo -m qwen2.5:7b                    # Use another Ollama model
    lingo --backend disabled               # Start without translation capabilities
    lingo completions bash > lingo.bash    # Generate bash completions

CONFIGURATION:
    conf.json in the working directory is used when present, else the file in
    the user config directory. If the config file doesn't exist, a default one
    will be created automatically.

Type :help at the prompt for the list of commands.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Capability backend to use
    #[arg(short, long, value_enum)]
    backend: Option<CliBackend>,

    /// Ollama model name
    #[arg(short, long)]
    model: Option<String>,

    /// Ollama endpoint URL
    #[arg(long, env = "LINGO_OLLAMA_ENDPOINT")]
    endpoint: Option<String>,

    /// Source language code, or 'auto' to detect it
    #[arg(short, long)]
    source_language: Option<String>,

    /// Target language code (e.g., 'en', 'es', 'fr')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Configuration file path
    #[arg(short, long)]
    config_path: Option<PathBuf>,

    /// Set logging level
    #[arg(short, long, value_enum)]
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
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji and ANSI color for log level
    fn decoration(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("❌ ", "1;31"),
            Level::Warn => ("🚧 ", "1;33"),
            Level::Info => (" ", "1;32"),
            Level::Debug => ("🔍 ", "1;36"),
            Level::Trace => ("📋 ", "1;35"),
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
            let (emoji, color) = Self::decoration(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "\x1B[{}m{} {} {}\x1B[0m", color, now, emoji, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Installed at the most verbose level; the effective level is set once the config is loaded
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Some(Commands::Completions { shell }) = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "lingo", &mut std::io::stdout());
        return Ok(());
    }

    if let Some(level) = &cli.log_level {
        let level: app_config::LogLevel = level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let config_path = cli.config_path.clone().unwrap_or_else(Config::default_path);
    let mut config = Config::load_or_create(&config_path)?;
    apply_overrides(&mut config, cli);

    config
        .validate()
        .context("Configuration validation failed")?;

    log::set_max_level(config.log_level.to_level_filter());

    info!(
        "Using the {} backend ({} -> {})",
        config.backend.display_name(),
        config.source_language,
        config.target_language
    );

    let controller = Controller::with_config(&config, Capabilities::from_config(&config));
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());

    controller.run(stdin).await
}

/// Override config values with the ones given on the command line
fn apply_overrides(config: &mut Config, options: CommandLineOptions) {
    if let Some(backend) = options.backend {
        config.backend = backend.into();
    }

    if let Some(model) = options.model {
        config.ollama.model = model;
    }

    if let Some(endpoint) = options.endpoint {
        config.ollama.endpoint = endpoint;
    }

    if let Some(source_language) = options.source_language {
        config.source_language = source_language.to_lowercase();
    }

    if let Some(target_language) = options.target_language {
        config.target_language = target_language.to_lowercase();
    }

    if let Some(log_level) = options.log_level {
        config.log_level = log_level.into();
    }
}
