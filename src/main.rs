//! promsnap - version 0.1.0
//!
//! One-shot Prometheus snapshot with tracing logging.
//! This is the main entry point that loads configuration, runs the snapshot
//! and handles subcommands.

mod cli;
mod commands;

use clap::Parser;
use promsnap::config::{config_warnings, resolve_config, show_config, validate_effective_config, Config};
use promsnap::{run, PrometheusClient};
use std::fmt::Display;
use std::process::ExitCode;
use tracing::level_filters::LevelFilter;
use tracing::{debug, info, warn};

use cli::{Args, Commands, LogLevel};
use commands::{command_check, command_config};

/// Initializes tracing logging subsystem with configured log level.
/// Logs go to stderr so stdout only carries the tables.
fn setup_logging(args: &Args) {
    let log_level = match args.log_level {
        LogLevel::Off => LevelFilter::OFF,
        LogLevel::Error => LevelFilter::ERROR,
        LogLevel::Warn => LevelFilter::WARN,
        LogLevel::Info => LevelFilter::INFO,
        LogLevel::Debug => LevelFilter::DEBUG,
        LogLevel::Trace => LevelFilter::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    debug!("Logging initialized with level: {:?}", args.log_level);
}

/// Prints a single-line fatal error to stderr and returns the failure code.
fn fatal(err: impl Display) -> ExitCode {
    eprintln!("{err}");
    ExitCode::FAILURE
}

/// Helper function to load and validate configuration.
fn load_validated_config(args: &Args) -> Result<Config, promsnap::ConfigError> {
    let config = resolve_config(&args.config, args.server.as_deref())?;
    validate_effective_config(&config)?;
    for warning in config_warnings(&config) {
        warn!("{}", warning);
    }
    Ok(config)
}

/// Main application entry point.
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();
    setup_logging(&args);

    // Config generation does not need an existing config file
    if let Some(Commands::Config {
        output,
        format,
        commented,
    }) = &args.command
    {
        return match command_config(output.clone(), *format, *commented) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => fatal(format!("Could not write configuration: {e:#}")),
        };
    }

    if args.show_config || args.check_config {
        let config = match resolve_config(&args.config, args.server.as_deref()) {
            Ok(config) => config,
            Err(e) => return fatal(e),
        };

        if args.check_config {
            if let Err(e) = validate_effective_config(&config) {
                return fatal(format!("❌ {e}"));
            }
            println!("✅ Configuration is valid");
            return ExitCode::SUCCESS;
        }

        return match show_config(&config, args.config_format) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => fatal(format!("Could not render configuration: {e:#}")),
        };
    }

    // The check command reports validation problems itself
    if let Some(Commands::Check { queries }) = &args.command {
        let config = match resolve_config(&args.config, args.server.as_deref()) {
            Ok(config) => config,
            Err(e) => return fatal(e),
        };
        return match command_check(*queries, &config).await {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => fatal(format!("{e:#}")),
        };
    }

    let config = match load_validated_config(&args) {
        Ok(config) => config,
        Err(e) => return fatal(e),
    };

    let client = match PrometheusClient::new(config.prometheus_server.clone()) {
        Ok(client) => client,
        Err(e) => return fatal(e),
    };

    info!("Querying Prometheus at {}", client.base_url());

    let mut stdout = std::io::stdout().lock();
    match run(&config, &client, &mut stdout).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => fatal(e),
    }
}
