//! CLI arguments and subcommands for promsnap.
//!
//! This module defines the command-line interface structure using the clap library,
//! including all flags, options, and subcommands.

use clap::{Parser, Subcommand, ValueEnum};
use promsnap::config::DEFAULT_CONFIG_PATH;
use promsnap::ConfigFormat;
use std::path::PathBuf;

/// Log level options for CLI parsing
#[derive(Debug, Clone, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Main CLI arguments structure
#[derive(Parser, Debug)]
#[command(
    name = "promsnap",
    about = "Print a one-shot Prometheus snapshot of error ratios and min(up) per namespace",
    long_about = "Print a one-shot Prometheus snapshot of error ratios and min(up) per namespace.\n\n\
                  Runs every configured query once against the Prometheus HTTP API and prints \
                  two aligned tables: requests/s, errors/s and error ratio per service, followed \
                  by min(up) per namespace. Any failed query aborts the run.",
    version,
    propagate_version = true
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Config file (YAML/JSON/TOML)
    #[arg(short = 'c', long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Prometheus base URL (overrides prometheus_server from the config file)
    #[arg(short = 's', long)]
    pub server: Option<String>,

    /// Log level (logs go to stderr)
    #[arg(long, value_enum, default_value = "warn")]
    pub log_level: LogLevel,

    /// Print effective merged config and exit
    #[arg(long)]
    pub show_config: bool,

    /// Output format for --show-config
    #[arg(long, value_enum, default_value = "yaml")]
    pub config_format: ConfigFormat,

    /// Validate config and exit (return code 1 on error)
    #[arg(long)]
    pub check_config: bool,
}

/// Subcommands for additional functionality
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate configuration and server connectivity
    Check {
        /// Also evaluate every configured query and report its value
        #[arg(long)]
        queries: bool,
    },

    /// Generate an example configuration file
    Config {
        /// Output file path ("-" for stdout)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "yaml")]
        format: ConfigFormat,

        /// Include comments and examples
        #[arg(long)]
        commented: bool,
    },
}
