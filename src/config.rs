//! Configuration management for promsnap.
//!
//! This module handles loading, overriding, and validating the snapshot
//! configuration. It supports YAML, JSON, and TOML formats.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::ConfigError;

// Default configuration constants
pub const DEFAULT_CONFIG_PATH: &str = "./config.yaml";
pub const DEFAULT_PROMETHEUS_SERVER: &str = "http://localhost:9090";

/// Namespaces that can be interpolated into a label matcher without quoting
/// trouble (Kubernetes DNS label rules).
static SAFE_NAMESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?$").expect("valid namespace regex"));

/// Output format options for rendering a configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ConfigFormat {
    Yaml,
    Json,
    Toml,
}

/// One row of the error ratio table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorRatioTarget {
    /// Label shown in the first column
    pub name: String,
    /// Expression for the request rate
    pub total_query: String,
    /// Expression for the error rate
    pub error_query: String,
}

/// One row of the liveness table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpTarget {
    pub namespace: String,
}

/// Snapshot configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the Prometheus server
    #[serde(default)]
    pub prometheus_server: String,

    /// Targets for the error ratio table, in display order
    #[serde(default)]
    pub total_vs_errors: Vec<ErrorRatioTarget>,

    /// Namespaces for the liveness table, in display order
    #[serde(default)]
    pub up: Vec<UpTarget>,
}

impl Config {
    /// A small, commented-friendly configuration used by `promsnap config`.
    pub fn example() -> Self {
        Self {
            prometheus_server: DEFAULT_PROMETHEUS_SERVER.to_string(),
            total_vs_errors: vec![ErrorRatioTarget {
                name: "api".to_string(),
                total_query: r#"sum(rate(http_requests_total{job="api"}[5m]))"#.to_string(),
                error_query: r#"sum(rate(http_requests_total{job="api",code=~"5.."}[5m]))"#
                    .to_string(),
            }],
            up: vec![UpTarget {
                namespace: "default".to_string(),
            }],
        }
    }
}

/// Validate effective config (used by --check-config and before every run)
pub fn validate_effective_config(cfg: &Config) -> Result<(), ConfigError> {
    let server = cfg.prometheus_server.trim();
    if server.is_empty() {
        return Err(ConfigError::Invalid("prometheus_server is not set".into()));
    }

    match reqwest::Url::parse(server) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        Ok(url) => {
            return Err(ConfigError::Invalid(format!(
                "prometheus_server '{}' has unsupported scheme '{}', expected http or https",
                server,
                url.scheme()
            )));
        }
        Err(e) => {
            return Err(ConfigError::Invalid(format!(
                "prometheus_server '{}' is not a valid URL ({})",
                server, e
            )));
        }
    }

    for (index, target) in cfg.total_vs_errors.iter().enumerate() {
        if target.name.is_empty() {
            return Err(ConfigError::Invalid(format!(
                "total_vs_errors[{}] has an empty name",
                index
            )));
        }
        if target.total_query.trim().is_empty() {
            return Err(ConfigError::Invalid(format!(
                "total_vs_errors '{}' has an empty total_query",
                target.name
            )));
        }
        if target.error_query.trim().is_empty() {
            return Err(ConfigError::Invalid(format!(
                "total_vs_errors '{}' has an empty error_query",
                target.name
            )));
        }
    }

    if let Some(index) = cfg.up.iter().position(|t| t.namespace.is_empty()) {
        return Err(ConfigError::Invalid(format!(
            "up[{}] has an empty namespace",
            index
        )));
    }

    Ok(())
}

/// Non-fatal findings about a config. Namespaces are interpolated into the
/// liveness query verbatim, so anything outside plain DNS-label syntax is
/// reported here.
pub fn config_warnings(cfg: &Config) -> Vec<String> {
    cfg.up
        .iter()
        .filter(|t| !t.namespace.is_empty() && !SAFE_NAMESPACE.is_match(&t.namespace))
        .map(|t| {
            format!(
                "namespace '{}' is not a plain DNS label and is inserted into the query unescaped",
                t.namespace
            )
        })
        .collect()
}

/// Loads the config file and applies CLI overrides.
/// Precedence: CLI (if provided) > config file.
pub fn resolve_config(path: &Path, server_override: Option<&str>) -> Result<Config, ConfigError> {
    let mut config = load_config(path)?;

    if let Some(server) = server_override {
        config.prometheus_server = server.to_string();
    }

    Ok(config)
}

/// Loads a configuration file, picking the format from the file extension.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    match path.extension().and_then(|s| s.to_str()) {
        Some("json") => {
            let config: Config =
                serde_json::from_str(&content).map_err(|e| parse_error(path, e))?;
            info!("Loaded JSON configuration from: {}", path.display());
            Ok(config)
        }
        Some("toml") => {
            let config: Config = toml::from_str(&content).map_err(|e| parse_error(path, e))?;
            info!("Loaded TOML configuration from: {}", path.display());
            Ok(config)
        }
        _ => {
            // Default to YAML
            let config: Config =
                serde_yaml::from_str(&content).map_err(|e| parse_error(path, e))?;
            info!("Loaded YAML configuration from: {}", path.display());
            Ok(config)
        }
    }
}

/// Renders a configuration in the requested format.
pub fn render_config(config: &Config, format: ConfigFormat) -> anyhow::Result<String> {
    let output = match format {
        ConfigFormat::Json => serde_json::to_string_pretty(config)?,
        ConfigFormat::Toml => toml::to_string_pretty(config)?,
        ConfigFormat::Yaml => serde_yaml::to_string(config)?,
    };
    Ok(output)
}

/// Shows configuration in requested format
pub fn show_config(config: &Config, format: ConfigFormat) -> anyhow::Result<()> {
    println!("{}", render_config(config, format)?);
    Ok(())
}

// Parser messages can span lines; fatal errors must fit on one.
fn parse_error(path: &Path, err: impl std::fmt::Display) -> ConfigError {
    ConfigError::Parse {
        path: PathBuf::from(path),
        message: err.to_string().split_whitespace().collect::<Vec<_>>().join(" "),
    }
}
