//! Config command implementation.
//!
//! Generates an example configuration file in various formats.

use std::fs;
use std::path::PathBuf;

use promsnap::config::{render_config, Config, ConfigFormat, DEFAULT_CONFIG_PATH};

/// Generates configuration files.
pub fn command_config(
    output: Option<PathBuf>,
    format: ConfigFormat,
    commented: bool,
) -> anyhow::Result<()> {
    let config = Config::example();
    let output = output.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

    let mut content = render_config(&config, format)?;
    if commented && format == ConfigFormat::Yaml {
        content = add_config_comments(content);
    }

    if output.to_string_lossy() == "-" {
        print!("{}", content);
    } else {
        fs::write(&output, content)?;
        println!("✅ Configuration written to: {}", output.display());
    }

    Ok(())
}

/// Adds comments to YAML configuration.
fn add_config_comments(yaml: String) -> String {
    let comments = r#"# promsnap Configuration
# =======================
#
# prometheus_server: "http://localhost:9090"
#     Base URL of the Prometheus server. /api/v1/query is appended.
#     Can be overridden with --server.
#
# total_vs_errors:
#     One row per entry in the error ratio table, in this order.
#     - name: "api"                 # Label in the first column
#       total_query: "..."          # PromQL for requests per second
#       error_query: "..."          # PromQL for errors per second
#     Error ratio = error_query / total_query. A query with no series counts as 0.
#
# up:
#     One row per entry in the liveness table, in this order.
#     - namespace: "default"        # Queried as min(up{namespace="default"})
#     The namespace is inserted into the query verbatim; use plain names.
"#;

    format!("{comments}\n{yaml}")
}
