//! promsnap library
//!
//! Queries a Prometheus server once and renders two plain-text tables:
//! request rate, error rate and error ratio per configured service, and
//! `min(up)` per configured namespace.
//!
//! # Usage
//!
//! ```no_run
//! use promsnap::{load_config, run, PrometheusClient};
//! use std::path::Path;
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config(Path::new("./config.yaml"))?;
//! let client = PrometheusClient::new(config.prometheus_server.clone())?;
//!
//! let mut stdout = std::io::stdout().lock();
//! run(&config, &client, &mut stdout).await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod query;
pub mod report;
pub mod table;

// Re-export main types for convenience
pub use config::{
    config_warnings, load_config, resolve_config, validate_effective_config, Config,
    ConfigFormat, ErrorRatioTarget, UpTarget,
};
pub use error::{ConfigError, ExtractError, QueryError, ReportError};
pub use query::{extract, MetricSource, PrometheusClient, QueryResponse, Sample};
pub use report::{collect_error_ratios, collect_up, run, up_query, ErrorRatioRow, UpRow};
pub use table::{format_fixed, render_error_ratio_table, render_up_table};
