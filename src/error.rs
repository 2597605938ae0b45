//! Error types for promsnap.
//!
//! Every error in this crate is fatal for a snapshot run. The `Display`
//! implementations are written so that a single line on stderr names the
//! failing file or query together with the underlying cause.

use std::num::ParseFloatError;
use std::path::PathBuf;

/// Errors raised while loading or validating the configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not parse {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    #[error("Configuration invalid: {0}")]
    Invalid(String),
}

/// Errors raised while turning one sample into a float.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("Could not parse metric value into float: {raw:?}: {source}")]
    InvalidValue {
        raw: String,
        #[source]
        source: ParseFloatError,
    },

    #[error("Malformed sample: {0}")]
    MalformedSample(String),
}

/// Errors raised by a single instant query.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("Could not make query request: {}", with_causes(.0))]
    Transport(#[source] reqwest::Error),

    #[error("Got non-200 status: {status}{}", status_detail(.detail))]
    Status {
        status: reqwest::StatusCode,
        detail: Option<String>,
    },

    #[error("Could not decode response body: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("Query rejected by server: {error_type}: {message}")]
    Api { error_type: String, message: String },

    #[error(transparent)]
    Extract(#[from] ExtractError),
}

/// Renders an error followed by every cause in its source chain, joined by
/// `": "`. Transport errors keep the useful part (refused, DNS, TLS) there.
fn with_causes(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut cause = err.source();
    while let Some(current) = cause {
        let text = current.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        cause = current.source();
    }
    message
}

fn status_detail(detail: &Option<String>) -> String {
    detail
        .as_deref()
        .map(|d| format!(" ({d})"))
        .unwrap_or_default()
}

/// Errors raised while building and printing a report.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Could not make query {query}: {source}")]
    Query {
        query: String,
        #[source]
        source: QueryError,
    },

    #[error("Could not write report: {0}")]
    Output(#[from] std::io::Error),
}
