//! HTTP client for the Prometheus instant query endpoint.

use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Instant;
use tracing::{debug, warn};

use crate::error::QueryError;
use crate::query::extract::extract;
use crate::query::response::{QueryResponse, ResponseStatus};

/// Path of the instant query endpoint, relative to the server base URL.
pub const QUERY_PATH: &str = "/api/v1/query";

/// Prometheus API client bound to one server.
#[derive(Debug, Clone)]
pub struct PrometheusClient {
    http: reqwest::Client,
    base_url: String,
}

/// Error body returned alongside non-2xx statuses.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    #[serde(rename = "errorType")]
    error_type: Option<String>,
    error: Option<String>,
}

impl PrometheusClient {
    /// Creates a client for `base_url` (e.g. `http://prometheus:9090`).
    /// The URL itself is not validated here; a bad URL fails on first query.
    pub fn new(base_url: impl Into<String>) -> Result<Self, QueryError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("promsnap/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(QueryError::Transport)?;

        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL of the query endpoint, without the query string.
    pub fn query_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), QUERY_PATH)
    }

    /// Runs one instant query and returns the decoded envelope.
    ///
    /// Anything but `200 OK` is an error. The body is always read to the end
    /// before returning so the connection is released on every path.
    pub async fn query_response(&self, expression: &str) -> Result<QueryResponse, QueryError> {
        let started = Instant::now();

        let response = self
            .http
            .get(self.query_url())
            .query(&[("query", expression)])
            .send()
            .await
            .map_err(QueryError::Transport)?;

        let status = response.status();
        let body = response.bytes().await.map_err(QueryError::Transport)?;

        if status != StatusCode::OK {
            return Err(QueryError::Status {
                status,
                detail: error_detail(&body),
            });
        }

        let decoded: QueryResponse = serde_json::from_slice(&body).map_err(QueryError::Decode)?;

        if decoded.status == ResponseStatus::Error {
            return Err(QueryError::Api {
                error_type: decoded.error_type.unwrap_or_else(|| "unknown".into()),
                message: decoded.error.unwrap_or_default(),
            });
        }

        for warning in &decoded.warnings {
            warn!(query = expression, "Prometheus returned warning: {}", warning);
        }

        debug!(
            query = expression,
            bytes = body.len(),
            "Query completed in {:.2}ms",
            started.elapsed().as_secs_f64() * 1000.0
        );

        Ok(decoded)
    }

    /// Runs one instant query and extracts its scalar value.
    pub async fn query(&self, expression: &str) -> Result<f64, QueryError> {
        let response = self.query_response(expression).await?;
        let value = extract(&response)?;
        debug!(query = expression, value, "Extracted sample value");
        Ok(value)
    }
}

/// Formats the Prometheus error envelope of a failed request, if present.
fn error_detail(body: &[u8]) -> Option<String> {
    let envelope: ErrorEnvelope = serde_json::from_slice(body).ok()?;
    match (envelope.error_type, envelope.error) {
        (Some(kind), Some(message)) => Some(format!("{kind}: {message}")),
        (None, Some(message)) => Some(message),
        (Some(kind), None) => Some(kind),
        (None, None) => None,
    }
}
