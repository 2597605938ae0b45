//! Prometheus query layer.
//!
//! This module provides:
//! - `client`: HTTP client for `/api/v1/query`
//! - `response`: wire types and the typed sample decoder
//! - `extract`: scalar extraction from a decoded response

pub mod client;
pub mod extract;
pub mod response;

use std::future::Future;

use crate::error::QueryError;

// Re-export commonly used items
pub use client::{PrometheusClient, QUERY_PATH};
pub use extract::{extract, extract_sample};
pub use response::{QueryData, QueryResponse, RawSample, ResponseStatus, Sample, Series};

/// Something that evaluates a query expression to a single scalar.
///
/// Report passes are written against this trait so they can run against a
/// real server or an in-memory source.
pub trait MetricSource {
    fn query(&self, expression: &str) -> impl Future<Output = Result<f64, QueryError>>;
}

impl MetricSource for PrometheusClient {
    async fn query(&self, expression: &str) -> Result<f64, QueryError> {
        PrometheusClient::query(self, expression).await
    }
}
