//! Report passes: run the configured queries and collect table rows.
//!
//! Both passes are strictly sequential and fail fast: the first query error
//! aborts the whole run. Rows always come back in configuration order.

use std::io::Write;
use tracing::{debug, info};

use crate::config::{Config, ErrorRatioTarget, UpTarget};
use crate::error::ReportError;
use crate::query::MetricSource;
use crate::table::{render_error_ratio_table, render_up_table};

/// Request rate, error rate and their ratio for one target.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorRatioRow {
    pub name: String,
    pub total_rate: f64,
    pub error_rate: f64,
    /// `error_rate / total_rate`; infinite or NaN when `total_rate` is zero.
    pub error_ratio: f64,
}

/// Truncated `min(up)` for one namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpRow {
    pub namespace: String,
    pub value: i64,
}

/// Builds the liveness expression for a namespace. The namespace is inserted
/// verbatim.
pub fn up_query(namespace: &str) -> String {
    format!(r#"min(up{{namespace="{}"}})"#, namespace)
}

/// Truncates toward zero. NaN maps to 0 and infinities saturate.
pub fn truncate_toward_zero(value: f64) -> i64 {
    value.trunc() as i64
}

async fn run_query<S: MetricSource>(source: &S, query: &str) -> Result<f64, ReportError> {
    source
        .query(query)
        .await
        .map_err(|source| ReportError::Query {
            query: query.to_string(),
            source,
        })
}

/// Ratio pass: two queries per target (total, then errors).
pub async fn collect_error_ratios<S: MetricSource>(
    source: &S,
    targets: &[ErrorRatioTarget],
) -> Result<Vec<ErrorRatioRow>, ReportError> {
    let mut rows = Vec::with_capacity(targets.len());

    for target in targets {
        let total_rate = run_query(source, &target.total_query).await?;
        let error_rate = run_query(source, &target.error_query).await?;
        let error_ratio = error_rate / total_rate;

        debug!(
            name = %target.name,
            total_rate,
            error_rate,
            error_ratio,
            "Collected error ratio"
        );

        rows.push(ErrorRatioRow {
            name: target.name.clone(),
            total_rate,
            error_rate,
            error_ratio,
        });
    }

    Ok(rows)
}

/// Liveness pass: one `min(up{...})` query per namespace.
pub async fn collect_up<S: MetricSource>(
    source: &S,
    targets: &[UpTarget],
) -> Result<Vec<UpRow>, ReportError> {
    let mut rows = Vec::with_capacity(targets.len());

    for target in targets {
        let value = run_query(source, &up_query(&target.namespace)).await?;
        let value = truncate_toward_zero(value);
        debug!(namespace = %target.namespace, value, "Collected min(up)");

        rows.push(UpRow {
            namespace: target.namespace.clone(),
            value,
        });
    }

    Ok(rows)
}

/// Runs both passes and writes both tables to `out`.
///
/// The error ratio table is written (and flushed) before the liveness pass
/// issues its first query.
pub async fn run<S: MetricSource, W: Write>(
    config: &Config,
    source: &S,
    out: &mut W,
) -> Result<(), ReportError> {
    info!(
        targets = config.total_vs_errors.len(),
        namespaces = config.up.len(),
        "Collecting snapshot from {}",
        config.prometheus_server
    );

    let ratios = collect_error_ratios(source, &config.total_vs_errors).await?;
    writeln!(out, "{}", render_error_ratio_table(&ratios))?;
    writeln!(out)?;
    out.flush()?;

    let ups = collect_up(source, &config.up).await?;
    writeln!(out, "{}", render_up_table(&ups))?;
    out.flush()?;

    Ok(())
}
