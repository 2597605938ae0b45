//! Check command implementation.
//!
//! Validates the configuration and the Prometheus server, optionally
//! evaluating every configured query. Unlike a snapshot run, failures are
//! reported per query and do not stop the remaining checks.

use chrono::{DateTime, Utc};
use promsnap::config::{config_warnings, validate_effective_config, Config};
use promsnap::query::{extract_sample, PrometheusClient, Sample};
use promsnap::{format_fixed, up_query, QueryError};

/// Expression used to probe the server; always returns one sample.
const PROBE_QUERY: &str = "vector(1)";

/// Renders a sample timestamp for humans.
fn format_timestamp(timestamp: f64) -> String {
    let secs = timestamp.trunc() as i64;
    let nanos = ((timestamp - timestamp.trunc()) * 1e9) as u32;
    DateTime::<Utc>::from_timestamp(secs, nanos)
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|| format!("{timestamp}"))
}

/// Evaluates one expression and prints its outcome. Returns false on error.
async fn check_query(client: &PrometheusClient, label: &str, expression: &str) -> bool {
    let sample = match client.query_response(expression).await {
        Ok(response) => extract_sample(&response).map_err(QueryError::from),
        Err(e) => Err(e),
    };

    match sample {
        Ok(Some(Sample { timestamp, value })) => {
            println!(
                "   ✅ {}: {} = {} (at {})",
                label,
                expression,
                format_fixed(value),
                format_timestamp(timestamp)
            );
            true
        }
        Ok(None) => {
            println!("   ⚠️  {}: {} returned no series (shown as 0)", label, expression);
            true
        }
        Err(e) => {
            println!("   ❌ {}: {}: {}", label, expression, e);
            false
        }
    }
}

/// Validates configuration and server connectivity. Any failed check is
/// returned as an error so the caller exits non-zero.
pub async fn command_check(queries: bool, config: &Config) -> anyhow::Result<()> {
    println!("🔍 promsnap - Configuration Check");
    println!("=================================");

    let mut all_ok = true;

    println!("\n⚙️  Checking configuration...");
    match validate_effective_config(config) {
        Ok(()) => {
            println!("   ✅ Configuration is valid");
            println!(
                "   ✅ {} error ratio targets, {} namespaces",
                config.total_vs_errors.len(),
                config.up.len()
            );
        }
        Err(e) => {
            println!("   ❌ {}", e);
            println!("\n📋 Summary:");
            println!("   ❌ Some checks failed - please review errors");
            return Err(e.into());
        }
    }
    for warning in config_warnings(config) {
        println!("   ⚠️  {}", warning);
    }

    let client = PrometheusClient::new(config.prometheus_server.clone())?;

    println!("\n🌐 Checking Prometheus at {}...", client.query_url());
    if !check_query(&client, "probe", PROBE_QUERY).await {
        all_ok = false;
    }

    if queries && all_ok {
        println!("\n📊 Evaluating error ratio queries...");
        for target in &config.total_vs_errors {
            all_ok &= check_query(&client, &format!("{} total", target.name), &target.total_query).await;
            all_ok &= check_query(&client, &format!("{} errors", target.name), &target.error_query).await;
        }

        println!("\n📊 Evaluating min(up) queries...");
        for target in &config.up {
            all_ok &= check_query(&client, &target.namespace, &up_query(&target.namespace)).await;
        }
    }

    println!("\n📋 Summary:");
    if all_ok {
        println!("   ✅ All checks passed");
        Ok(())
    } else {
        println!("   ❌ Some checks failed - please review errors");
        anyhow::bail!("Some checks failed")
    }
}
