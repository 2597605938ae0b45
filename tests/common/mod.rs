//! Shared helpers for integration tests: a canned Prometheus query API.

#![allow(dead_code)]

use axum::extract::{Query, RawQuery, State};
use axum::http::{header, StatusCode};
use axum::routing::get;
use axum::Router;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// A canned reply: HTTP status and body.
#[derive(Clone, Debug)]
pub struct Reply {
    pub status: u16,
    pub body: String,
}

impl Reply {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Instant vector with a single series holding `value`.
    pub fn value(value: &str) -> Self {
        Self::ok(vector_body(&[value]))
    }

    /// Instant vector with no series.
    pub fn empty() -> Self {
        Self::ok(vector_body(&[]))
    }
}

/// Builds a `vector` response body with one series per value.
pub fn vector_body(values: &[&str]) -> String {
    let series: Vec<String> = values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            format!(
                r#"{{"metric":{{"instance":"node-{i}"}},"value":[1700000000.5,"{v}"]}}"#
            )
        })
        .collect();
    format!(
        r#"{{"status":"success","data":{{"resultType":"vector","result":[{}]}}}}"#,
        series.join(",")
    )
}

#[derive(Clone)]
struct MockState {
    replies: Arc<HashMap<String, Reply>>,
    fallback: Reply,
    seen: Arc<Mutex<Vec<String>>>,
    raw: Arc<Mutex<Vec<String>>>,
}

/// Handle to a running mock server.
pub struct MockPrometheus {
    pub base_url: String,
    seen: Arc<Mutex<Vec<String>>>,
    raw: Arc<Mutex<Vec<String>>>,
}

impl MockPrometheus {
    /// Decoded `query` parameters, in arrival order.
    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }

    /// Raw query strings, in arrival order.
    pub fn raw_queries(&self) -> Vec<String> {
        self.raw.lock().unwrap().clone()
    }
}

async fn query_handler(
    State(state): State<MockState>,
    Query(params): Query<HashMap<String, String>>,
    RawQuery(raw): RawQuery,
) -> (StatusCode, [(header::HeaderName, &'static str); 1], String) {
    let query = params.get("query").cloned().unwrap_or_default();
    state.seen.lock().unwrap().push(query.clone());
    state.raw.lock().unwrap().push(raw.unwrap_or_default());

    let reply = state
        .replies
        .get(&query)
        .cloned()
        .unwrap_or_else(|| state.fallback.clone());

    (
        StatusCode::from_u16(reply.status).unwrap(),
        [(header::CONTENT_TYPE, "application/json")],
        reply.body,
    )
}

/// Starts a mock `/api/v1/query` endpoint on its own thread and runtime.
/// Expressions not listed in `replies` get `fallback`.
pub fn spawn_mock_prometheus(replies: &[(&str, Reply)], fallback: Reply) -> MockPrometheus {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let raw = Arc::new(Mutex::new(Vec::new()));

    let state = MockState {
        replies: Arc::new(
            replies
                .iter()
                .map(|(q, r)| (q.to_string(), r.clone()))
                .collect(),
        ),
        fallback,
        seen: seen.clone(),
        raw: raw.clone(),
    };

    let app = Router::new()
        .route("/api/v1/query", get(query_handler))
        .with_state(state);

    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind mock server");
    listener
        .set_nonblocking(true)
        .expect("Failed to set non-blocking");
    let addr = listener.local_addr().expect("Failed to read local addr");

    std::thread::spawn(move || {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("Failed to build mock runtime");
        runtime.block_on(async move {
            let listener =
                tokio::net::TcpListener::from_std(listener).expect("Failed to adopt listener");
            axum::serve(listener, app).await.expect("Mock server failed");
        });
    });

    MockPrometheus {
        base_url: format!("http://{}", addr),
        seen,
        raw,
    }
}

/// An address on which nothing is listening.
pub fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind");
    let addr = listener.local_addr().expect("Failed to read local addr");
    drop(listener);
    format!("http://{}", addr)
}
