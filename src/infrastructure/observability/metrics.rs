//! Prometheus metrics infrastructure

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::Lazy;
use regex::Regex;

use super::config::MetricsConfig;

/// Route under which metrics are exposed
pub const METRICS_PATH: &str = "/_proxy/metrics";

static NUMERIC_SEGMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/\d+(/|$)").expect("static regex is valid"));

/// Prometheus metrics handle for serving the metrics endpoint
#[derive(Clone)]
pub struct PrometheusMetrics {
    handle: Arc<PrometheusHandle>,
}

impl PrometheusMetrics {
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

/// Outcome of a semantic cache lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupOutcome {
    Hit,
    Miss,
    /// Request was not parseable or had an empty context
    Bypass,
    /// Lookup failed and the request was forwarded
    Error,
}

impl LookupOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            LookupOutcome::Hit => "hit",
            LookupOutcome::Miss => "miss",
            LookupOutcome::Bypass => "bypass",
            LookupOutcome::Error => "error",
        }
    }
}

/// Initialize Prometheus metrics
pub fn init_metrics(config: &MetricsConfig) -> Option<PrometheusMetrics> {
    if !config.enabled {
        tracing::info!("Prometheus metrics disabled");
        return None;
    }

    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            gauge!("semantic_cache_proxy_info", "version" => env!("CARGO_PKG_VERSION")).set(1.0);
            tracing::info!("Prometheus metrics initialized at {}", METRICS_PATH);

            Some(PrometheusMetrics {
                handle: Arc::new(handle),
            })
        }
        Err(e) => {
            tracing::error!("Failed to initialize Prometheus metrics: {}", e);
            None
        }
    }
}

/// Create the metrics router
///
/// The route is mounted even when metrics are disabled so the path never
/// reaches the proxy fallback; it then answers `404`.
pub fn create_metrics_router(metrics: Option<PrometheusMetrics>) -> Router {
    Router::new()
        .route(METRICS_PATH, get(metrics_handler))
        .with_state(metrics)
}

async fn metrics_handler(State(metrics): State<Option<PrometheusMetrics>>) -> Response {
    match metrics {
        Some(metrics) => metrics.render().into_response(),
        None => (StatusCode::NOT_FOUND, "Metrics are disabled").into_response(),
    }
}

/// Record an inbound HTTP request
pub fn record_http_request(method: &str, path: &str, status: u16, duration: Duration) {
    let labels = [
        ("method", method.to_string()),
        ("path", sanitize_path(path)),
        ("status", status.to_string()),
    ];

    counter!("http_requests_total", &labels).increment(1);
    histogram!("http_request_duration_seconds", &labels).record(duration.as_secs_f64());
}

/// Record the outcome of a semantic cache lookup
pub fn record_cache_lookup(outcome: LookupOutcome) {
    counter!("semantic_cache_lookups_total", "outcome" => outcome.as_str()).increment(1);
}

/// Record the outcome of a semantic cache save
pub fn record_cache_save(success: bool) {
    let status = if success { "success" } else { "error" };
    counter!("semantic_cache_saves_total", "status" => status).increment(1);
}

/// Record a forwarded upstream call; `status` is `None` on transport failure
pub fn record_upstream_request(status: Option<u16>, duration: Duration) {
    match status {
        Some(code) => {
            let labels = [("status", code.to_string())];
            counter!("upstream_requests_total", &labels).increment(1);
            histogram!("upstream_request_duration_seconds", &labels)
                .record(duration.as_secs_f64());
        }
        None => {
            counter!("upstream_errors_total").increment(1);
        }
    }
}

/// Keep path label cardinality bounded
fn sanitize_path(path: &str) -> String {
    let path = NUMERIC_SEGMENT.replace_all(path, "/{id}$1");

    if path.len() > 50 {
        path.chars().take(50).collect()
    } else {
        path.to_string()
    }
}
