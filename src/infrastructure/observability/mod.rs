//! Observability infrastructure - Tracing and Metrics

mod config;
mod metrics;
mod tracing_setup;

pub use config::{MetricsConfig, ObservabilityConfig, TracingConfig};
pub use metrics::{
    create_metrics_router, init_metrics, record_cache_lookup, record_cache_save,
    record_http_request, record_upstream_request, LookupOutcome, PrometheusMetrics, METRICS_PATH,
};
pub use tracing_setup::{init_tracing, shutdown_tracing};
