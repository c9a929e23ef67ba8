use axum::{extract::DefaultBodyLimit, middleware, routing::get, Router};
use tower_http::trace::TraceLayer;

use super::health;
use super::middleware::{logging_middleware, metrics_middleware};
use super::proxy;
use super::state::AppState;
use crate::infrastructure::observability::{create_metrics_router, PrometheusMetrics};

/// Create the proxy router: operational routes under `/_proxy` plus a
/// catch-all forwarder for every other method and path
pub fn create_router(state: AppState, metrics: Option<PrometheusMetrics>) -> Router {
    let body_limit = state.config.server.max_body_bytes;

    Router::new()
        .route("/_proxy/health", get(health::health_check))
        .route("/_proxy/ready", get(health::ready_check))
        .route("/_proxy/live", get(health::live_check))
        .fallback(proxy::proxy)
        .with_state(state)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .merge(create_metrics_router(metrics))
}
