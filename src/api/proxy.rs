//! Cache-aside reverse proxy handler
//!
//! Every request that does not hit an operational route lands here and moves
//! through: buffer body, parse context, semantic lookup, forward on miss,
//! stream the upstream response back, then save it once fully delivered.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::{Body, Bytes},
    extract::{rejection::BytesRejection, State},
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use tokio::sync::oneshot;
use tracing::{debug, error, info, warn};

use super::state::AppState;
use super::types::{ApiError, ApiErrorType};
use crate::config::SemanticCacheConfig;
use crate::domain::{Context, UpstreamRequest, UpstreamResponse};
use crate::infrastructure::observability::{
    record_cache_lookup, record_cache_save, record_upstream_request, LookupOutcome,
};
use crate::infrastructure::services::SemanticCacheServiceTrait;
use crate::infrastructure::upstream::{response_headers_for_client, Capture, TeeStream};

/// Fallback handler proxying any method and path
///
/// The body is buffered up to the router's body limit; a larger body is
/// rejected with `413` before anything is forwarded.
pub async fn proxy(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let body = match body {
        Ok(body) => body,
        Err(rejection) => {
            warn!(
                status = rejection.status().as_u16(),
                error = %rejection,
                "Failed to read request body"
            );
            return ApiError::new(
                rejection.status(),
                ApiErrorType::InvalidRequestError,
                format!("Failed to read request body: {}", rejection.body_text()),
            )
            .into_response();
        }
    };

    let context = parse_context(state.cache_service.as_ref(), &body);

    if let Some(context) = &context {
        if let Some(cached) = lookup(state.cache_service.as_ref(), context).await {
            return cached_response(&state.config.cache, cached);
        }
    }

    let path_and_query = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());

    let upstream_request = UpstreamRequest {
        method,
        path_and_query,
        headers,
        body,
    };

    let start = Instant::now();

    let upstream_response = match state.upstream.forward(upstream_request).await {
        Ok(response) => response,
        Err(e) => {
            record_upstream_request(None, start.elapsed());
            error!(error = %e, "Upstream request failed");
            return ApiError::from(e).into_response();
        }
    };

    record_upstream_request(Some(upstream_response.status.as_u16()), start.elapsed());

    relay(&state, context, upstream_response)
}

/// Context to look up and save under, or `None` when the cache is bypassed
fn parse_context(service: &dyn SemanticCacheServiceTrait, body: &[u8]) -> Option<Context> {
    match service.parse(body) {
        Ok(context) if !context.is_empty() => Some(context),
        Ok(_) => {
            debug!("Empty conversation context, bypassing semantic cache");
            record_cache_lookup(LookupOutcome::Bypass);
            None
        }
        Err(e) => {
            debug!(error = %e, "Request body not cacheable, bypassing semantic cache");
            record_cache_lookup(LookupOutcome::Bypass);
            None
        }
    }
}

async fn lookup(service: &dyn SemanticCacheServiceTrait, context: &Context) -> Option<Bytes> {
    match service.get(context).await {
        Ok(Some(cached)) if !cached.is_empty() => {
            info!(bytes = cached.len(), "Serving response from semantic cache");
            record_cache_lookup(LookupOutcome::Hit);
            Some(cached)
        }
        Ok(_) => {
            record_cache_lookup(LookupOutcome::Miss);
            None
        }
        Err(e) => {
            warn!(error = %e, "Semantic cache lookup failed, forwarding upstream");
            record_cache_lookup(LookupOutcome::Error);
            None
        }
    }
}

/// Builds a 200 response around a cached body
///
/// Only the configured content headers are sent; headers from the original
/// upstream response were not stored.
fn cached_response(config: &SemanticCacheConfig, body: Bytes) -> Response {
    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, &config.hit_content_type)
        .header(header::CONTENT_LENGTH, body.len());

    if let Some(encoding) = config.hit_content_encoding.as_deref().filter(|e| !e.is_empty()) {
        builder = builder
            .header(header::CONTENT_ENCODING, encoding)
            .header(header::ACCEPT_ENCODING, encoding);
    }

    match builder.body(Body::from(body)) {
        Ok(response) => response,
        Err(e) => {
            error!(error = %e, "Invalid cached response headers");
            ApiError::internal("Failed to build cached response").into_response()
        }
    }
}

/// Streams the upstream response to the client, capturing it for a save
/// when the request is cacheable
fn relay(state: &AppState, context: Option<Context>, upstream: UpstreamResponse) -> Response {
    let UpstreamResponse {
        status,
        headers,
        body,
    } = upstream;

    let cacheable = status.is_success() || state.config.cache.cache_error_responses;

    let body = match context {
        Some(context) if cacheable => {
            let (tee, capture) = TeeStream::new(body);
            tokio::spawn(save_when_complete(
                state.cache_service.clone(),
                context,
                capture,
            ));
            Body::from_stream(tee)
        }
        Some(_) => {
            debug!(status = status.as_u16(), "Upstream status not cacheable");
            Body::from_stream(body)
        }
        None => Body::from_stream(body),
    };

    let mut response = Response::new(body);
    *response.status_mut() = status;
    *response.headers_mut() = response_headers_for_client(&headers);

    response
}

async fn save_when_complete(
    service: Arc<dyn SemanticCacheServiceTrait>,
    context: Context,
    capture: oneshot::Receiver<Capture>,
) {
    let captured = match capture.await {
        Ok(Capture::Complete(captured)) => captured,
        Ok(Capture::Failed(reason)) => {
            warn!(reason = %reason, "Upstream body failed mid-stream, response not cached");
            return;
        }
        Ok(Capture::Abandoned { bytes_seen }) => {
            debug!(bytes_seen, "Client went away before end of response, not cached");
            return;
        }
        Err(_) => return,
    };

    if captured.is_empty() {
        debug!("Empty upstream body, not cached");
        return;
    }

    match service.save(&context, captured).await {
        Ok(id) => {
            debug!(id, "Saved response to semantic cache");
            record_cache_save(true);
        }
        Err(e) => {
            warn!(error = %e, "Failed to save response to semantic cache");
            record_cache_save(false);
        }
    }
}
