//! Upstream transport domain - replaying buffered requests to the LLM API

use std::fmt;
use std::pin::Pin;

use async_trait::async_trait;
use axum::http::{HeaderMap, Method, StatusCode};
use bytes::Bytes;
use futures::Stream;

use crate::domain::DomainError;

/// Stream type for upstream response bodies
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, DomainError>> + Send>>;

/// A fully buffered inbound request, ready to be replayed
#[derive(Debug, Clone)]
pub struct UpstreamRequest {
    pub method: Method,
    /// Path plus optional query string, appended verbatim to the target URL
    pub path_and_query: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Upstream response whose body has not been consumed yet
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: ByteStream,
}

impl fmt::Debug for UpstreamResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpstreamResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .field("body", &"<ByteStream>")
            .finish()
    }
}

/// Outbound transport to the upstream LLM API
///
/// Each call is attempted once. Transport and request construction failures
/// are reported as [`DomainError::Upstream`]; any HTTP status the upstream
/// returns, including 4xx/5xx, is a successful forward.
#[async_trait]
pub trait UpstreamClient: Send + Sync + fmt::Debug {
    async fn forward(&self, request: UpstreamRequest) -> Result<UpstreamResponse, DomainError>;
}
