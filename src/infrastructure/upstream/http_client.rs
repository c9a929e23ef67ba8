use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use tracing::debug;

use super::headers::request_headers_for_upstream;
use crate::config::UpstreamConfig;
use crate::domain::{DomainError, UpstreamClient, UpstreamRequest, UpstreamResponse};

/// Upstream transport using reqwest
///
/// No retries; the response body is handed back unread as a byte stream.
#[derive(Debug, Clone)]
pub struct HttpUpstreamClient {
    client: reqwest::Client,
    target_url: String,
}

impl HttpUpstreamClient {
    pub fn new(target_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            target_url: target_url.into(),
        }
    }

    pub fn from_config(config: &UpstreamConfig) -> Result<Self, DomainError> {
        let mut builder = reqwest::Client::builder();

        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        let client = builder.build().map_err(|e| {
            DomainError::configuration(format!("Failed to build upstream HTTP client: {}", e))
        })?;

        Ok(Self {
            client,
            target_url: config.target_url.clone(),
        })
    }

    /// Target URL with the inbound path and query appended verbatim
    pub fn url_for(&self, path_and_query: &str) -> String {
        format!("{}{}", self.target_url.trim_end_matches('/'), path_and_query)
    }
}

#[async_trait]
impl UpstreamClient for HttpUpstreamClient {
    async fn forward(&self, request: UpstreamRequest) -> Result<UpstreamResponse, DomainError> {
        let url = self.url_for(&request.path_and_query);

        debug!(method = %request.method, url = %url, "Forwarding request upstream");

        let response = self
            .client
            .request(request.method, &url)
            .headers(request_headers_for_upstream(&request.headers))
            .body(request.body)
            .send()
            .await
            .map_err(|e| DomainError::upstream(format!("Request to {} failed: {}", url, e)))?;

        let status = response.status();
        let headers = response.headers().clone();

        let body = response.bytes_stream().map(|result| {
            result.map_err(|e| DomainError::upstream(format!("Stream error: {}", e)))
        });

        Ok(UpstreamResponse {
            status,
            headers,
            body: Box::pin(body),
        })
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use axum::http::{HeaderMap, HeaderValue, StatusCode};
    use bytes::Bytes;
    use futures::stream;
    use std::sync::Mutex;

    /// Scripted upstream that records every request it receives
    #[derive(Debug)]
    pub struct MockUpstreamClient {
        status: StatusCode,
        headers: HeaderMap,
        chunks: Vec<Bytes>,
        stream_error: Option<String>,
        error: Option<String>,
        calls: Mutex<Vec<UpstreamRequest>>,
    }

    impl MockUpstreamClient {
        pub fn new() -> Self {
            let mut headers = HeaderMap::new();
            headers.insert("content-type", HeaderValue::from_static("application/json"));

            Self {
                status: StatusCode::OK,
                headers,
                chunks: Vec::new(),
                stream_error: None,
                error: None,
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn with_status(mut self, status: StatusCode) -> Self {
            self.status = status;
            self
        }

        pub fn with_header(mut self, name: &'static str, value: &'static str) -> Self {
            self.headers.insert(name, HeaderValue::from_static(value));
            self
        }

        pub fn with_body(mut self, chunks: Vec<&'static str>) -> Self {
            self.chunks = chunks
                .into_iter()
                .map(|c| Bytes::from_static(c.as_bytes()))
                .collect();
            self
        }

        /// Fail the body stream after the scripted chunks
        pub fn with_stream_error(mut self, error: impl Into<String>) -> Self {
            self.stream_error = Some(error.into());
            self
        }

        /// Fail the forward itself
        pub fn with_error(mut self, error: impl Into<String>) -> Self {
            self.error = Some(error.into());
            self
        }

        pub fn calls(&self) -> Vec<UpstreamRequest> {
            self.calls.lock().unwrap().clone()
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    impl Default for MockUpstreamClient {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl UpstreamClient for MockUpstreamClient {
        async fn forward(
            &self,
            request: UpstreamRequest,
        ) -> Result<UpstreamResponse, DomainError> {
            self.calls.lock().unwrap().push(request);

            if let Some(error) = &self.error {
                return Err(DomainError::upstream(error.clone()));
            }

            let mut items: Vec<Result<Bytes, DomainError>> =
                self.chunks.iter().cloned().map(Ok).collect();

            if let Some(error) = &self.stream_error {
                items.push(Err(DomainError::upstream(error.clone())));
            }

            Ok(UpstreamResponse {
                status: self.status,
                headers: self.headers.clone(),
                body: Box::pin(stream::iter(items)),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::{HeaderMap, HeaderValue, Method};
    use bytes::Bytes;
    use wiremock::matchers::{body_string, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn request(path_and_query: &str, body: &'static str) -> UpstreamRequest {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Bearer sk-test"));
        headers.insert("content-type", HeaderValue::from_static("application/json"));
        headers.insert("host", HeaderValue::from_static("proxy.local:8080"));

        UpstreamRequest {
            method: Method::POST,
            path_and_query: path_and_query.to_string(),
            headers,
            body: Bytes::from_static(body.as_bytes()),
        }
    }

    async fn collect(response: UpstreamResponse) -> Vec<u8> {
        let mut body = response.body;
        let mut bytes = Vec::new();
        while let Some(chunk) = body.next().await {
            bytes.extend_from_slice(&chunk.unwrap());
        }
        bytes
    }

    #[test]
    fn test_url_for_joins_without_double_slash() {
        let client = HttpUpstreamClient::new("https://api.openai.com/v1/");
        assert_eq!(
            client.url_for("/chat/completions?x=1"),
            "https://api.openai.com/v1/chat/completions?x=1"
        );
    }

    #[tokio::test]
    async fn test_forward_replays_method_path_headers_and_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(query_param("stream", "true"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_string(r#"{"messages":[]}"#))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("x-request-id", "abc")
                    .set_body_string("data: ok\n\n"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpUpstreamClient::new(format!("{}/v1", server.uri()));
        let response = client
            .forward(request("/chat/completions?stream=true", r#"{"messages":[]}"#))
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.headers.get("x-request-id").unwrap(), "abc");
        assert_eq!(collect(response).await, b"data: ok\n\n");
    }

    #[tokio::test]
    async fn test_forward_relays_error_status() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
            .mount(&server)
            .await;

        let client = HttpUpstreamClient::new(server.uri());
        let response = client.forward(request("/chat/completions", "{}")).await.unwrap();

        assert_eq!(response.status, 429);
        assert_eq!(collect(response).await, b"slow down");
    }

    #[tokio::test]
    async fn test_forward_transport_failure() {
        let client = HttpUpstreamClient::new("http://127.0.0.1:1");
        let err = client.forward(request("/chat/completions", "{}")).await.unwrap_err();

        assert!(matches!(err, DomainError::Upstream { .. }));
    }

    #[test]
    fn test_from_config() {
        let config = UpstreamConfig {
            target_url: "http://llm:9000/".to_string(),
            timeout_secs: Some(30),
        };

        let client = HttpUpstreamClient::from_config(&config).unwrap();
        assert_eq!(client.url_for("/v1/models"), "http://llm:9000/v1/models");
    }
}
