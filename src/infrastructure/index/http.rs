//! HTTP client for the similarity-index microservice

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;
use tracing::debug;

use crate::config::IndexConfig;
use crate::domain::{
    AddIndexRequest, AddIndexResponse, DomainError, IndexClient, IndexErrorResponse, IndexMatch,
    QueryIndexRequest,
};

pub const QUERY_INDEX_PATH: &str = "/queryIndex";
pub const ADD_INDEX_PATH: &str = "/addIndex";

/// JSON-over-HTTP index client
///
/// Status contract of the service:
/// - `/queryIndex`: 200 with `{id, distance}` on a match, 204 with an empty
///   body when nothing is close enough, anything else is an error carrying
///   `{detail}`.
/// - `/addIndex`: 200 with `{status, message}` on success, anything else is
///   an error carrying `{detail}`.
#[derive(Debug, Clone)]
pub struct HttpIndexClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpIndexClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn from_config(config: &IndexConfig) -> Result<Self, DomainError> {
        let mut builder = reqwest::Client::builder();

        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        let client = builder.build().map_err(|e| {
            DomainError::configuration(format!("Failed to build index HTTP client: {}", e))
        })?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn post<T: Serialize + Sync>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<reqwest::Response, DomainError> {
        let url = self.endpoint(path);

        self.client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| DomainError::index_transport(format!("POST {} failed: {}", url, e)))
    }
}

/// Converts a non-success response into an error carrying the service's detail
async fn service_error(response: reqwest::Response) -> DomainError {
    let status = response.status().as_u16();

    let text = match response.text().await {
        Ok(text) => text,
        Err(e) => return DomainError::index_transport(format!("Failed to read error body: {}", e)),
    };

    match serde_json::from_str::<IndexErrorResponse>(&text) {
        Ok(body) => DomainError::index_service(status, body.detail),
        Err(_) if text.is_empty() => DomainError::index_service(status, "<empty body>"),
        Err(_) => DomainError::index_service(status, text),
    }
}

#[async_trait]
impl IndexClient for HttpIndexClient {
    async fn query_index(
        &self,
        context: &str,
        distance_threshold: f32,
    ) -> Result<Option<IndexMatch>, DomainError> {
        let request = QueryIndexRequest {
            context: context.to_string(),
            distance_threshold,
        };

        let response = self.post(QUERY_INDEX_PATH, &request).await?;

        match response.status() {
            StatusCode::NO_CONTENT => {
                debug!("Index query found no match");
                Ok(None)
            }
            StatusCode::OK => {
                let found: IndexMatch = response.json().await.map_err(|e| {
                    DomainError::index_service(200, format!("Malformed query response: {}", e))
                })?;
                Ok(Some(found))
            }
            _ => Err(service_error(response).await),
        }
    }

    async fn add_index(&self, id: i64, context: &str) -> Result<(), DomainError> {
        let request = AddIndexRequest {
            id,
            context: context.to_string(),
        };

        let response = self.post(ADD_INDEX_PATH, &request).await?;

        if response.status() != StatusCode::OK {
            return Err(service_error(response).await);
        }

        let added: AddIndexResponse = response.json().await.map_err(|e| {
            DomainError::index_service(200, format!("Malformed add response: {}", e))
        })?;

        debug!(id, status = %added.status, "Index entry added");

        Ok(())
    }
}
