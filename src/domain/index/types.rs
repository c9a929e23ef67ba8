//! Wire types of the similarity-index service

use serde::{Deserialize, Serialize};

/// Body of a `/queryIndex` request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryIndexRequest {
    pub context: String,
    pub distance_threshold: f32,
}

/// Nearest previously indexed context returned by a query
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndexMatch {
    pub id: i64,
    pub distance: f32,
}

impl IndexMatch {
    pub fn new(id: i64, distance: f32) -> Self {
        Self { id, distance }
    }

    /// Whether the match lies within the given distance threshold
    pub fn is_within(&self, threshold: f32) -> bool {
        self.distance <= threshold
    }
}

/// Body of an `/addIndex` request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddIndexRequest {
    pub id: i64,
    pub context: String,
}

/// Successful `/addIndex` response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddIndexResponse {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}

/// Error body returned by the index service on any non-success status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexErrorResponse {
    pub detail: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_request_field_names() {
        let request = QueryIndexRequest {
            context: "hello".to_string(),
            distance_threshold: 0.2,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["context"], "hello");
        assert!(json.get("distance_threshold").is_some());
    }

    #[test]
    fn test_add_response_without_message() {
        let response: AddIndexResponse = serde_json::from_str(r#"{"status":"ok"}"#).unwrap();
        assert_eq!(response.status, "ok");
        assert!(response.message.is_none());
    }

    #[test]
    fn test_match_within_threshold() {
        let hit = IndexMatch::new(5, 0.1);
        assert!(hit.is_within(0.2));
        assert!(!hit.is_within(0.05));
    }
}
