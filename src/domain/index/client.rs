//! Similarity-index client trait

use std::fmt::Debug;

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use super::IndexMatch;
use crate::domain::DomainError;

/// Client of the similarity-index microservice
#[cfg_attr(test, automock)]
#[async_trait]
pub trait IndexClient: Send + Sync + Debug {
    /// Finds the nearest indexed context.
    ///
    /// `Ok(None)` means the service found no match; it is not an error. The
    /// threshold is forwarded to the service, which alone decides whether a
    /// candidate is close enough. The returned distance is not re-checked here.
    async fn query_index(
        &self,
        context: &str,
        distance_threshold: f32,
    ) -> Result<Option<IndexMatch>, DomainError>;

    /// Registers a cached item ID under the given context
    async fn add_index(&self, id: i64, context: &str) -> Result<(), DomainError>;
}
