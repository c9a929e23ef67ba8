//! Response cache trait definition

use std::fmt::Debug;

use async_trait::async_trait;
use bytes::Bytes;

#[cfg(test)]
use mockall::automock;

use crate::domain::DomainError;

/// ID-addressed store for captured upstream responses
///
/// IDs come from a single shared counter and are the join key with the
/// similarity index. They are strictly increasing across all callers; gaps
/// are allowed, duplicates are not.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ResponseCache: Send + Sync + Debug {
    /// Allocates the next ID and stores the value under it
    ///
    /// Allocation and storage are two separate operations. A failure between
    /// them leaves an unused ID behind; nothing is rolled back.
    async fn save(&self, value: Bytes) -> Result<i64, DomainError>;

    /// Gets a stored value. An absent ID is `Ok(None)`, never an error.
    async fn get(&self, id: i64) -> Result<Option<Bytes>, DomainError>;

    /// Checks that the backing store is reachable
    async fn ping(&self) -> Result<(), DomainError> {
        Ok(())
    }
}
