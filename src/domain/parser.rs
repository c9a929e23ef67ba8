//! Request parser capability

use std::fmt::Debug;

#[cfg(test)]
use mockall::automock;

use super::{Context, DomainError};

/// Turns a raw request body into the ordered message contents used as the cache key.
///
/// Implementations are pure: no I/O and no side effects. A body that does not have
/// the expected message shape yields [`DomainError::Parse`], which callers treat as a
/// cache bypass rather than a failure.
#[cfg_attr(test, automock)]
pub trait RequestParser: Send + Sync + Debug {
    fn parse(&self, body: &[u8]) -> Result<Context, DomainError>;
}
