//! Cache domain - ID-addressed response storage

mod key;
mod repository;

pub use key::{item_key, ID_COUNTER_KEY, ITEM_KEY_PREFIX};
pub use repository::ResponseCache;

#[cfg(test)]
pub use repository::MockResponseCache;
