//! Similarity-index client implementations

mod http;

pub use http::{HttpIndexClient, ADD_INDEX_PATH, QUERY_INDEX_PATH};
