//! Similarity index domain - contract with the external index microservice

mod client;
mod types;

pub use client::IndexClient;
pub use types::{
    AddIndexRequest, AddIndexResponse, IndexErrorResponse, IndexMatch, QueryIndexRequest,
};

#[cfg(test)]
pub use client::MockIndexClient;
