//! Domain layer - Core types and capability contracts

pub mod cache;
pub mod context;
pub mod error;
pub mod index;
pub mod parser;
pub mod upstream;

pub use cache::{item_key, ResponseCache, ID_COUNTER_KEY, ITEM_KEY_PREFIX};
pub use context::Context;
pub use error::DomainError;
pub use index::{
    AddIndexRequest, AddIndexResponse, IndexClient, IndexErrorResponse, IndexMatch,
    QueryIndexRequest,
};
pub use parser::RequestParser;
pub use upstream::{ByteStream, UpstreamClient, UpstreamRequest, UpstreamResponse};
