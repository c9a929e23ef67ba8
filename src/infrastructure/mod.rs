//! Infrastructure layer - External service implementations

pub mod cache;
pub mod index;
pub mod logging;
pub mod observability;
pub mod parser;
pub mod services;
pub mod upstream;
