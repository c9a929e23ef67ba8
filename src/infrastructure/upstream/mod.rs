//! Upstream transport and response relaying

mod headers;
mod http_client;
mod tee;

pub use headers::{is_hop_by_hop, request_headers_for_upstream, response_headers_for_client};
pub use http_client::HttpUpstreamClient;
pub use tee::{Capture, TeeStream};

#[cfg(test)]
pub use http_client::mock::MockUpstreamClient;
