//! Header handling for replayed requests and relayed responses

use axum::http::header::{self, HeaderMap, HeaderName};

/// Connection-scoped headers that must not be relayed across the proxy
const HOP_BY_HOP: &[HeaderName] = &[
    header::CONNECTION,
    header::PROXY_AUTHENTICATE,
    header::PROXY_AUTHORIZATION,
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
];

pub fn is_hop_by_hop(name: &HeaderName) -> bool {
    HOP_BY_HOP.contains(name) || name.as_str() == "keep-alive" || name.as_str() == "proxy-connection"
}

/// Headers to replay upstream: everything except `host`, `content-length`
/// (both recomputed by the outbound client) and hop-by-hop headers
pub fn request_headers_for_upstream(headers: &HeaderMap) -> HeaderMap {
    filter(headers, |name| {
        *name != header::HOST && *name != header::CONTENT_LENGTH && !is_hop_by_hop(name)
    })
}

/// Headers to relay back to the client: everything except hop-by-hop headers
pub fn response_headers_for_client(headers: &HeaderMap) -> HeaderMap {
    filter(headers, |name| !is_hop_by_hop(name))
}

fn filter(headers: &HeaderMap, keep: impl Fn(&HeaderName) -> bool) -> HeaderMap {
    let mut filtered = HeaderMap::with_capacity(headers.len());

    for (name, value) in headers.iter() {
        if keep(name) {
            filtered.append(name.clone(), value.clone());
        }
    }

    filtered
}
