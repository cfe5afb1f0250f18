use axum::http::{HeaderMap, HeaderName};

/// Upstream response headers that describe the upstream connection rather than the payload.
pub const HOP_BY_HOP_RESPONSE_HEADERS: [&str; 2] = ["transfer-encoding", "connection"];

pub const API_KEY_HEADER: &str = "x-api-key";

fn is_hop_by_hop(name: &HeaderName) -> bool {
    HOP_BY_HOP_RESPONSE_HEADERS
        .iter()
        .any(|h| name.as_str().eq_ignore_ascii_case(h))
}

/// Copies every upstream header except the hop-by-hop ones, keeping repeated values.
pub fn filter_response_headers(upstream: &HeaderMap) -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(upstream.len());
    for (name, value) in upstream {
        if !is_hop_by_hop(name) {
            headers.append(name.clone(), value.clone());
        }
    }
    headers
}

/// True only when the `X-API-Key` header is present and equals `expected` exactly.
pub fn api_key_matches(headers: &HeaderMap, expected: &str) -> bool {
    headers
        .get(API_KEY_HEADER)
        .map_or(false, |value| value.as_bytes() == expected.as_bytes())
}
