use super::HeaderPolicy;
use crate::error::ProxyError;
use http::{header, HeaderMap, HeaderValue};
use tracing::debug;

/// Forwards the caller's own `Authorization` and `Content-Type`, nothing else.
pub struct PassthroughPolicy;

impl HeaderPolicy for PassthroughPolicy {
    fn name(&self) -> &str {
        "passthrough"
    }

    fn process_headers(&self, inbound: &HeaderMap) -> Result<HeaderMap, ProxyError> {
        let mut headers = HeaderMap::with_capacity(2);

        let content_type = inbound
            .get(header::CONTENT_TYPE)
            .cloned()
            .unwrap_or_else(|| HeaderValue::from_static("application/json"));
        headers.insert(header::CONTENT_TYPE, content_type);

        if let Some(auth) = inbound.get(header::AUTHORIZATION) {
            debug!("Forwarding caller authorization header");
            headers.insert(header::AUTHORIZATION, auth.clone());
        }

        Ok(headers)
    }
}
