use super::HeaderPolicy;
use crate::{config::ConfigError, error::ProxyError};
use http::{header, HeaderMap, HeaderValue};

/// Sends the server-held client id as a bearer token and ignores every caller header.
pub struct InjectPolicy {
    authorization: HeaderValue,
}

impl InjectPolicy {
    pub fn new(client_id: &str) -> Result<Self, ConfigError> {
        let mut authorization = HeaderValue::from_str(&format!("Bearer {}", client_id))
            .map_err(|_| ConfigError::InvalidCredential)?;
        authorization.set_sensitive(true);
        Ok(Self { authorization })
    }
}

impl HeaderPolicy for InjectPolicy {
    fn name(&self) -> &str {
        "inject"
    }

    fn process_headers(&self, _inbound: &HeaderMap) -> Result<HeaderMap, ProxyError> {
        let mut headers = HeaderMap::with_capacity(2);
        headers.insert(header::AUTHORIZATION, self.authorization.clone());
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        Ok(headers)
    }
}
