use axum::{
    body::Body,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

const INVALID_API_KEY_BODY: &[u8] = br#"{"error": "Invalid API key"}"#;
const BAD_GATEWAY_BODY: &[u8] = br#"{"error": "Bad Gateway"}"#;
const BAD_REQUEST_BODY: &[u8] = br#"{"error": "Bad Request"}"#;
const METHOD_NOT_ALLOWED_BODY: &[u8] = b"Method Not Allowed";

#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("Missing or invalid API key")]
    InvalidApiKey,

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Request to upstream failed: {0}")]
    Upstream(#[from] reqwest::Error),

    #[error("Failed to read request body: {0}")]
    Body(#[from] axum::Error),
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::InvalidApiKey => StatusCode::UNAUTHORIZED,
            ProxyError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ProxyError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ProxyError::Body(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        // Transport details stay in the server log; the client only sees a fixed body.
        let (content_type, body) = match &self {
            ProxyError::InvalidApiKey => ("application/json", INVALID_API_KEY_BODY),
            ProxyError::MethodNotAllowed => ("text/plain", METHOD_NOT_ALLOWED_BODY),
            ProxyError::Upstream(_) => ("application/json", BAD_GATEWAY_BODY),
            ProxyError::Body(_) => ("application/json", BAD_REQUEST_BODY),
        };

        (
            self.status(),
            [(header::CONTENT_TYPE, content_type)],
            Body::from(body),
        )
            .into_response()
    }
}
