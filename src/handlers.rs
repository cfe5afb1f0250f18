use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::Response,
};
use std::sync::Arc;
use crate::{proxy, state::AppState};

/// Fallback handler: every path and method lands here.
pub async fn proxy_request(
    State(state): State<Arc<AppState>>,
    request: Request<Body>,
) -> Response {
    proxy::handle(&state, request).await
}
