use axum::{
    body::{to_bytes, Body, Bytes},
    http::{header, HeaderMap, Method, Request, Response},
    response::IntoResponse,
};
use tracing::{debug, error, info};

use crate::{error::ProxyError, state::AppState};

mod client;
mod headers;

pub use client::{CLIENT, UPSTREAM_TIMEOUT};
pub use headers::{api_key_matches, filter_response_headers, HOP_BY_HOP_RESPONSE_HEADERS};

/// Handles one inbound request end to end. Every failure becomes a response.
pub async fn handle(state: &AppState, request: Request<Body>) -> Response<Body> {
    match forward(state, request).await {
        Ok(response) => response,
        Err(e) => {
            if let ProxyError::Upstream(ref cause) = e {
                error!("Error proxying request: {}", cause);
            }
            e.into_response()
        }
    }
}

async fn forward(state: &AppState, request: Request<Body>) -> Result<Response<Body>, ProxyError> {
    if !api_key_matches(request.headers(), &state.api_key) {
        debug!("Rejected request with missing or invalid API key");
        return Err(ProxyError::InvalidApiKey);
    }

    let method = request.method().clone();
    if method != Method::GET && method != Method::POST {
        debug!(method = %method, "Rejected unsupported method");
        return Err(ProxyError::MethodNotAllowed);
    }

    let path_and_query = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    let url = state.target_url(path_and_query);
    info!("Proxying {} {}", method, url);

    let outbound_headers = state.policy.process_headers(request.headers())?;
    let body = read_body(request).await?;

    let mut outbound = CLIENT.request(method.clone(), url).headers(outbound_headers);
    if method == Method::POST {
        outbound = outbound.body(body);
    }

    let upstream = outbound.send().await?;
    relay_response(upstream).await
}

/// Reads exactly the declared `Content-Length` bytes; anything else is an empty body.
async fn read_body(request: Request<Body>) -> Result<Bytes, ProxyError> {
    let declared = declared_length(request.headers());
    if declared == 0 {
        return Ok(Bytes::new());
    }
    Ok(to_bytes(request.into_body(), declared).await?)
}

fn declared_length(headers: &HeaderMap) -> usize {
    headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(0)
}

async fn relay_response(upstream: reqwest::Response) -> Result<Response<Body>, ProxyError> {
    let status = upstream.status();
    let headers = filter_response_headers(upstream.headers());
    let body = upstream.bytes().await?;
    debug!(status = %status, bytes = body.len(), "Relaying upstream response");

    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    Ok(response)
}
