//! Authenticating reverse proxy in front of the HackForums API.
//!
//! Requests must carry the shared secret in `X-API-Key`. Accepted `GET` and
//! `POST` requests are forwarded to [`config::UPSTREAM_API_BASE`] with the
//! headers chosen by the active [`policy::HeaderPolicy`], and the upstream
//! response is relayed back unchanged apart from hop-by-hop headers.

pub mod config;
pub mod error;
pub mod handlers;
pub mod policy;
pub mod proxy;
pub mod server;
pub mod state;
