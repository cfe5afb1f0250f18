use crate::{
    config::{AuthMode, ConfigError},
    error::ProxyError,
};
use http::HeaderMap;
use tracing::debug;

/// Decides which headers accompany a request to the upstream.
pub trait HeaderPolicy: Send + Sync {
    /// Get the policy's name for logging and identification
    fn name(&self) -> &str;

    /// Build the outbound headers from the caller's headers
    fn process_headers(&self, inbound: &HeaderMap) -> Result<HeaderMap, ProxyError>;
}

mod inject;
mod passthrough;

pub use inject::InjectPolicy;
pub use passthrough::PassthroughPolicy;

/// Factory function to create the policy selected at startup
pub fn create_policy(mode: &AuthMode) -> Result<Box<dyn HeaderPolicy>, ConfigError> {
    let policy: Box<dyn HeaderPolicy> = match mode {
        AuthMode::Inject { client_id, .. } => Box::new(InjectPolicy::new(client_id)?),
        AuthMode::Passthrough => Box::new(PassthroughPolicy),
    };
    debug!(policy = policy.name(), "Header policy selected");
    Ok(policy)
}
