use crate::{
    config::{ConfigError, ProxyConfig},
    policy::{create_policy, HeaderPolicy},
};

/// Everything a request needs, built once at startup and shared read-only.
pub struct AppState {
    pub upstream_base: String,
    pub api_key: String,
    pub policy: Box<dyn HeaderPolicy>,
}

impl AppState {
    pub fn new(config: &ProxyConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            upstream_base: config.upstream_base.clone(),
            api_key: config.api_key.clone(),
            policy: create_policy(&config.auth)?,
        })
    }

    /// Target URL for an inbound path and query, concatenated as received.
    pub fn target_url(&self, path_and_query: &str) -> String {
        format!("{}{}", self.upstream_base, path_and_query)
    }
}
