use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hf_api_proxy::{
    config::{redact, AuthMode, ConfigError, ProxyConfig},
    server,
    state::AppState,
};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().compact())
        .init();

    let config = match ProxyConfig::from_env() {
        Ok(config) => config,
        Err(e) => exit_with_config_error(e),
    };

    let state = match AppState::new(&config) {
        Ok(state) => Arc::new(state),
        Err(e) => exit_with_config_error(e),
    };

    let listener = server::bind(config.port).await.unwrap_or_else(|e| {
        error!("Failed to bind port {}: {}", config.port, e);
        std::process::exit(1);
    });

    info!("Starting HackForums API proxy on port {}", config.port);
    info!("Auth mode: {}", config.auth.name());
    if let AuthMode::Inject { client_id, .. } = &config.auth {
        info!("HF Client ID: {}", redact(client_id, 20));
    }
    info!("Proxy API Key: {}", redact(&config.api_key, 8));

    server::serve(listener, state, server::shutdown_signal())
        .await
        .unwrap_or_else(|e| {
            error!("Server error: {}", e);
            std::process::exit(1);
        });
}

fn exit_with_config_error(e: ConfigError) -> ! {
    error!("ERROR: {}", e);
    if let ConfigError::Missing(missing) = &e {
        let mode = std::env::var("PROXY_AUTH_MODE").ok();
        for key in ProxyConfig::required_keys(mode.as_deref()) {
            let status = if missing.contains(key) { "missing" } else { "set" };
            error!("{}: {}", key, status);
        }
    }
    std::process::exit(1);
}
