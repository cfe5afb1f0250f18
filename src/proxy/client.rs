use once_cell::sync::Lazy;
use std::time::Duration;

/// Combined connect and read budget for a single upstream call.
pub const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(30);

/// Shared outbound client. Built without decompression so bodies relay byte for byte.
pub static CLIENT: Lazy<reqwest::Client> = Lazy::new(|| {
    reqwest::Client::builder()
        .pool_idle_timeout(Duration::from_secs(30))
        .pool_max_idle_per_host(32)
        .tcp_keepalive(Duration::from_secs(60))
        .timeout(UPSTREAM_TIMEOUT)
        .build()
        .expect("Failed to create HTTP client")
});
