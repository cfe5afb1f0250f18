use std::env;
use std::fmt;
use dotenv::dotenv;

/// Base URL of the HackForums API every accepted request is forwarded to.
pub const UPSTREAM_API_BASE: &str = "https://hackforums.net/api/v2";

pub const DEFAULT_PORT: u16 = 8080;

const PORT_KEY: &str = "PORT";
const PROXY_API_KEY: &str = "PROXY_API_KEY";
const CLIENT_ID_KEY: &str = "HF_CLIENT_ID";
const CLIENT_SECRET_KEY: &str = "HF_CLIENT_SECRET";
const AUTH_MODE_KEY: &str = "PROXY_AUTH_MODE";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variables: {}", .0.join(", "))]
    Missing(Vec<&'static str>),

    #[error("PORT must be a number, got {0:?}")]
    InvalidPort(String),

    #[error("PROXY_AUTH_MODE must be \"inject\" or \"passthrough\", got {0:?}")]
    InvalidAuthMode(String),

    #[error("HF_CLIENT_ID is not a valid header value")]
    InvalidCredential,
}

/// How the outbound `Authorization` header is produced.
#[derive(Clone, PartialEq, Eq)]
pub enum AuthMode {
    /// Send `Bearer <client_id>` on every request and drop the caller's headers.
    Inject {
        client_id: String,
        client_secret: String,
    },
    /// Forward the caller's `Authorization` and `Content-Type` headers.
    Passthrough,
}

impl AuthMode {
    pub fn name(&self) -> &'static str {
        match self {
            AuthMode::Inject { .. } => "inject",
            AuthMode::Passthrough => "passthrough",
        }
    }
}

// Credentials never reach the logs through a stray `{:?}`.
impl fmt::Debug for AuthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthMode::Inject { client_id, .. } => f
                .debug_struct("Inject")
                .field("client_id", &redact(client_id, 20))
                .finish_non_exhaustive(),
            AuthMode::Passthrough => f.write_str("Passthrough"),
        }
    }
}

#[derive(Clone)]
pub struct ProxyConfig {
    pub port: u16,
    pub upstream_base: String,
    pub api_key: String,
    pub auth: AuthMode,
}

impl fmt::Debug for ProxyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyConfig")
            .field("port", &self.port)
            .field("upstream_base", &self.upstream_base)
            .field("api_key", &redact(&self.api_key, 8))
            .field("auth", &self.auth)
            .finish()
    }
}

impl ProxyConfig {
    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let port = match get(PORT_KEY) {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };

        let mode = get(AUTH_MODE_KEY).unwrap_or_else(|| "inject".to_string());
        let api_key = get(PROXY_API_KEY);

        let (auth, mut missing) = match mode.to_ascii_lowercase().as_str() {
            "inject" => {
                let client_id = get(CLIENT_ID_KEY);
                let client_secret = get(CLIENT_SECRET_KEY);
                let mut missing = Vec::new();
                if client_id.is_none() {
                    missing.push(CLIENT_ID_KEY);
                }
                if client_secret.is_none() {
                    missing.push(CLIENT_SECRET_KEY);
                }
                let auth = client_id.zip(client_secret).map(|(client_id, client_secret)| {
                    AuthMode::Inject {
                        client_id,
                        client_secret,
                    }
                });
                (auth, missing)
            }
            "passthrough" => (Some(AuthMode::Passthrough), Vec::new()),
            _ => return Err(ConfigError::InvalidAuthMode(mode)),
        };

        if api_key.is_none() {
            missing.push(PROXY_API_KEY);
        }

        match (api_key, auth) {
            (Some(api_key), Some(auth)) if missing.is_empty() => Ok(Self {
                port,
                upstream_base: UPSTREAM_API_BASE.to_string(),
                api_key,
                auth,
            }),
            _ => Err(ConfigError::Missing(missing)),
        }
    }

    /// Points the proxy at a different upstream. Used to aim the proxy at a local mock.
    pub fn with_upstream_base(mut self, base: impl Into<String>) -> Self {
        self.upstream_base = base.into().trim_end_matches('/').to_string();
        self
    }

    /// The keys this configuration's mode requires, in report order.
    pub fn required_keys(mode: Option<&str>) -> &'static [&'static str] {
        match mode.map(str::to_ascii_lowercase).as_deref() {
            Some("passthrough") => &[PROXY_API_KEY],
            _ => &[CLIENT_ID_KEY, CLIENT_SECRET_KEY, PROXY_API_KEY],
        }
    }
}

/// Returns the first `keep` characters of `secret` followed by an ellipsis.
pub fn redact(secret: &str, keep: usize) -> String {
    let prefix: String = secret.chars().take(keep).collect();
    format!("{}...", prefix)
}
