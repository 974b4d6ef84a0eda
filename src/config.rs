use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;
use zeroize::Zeroizing;

/// Application-level constants
pub const APP_NAME: &str = "canon-checker";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_TEMPERATURE: f32 = 0.2;

const ENV_API_KEY: &str = "GEMINI_API_KEY";
const ENV_MODEL: &str = "CANON_MODEL";
const ENV_API_BASE: &str = "CANON_API_BASE";
const ENV_BIND_ADDR: &str = "CANON_BIND_ADDR";
const ENV_TIMEOUT: &str = "CANON_REQUEST_TIMEOUT_SECS";
const ENV_TEMPERATURE: &str = "CANON_TEMPERATURE";

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "canon_checker=info,tower_http=info"
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing credential: set {0}")]
    MissingCredential(&'static str),

    #[error("Invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Process-wide configuration, loaded once at startup and read-only after.
#[derive(Clone)]
pub struct AppConfig {
    pub api_key: Zeroizing<String>,
    pub model: String,
    pub api_base_url: String,
    pub bind_addr: SocketAddr,
    /// `None` leaves inference calls unbounded.
    pub request_timeout: Option<Duration>,
    pub temperature: f32,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("api_base_url", &self.api_base_url)
            .field("bind_addr", &self.bind_addr)
            .field("request_timeout", &self.request_timeout)
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl AppConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load from an arbitrary variable source (used by tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let api_key = get(ENV_API_KEY)
            .map(Zeroizing::new)
            .ok_or(ConfigError::MissingCredential(ENV_API_KEY))?;

        let bind_raw = get(ENV_BIND_ADDR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw.parse::<SocketAddr>().map_err(|e| ConfigError::Invalid {
            var: ENV_BIND_ADDR,
            reason: e.to_string(),
        })?;

        let request_timeout = match get(ENV_TIMEOUT) {
            None => None,
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Some(Duration::from_secs(secs)),
                _ => {
                    return Err(ConfigError::Invalid {
                        var: ENV_TIMEOUT,
                        reason: format!("expected a positive number of seconds, got '{raw}'"),
                    })
                }
            },
        };

        let temperature = match get(ENV_TEMPERATURE) {
            None => DEFAULT_TEMPERATURE,
            Some(raw) => match raw.parse::<f32>() {
                Ok(t) if (0.0..=2.0).contains(&t) => t,
                _ => {
                    return Err(ConfigError::Invalid {
                        var: ENV_TEMPERATURE,
                        reason: format!("expected a number between 0 and 2, got '{raw}'"),
                    })
                }
            },
        };

        Ok(Self {
            api_key,
            model: get(ENV_MODEL).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            api_base_url: get(ENV_API_BASE).unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            bind_addr,
            request_timeout,
            temperature,
        })
    }

    #[cfg(test)]
    pub(crate) fn for_tests() -> Self {
        Self {
            api_key: Zeroizing::new("test-key".to_string()),
            model: DEFAULT_MODEL.to_string(),
            api_base_url: DEFAULT_API_BASE.to_string(),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            request_timeout: Some(Duration::from_secs(5)),
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}
