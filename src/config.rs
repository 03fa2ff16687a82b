use std::env;
use std::time::Duration;

use log::warn;

pub const DEFAULT_OPENAI_ENDPOINT: &str = "https://api.openai.com";
pub const DEFAULT_ANTHROPIC_ENDPOINT: &str = "https://api.anthropic.com";
pub const DEFAULT_ANTHROPIC_VERSION: &str = "2023-06-01";
pub const DEFAULT_ANTHROPIC_MAX_TOKENS: u32 = 4096;
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 30;

/// Credentials and endpoint for one upstream provider family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub api_key: String,
    pub endpoint: String,
}

/// Process configuration, read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub openai: Option<ProviderConfig>,
    pub anthropic: Option<ProviderConfig>,
    pub anthropic_version: String,
    pub anthropic_max_tokens: u32,
    pub upstream_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
            openai: None,
            anthropic: None,
            anthropic_version: DEFAULT_ANTHROPIC_VERSION.to_string(),
            anthropic_max_tokens: DEFAULT_ANTHROPIC_MAX_TOKENS,
            upstream_timeout: Duration::from_secs(DEFAULT_UPSTREAM_TIMEOUT_SECS),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup. Empty values
    /// count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let defaults = Self::default();

        let provider = |key_var: &str, endpoint_var: &str, default_endpoint: &str| {
            get(key_var).map(|api_key| ProviderConfig {
                api_key,
                endpoint: get(endpoint_var).unwrap_or_else(|| default_endpoint.to_string()),
            })
        };

        Self {
            host: get("HOST").unwrap_or(defaults.host),
            port: parse_or("PORT", get("PORT"), defaults.port),
            openai: provider("OPENAI_API_KEY", "OPENAI_ENDPOINT", DEFAULT_OPENAI_ENDPOINT),
            anthropic: provider(
                "ANTHROPIC_API_KEY",
                "ANTHROPIC_ENDPOINT",
                DEFAULT_ANTHROPIC_ENDPOINT,
            ),
            anthropic_version: get("ANTHROPIC_VERSION").unwrap_or(defaults.anthropic_version),
            anthropic_max_tokens: parse_or(
                "ANTHROPIC_MAX_TOKENS",
                get("ANTHROPIC_MAX_TOKENS"),
                defaults.anthropic_max_tokens,
            ),
            upstream_timeout: Duration::from_secs(parse_or(
                "UPSTREAM_TIMEOUT_SECS",
                get("UPSTREAM_TIMEOUT_SECS"),
                DEFAULT_UPSTREAM_TIMEOUT_SECS,
            )),
        }
    }

    /// True when at least one provider API key is present. When false every
    /// chat request is answered by the offline responder.
    pub fn has_credentials(&self) -> bool {
        self.openai.is_some() || self.anthropic.is_some()
    }
}

fn parse_or<T: std::str::FromStr + Copy + std::fmt::Display>(
    key: &str,
    raw: Option<String>,
    default: T,
) -> T {
    match raw {
        Some(value) => value.trim().parse().unwrap_or_else(|_| {
            warn!("Ignoring invalid {}={:?}, using {}", key, value, default);
            default
        }),
        None => default,
    }
}
