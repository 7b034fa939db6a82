//! Runtime configuration for the remote gateway.
//!
//! Everything environment-derived is resolved once, up front, into an
//! explicit struct that gets passed into the client constructor. The rest of
//! the crate never reads process state.

use std::env;
use std::error::Error;
use std::fmt;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 45;

const DEFAULT_APP_TITLE: &str = "charla";
const DEFAULT_APP_REFERER: &str = "https://github.com/charla-chat/charla";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    MissingApiKey,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingApiKey => write!(
                f,
                "OPENROUTER_API_KEY is not set. Export it (or pass --api-key) \
                 before starting a chat session."
            ),
        }
    }
}

impl Error for ConfigError {}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub base_url: String,
    /// Sent as the `X-Title` attribution header.
    pub app_title: String,
    /// Sent as the `HTTP-Referer` attribution header.
    pub app_referer: String,
    pub timeout: Duration,
}

impl Config {
    /// Resolve configuration from CLI overrides and the environment.
    ///
    /// The credential is the only hard requirement; its absence is fatal
    /// before the chat loop ever starts.
    pub fn resolve(api_key: Option<String>, timeout_secs: Option<u64>) -> Result<Self, ConfigError> {
        let api_key = match api_key {
            Some(key) if !key.is_empty() => key,
            _ => env::var("OPENROUTER_API_KEY")
                .ok()
                .filter(|key| !key.is_empty())
                .ok_or(ConfigError::MissingApiKey)?,
        };

        Ok(Config {
            api_key,
            base_url: env_or("OPENROUTER_BASE_URL", DEFAULT_BASE_URL),
            app_title: env_or("CHARLA_APP_TITLE", DEFAULT_APP_TITLE),
            app_referer: env_or("CHARLA_APP_REFERER", DEFAULT_APP_REFERER),
            timeout: Duration::from_secs(timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
        })
    }

    /// Configuration for the keyless `--list-models` path. The public models
    /// catalogue does not require authentication.
    pub fn for_listing(api_key: Option<String>, timeout_secs: Option<u64>) -> Self {
        Config {
            api_key: api_key.unwrap_or_default(),
            base_url: env_or("OPENROUTER_BASE_URL", DEFAULT_BASE_URL),
            app_title: env_or("CHARLA_APP_TITLE", DEFAULT_APP_TITLE),
            app_referer: env_or("CHARLA_APP_REFERER", DEFAULT_APP_REFERER),
            timeout: Duration::from_secs(timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
        }
    }
}

fn env_or(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_key_wins_over_environment() {
        let config = Config::resolve(Some("cli-key".to_string()), None).unwrap();
        assert_eq!(config.api_key, "cli-key");
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn timeout_override_is_applied() {
        let config = Config::resolve(Some("k".to_string()), Some(7)).unwrap();
        assert_eq!(config.timeout, Duration::from_secs(7));
    }

    #[test]
    fn listing_config_works_without_a_key() {
        let config = Config::for_listing(None, None);
        assert!(config.api_key.is_empty());
        assert!(!config.base_url.is_empty());
    }
}
