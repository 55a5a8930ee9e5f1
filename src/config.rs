/// Configuration management using figment
///
/// Loads configuration with this precedence (highest wins):
/// 1. Defaults (hardcoded)
/// 2. TOML file: formrecall.toml (in working directory)
/// 3. Environment variables: prefixed FORMRECALL_ (e.g., FORMRECALL_LOG_LEVEL=debug)

use figment::{
    Figment,
    providers::{Env, Format, Toml, Serialized},
};
use serde::{Deserialize, Serialize};
use crate::errors::MemoryError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Base URL of the remote memory store (no trailing slash)
    #[serde(default = "default_store_base_url")]
    pub store_base_url: String,

    /// Per-request timeout for outbound store calls, in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Default result limit for searchWithContext
    #[serde(default = "default_search_limit")]
    pub search_limit: usize,

    /// Result limit used when building enhanced context
    #[serde(default = "default_context_limit")]
    pub context_limit: usize,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_store_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_search_limit() -> usize {
    10
}

fn default_context_limit() -> usize {
    5
}

impl Default for Config {
    fn default() -> Self {
        Config {
            log_level: default_log_level(),
            store_base_url: default_store_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            search_limit: default_search_limit(),
            context_limit: default_context_limit(),
        }
    }
}

impl Config {
    /// Load configuration from defaults, TOML file, and environment variables
    ///
    /// Environment variables override TOML file values.
    /// Example: FORMRECALL_STORE_BASE_URL=https://memory.internal overrides
    /// store_base_url in formrecall.toml
    pub fn load() -> Result<Config, MemoryError> {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file("formrecall.toml"))
            .merge(Env::prefixed("FORMRECALL_"))
            .extract()
            .map_err(|e| MemoryError::Config(format!("Failed to load config: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.store_base_url, "http://127.0.0.1:8000");
        assert_eq!(config.request_timeout_secs, 10);
        assert_eq!(config.search_limit, 10);
        assert_eq!(config.context_limit, 5);
    }
}
