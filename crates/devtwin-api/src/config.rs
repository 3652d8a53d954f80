//! Server configuration read from `DEVTWIN_*` environment variables

use config::{Config, ConfigError, Environment};
use devtwin_core::RuntimeConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Socket address to listen on
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Log level (trace, debug, info, warn, error) used when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Shard count for the twin map
    #[serde(default)]
    pub shard_amount: Option<usize>,
}

fn default_bind_addr() -> String {
    "0.0.0.0:8082".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_request_timeout_secs() -> u64 {
    5
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            log_level: default_log_level(),
            request_timeout_secs: default_request_timeout_secs(),
            shard_amount: None,
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(Environment::with_prefix("DEVTWIN").try_parsing(true))
            .build()?
            .try_deserialize()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            shard_amount: self.shard_amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Environment is process-global
    static TEST_LOCK: Mutex<()> = Mutex::new(());

    fn clear_env() {
        for key in [
            "DEVTWIN_BIND_ADDR",
            "DEVTWIN_LOG_LEVEL",
            "DEVTWIN_REQUEST_TIMEOUT_SECS",
            "DEVTWIN_SHARD_AMOUNT",
        ] {
            std::env::remove_var(key);
        }
    }

    #[test]
    fn test_default_config() {
        let _lock = TEST_LOCK.lock().unwrap();
        clear_env();

        let config = ApiConfig::from_env().unwrap();
        assert_eq!(config, ApiConfig::default());
        assert_eq!(config.bind_addr, "0.0.0.0:8082");
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_custom_config() {
        let _lock = TEST_LOCK.lock().unwrap();
        clear_env();

        std::env::set_var("DEVTWIN_BIND_ADDR", "127.0.0.1:9000");
        std::env::set_var("DEVTWIN_LOG_LEVEL", "debug");
        std::env::set_var("DEVTWIN_REQUEST_TIMEOUT_SECS", "10");
        std::env::set_var("DEVTWIN_SHARD_AMOUNT", "16");

        let config = ApiConfig::from_env().unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:9000");
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.request_timeout_secs, 10);
        assert_eq!(config.runtime_config().shard_amount, Some(16));

        clear_env();
    }
}
