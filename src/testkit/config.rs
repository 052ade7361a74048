//! Canonical test configurations.
//!
//! Built in code rather than parsed, so no environment token leaks in.

use crate::infrastructure::config::{ApiConfig, Config, ConsoleConfig, LoggingConfig};

/// Config pointing at `base_url` with no retries and short timeouts.
pub fn local(base_url: &str) -> Config {
    Config {
        api: ApiConfig {
            base_url: base_url.to_string(),
            timeout_ms: 2_000,
            connect_timeout_ms: 500,
            ..ApiConfig::default()
        },
        logging: LoggingConfig::default(),
        console: ConsoleConfig::default(),
        api_token: None,
    }
}

/// Console settings with MPC loading switched off.
pub fn without_mpc() -> ConsoleConfig {
    ConsoleConfig {
        load_mpc: false,
        ..ConsoleConfig::default()
    }
}
