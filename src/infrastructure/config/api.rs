//! Backend API connection settings.

use serde::Deserialize;

/// HTTP client configuration for the backend API.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Base URL every request path is appended to, e.g. `https://api.example.com/v1`.
    #[serde(default)]
    pub base_url: String,
    /// Request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Connect timeout in milliseconds.
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    /// Attempts for connect/timeout failures. 1 disables retries.
    #[serde(default = "default_retry_max_attempts")]
    pub retry_max_attempts: u32,
    /// Backoff between retries in milliseconds.
    #[serde(default)]
    pub retry_backoff_ms: u64,
    /// Environment variable holding the access token.
    #[serde(default = "default_token_env")]
    pub token_env: String,
}

const fn default_timeout_ms() -> u64 {
    10_000
}

const fn default_connect_timeout_ms() -> u64 {
    3_000
}

const fn default_retry_max_attempts() -> u32 {
    1
}

fn default_token_env() -> String {
    "CONSOLE_API_TOKEN".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout_ms: default_timeout_ms(),
            connect_timeout_ms: default_connect_timeout_ms(),
            retry_max_attempts: default_retry_max_attempts(),
            retry_backoff_ms: 0,
            token_env: default_token_env(),
        }
    }
}
