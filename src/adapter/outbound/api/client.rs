//! Backend REST API client.
//!
//! Implements [`RemoteFetch`] over reqwest. Every call is resolved against
//! the configured base URL and carries the bearer token when one is set.
//! Connect failures and timeouts are retried; HTTP status failures are not.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde_json::Value;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::infrastructure::config::ApiConfig;
use crate::port::{ApiRequest, Method, RemoteFetch, TokenProvider};

/// HTTP client for the console backend.
pub struct ApiClient {
    http: HttpClient,
    base_url: String,
    token: Arc<dyn TokenProvider>,
    retry_max_attempts: u32,
    retry_backoff_ms: u64,
}

impl ApiClient {
    /// Client with reqwest defaults and no retries.
    #[must_use]
    pub fn new(base_url: impl Into<String>, token: Arc<dyn TokenProvider>) -> Self {
        Self {
            http: HttpClient::new(),
            base_url: normalize(base_url.into()),
            token,
            retry_max_attempts: 1,
            retry_backoff_ms: 0,
        }
    }

    #[must_use]
    pub fn from_config(config: &ApiConfig, token: Arc<dyn TokenProvider>) -> Self {
        let http = HttpClient::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .build()
            .unwrap_or_else(|err| {
                warn!(error = %err, "Failed to build HTTP client, using defaults");
                HttpClient::new()
            });

        Self {
            http,
            base_url: normalize(config.base_url.clone()),
            token,
            retry_max_attempts: config.retry_max_attempts,
            retry_backoff_ms: config.retry_backoff_ms,
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    async fn send_with_retry(
        &self,
        request: &ApiRequest,
        token: Option<&str>,
    ) -> Result<reqwest::Response, ApiError> {
        let url = self.url(&request.path);
        let mut attempt = 0;
        let max_attempts = self.retry_max_attempts.max(1);

        loop {
            attempt += 1;
            let mut builder = self.http.request(http_method(request.method), &url);
            if let Some(token) = token {
                builder = builder.bearer_auth(token);
            }
            if let Some(body) = &request.body {
                builder = builder.json(body);
            }

            match builder.send().await {
                Ok(response) => return Ok(response),
                Err(err) => {
                    if attempt >= max_attempts || !Self::should_retry(&err) {
                        return Err(ApiError::Network(err.to_string()));
                    }
                    self.backoff(attempt, max_attempts, &err).await;
                }
            }
        }
    }

    fn should_retry(err: &reqwest::Error) -> bool {
        err.is_timeout() || err.is_connect()
    }

    async fn backoff(&self, attempt: u32, max_attempts: u32, err: &reqwest::Error) {
        warn!(
            attempt,
            max_attempts,
            error = %err,
            "HTTP request failed, retrying"
        );
        if self.retry_backoff_ms > 0 {
            sleep(Duration::from_millis(self.retry_backoff_ms)).await;
        }
    }
}

#[async_trait]
impl RemoteFetch for ApiClient {
    async fn fetch(&self, request: ApiRequest) -> Result<Value, ApiError> {
        let token = self.token.access_token().await?;
        debug!(method = %request.method, path = %request.path, "API request");

        let response = self.send_with_retry(&request, token.as_deref()).await?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        if !status.is_success() {
            debug!(status = status.as_u16(), path = %request.path, "API request rejected");
            return Err(ApiError::from_status(status.as_u16(), body));
        }
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

fn normalize(base_url: String) -> String {
    base_url.trim_end_matches('/').to_string()
}

fn http_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Delete => reqwest::Method::DELETE,
    }
}
