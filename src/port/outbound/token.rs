//! Access-token port. Authentication itself lives in a separate service.

use async_trait::async_trait;

use crate::error::ApiError;

/// Supplies a bearer token for backend calls.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// A currently valid access token, or `None` for anonymous calls.
    async fn access_token(&self) -> Result<Option<String>, ApiError>;
}

/// A fixed token, typically read from the environment at startup.
#[derive(Debug, Clone, Default)]
pub struct StaticToken(Option<String>);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(Some(token.into()))
    }

    #[must_use]
    pub fn anonymous() -> Self {
        Self(None)
    }
}

#[async_trait]
impl TokenProvider for StaticToken {
    async fn access_token(&self) -> Result<Option<String>, ApiError> {
        Ok(self.0.clone())
    }
}
