//! Remote fetch port: the boundary through which stores reach the backend.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::ApiError;

/// HTTP method of a backend call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Post => write!(f, "POST"),
            Self::Put => write!(f, "PUT"),
            Self::Delete => write!(f, "DELETE"),
        }
    }
}

/// A backend call relative to the API base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path and optional query, e.g. `/projects/p1/alerts?page=1`.
    pub path: String,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            body: None,
        }
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self {
            method: Method::Delete,
            path: path.into(),
            body: None,
        }
    }

    /// `DELETE` with a JSON body naming what to remove.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Decode`] if `body` cannot be serialized.
    pub fn delete_with<B: Serialize + ?Sized>(
        path: impl Into<String>,
        body: &B,
    ) -> Result<Self, ApiError> {
        Ok(Self {
            method: Method::Delete,
            path: path.into(),
            body: Some(encode(body)?),
        })
    }

    /// `POST` with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Decode`] if `body` cannot be serialized.
    pub fn post<B: Serialize + ?Sized>(path: impl Into<String>, body: &B) -> Result<Self, ApiError> {
        Ok(Self {
            method: Method::Post,
            path: path.into(),
            body: Some(encode(body)?),
        })
    }

    /// `PUT` with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Decode`] if `body` cannot be serialized.
    pub fn put<B: Serialize + ?Sized>(path: impl Into<String>, body: &B) -> Result<Self, ApiError> {
        Ok(Self {
            method: Method::Put,
            path: path.into(),
            body: Some(encode(body)?),
        })
    }

    /// `PUT` without a body, used by toggle endpoints.
    pub fn put_empty(path: impl Into<String>) -> Self {
        Self {
            method: Method::Put,
            path: path.into(),
            body: None,
        }
    }
}

fn encode<B: Serialize + ?Sized>(body: &B) -> Result<Value, ApiError> {
    serde_json::to_value(body).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Issues requests to the backend API and returns the raw JSON response.
///
/// Implementations attach authentication and classify failures into
/// [`ApiError`]. An empty response body is returned as `Value::Null`.
#[async_trait]
pub trait RemoteFetch: Send + Sync {
    async fn fetch(&self, request: ApiRequest) -> Result<Value, ApiError>;
}

/// Fetch and decode a response into `T`.
///
/// # Errors
///
/// Propagates the transport error, or [`ApiError::Decode`] when the response
/// does not have the expected shape.
pub async fn fetch_json<T: DeserializeOwned>(
    fetch: &dyn RemoteFetch,
    request: ApiRequest,
) -> Result<T, ApiError> {
    let value = fetch.fetch(request).await?;
    serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
}
