use thiserror::Error;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Failures of a remote API call, classified by cause.
///
/// Handled statuses (400, 401, 500) carry fixed operator-facing texts; the
/// remaining variants render the underlying cause.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),

    #[error("unexpected response shape: {0}")]
    Decode(String),

    #[error("The request was rejected by the server. Please check your input.")]
    BadRequest { body: String },

    #[error("Your session is no longer valid. Please log in again.")]
    Unauthorized,

    #[error("The server encountered an error. Please try again later.")]
    Server { body: String },

    #[error("request failed with status {code}")]
    Status { code: u16, body: String },
}

impl ApiError {
    /// Classify a non-success HTTP status.
    #[must_use]
    pub fn from_status(code: u16, body: String) -> Self {
        match code {
            400 => Self::BadRequest { body },
            401 => Self::Unauthorized,
            500 => Self::Server { body },
            _ => Self::Status { code, body },
        }
    }

    /// HTTP status code behind this error, if the server answered.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::BadRequest { .. } => Some(400),
            Self::Unauthorized => Some(401),
            Self::Server { .. } => Some(500),
            Self::Status { code, .. } => Some(*code),
            Self::Network(_) | Self::Decode(_) => None,
        }
    }
}

/// Errors raised by the store layer itself.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConsoleError {
    #[error("no project selected")]
    NoProjectSelected,

    #[error("unknown {kind} '{id}'")]
    UnknownRecord { kind: &'static str, id: String },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Console(#[from] ConsoleError),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),
}

pub type Result<T> = std::result::Result<T, Error>;
