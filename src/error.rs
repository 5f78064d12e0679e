//! Error types for talking to a GBD server

use thiserror::Error;

/// Errors that can occur while calling the GBD HTTP API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The request never produced a response (connection refused, timeout, ...).
    #[error("request failed: {0}")]
    Transport(String),

    /// The server answered with a non-2xx status code.
    #[error("server responded with status {0}")]
    Status(u16),

    /// The response body was not JSON of the expected shape.
    #[error("unexpected response body: {0}")]
    Malformed(String),

    /// The configured server URL cannot be turned into an origin.
    #[error("invalid server origin '{0}'")]
    InvalidOrigin(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => ApiError::Status(status.as_u16()),
            None => ApiError::Transport(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Malformed(err.to_string())
    }
}
