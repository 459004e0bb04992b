// Error types for repo-stats.
// Separates upstream fetch failures (recovered internally) from caller-visible errors.

use reqwest::StatusCode;
use thiserror::Error;

/// A single failed attempt to read from the upstream API.
///
/// The data client recovers from these by serving cached data; they only reach
/// callers wrapped in [`Error::RemoteUnavailable`].
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("GitHub API error: {0}")]
    Http(#[source] reqwest::Error),

    #[error("request timed out")]
    Timeout,

    #[error("Authentication failed: invalid or expired token")]
    Unauthorized,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Rate limit exceeded, resets at {reset_at}")]
    RateLimited { reset_at: String },

    #[error("HTTP {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("unexpected response shape: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid header value: {0}")]
    InvalidHeader(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else {
            FetchError::Http(err)
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    /// Live fetch failed and nothing was cached for the resource.
    #[error("{resource} unavailable: {source}")]
    RemoteUnavailable {
        resource: &'static str,
        #[source]
        source: FetchError,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn is_remote_unavailable(&self) -> bool {
        matches!(self, Error::RemoteUnavailable { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
