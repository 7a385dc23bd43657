//! Shared error types for the services crate.

use std::time::Duration;

use thiserror::Error;

use aware_core::model::SessionStateError;
use storage::repository::StorageError;

/// Errors emitted by the content API client.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    #[error("request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error("rate limited by the content service")]
    RateLimited { retry_after: Option<Duration> },
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("malformed response body: {0}")]
    Decode(String),
    #[error("content service returned no {0}")]
    EmptyContent(&'static str),
    #[error(transparent)]
    Url(#[from] url::ParseError),
}

impl ApiError {
    /// Returns true when repeating the same request may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ApiError::HttpStatus(_) | ApiError::RateLimited { .. } | ApiError::Http(_)
        )
    }

    /// Server-requested wait before the next attempt, if any.
    #[must_use]
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            ApiError::RateLimited { retry_after } => *retry_after,
            _ => None,
        }
    }
}

/// Errors emitted while reading configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("invalid api base url `{value}`: {source}")]
    BaseUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },
    #[error("api base url `{0}` cannot carry paths")]
    CannotBeBase(String),
}

/// Errors emitted by the education controller.
///
/// Network trouble never shows up here; it resolves to a screen. What remains
/// is misuse of the flow and failures of the local store.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no education session is active")]
    NoSession,
    #[error("the current screen does not accept this action")]
    WrongScreen,
    #[error("option `{0}` is not on screen")]
    UnknownOption(String),
    #[error(transparent)]
    State(#[from] SessionStateError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
