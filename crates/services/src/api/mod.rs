//! Content service access: wire types, the `AwarenessApi` seam and the
//! reqwest-backed client.

mod client;
mod retry;

pub use client::ApiClient;
pub use retry::{parse_retry_after, with_retry};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use aware_core::model::{Question, QuizId, Slide};

use crate::error::ApiError;

/// Body returned by `POST api/submit_quiz/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitQuizResponse {
    pub message: String,
    /// False when the server declined to record the score (anonymous user,
    /// repeat attempt). The attempt may be retried later.
    pub saved: bool,
}

/// Body returned by `POST api/update_quiz_count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizCount {
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedInUser {
    pub username: String,
}

/// Body returned by `GET api/user_status`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStatus {
    #[serde(default)]
    pub user: Option<SignedInUser>,
}

impl UserStatus {
    #[must_use]
    pub fn username(&self) -> Option<&str> {
        self.user.as_ref().map(|user| user.username.as_str())
    }
}

/// Body returned by `GET api/latest_refresh`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LatestRefresh {
    #[serde(default)]
    pub latest_refresh: Option<String>,
    /// Seconds since the epoch; 0 when content was never refreshed.
    #[serde(default)]
    pub timestamp: f64,
}

impl LatestRefresh {
    #[must_use]
    pub fn timestamp_millis(&self) -> i64 {
        if self.timestamp.is_finite() && self.timestamp > 0.0 {
            (self.timestamp * 1000.0).round() as i64
        } else {
            0
        }
    }
}

/// The content service as seen by the session engine.
#[async_trait]
pub trait AwarenessApi: Send + Sync {
    /// `GET api/slides`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` when every attempt fails or the body is malformed.
    async fn slides(&self) -> Result<Vec<Slide>, ApiError>;

    /// `GET api/quiz`. An empty quiz is an error.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::EmptyContent` for an empty list, other variants on
    /// transport or decoding failures.
    async fn quiz(&self) -> Result<Vec<Question>, ApiError>;

    /// `POST api/submit_quiz/{id}` with `{score}`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport, status or decoding failures.
    async fn submit_quiz(&self, quiz_id: QuizId, score: u32)
    -> Result<SubmitQuizResponse, ApiError>;

    /// `POST api/update_quiz_count`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport, status or decoding failures.
    async fn update_quiz_count(&self) -> Result<QuizCount, ApiError>;

    /// `GET api/update_quiz_count`, reading the total without bumping it.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport, status or decoding failures.
    async fn quiz_count(&self) -> Result<QuizCount, ApiError>;

    /// `GET api/user_status`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport, status or decoding failures.
    async fn user_status(&self) -> Result<UserStatus, ApiError>;

    /// `GET api/latest_refresh`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport, status or decoding failures.
    async fn latest_refresh(&self) -> Result<LatestRefresh, ApiError>;
}
