//! One-shot side effects of a finished quiz: the score submission and the
//! global quiz counter.

use std::sync::Arc;

use log::{info, warn};

use aware_core::model::QuizId;
use storage::repository::StorageError;

use crate::api::AwarenessApi;
use crate::store::SessionStore;

/// Shown when a score could not be submitted.
pub const SUBMISSION_FAILED: &str = "Error submitting score. Please try again.";
/// Shown when nothing better is known about a previous submission.
pub const SIGN_IN_PROMPT: &str = "Sign in to save your score.";

/// What `QuizSubmissionGateway::submit_once` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// A previous attempt was already recorded; nothing was sent.
    AlreadySubmitted { message: String },
    /// The server recorded the score.
    Saved { message: String },
    /// The server answered but declined to record the score.
    NotSaved { message: String },
    /// The request failed.
    Failed { message: String },
}

impl SubmissionOutcome {
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            SubmissionOutcome::AlreadySubmitted { message }
            | SubmissionOutcome::Saved { message }
            | SubmissionOutcome::NotSaved { message }
            | SubmissionOutcome::Failed { message } => message,
        }
    }

    /// True when the durable submitted marker is set after this call.
    #[must_use]
    pub fn is_recorded(&self) -> bool {
        matches!(
            self,
            SubmissionOutcome::AlreadySubmitted { .. } | SubmissionOutcome::Saved { .. }
        )
    }
}

/// Posts a quiz score at most once per attempt.
///
/// The submitted marker is only set when the server reports `saved`, so an
/// anonymous attempt is submitted again after signing in.
#[derive(Clone)]
pub struct QuizSubmissionGateway {
    api: Arc<dyn AwarenessApi>,
    store: SessionStore,
}

impl QuizSubmissionGateway {
    #[must_use]
    pub fn new(api: Arc<dyn AwarenessApi>, store: SessionStore) -> Self {
        Self { api, store }
    }

    /// Submit `score` for `quiz_id` unless this attempt was already recorded.
    ///
    /// Network failures resolve to `SubmissionOutcome::Failed`; a missing quiz
    /// id does too.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the local store cannot be read or written.
    pub async fn submit_once(
        &self,
        quiz_id: Option<QuizId>,
        score: u32,
    ) -> Result<SubmissionOutcome, StorageError> {
        if self.store.is_submitted().await? {
            let message = self
                .store
                .submission_message()
                .await?
                .unwrap_or_else(|| SIGN_IN_PROMPT.to_string());
            return Ok(SubmissionOutcome::AlreadySubmitted { message });
        }

        let Some(quiz_id) = quiz_id else {
            warn!("cannot submit score {score}: quiz id missing");
            return self.failed().await;
        };

        match self.api.submit_quiz(quiz_id, score).await {
            Ok(response) => {
                self.store.set_submission_message(&response.message).await?;
                if response.saved {
                    self.store.mark_submitted().await?;
                    info!("score {score} saved for quiz {quiz_id}");
                    Ok(SubmissionOutcome::Saved {
                        message: response.message,
                    })
                } else {
                    info!("score {score} for quiz {quiz_id} not saved: {}", response.message);
                    Ok(SubmissionOutcome::NotSaved {
                        message: response.message,
                    })
                }
            }
            Err(err) => {
                warn!("score submission for quiz {quiz_id} failed: {err}");
                self.failed().await
            }
        }
    }

    async fn failed(&self) -> Result<SubmissionOutcome, StorageError> {
        self.store.set_submission_message(SUBMISSION_FAILED).await?;
        Ok(SubmissionOutcome::Failed {
            message: SUBMISSION_FAILED.to_string(),
        })
    }
}

/// Bumps the global completed-quiz counter once per attempt.
#[derive(Clone)]
pub struct QuizCounter {
    api: Arc<dyn AwarenessApi>,
    store: SessionStore,
}

impl QuizCounter {
    #[must_use]
    pub fn new(api: Arc<dyn AwarenessApi>, store: SessionStore) -> Self {
        Self { api, store }
    }

    /// Increment the counter unless this attempt already did.
    ///
    /// Returns the new total, or `None` when nothing was sent or the request
    /// failed. A failure leaves the marker unset.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the local store cannot be read or written.
    pub async fn update_once(&self) -> Result<Option<u64>, StorageError> {
        if self.store.is_count_updated().await? {
            return Ok(None);
        }
        match self.api.update_quiz_count().await {
            Ok(count) => {
                self.store.mark_count_updated().await?;
                Ok(Some(count.count))
            }
            Err(err) => {
                warn!("quiz count update failed: {err}");
                Ok(None)
            }
        }
    }

    /// Current total without bumping it; `None` when unavailable.
    pub async fn current(&self) -> Option<u64> {
        match self.api.quiz_count().await {
            Ok(count) => Some(count.count),
            Err(err) => {
                warn!("quiz count unavailable: {err}");
                None
            }
        }
    }
}
