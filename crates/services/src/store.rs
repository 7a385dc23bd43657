//! Typed access to the local key-value store.

use std::sync::Arc;

use log::{debug, warn};

use aware_core::model::{SessionSnapshot, Section, Theme};
use storage::repository::{KeyValueStore, StorageError};

/// Keys used in the local store.
pub mod keys {
    pub const EDUCATION_STATE: &str = "educationState";
    pub const QUIZ_SUBMITTED: &str = "quizSubmitted";
    pub const QUIZ_SUBMISSION_MESSAGE: &str = "quizSubmissionMessage";
    pub const QUIZ_COUNT_UPDATED: &str = "quizCountUpdated";
    pub const LAST_SECTION: &str = "lastSection";
    pub const CURRENT_SECTION: &str = "currentSection";
    pub const RETURN_TO_SECTION: &str = "returnToSection";
    pub const PRE_LOGIN_STATE: &str = "preLoginState";
    pub const QUIZ_TAKEN_PREFIX: &str = "quizTaken_";
    pub const THEME: &str = "theme";
    pub const WELCOME_DISMISSED: &str = "welcomeDismissed";
}

/// Keys dropped by `SessionStore::clear`, besides the `quizTaken_` family.
const USER_STATE_KEYS: [&str; 7] = [
    keys::EDUCATION_STATE,
    keys::QUIZ_SUBMITTED,
    keys::QUIZ_SUBMISSION_MESSAGE,
    keys::QUIZ_COUNT_UPDATED,
    keys::LAST_SECTION,
    keys::RETURN_TO_SECTION,
    keys::PRE_LOGIN_STATE,
];

const TRUE: &str = "true";

/// Session snapshot, markers and preferences on top of a `KeyValueStore`.
///
/// Every write replaces a whole value, so a reader sees either the previous
/// snapshot or the new one.
#[derive(Clone)]
pub struct SessionStore {
    local: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    #[must_use]
    pub fn new(local: Arc<dyn KeyValueStore>) -> Self {
        Self { local }
    }

    //
    // ─── SNAPSHOT ──────────────────────────────────────────────────────────────
    //

    /// Serialize `snapshot` and overwrite the stored one.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if serialization or the write fails.
    pub async fn save(&self, snapshot: &SessionSnapshot) -> Result<(), StorageError> {
        let raw = encode(snapshot)?;
        self.local.set(keys::EDUCATION_STATE, &raw).await?;
        debug!(
            "saved session: slide {}, question {}/{}, pending {}",
            snapshot.current_slide,
            snapshot.current_question,
            snapshot.questions.len(),
            snapshot.pending_quiz_submission
        );
        Ok(())
    }

    /// Last saved snapshot. A blob that no longer parses counts as absent.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read.
    pub async fn load(&self) -> Result<Option<SessionSnapshot>, StorageError> {
        let raw = self.local.get(keys::EDUCATION_STATE).await?;
        Ok(raw.as_deref().and_then(|raw| decode(keys::EDUCATION_STATE, raw)))
    }

    /// Remove the snapshot and every transient marker of the current user.
    ///
    /// Theme and welcome preferences survive.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be written.
    pub async fn clear(&self) -> Result<(), StorageError> {
        for key in USER_STATE_KEYS {
            self.local.remove(key).await?;
        }
        let taken = self.local.remove_prefix(keys::QUIZ_TAKEN_PREFIX).await?;
        debug!("cleared user state ({taken} quiz markers)");
        Ok(())
    }

    /// Store the snapshot to resume after a login redirect.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if serialization or the write fails.
    pub async fn save_pre_login(&self, snapshot: &SessionSnapshot) -> Result<(), StorageError> {
        let raw = encode(snapshot)?;
        self.local.set(keys::PRE_LOGIN_STATE, &raw).await
    }

    /// Consume the pre-login snapshot, promoting it to the regular slot.
    ///
    /// The pre-login entry is removed even when it no longer parses.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read or written.
    pub async fn take_pre_login(&self) -> Result<Option<SessionSnapshot>, StorageError> {
        let Some(raw) = self.local.get(keys::PRE_LOGIN_STATE).await? else {
            return Ok(None);
        };
        self.local.remove(keys::PRE_LOGIN_STATE).await?;
        let Some(snapshot) = decode(keys::PRE_LOGIN_STATE, &raw) else {
            return Ok(None);
        };
        self.local.set(keys::EDUCATION_STATE, &raw).await?;
        debug!("promoted pre-login session");
        Ok(Some(snapshot))
    }

    //
    // ─── QUIZ MARKERS ──────────────────────────────────────────────────────────
    //

    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read.
    pub async fn is_submitted(&self) -> Result<bool, StorageError> {
        self.flag(keys::QUIZ_SUBMITTED).await
    }

    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be written.
    pub async fn mark_submitted(&self) -> Result<(), StorageError> {
        self.local.set(keys::QUIZ_SUBMITTED, TRUE).await
    }

    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read.
    pub async fn is_count_updated(&self) -> Result<bool, StorageError> {
        self.flag(keys::QUIZ_COUNT_UPDATED).await
    }

    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be written.
    pub async fn mark_count_updated(&self) -> Result<(), StorageError> {
        self.local.set(keys::QUIZ_COUNT_UPDATED, TRUE).await
    }

    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read.
    pub async fn submission_message(&self) -> Result<Option<String>, StorageError> {
        self.local.get(keys::QUIZ_SUBMISSION_MESSAGE).await
    }

    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be written.
    pub async fn set_submission_message(&self, message: &str) -> Result<(), StorageError> {
        self.local.set(keys::QUIZ_SUBMISSION_MESSAGE, message).await
    }

    /// Forget the submitted and count markers of the previous attempt.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be written.
    pub async fn reset_attempt_markers(&self) -> Result<(), StorageError> {
        self.local.remove(keys::QUIZ_SUBMITTED).await?;
        self.local.remove(keys::QUIZ_COUNT_UPDATED).await
    }

    /// Like `reset_attempt_markers`, and drop the submission message too.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be written.
    pub async fn clear_attempt(&self) -> Result<(), StorageError> {
        self.reset_attempt_markers().await?;
        self.local.remove(keys::QUIZ_SUBMISSION_MESSAGE).await
    }

    //
    // ─── SECTIONS ──────────────────────────────────────────────────────────────
    //

    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read.
    pub async fn current_section(&self) -> Result<Option<Section>, StorageError> {
        self.section(keys::CURRENT_SECTION).await
    }

    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be written.
    pub async fn set_current_section(&self, section: Section) -> Result<(), StorageError> {
        self.local.set(keys::CURRENT_SECTION, section.as_str()).await
    }

    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read.
    pub async fn last_section(&self) -> Result<Option<Section>, StorageError> {
        self.section(keys::LAST_SECTION).await
    }

    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be written.
    pub async fn set_last_section(&self, section: Section) -> Result<(), StorageError> {
        self.local.set(keys::LAST_SECTION, section.as_str()).await
    }

    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read.
    pub async fn return_section(&self) -> Result<Option<Section>, StorageError> {
        self.section(keys::RETURN_TO_SECTION).await
    }

    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be written.
    pub async fn set_return_section(&self, section: Section) -> Result<(), StorageError> {
        self.local.set(keys::RETURN_TO_SECTION, section.as_str()).await
    }

    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be written.
    pub async fn clear_return_section(&self) -> Result<(), StorageError> {
        self.local.remove(keys::RETURN_TO_SECTION).await
    }

    //
    // ─── PREFERENCES ───────────────────────────────────────────────────────────
    //

    /// Saved theme; dark unless light was chosen.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read.
    pub async fn theme(&self) -> Result<Theme, StorageError> {
        let raw = self.local.get(keys::THEME).await?;
        Ok(raw.as_deref().map(Theme::parse).unwrap_or_default())
    }

    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be written.
    pub async fn set_theme(&self, theme: Theme) -> Result<(), StorageError> {
        self.local.set(keys::THEME, theme.as_str()).await
    }

    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read.
    pub async fn is_welcome_dismissed(&self) -> Result<bool, StorageError> {
        self.flag(keys::WELCOME_DISMISSED).await
    }

    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be written.
    pub async fn dismiss_welcome(&self) -> Result<(), StorageError> {
        self.local.set(keys::WELCOME_DISMISSED, TRUE).await
    }

    async fn flag(&self, key: &str) -> Result<bool, StorageError> {
        Ok(self.local.get(key).await?.as_deref() == Some(TRUE))
    }

    async fn section(&self, key: &str) -> Result<Option<Section>, StorageError> {
        Ok(self
            .local
            .get(key)
            .await?
            .as_deref()
            .and_then(Section::parse))
    }
}

fn encode(snapshot: &SessionSnapshot) -> Result<String, StorageError> {
    serde_json::to_string(snapshot).map_err(|e| StorageError::Serialization(e.to_string()))
}

fn decode(key: &str, raw: &str) -> Option<SessionSnapshot> {
    match serde_json::from_str(raw) {
        Ok(snapshot) => Some(snapshot),
        Err(err) => {
            warn!("ignoring unparsable `{key}`: {err}");
            None
        }
    }
}
