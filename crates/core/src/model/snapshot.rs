use serde::{Deserialize, Serialize};

use crate::model::{Question, QuizId, Slide};

/// Serialized education session, persisted across page loads and login
/// redirects.
///
/// Field names follow the persisted camelCase layout so snapshots written by
/// earlier clients still load. Every field defaults, so partially written
/// legacy blobs degrade to an empty session instead of failing to parse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    #[serde(default)]
    pub current_slide: usize,
    #[serde(default)]
    pub slides: Vec<Slide>,
    #[serde(default)]
    pub current_question: usize,
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(default)]
    pub answers: Vec<Option<usize>>,
    /// Epoch millis of the content version this snapshot was built against.
    #[serde(default)]
    pub refresh_timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quiz_id: Option<QuizId>,
    #[serde(default)]
    pub pending_quiz_submission: bool,
}

impl SessionSnapshot {
    /// Returns true when every question has been answered.
    #[must_use]
    pub fn is_quiz_complete(&self) -> bool {
        !self.questions.is_empty() && self.current_question >= self.questions.len()
    }
}
