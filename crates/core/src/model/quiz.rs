use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::QuizId;

/// Smallest and largest number of options a question may carry.
pub const MIN_OPTIONS: usize = 2;
pub const MAX_OPTIONS: usize = 4;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question {id} has {count} options, expected 2 to 4")]
    OptionCount { id: QuizId, count: usize },

    #[error("question {id} marks option {correct} correct but has {count} options")]
    CorrectOutOfRange {
        id: QuizId,
        correct: usize,
        count: usize,
    },

    #[error("question {id} has no text")]
    EmptyText { id: QuizId },
}

/// A multiple-choice quiz question.
///
/// `correct` indexes into `options` in their served order; answers are always
/// recorded against that order, never against a shuffled display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuizId,
    pub question: String,
    pub options: Vec<String>,
    pub correct: usize,
    #[serde(default)]
    pub explanation: String,
}

impl Question {
    #[must_use]
    pub fn new(
        id: QuizId,
        question: impl Into<String>,
        options: Vec<String>,
        correct: usize,
        explanation: impl Into<String>,
    ) -> Self {
        Self {
            id,
            question: question.into(),
            options,
            correct,
            explanation: explanation.into(),
        }
    }

    /// Check structural invariants of a served question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` for empty text, an option count outside 2..=4,
    /// or a correct index past the last option.
    pub fn validate(&self) -> Result<(), QuestionError> {
        if self.question.trim().is_empty() {
            return Err(QuestionError::EmptyText { id: self.id });
        }
        let count = self.options.len();
        if !(MIN_OPTIONS..=MAX_OPTIONS).contains(&count) {
            return Err(QuestionError::OptionCount { id: self.id, count });
        }
        if self.correct >= count {
            return Err(QuestionError::CorrectOutOfRange {
                id: self.id,
                correct: self.correct,
                count,
            });
        }
        Ok(())
    }

    /// Returns true if `answer` names the correct option.
    #[must_use]
    pub fn is_correct(&self, answer: Option<usize>) -> bool {
        answer == Some(self.correct)
    }
}
