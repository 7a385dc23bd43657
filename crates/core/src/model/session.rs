use std::fmt;

use thiserror::Error;

use crate::model::{Question, QuestionError, QuizId, SessionSnapshot, Slide};
use crate::scoring::calculate_score;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionStateError {
    #[error("no slides loaded")]
    NoSlides,

    #[error("slide {index} out of range ({len} slides)")]
    SlideOutOfRange { index: usize, len: usize },

    #[error("quiz has no questions")]
    EmptyQuiz,

    #[error("no quiz in progress")]
    NoQuiz,

    #[error("quiz already completed")]
    QuizComplete,

    #[error("question {index} already answered")]
    AlreadyAnswered { index: usize },

    #[error("option {option} out of range for question {index} ({count} options)")]
    InvalidOption {
        index: usize,
        option: usize,
        count: usize,
    },

    #[error(transparent)]
    Question(#[from] QuestionError),
}

/// Outcome of recording one answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerRecorded {
    pub index: usize,
    pub option: usize,
    pub correct: bool,
    pub is_complete: bool,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// Explicit state of one visitor's education session.
///
/// Owns the slide deck, the quiz in progress and the answers given so far.
/// Answers are write-once and `current_question` always equals the number of
/// answered questions. Persisted form is `SessionSnapshot`, always produced
/// whole from this container.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct EducationSession {
    slides: Vec<Slide>,
    current_slide: usize,
    questions: Vec<Question>,
    current_question: usize,
    answers: Vec<Option<usize>>,
    refresh_timestamp: i64,
    quiz_id: Option<QuizId>,
}

impl EducationSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a session from a persisted snapshot.
    ///
    /// Out-of-range cursors are clamped and the answer list is padded or cut
    /// to the question count, so a hand-edited or truncated snapshot still
    /// yields a consistent session.
    #[must_use]
    pub fn from_snapshot(snapshot: SessionSnapshot) -> Self {
        let SessionSnapshot {
            current_slide,
            slides,
            current_question,
            questions,
            mut answers,
            refresh_timestamp,
            quiz_id,
            pending_quiz_submission: _,
        } = snapshot;

        answers.resize(questions.len(), None);
        let current_question = current_question.min(questions.len());
        let current_slide = current_slide.min(slides.len().saturating_sub(1));

        Self {
            slides,
            current_slide,
            questions,
            current_question,
            answers,
            refresh_timestamp,
            quiz_id,
        }
    }

    /// Produce the complete persisted form of this session.
    #[must_use]
    pub fn snapshot(&self, pending_quiz_submission: bool) -> SessionSnapshot {
        SessionSnapshot {
            current_slide: self.current_slide,
            slides: self.slides.clone(),
            current_question: self.current_question,
            questions: self.questions.clone(),
            answers: self.answers.clone(),
            refresh_timestamp: self.refresh_timestamp,
            quiz_id: self.quiz_id(),
            pending_quiz_submission,
        }
    }

    #[must_use]
    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    #[must_use]
    pub fn current_slide(&self) -> usize {
        self.current_slide
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn current_question_index(&self) -> usize {
        self.current_question
    }

    #[must_use]
    pub fn answers(&self) -> &[Option<usize>] {
        &self.answers
    }

    #[must_use]
    pub fn refresh_timestamp(&self) -> i64 {
        self.refresh_timestamp
    }

    /// Quiz id for submissions: the recorded id, else the first question's id.
    #[must_use]
    pub fn quiz_id(&self) -> Option<QuizId> {
        self.quiz_id
            .or_else(|| self.questions.first().map(|question| question.id))
    }

    #[must_use]
    pub fn has_slides(&self) -> bool {
        !self.slides.is_empty()
    }

    #[must_use]
    pub fn has_quiz(&self) -> bool {
        !self.questions.is_empty()
    }

    #[must_use]
    pub fn is_on_last_slide(&self) -> bool {
        self.has_slides() && self.current_slide + 1 >= self.slides.len()
    }

    /// All questions answered and the quiz not yet reset.
    #[must_use]
    pub fn is_quiz_complete(&self) -> bool {
        self.has_quiz() && self.current_question >= self.questions.len()
    }

    /// The next unanswered question, if a quiz is in progress.
    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current_question)
    }

    /// Score of the answers recorded so far.
    #[must_use]
    pub fn score(&self) -> u32 {
        calculate_score(&self.questions, &self.answers)
    }

    /// Replace the deck with freshly fetched slides and drop any quiz state.
    ///
    /// Only the first `limit` slides are kept.
    pub fn load_slides(&mut self, mut slides: Vec<Slide>, limit: usize, refresh_timestamp: i64) {
        slides.truncate(limit);
        *self = Self {
            slides,
            refresh_timestamp,
            ..Self::default()
        };
    }

    /// Move to the slide at `index`.
    ///
    /// # Errors
    ///
    /// Returns `SessionStateError::NoSlides` or `SlideOutOfRange`.
    pub fn go_to_slide(&mut self, index: usize) -> Result<&Slide, SessionStateError> {
        if self.slides.is_empty() {
            return Err(SessionStateError::NoSlides);
        }
        if index >= self.slides.len() {
            return Err(SessionStateError::SlideOutOfRange {
                index,
                len: self.slides.len(),
            });
        }
        self.current_slide = index;
        Ok(&self.slides[index])
    }

    /// Begin a quiz with the served questions.
    ///
    /// # Errors
    ///
    /// Returns `SessionStateError::EmptyQuiz` for an empty list and
    /// `SessionStateError::Question` when a question is malformed.
    pub fn start_quiz(&mut self, questions: Vec<Question>) -> Result<QuizId, SessionStateError> {
        let Some(first) = questions.first() else {
            return Err(SessionStateError::EmptyQuiz);
        };
        let quiz_id = first.id;
        for question in &questions {
            question.validate()?;
        }

        self.answers = vec![None; questions.len()];
        self.questions = questions;
        self.current_question = 0;
        self.quiz_id = Some(quiz_id);
        Ok(quiz_id)
    }

    /// Record the answer to the current question.
    ///
    /// `option` is the index into the question's served option order.
    ///
    /// # Errors
    ///
    /// Returns `SessionStateError` when no quiz is running, the quiz is
    /// already complete, the option does not exist, or the question was
    /// answered before.
    pub fn record_answer(&mut self, option: usize) -> Result<AnswerRecorded, SessionStateError> {
        if !self.has_quiz() {
            return Err(SessionStateError::NoQuiz);
        }
        let index = self.current_question;
        let Some(question) = self.questions.get(index) else {
            return Err(SessionStateError::QuizComplete);
        };
        let count = question.options.len();
        if option >= count {
            return Err(SessionStateError::InvalidOption {
                index,
                option,
                count,
            });
        }
        if self.answers.get(index).copied().flatten().is_some() {
            return Err(SessionStateError::AlreadyAnswered { index });
        }
        let correct = question.is_correct(Some(option));

        if self.answers.len() < self.questions.len() {
            self.answers.resize(self.questions.len(), None);
        }
        self.answers[index] = Some(option);
        self.current_question += 1;

        Ok(AnswerRecorded {
            index,
            option,
            correct,
            is_complete: self.is_quiz_complete(),
        })
    }

    /// Leave the results screen: forget the quiz, keep the slides and start
    /// over at the first slide.
    pub fn finish_quiz(&mut self) {
        self.questions.clear();
        self.answers.clear();
        self.current_question = 0;
        self.current_slide = 0;
    }

    /// Forget everything.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

impl fmt::Debug for EducationSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EducationSession")
            .field("slides_len", &self.slides.len())
            .field("current_slide", &self.current_slide)
            .field("questions_len", &self.questions.len())
            .field("current_question", &self.current_question)
            .field("answers", &self.answers)
            .field("refresh_timestamp", &self.refresh_timestamp)
            .field("quiz_id", &self.quiz_id)
            .finish()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::FIXED_TEST_MILLIS;

    fn slides(count: usize) -> Vec<Slide> {
        (0..count)
            .map(|i| Slide::new(format!("Slide {i}"), "Body"))
            .collect()
    }

    fn question(id: u64, correct: usize) -> Question {
        Question::new(
            QuizId::new(id),
            format!("Question {id}"),
            vec!["a".into(), "b".into(), "c".into()],
            correct,
            "Because.",
        )
    }

    #[test]
    fn load_slides_keeps_first_five_and_resets_quiz() {
        let mut session = EducationSession::new();
        session.start_quiz(vec![question(1, 0)]).unwrap();
        session.load_slides(slides(7), 5, FIXED_TEST_MILLIS);

        assert_eq!(session.slides().len(), 5);
        assert_eq!(session.current_slide(), 0);
        assert!(!session.has_quiz());
        assert_eq!(session.quiz_id(), None);
        assert_eq!(session.refresh_timestamp(), FIXED_TEST_MILLIS);
    }

    #[test]
    fn go_to_slide_checks_bounds() {
        let mut session = EducationSession::new();
        assert_eq!(session.go_to_slide(0), Err(SessionStateError::NoSlides));
        session.load_slides(slides(2), 5, 0);
        assert!(session.go_to_slide(1).is_ok());
        assert!(session.is_on_last_slide());
        assert_eq!(
            session.go_to_slide(2),
            Err(SessionStateError::SlideOutOfRange { index: 2, len: 2 })
        );
    }

    #[test]
    fn empty_quiz_is_rejected() {
        let mut session = EducationSession::new();
        assert_eq!(session.start_quiz(Vec::new()), Err(SessionStateError::EmptyQuiz));
    }

    #[test]
    fn answers_are_write_once_and_advance() {
        let mut session = EducationSession::new();
        let quiz_id = session.start_quiz(vec![question(3, 1), question(4, 0)]).unwrap();
        assert_eq!(quiz_id, QuizId::new(3));
        assert_eq!(session.answers(), &[None, None]);

        let first = session.record_answer(1).unwrap();
        assert_eq!(first.index, 0);
        assert!(first.correct);
        assert!(!first.is_complete);
        assert_eq!(session.current_question_index(), 1);

        assert!(matches!(
            session.record_answer(9),
            Err(SessionStateError::InvalidOption { option: 9, .. })
        ));

        let second = session.record_answer(2).unwrap();
        assert!(second.is_complete);
        assert_eq!(session.answers(), &[Some(1), Some(2)]);
        assert_eq!(session.record_answer(0), Err(SessionStateError::QuizComplete));
        assert_eq!(session.score(), 20);
    }

    #[test]
    fn from_snapshot_normalizes_cursors() {
        let snapshot = SessionSnapshot {
            current_slide: 10,
            slides: slides(3),
            current_question: 8,
            questions: vec![question(1, 0), question(2, 0)],
            answers: vec![Some(0)],
            refresh_timestamp: FIXED_TEST_MILLIS,
            quiz_id: None,
            pending_quiz_submission: true,
        };
        let session = EducationSession::from_snapshot(snapshot);
        assert_eq!(session.current_slide(), 2);
        assert_eq!(session.current_question_index(), 2);
        assert_eq!(session.answers(), &[Some(0), None]);
        assert!(session.is_quiz_complete());
        assert_eq!(session.quiz_id(), Some(QuizId::new(1)));
    }

    #[test]
    fn snapshot_round_trips_through_session() {
        let mut session = EducationSession::new();
        session.load_slides(slides(5), 5, FIXED_TEST_MILLIS);
        session.go_to_slide(3).unwrap();
        session.start_quiz(vec![question(5, 2)]).unwrap();
        session.record_answer(2).unwrap();

        let snapshot = session.snapshot(true);
        assert!(snapshot.pending_quiz_submission);
        assert_eq!(snapshot.quiz_id, Some(QuizId::new(5)));
        assert_eq!(EducationSession::from_snapshot(snapshot), session);
    }

    #[test]
    fn finish_quiz_keeps_slides() {
        let mut session = EducationSession::new();
        session.load_slides(slides(5), 5, 0);
        session.go_to_slide(4).unwrap();
        session.start_quiz(vec![question(1, 0)]).unwrap();
        session.record_answer(0).unwrap();

        session.finish_quiz();
        assert_eq!(session.slides().len(), 5);
        assert_eq!(session.current_slide(), 0);
        assert!(!session.has_quiz());
        assert!(session.answers().is_empty());
        assert_eq!(session.current_question_index(), 0);
    }
}
