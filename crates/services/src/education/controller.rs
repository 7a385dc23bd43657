use std::sync::Arc;

use log::{debug, info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;

use aware_core::model::{
    EducationSession, LoginProvider, Question, Section, SessionSnapshot, content_timestamp,
};
use aware_core::presentation::{QuestionView, ResultsView, SlideView, missed_explanations};

use super::screen::{EducationState, Screen};
use crate::api::AwarenessApi;
use crate::config::ControllerConfig;
use crate::error::SessionError;
use crate::freshness::FreshnessOracle;
use crate::navigation::Navigation;
use crate::store::SessionStore;
use crate::submission::{QuizCounter, QuizSubmissionGateway, SIGN_IN_PROMPT};

/// Shown when no slides could be loaded.
pub const NO_SLIDES_MESSAGE: &str = "No slides available yet. Please try again later.";
/// Shown when the quiz could not be loaded.
pub const NO_QUIZ_MESSAGE: &str = "The quiz could not be loaded. Please try again later.";

/// Drives one visitor through slides, quiz and results, persisting the
/// session after every step so it survives reloads and login redirects.
pub struct EducationController {
    api: Arc<dyn AwarenessApi>,
    store: SessionStore,
    oracle: FreshnessOracle,
    gateway: QuizSubmissionGateway,
    counter: QuizCounter,
    navigation: Navigation,
    config: ControllerConfig,
    session: EducationSession,
    state: EducationState,
    question_view: Option<QuestionView>,
    rng: StdRng,
}

impl EducationController {
    #[must_use]
    pub fn new(api: Arc<dyn AwarenessApi>, store: SessionStore, config: ControllerConfig) -> Self {
        Self {
            oracle: FreshnessOracle::new(api.clone()),
            gateway: QuizSubmissionGateway::new(api.clone(), store.clone()),
            counter: QuizCounter::new(api.clone(), store.clone()),
            navigation: Navigation::new(api.clone(), store.clone()),
            api,
            store,
            config,
            session: EducationSession::new(),
            state: EducationState::NoSession,
            question_view: None,
            rng: StdRng::from_os_rng(),
        }
    }

    /// Use a seeded option shuffle.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    #[must_use]
    pub fn state(&self) -> EducationState {
        self.state
    }

    #[must_use]
    pub fn session(&self) -> &EducationSession {
        &self.session
    }

    #[must_use]
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    #[must_use]
    pub fn navigation(&self) -> &Navigation {
        &self.navigation
    }

    #[must_use]
    pub fn counter(&self) -> &QuizCounter {
        &self.counter
    }

    //
    // ─── ENTRY ─────────────────────────────────────────────────────────────────
    //

    /// Resume or start the education flow.
    ///
    /// A pre-login snapshot wins over the regular one. A snapshot built
    /// against content from another calendar day, or when the content version
    /// is unknown, is discarded together with all user state.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the local store fails.
    pub async fn enter(&mut self) -> Result<Screen, SessionError> {
        let candidate = match self.store.take_pre_login().await? {
            Some(snapshot) => {
                debug!("resuming pre-login session");
                Some(snapshot)
            }
            None => self.store.load().await?,
        };
        let content = self.oracle.current_content_timestamp().await;

        let Some(snapshot) = candidate.filter(|snapshot| self.is_current(snapshot, content)) else {
            info!("no current session; starting fresh");
            self.store.clear().await?;
            return self.start_fresh().await;
        };

        let pending = snapshot.pending_quiz_submission;
        self.session = EducationSession::from_snapshot(snapshot);
        self.question_view = None;

        if pending && self.session.is_quiz_complete() && !self.store.is_submitted().await? {
            info!("submitting score of a pending attempt");
            self.state = EducationState::PendingSubmission;
            let score = self.session.score();
            self.gateway.submit_once(self.session.quiz_id(), score).await?;
            return self.show_results(false, false).await;
        }
        if self.session.is_quiz_complete() {
            return self.show_results(false, true).await;
        }
        if self.session.has_quiz() {
            return self.show_question().await;
        }
        if self.session.has_slides() {
            return self.show_slide().await;
        }
        self.start_fresh().await
    }

    fn is_current(&self, snapshot: &SessionSnapshot, content: i64) -> bool {
        if content == 0 {
            warn!("content version unknown; discarding saved session");
            return false;
        }
        let current = self
            .config
            .day_zone
            .same_day(snapshot.refresh_timestamp, content);
        if !current {
            info!(
                "saved session from {} is stale against content {}",
                snapshot.refresh_timestamp, content
            );
        }
        current
    }

    /// Fetch the slides and start over at the first one.
    ///
    /// Empty or failed loads are retried; when every load fails the screen
    /// is `Screen::Unavailable`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the local store fails.
    pub async fn start_fresh(&mut self) -> Result<Screen, SessionError> {
        self.session.clear();
        self.question_view = None;
        self.state = EducationState::NoSession;

        let attempts = self.config.content_retry_attempts.max(1);
        for attempt in 1..=attempts {
            match self.api.slides().await {
                Ok(slides) if !slides.is_empty() => {
                    let refresh_timestamp = content_timestamp(&slides);
                    self.session
                        .load_slides(slides, self.config.slide_limit, refresh_timestamp);
                    info!("loaded {} slides", self.session.slides().len());
                    return self.show_slide().await;
                }
                Ok(_) => warn!("no slides available (load {attempt}/{attempts})"),
                Err(err) => warn!("slides load {attempt}/{attempts} failed: {err}"),
            }
            if attempt < attempts {
                tokio::time::sleep(self.config.content_retry_delay).await;
            }
        }
        Ok(Screen::Unavailable {
            message: NO_SLIDES_MESSAGE.to_string(),
        })
    }

    //
    // ─── SLIDES ────────────────────────────────────────────────────────────────
    //

    /// Advance one slide; past the last slide the quiz starts.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::WrongScreen` outside the slides, or a storage
    /// error.
    pub async fn next_slide(&mut self) -> Result<Screen, SessionError> {
        self.expect_state(EducationState::Slides)?;
        if self.session.is_on_last_slide() {
            return self.start_quiz().await;
        }
        let next = self.session.current_slide() + 1;
        self.session.go_to_slide(next)?;
        self.show_slide().await
    }

    /// Go back one slide; on the first slide the view stays put.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::WrongScreen` outside the slides, or a storage
    /// error.
    pub async fn previous_slide(&mut self) -> Result<Screen, SessionError> {
        self.expect_state(EducationState::Slides)?;
        let previous = self.session.current_slide().saturating_sub(1);
        self.session.go_to_slide(previous)?;
        self.show_slide().await
    }

    /// Hide the welcome banner for good.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the local store fails.
    pub async fn dismiss_welcome(&mut self) -> Result<Option<Screen>, SessionError> {
        self.store.dismiss_welcome().await?;
        if self.state == EducationState::Slides {
            return self.show_slide().await.map(Some);
        }
        Ok(None)
    }

    async fn show_slide(&mut self) -> Result<Screen, SessionError> {
        self.state = EducationState::Slides;
        self.persist().await?;
        let welcome_dismissed = self.store.is_welcome_dismissed().await?;
        let view = SlideView::build(
            self.session.slides(),
            self.session.current_slide(),
            welcome_dismissed,
            self.config.day_zone,
        )
        .ok_or(SessionError::NoSession)?;
        Ok(Screen::Slide(view))
    }

    //
    // ─── QUIZ ──────────────────────────────────────────────────────────────────
    //

    /// Fetch the quiz and show its first question.
    ///
    /// Loads that fail or return nothing usable are retried; when every load
    /// fails the visitor stays on the slides and gets `Screen::Unavailable`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoSession` without slides, or a storage error.
    pub async fn start_quiz(&mut self) -> Result<Screen, SessionError> {
        if !self.session.has_slides() {
            return Err(SessionError::NoSession);
        }
        let attempts = self.config.content_retry_attempts.max(1);
        for attempt in 1..=attempts {
            match self.api.quiz().await {
                Ok(questions) => match self.begin_quiz(questions).await {
                    Ok(screen) => return Ok(screen),
                    Err(SessionError::State(err)) => {
                        warn!("quiz load {attempt}/{attempts} unusable: {err}");
                    }
                    Err(err) => return Err(err),
                },
                Err(err) => warn!("quiz load {attempt}/{attempts} failed: {err}"),
            }
            if attempt < attempts {
                tokio::time::sleep(self.config.content_retry_delay).await;
            }
        }
        Ok(Screen::Unavailable {
            message: NO_QUIZ_MESSAGE.to_string(),
        })
    }

    async fn begin_quiz(&mut self, questions: Vec<Question>) -> Result<Screen, SessionError> {
        let quiz_id = self.session.start_quiz(questions)?;
        self.store.reset_attempt_markers().await?;
        info!(
            "started quiz {quiz_id} with {} questions",
            self.session.questions().len()
        );
        self.show_question().await
    }

    /// Record the answer given as the option's index in the served order.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::WrongScreen` outside the quiz,
    /// `SessionError::State` for an invalid option, or a storage error.
    pub async fn answer(&mut self, original_index: usize) -> Result<Screen, SessionError> {
        self.expect_state(EducationState::Quiz)?;
        let recorded = self.session.record_answer(original_index)?;
        self.question_view = None;
        debug!(
            "question {} answered with option {} ({})",
            recorded.index + 1,
            recorded.option,
            if recorded.correct { "correct" } else { "incorrect" }
        );
        if recorded.is_complete {
            return self.show_results(true, true).await;
        }
        self.show_question().await
    }

    /// Record the answer picked by its on-screen label (`A`, `B`, ...).
    ///
    /// # Errors
    ///
    /// Returns `SessionError::UnknownOption` when no displayed option carries
    /// `label`, plus the errors of `answer`.
    pub async fn answer_label(&mut self, label: char) -> Result<Screen, SessionError> {
        self.expect_state(EducationState::Quiz)?;
        let original_index = self
            .question_view
            .as_ref()
            .and_then(|view| view.option_by_label(label))
            .map(|option| option.original_index)
            .ok_or_else(|| SessionError::UnknownOption(label.to_string()))?;
        self.answer(original_index).await
    }

    /// The question currently on screen, if any.
    #[must_use]
    pub fn question_view(&self) -> Option<&QuestionView> {
        self.question_view.as_ref()
    }

    async fn show_question(&mut self) -> Result<Screen, SessionError> {
        self.state = EducationState::Quiz;
        self.persist().await?;
        let view = QuestionView::arrange(
            self.session.questions(),
            self.session.current_question_index(),
            &mut self.rng,
        )
        .ok_or(SessionError::NoSession)?;
        self.question_view = Some(view.clone());
        Ok(Screen::Question(view))
    }

    //
    // ─── RESULTS ───────────────────────────────────────────────────────────────
    //

    async fn show_results(
        &mut self,
        bump_counter: bool,
        submit: bool,
    ) -> Result<Screen, SessionError> {
        self.question_view = None;
        let score = self.session.score();
        let message = if submit {
            let outcome = self.gateway.submit_once(self.session.quiz_id(), score).await?;
            outcome.message().to_string()
        } else {
            self.store
                .submission_message()
                .await?
                .unwrap_or_else(|| SIGN_IN_PROMPT.to_string())
        };
        let quiz_count = if bump_counter {
            self.counter.update_once().await?
        } else {
            None
        };

        self.state = EducationState::Results;
        self.persist().await?;
        self.store.set_current_section(Section::Results).await?;
        info!("quiz finished with score {score}");

        Ok(Screen::Results(ResultsView {
            outcome: self.config.score_policy.classify(score),
            explanations: missed_explanations(self.session.questions(), self.session.answers()),
            message,
            quiz_count,
        }))
    }

    /// Leave the results: forget the quiz, keep the slides and return to the
    /// first one.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::WrongScreen` outside the results, or a storage
    /// error.
    pub async fn continue_after_results(&mut self) -> Result<Screen, SessionError> {
        self.expect_state(EducationState::Results)?;
        self.session.finish_quiz();
        self.store.clear_attempt().await?;
        self.store.set_current_section(Section::Home).await?;
        self.show_slide().await
    }

    //
    // ─── LEAVING ───────────────────────────────────────────────────────────────
    //

    /// Save the session when the visitor switches to another section.
    ///
    /// A completed quiz is flagged for submission on the next entry.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the local store fails.
    pub async fn suspend(&mut self) -> Result<(), SessionError> {
        if self.state == EducationState::NoSession {
            return Ok(());
        }
        let pending = self.session.is_quiz_complete();
        let snapshot = self.session.snapshot(pending);
        self.store.save(&snapshot).await?;
        debug!("suspended session in state {}", self.state);
        Ok(())
    }

    /// Save the session for the trip through `provider`'s login and return
    /// the login path.
    ///
    /// A finished quiz whose score is not yet recorded is flagged pending,
    /// so the restored session submits it. An unfinished quiz resumes at its
    /// current question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the local store fails.
    pub async fn prepare_login(&mut self, provider: LoginProvider) -> Result<String, SessionError> {
        let pending = self.session.is_quiz_complete() && !self.store.is_submitted().await?;
        self.store
            .save_pre_login(&self.session.snapshot(pending))
            .await?;
        let path = self.navigation.login_path(provider).await?;
        info!("handing off to {} login", provider.as_str());
        Ok(path)
    }

    /// Drop the session and every user marker.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the local store fails.
    pub async fn logout(&mut self) -> Result<(), SessionError> {
        self.store.clear().await?;
        self.session.clear();
        self.question_view = None;
        self.state = EducationState::NoSession;
        info!("logged out; user state cleared");
        Ok(())
    }

    fn expect_state(&self, expected: EducationState) -> Result<(), SessionError> {
        if self.state == EducationState::NoSession {
            return Err(SessionError::NoSession);
        }
        if self.state != expected {
            return Err(SessionError::WrongScreen);
        }
        Ok(())
    }

    async fn persist(&self) -> Result<(), SessionError> {
        self.store.save(&self.session.snapshot(false)).await?;
        Ok(())
    }
}
