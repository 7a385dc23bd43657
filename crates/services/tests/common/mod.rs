#![allow(dead_code)]

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use aware_core::DayZone;
use aware_core::model::{Headline, Question, QuizId, SessionSnapshot, Slide};
use aware_core::time::{FIXED_TEST_MILLIS, fixed_iso};
use services::api::{LatestRefresh, QuizCount, SignedInUser, SubmitQuizResponse, UserStatus};
use services::{ApiError, AwarenessApi, ControllerConfig, EducationController, SessionStore};
use storage::repository::InMemoryStore;

pub const QUIZ_ID: u64 = 42;
pub const SAVED_MESSAGE: &str = "Score saved! Check the leaderboard.";
pub const ANONYMOUS_MESSAGE: &str = "Sign in to save your score for the leaderboard!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitReply {
    Saved,
    NotSaved,
    Fail,
}

/// Scripted content service that counts what it was asked.
pub struct FakeApi {
    pub slides: Mutex<Vec<Slide>>,
    pub quiz: Mutex<Vec<Question>>,
    pub submit_reply: Mutex<SubmitReply>,
    pub submissions: Mutex<Vec<(QuizId, u32)>>,
    pub username: Mutex<Option<String>>,
    pub slide_calls: AtomicU32,
    pub quiz_calls: AtomicU32,
    pub count_posts: AtomicU32,
    pub count: AtomicU64,
}

impl FakeApi {
    pub fn new(slides: Vec<Slide>, quiz: Vec<Question>) -> Self {
        Self {
            slides: Mutex::new(slides),
            quiz: Mutex::new(quiz),
            submit_reply: Mutex::new(SubmitReply::Saved),
            submissions: Mutex::new(Vec::new()),
            username: Mutex::new(None),
            slide_calls: AtomicU32::new(0),
            quiz_calls: AtomicU32::new(0),
            count_posts: AtomicU32::new(0),
            count: AtomicU64::new(10),
        }
    }

    pub fn standard() -> Self {
        Self::new(slides(7), questions(5))
    }

    pub fn reply_with(&self, reply: SubmitReply) {
        *self.submit_reply.lock().unwrap() = reply;
    }

    pub fn submissions(&self) -> Vec<(QuizId, u32)> {
        self.submissions.lock().unwrap().clone()
    }

    pub fn set_slides(&self, slides: Vec<Slide>) {
        *self.slides.lock().unwrap() = slides;
    }

    pub fn set_quiz(&self, quiz: Vec<Question>) {
        *self.quiz.lock().unwrap() = quiz;
    }

    pub fn sign_in(&self, username: &str) {
        *self.username.lock().unwrap() = Some(username.to_string());
    }
}

#[async_trait]
impl AwarenessApi for FakeApi {
    async fn slides(&self) -> Result<Vec<Slide>, ApiError> {
        self.slide_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.slides.lock().unwrap().clone())
    }

    async fn quiz(&self) -> Result<Vec<Question>, ApiError> {
        self.quiz_calls.fetch_add(1, Ordering::SeqCst);
        let quiz = self.quiz.lock().unwrap().clone();
        if quiz.is_empty() {
            return Err(ApiError::EmptyContent("quiz questions"));
        }
        Ok(quiz)
    }

    async fn submit_quiz(
        &self,
        quiz_id: QuizId,
        score: u32,
    ) -> Result<SubmitQuizResponse, ApiError> {
        self.submissions.lock().unwrap().push((quiz_id, score));
        let reply = *self.submit_reply.lock().unwrap();
        match reply {
            SubmitReply::Saved => Ok(SubmitQuizResponse {
                message: SAVED_MESSAGE.to_string(),
                saved: true,
            }),
            SubmitReply::NotSaved => Ok(SubmitQuizResponse {
                message: ANONYMOUS_MESSAGE.to_string(),
                saved: false,
            }),
            SubmitReply::Fail => Err(ApiError::HttpStatus(
                reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            )),
        }
    }

    async fn update_quiz_count(&self) -> Result<QuizCount, ApiError> {
        self.count_posts.fetch_add(1, Ordering::SeqCst);
        let count = self.count.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(QuizCount { count })
    }

    async fn quiz_count(&self) -> Result<QuizCount, ApiError> {
        Ok(QuizCount {
            count: self.count.load(Ordering::SeqCst),
        })
    }

    async fn user_status(&self) -> Result<UserStatus, ApiError> {
        let user = self
            .username
            .lock()
            .unwrap()
            .clone()
            .map(|username| SignedInUser { username });
        Ok(UserStatus { user })
    }

    async fn latest_refresh(&self) -> Result<LatestRefresh, ApiError> {
        Ok(LatestRefresh {
            latest_refresh: Some(fixed_iso()),
            timestamp: (FIXED_TEST_MILLIS / 1000) as f64,
        })
    }
}

/// Slides whose headlines all carry the fixed test timestamp.
pub fn slides(count: usize) -> Vec<Slide> {
    (1..=count)
        .map(|i| {
            Slide::new(format!("Slide {i}"), format!("Point {i}a\nPoint {i}b")).with_headline(
                Headline {
                    title: format!("Headline {i}"),
                    description: "A breach was reported.".into(),
                    link: format!("https://news.example/{i}"),
                    source: "Wire".into(),
                    published_date: Some(fixed_iso()),
                    timestamp: Some(fixed_iso()),
                },
            )
        })
        .collect()
}

/// Questions where option `i % 4` is correct for question `i`.
pub fn questions(count: usize) -> Vec<Question> {
    (0..count)
        .map(|i| {
            Question::new(
                QuizId::new(QUIZ_ID),
                format!("Question {}?", i + 1),
                vec![
                    "A) Click the link".into(),
                    "B) Report it".into(),
                    "C) Reply".into(),
                    "D) Ignore it".into(),
                ],
                i % 4,
                format!("Explanation {}", i + 1),
            )
        })
        .collect()
}

pub fn config() -> ControllerConfig {
    ControllerConfig {
        content_retry_attempts: 2,
        content_retry_delay: Duration::ZERO,
        day_zone: DayZone::utc(),
        ..ControllerConfig::default()
    }
}

pub struct Harness {
    pub api: Arc<FakeApi>,
    pub local: Arc<InMemoryStore>,
    pub store: SessionStore,
}

impl Harness {
    pub fn new(api: FakeApi) -> Self {
        let local = Arc::new(InMemoryStore::new());
        Self {
            api: Arc::new(api),
            store: SessionStore::new(local.clone()),
            local,
        }
    }

    pub fn controller(&self) -> EducationController {
        EducationController::new(self.api.clone(), self.store.clone(), config()).with_seed(7)
    }
}

/// A snapshot built against today's content with the whole quiz answered.
pub fn completed_snapshot(answers: Vec<Option<usize>>, pending: bool) -> SessionSnapshot {
    let questions = questions(answers.len());
    SessionSnapshot {
        current_slide: 4,
        slides: slides(5),
        current_question: questions.len(),
        questions,
        answers,
        refresh_timestamp: FIXED_TEST_MILLIS,
        quiz_id: Some(QuizId::new(QUIZ_ID)),
        pending_quiz_submission: pending,
    }
}
