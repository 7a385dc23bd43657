#![forbid(unsafe_code)]

pub mod api;
pub mod config;
pub mod education;
pub mod error;
pub mod freshness;
pub mod navigation;
pub mod store;
pub mod submission;

pub use api::{ApiClient, AwarenessApi};
pub use config::{ApiConfig, ControllerConfig, RetryPolicy};
pub use education::{EducationController, EducationState, Screen};
pub use error::{ApiError, ConfigError, SessionError};
pub use freshness::FreshnessOracle;
pub use navigation::{Navigation, Route};
pub use store::SessionStore;
pub use submission::{QuizCounter, QuizSubmissionGateway, SubmissionOutcome};
