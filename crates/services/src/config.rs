use std::env;
use std::time::Duration;

use aware_core::{DayZone, ScorePolicy};
use url::Url;

use crate::error::ConfigError;

/// Environment variable naming the content service base URL.
pub const BASE_URL_ENV: &str = "AWARE_API_BASE_URL";
/// Base URL used when nothing is configured.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000/";

/// Where the content service lives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: Url,
}

impl ApiConfig {
    /// Parse and normalize a base URL so relative endpoints join under it.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the value is not an absolute http(s)-style URL.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        let trimmed = base_url.trim();
        let mut url = Url::parse(trimmed).map_err(|source| ConfigError::BaseUrl {
            value: trimmed.to_string(),
            source,
        })?;
        if url.cannot_be_a_base() {
            return Err(ConfigError::CannotBeBase(trimmed.to_string()));
        }
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(Self { base_url: url })
    }

    /// Read `AWARE_API_BASE_URL`, falling back to the local default.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the variable holds an invalid URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw = env::var(BASE_URL_ENV)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.into());
        Self::new(&raw)
    }
}

/// Bounded retry with linear backoff: attempt `n` waits `base_delay * n`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    /// Upper bound on a server-provided `Retry-After`.
    pub max_retry_after: Duration,
}

impl RetryPolicy {
    #[must_use]
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
            ..Self::default()
        }
    }

    /// Retry without waiting. Used by tests and offline tooling.
    #[must_use]
    pub fn immediate(max_attempts: u32) -> Self {
        Self::new(max_attempts, Duration::ZERO)
    }

    /// Delay after failed attempt number `attempt` (1-based).
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(2),
            max_retry_after: Duration::from_secs(60),
        }
    }
}

/// Tuning for `EducationController`.
#[derive(Clone, Debug)]
pub struct ControllerConfig {
    /// Slides kept from the served deck.
    pub slide_limit: usize,
    /// Loads of empty slides or quiz before giving up.
    pub content_retry_attempts: u32,
    /// Wait between those loads.
    pub content_retry_delay: Duration,
    pub score_policy: ScorePolicy,
    pub day_zone: DayZone,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            slide_limit: 5,
            content_retry_attempts: 3,
            content_retry_delay: Duration::from_secs(5),
            score_policy: ScorePolicy::default(),
            day_zone: DayZone::Local,
        }
    }
}
