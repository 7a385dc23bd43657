use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Utc};
use log::warn;

use crate::config::RetryPolicy;
use crate::error::ApiError;

/// Run `op` until it succeeds, fails with a non-retryable error, or the
/// policy's attempts are spent. The last error is returned.
///
/// Between attempts the task sleeps `base_delay * attempt`, or the
/// server's `Retry-After` (capped by the policy) after a 429.
///
/// # Errors
///
/// Returns the error of the final attempt.
pub async fn with_retry<T, F, Fut>(policy: &RetryPolicy, mut op: F) -> Result<T, ApiError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if !err.is_retryable() || attempt >= max_attempts => return Err(err),
            Err(err) => {
                let delay = err
                    .retry_after()
                    .map(|wait| wait.min(policy.max_retry_after))
                    .unwrap_or_else(|| policy.delay_for(attempt));
                warn!("attempt {attempt}/{max_attempts} failed: {err}; retrying in {delay:?}");
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

/// Parse a `Retry-After` header value: delta-seconds or an HTTP date.
///
/// Dates in the past yield a zero wait.
#[must_use]
pub fn parse_retry_after(value: &str, now: DateTime<Utc>) -> Option<Duration> {
    let value = value.trim();
    if let Ok(seconds) = value.parse::<u64>() {
        return Some(Duration::from_secs(seconds));
    }
    let at = DateTime::parse_from_rfc2822(value).ok()?;
    let wait = at.with_timezone(&Utc) - now;
    Some(wait.to_std().unwrap_or(Duration::ZERO))
}
