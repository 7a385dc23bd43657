use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use reqwest::header::RETRY_AFTER;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use aware_core::model::{Question, QuizId, Slide};

use super::retry::{parse_retry_after, with_retry};
use super::{AwarenessApi, LatestRefresh, QuizCount, SubmitQuizResponse, UserStatus};
use crate::config::{ApiConfig, RetryPolicy};
use crate::error::ApiError;

/// reqwest client for the content service. Every call goes through the
/// retry policy.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    retry: RetryPolicy,
}

impl ApiClient {
    #[must_use]
    pub fn new(config: ApiConfig, retry: RetryPolicy) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url,
            retry,
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve an endpoint path against the base URL.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Url` if the path cannot be joined.
    pub fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base_url.join(path)?)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.endpoint(path)?;
        debug!("GET {url}");
        let response = with_retry(&self.retry, || send(self.client.get(url.clone()))).await?;
        decode(response).await
    }

    async fn post_json<B, T>(&self, path: &str, body: Option<&B>) -> Result<T, ApiError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        debug!("POST {url}");
        let response = with_retry(&self.retry, || {
            let request = self.client.post(url.clone());
            let request = match body {
                Some(body) => request.json(body),
                None => request,
            };
            send(request)
        })
        .await?;
        decode(response).await
    }
}

async fn send(request: RequestBuilder) -> Result<Response, ApiError> {
    let response = request.send().await?;
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| parse_retry_after(value, Utc::now()));
        return Err(ApiError::RateLimited { retry_after });
    }
    Err(ApiError::HttpStatus(status))
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|err| ApiError::Decode(err.to_string()))
}

#[derive(Debug, Serialize)]
struct ScoreBody {
    score: u32,
}

#[async_trait]
impl AwarenessApi for ApiClient {
    async fn slides(&self) -> Result<Vec<Slide>, ApiError> {
        self.get_json("api/slides").await
    }

    async fn quiz(&self) -> Result<Vec<Question>, ApiError> {
        let questions: Vec<Question> = self.get_json("api/quiz").await?;
        if questions.is_empty() {
            return Err(ApiError::EmptyContent("quiz questions"));
        }
        Ok(questions)
    }

    async fn submit_quiz(
        &self,
        quiz_id: QuizId,
        score: u32,
    ) -> Result<SubmitQuizResponse, ApiError> {
        self.post_json(&format!("api/submit_quiz/{quiz_id}"), Some(&ScoreBody { score }))
            .await
    }

    async fn update_quiz_count(&self) -> Result<QuizCount, ApiError> {
        self.post_json::<ScoreBody, _>("api/update_quiz_count", None)
            .await
    }

    async fn quiz_count(&self) -> Result<QuizCount, ApiError> {
        self.get_json("api/update_quiz_count").await
    }

    async fn user_status(&self) -> Result<UserStatus, ApiError> {
        self.get_json("api/user_status").await
    }

    async fn latest_refresh(&self) -> Result<LatestRefresh, ApiError> {
        self.get_json("api/latest_refresh").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_join_under_base_path() {
        let config = ApiConfig::new("https://aware.example/app").unwrap();
        let client = ApiClient::new(config, RetryPolicy::default());
        assert_eq!(
            client.endpoint("api/submit_quiz/7").unwrap().as_str(),
            "https://aware.example/app/api/submit_quiz/7"
        );
    }

    #[tokio::test]
    async fn unreachable_service_fails_after_retries() {
        // Port 9 (discard) is closed on test machines; connection is refused.
        let config = ApiConfig::new("http://127.0.0.1:9/").unwrap();
        let client = ApiClient::new(config, RetryPolicy::immediate(2));
        let result = client.slides().await;
        assert!(matches!(result, Err(ApiError::Http(_))));
    }
}
