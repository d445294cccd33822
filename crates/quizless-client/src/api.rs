//! HTTP client for the quiz backend. Every method issues one request
//! and resolves exactly once; there is no retry, timeout or backoff, a
//! failed attempt is terminal for that user action.

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use quizless_common::requests::{
    CheckStatusRequest, GiveAnswerRequest, JoinQuizRequest, QuizResultsRequest,
    ScheduleQuizRequest, StartQuizRequest,
};
use quizless_common::results::QuizResultsResponse;
use quizless_common::state::UserQuizState;
use quizless_common::topic::QuizTopic;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8055/api";

/// Delay requested when the commander starts a quiz.
pub const SCHEDULE_DELAY_SECONDS: u32 = 10;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("server responded {status}")]
    Server {
        status: StatusCode,
        detail: Option<String>,
    },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// What the user gets shown: the server's `detail` verbatim when it
    /// sent one, a generic line otherwise (the raw cause goes to the log).
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Server {
                detail: Some(detail),
                ..
            } => detail.clone(),
            _ => "Generic error occurred, please check the log".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<String>,
}

/// Split success from failure the way the backend frames it: any 2xx
/// body decodes as `T`, anything else decodes as an error body whose
/// `detail` field is meant for the user.
fn decode_response<T: DeserializeOwned>(status: StatusCode, body: &[u8]) -> Result<T, ApiError> {
    if status.is_success() {
        return Ok(serde_json::from_slice(body)?);
    }
    let detail = serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.detail);
    if detail.is_none() {
        tracing::warn!(%status, body = %String::from_utf8_lossy(body), "undecodable error response");
    }
    Err(ApiError::Server { status, detail })
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint)
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        let url = self.url(endpoint);
        tracing::debug!(%url, "GET");
        let response = self.http.get(&url).send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        decode_response(status, &body)
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.url(endpoint);
        tracing::debug!(%url, "POST");
        let response = self.http.post(&url).json(body).send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;
        decode_response(status, &bytes)
    }

    pub async fn quiz_topics(&self) -> Result<Vec<QuizTopic>, ApiError> {
        self.get("quiz-topics").await
    }

    pub async fn start_quiz(
        &self,
        topic_id: &str,
        user_name: &str,
    ) -> Result<UserQuizState, ApiError> {
        let req = StartQuizRequest {
            topic_id: topic_id.to_string(),
            user_name: user_name.to_string(),
        };
        self.post("quiz-start", &req).await
    }

    pub async fn join_quiz(
        &self,
        quiz_code: u32,
        user_name: &str,
    ) -> Result<UserQuizState, ApiError> {
        let req = JoinQuizRequest {
            quiz_code,
            user_name: user_name.to_string(),
        };
        self.post("quiz-join", &req).await
    }

    pub async fn schedule_quiz(
        &self,
        quiz_code: u32,
        user_token: &str,
        delay_seconds: u32,
    ) -> Result<UserQuizState, ApiError> {
        let req = ScheduleQuizRequest {
            quiz_code,
            user_token: user_token.to_string(),
            delay_seconds,
        };
        self.post("quiz-schedule", &req).await
    }

    pub async fn check_status(
        &self,
        quiz_code: u32,
        user_token: &str,
    ) -> Result<UserQuizState, ApiError> {
        let req = CheckStatusRequest {
            quiz_code,
            user_token: user_token.to_string(),
        };
        self.post("quiz-check-status", &req).await
    }

    pub async fn give_answer(
        &self,
        quiz_code: u32,
        user_token: &str,
        question_index: usize,
        answer: Vec<usize>,
    ) -> Result<UserQuizState, ApiError> {
        let req = GiveAnswerRequest {
            quiz_code,
            user_token: user_token.to_string(),
            question_index,
            answer,
        };
        self.post("quiz-answer", &req).await
    }

    pub async fn quiz_results(&self, quiz_code: u32) -> Result<QuizResultsResponse, ApiError> {
        let req = QuizResultsRequest { quiz_code };
        self.post("quiz-results", &req).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = ApiClient::new("http://localhost:8055/api/");
        assert_eq!(
            client.url("quiz-topics"),
            "http://localhost:8055/api/quiz-topics"
        );
    }

    #[test]
    fn test_success_body_decodes() {
        let topics: Vec<QuizTopic> = decode_response(
            StatusCode::OK,
            br#"[{"id": "a", "name": "Solar System"}]"#,
        )
        .unwrap();
        assert_eq!(topics.len(), 1);
    }

    #[test]
    fn test_error_detail_is_surfaced_verbatim() {
        let err = decode_response::<Vec<QuizTopic>>(
            StatusCode::NOT_FOUND,
            br#"{"detail": "quiz not found"}"#,
        )
        .unwrap_err();
        assert_eq!(err.user_message(), "quiz not found");
    }

    #[test]
    fn test_error_without_detail_gets_generic_message() {
        let err =
            decode_response::<Vec<QuizTopic>>(StatusCode::INTERNAL_SERVER_ERROR, b"boom")
                .unwrap_err();
        assert_eq!(
            err.user_message(),
            "Generic error occurred, please check the log"
        );
    }

    #[test]
    fn test_malformed_success_body_is_a_decode_error() {
        let err = decode_response::<Vec<QuizTopic>>(StatusCode::OK, b"{not json").unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }
}
