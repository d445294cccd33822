//! Request payloads for the quiz HTTP API.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartQuizRequest {
    pub topic_id: String,
    pub user_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinQuizRequest {
    pub quiz_code: u32,
    pub user_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleQuizRequest {
    pub quiz_code: u32,
    pub user_token: String,
    pub delay_seconds: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckStatusRequest {
    pub quiz_code: u32,
    pub user_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GiveAnswerRequest {
    pub quiz_code: u32,
    pub user_token: String,
    pub question_index: usize,
    pub answer: Vec<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizResultsRequest {
    pub quiz_code: u32,
}
