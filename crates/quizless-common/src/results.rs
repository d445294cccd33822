//! Final ranking of a finished round.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::{GivenAnswer, QuizQuestion};

/// Per-player outcome. Players are ranked server-side by correct answer
/// count, ties broken by lower total answering time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerResult {
    pub name: String,
    pub correct_answers: u32,
    pub total_answering_time: f64,
    #[serde(default)]
    pub answers: Vec<GivenAnswer>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizResults {
    pub quiz_id: String,
    pub quiz_name: String,
    pub started_at: DateTime<Utc>,
    pub players: Vec<PlayerResult>,
}

/// The quiz metadata as shipped alongside results, questions included
/// with their correct answers now revealed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizData {
    pub id: String,
    pub name: String,
    pub questions: Vec<QuizQuestion>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizResultsResponse {
    pub quiz_results: QuizResults,
    pub quiz_data: QuizData,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_results_decode() {
        let json = r#"{
            "quiz_results": {
                "quiz_id": "q1",
                "quiz_name": "Solar System",
                "started_at": "2026-08-29T10:00:10Z",
                "players": [
                    {"name": "Bart", "correct_answers": 2, "total_answering_time": 3.5,
                     "answers": [{"answer": [1], "answer_given_seconds": 1.2}]},
                    {"name": "Alph", "correct_answers": 1, "total_answering_time": 1.1}
                ]
            },
            "quiz_data": {
                "id": "q1",
                "name": "Solar System",
                "questions": [
                    {"question": "Largest planet?", "answers": ["Earth", "Jupiter"],
                     "correct_answers": [1]}
                ]
            }
        }"#;
        let res: QuizResultsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(res.quiz_results.players.len(), 2);
        assert_eq!(res.quiz_results.players[0].name, "Bart");
        assert_eq!(res.quiz_data.questions[0].correct_answers, vec![1]);
    }
}
