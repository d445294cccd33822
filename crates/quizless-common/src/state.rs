use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle of a quiz round. Transitions happen server-side only; the
/// client observes them through snapshot responses.
///
/// PENDING -> SCHEDULED -> STARTED -> FINISHED, with EXPIRED reachable
/// from PENDING and SCHEDULED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuizStatus {
    Pending,
    Scheduled,
    Started,
    Finished,
    Expired,
}

impl QuizStatus {
    /// A live round is one the client should keep polling for updates.
    pub fn is_live(self) -> bool {
        matches!(self, Self::Pending | Self::Scheduled | Self::Started)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Player,
    Commander,
}

/// One question of a running round. `correct_answers` is stripped by the
/// server before the question reaches a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    pub answers: Vec<String>,
    #[serde(default)]
    pub correct_answers: Vec<usize>,
}

/// An answer a player already gave, with the time they took.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GivenAnswer {
    pub answer: Vec<usize>,
    pub answer_given_seconds: f64,
}

/// The viewer's own participant record in a round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizUser {
    pub name: String,
    pub user_token: String,
    pub user_role: UserRole,
    #[serde(default)]
    pub answers: Vec<GivenAnswer>,
}

/// Server-owned round state shared by all participants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundState {
    pub id: String,
    pub name: String,
    pub quiz_code: u32,
    pub status: QuizStatus,
    #[serde(default)]
    pub starts_at: Option<DateTime<Utc>>,
    pub expires: DateTime<Utc>,
    #[serde(default)]
    pub question_seconds: Option<u32>,
    /// (current index, total question count), present once the round runs.
    #[serde(default)]
    pub cur_question_index: Option<(usize, usize)>,
    #[serde(default)]
    pub cur_question: Option<QuizQuestion>,
    /// Server hint for how soon the snapshot is worth refreshing.
    #[serde(default)]
    pub updates_in_seconds: Option<u32>,
}

/// Full snapshot of a round from one participant's perspective. Every
/// server response carries a complete snapshot; the client replaces its
/// copy wholesale and never merges fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserQuizState {
    pub state: RoundState,
    pub user: QuizUser,
    pub all_user_names: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot_json() -> &'static str {
        r#"{
            "state": {
                "id": "d729af45-5ed3-42d0-ac57-d4485b64b067",
                "name": "Solar System",
                "quiz_code": 48213,
                "status": "SCHEDULED",
                "starts_at": "2026-08-29T10:00:10Z",
                "expires": "2026-08-29T10:10:00Z",
                "question_seconds": 15,
                "updates_in_seconds": 10
            },
            "user": {
                "name": "Alph",
                "user_token": "b2d5a8e1-3c44-4c2f-9c7a-0f6e2d1b9a33",
                "user_role": "COMMANDER",
                "answers": []
            },
            "all_user_names": ["Alph", "Bart"]
        }"#
    }

    #[test]
    fn test_snapshot_decode() {
        let snap: UserQuizState = serde_json::from_str(snapshot_json()).unwrap();
        assert_eq!(snap.state.quiz_code, 48213);
        assert_eq!(snap.state.status, QuizStatus::Scheduled);
        assert_eq!(snap.user.user_role, UserRole::Commander);
        assert_eq!(snap.all_user_names, vec!["Alph", "Bart"]);
        assert!(snap.state.cur_question.is_none());
    }

    #[test]
    fn test_snapshot_round_trip() {
        let snap: UserQuizState = serde_json::from_str(snapshot_json()).unwrap();
        let text = serde_json::to_string(&snap).unwrap();
        let again: UserQuizState = serde_json::from_str(&text).unwrap();
        assert_eq!(snap, again);
    }

    #[test]
    fn test_unknown_status_is_a_decode_error() {
        let err = serde_json::from_str::<QuizStatus>(r#""CANCELLED""#).unwrap_err();
        assert!(err.to_string().contains("CANCELLED"));
    }

    #[test]
    fn test_status_wire_names_are_uppercase() {
        assert_eq!(
            serde_json::to_string(&QuizStatus::Pending).unwrap(),
            r#""PENDING""#
        );
        assert_eq!(
            serde_json::to_string(&UserRole::Commander).unwrap(),
            r#""COMMANDER""#
        );
    }

    #[test]
    fn test_question_index_is_a_pair() {
        let json = r#"{
            "id": "q1", "name": "Quiz", "quiz_code": 7, "status": "STARTED",
            "expires": "2026-08-29T11:00:00Z",
            "cur_question_index": [1, 2],
            "cur_question": {
                "question": "Which planets have rings?",
                "answers": ["Saturn", "Mars", "Uranus"]
            }
        }"#;
        let state: RoundState = serde_json::from_str(json).unwrap();
        assert_eq!(state.cur_question_index, Some((1, 2)));
        let q = state.cur_question.unwrap();
        assert_eq!(q.answers.len(), 3);
        assert!(q.correct_answers.is_empty());
    }

    #[test]
    fn test_live_statuses() {
        assert!(QuizStatus::Pending.is_live());
        assert!(QuizStatus::Scheduled.is_live());
        assert!(QuizStatus::Started.is_live());
        assert!(!QuizStatus::Finished.is_live());
        assert!(!QuizStatus::Expired.is_live());
    }
}
