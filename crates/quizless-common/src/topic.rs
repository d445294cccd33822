use serde::{Deserialize, Serialize};

/// A selectable subject a new quiz round can be created about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizTopic {
    pub id: String,
    pub name: String,
}
