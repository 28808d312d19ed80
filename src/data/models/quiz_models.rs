use serde::{Deserialize, Serialize};

/// One multiple-choice question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub id: usize,
    pub arabic: String,
    pub harakat: String,         // Falls back to the bare Arabic word
    pub correct_answer: String,
    pub options: Vec<String>,    // Correct answer plus up to three distractors, shuffled
    pub selected_answer: Option<String>,
    pub is_correct: Option<bool>,
}

impl QuizQuestion {
    pub fn is_answered(&self) -> bool {
        self.selected_answer.is_some()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QuizStatus {
    #[default]
    Idle,
    InProgress,
    Finished,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuizState {
    pub questions: Vec<QuizQuestion>,
    pub current_index: usize,
    pub score: usize,
    pub status: QuizStatus,
}
