//! Quiz content and grading.

use serde::{Deserialize, Serialize};

use crate::error::ContentError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quiz {
    pub question: String,
    pub options: Vec<String>,
    #[serde(rename = "answerIndex", alias = "answer")]
    pub answer_index: usize,
}

impl Quiz {
    pub fn validate(&self, node: &str) -> Result<(), ContentError> {
        if self.options.len() < 2 {
            return Err(ContentError::InvalidQuiz {
                node: node.to_string(),
                reason: format!("needs at least two options, has {}", self.options.len()),
            });
        }
        if self.answer_index >= self.options.len() {
            return Err(ContentError::InvalidQuiz {
                node: node.to_string(),
                reason: format!(
                    "answer index {} out of range for {} options",
                    self.answer_index,
                    self.options.len()
                ),
            });
        }
        Ok(())
    }
}

/// What a node shows when opened.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeContent {
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quiz: Option<Quiz>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizResult {
    pub passed: bool,
    pub score: u8,
}

impl QuizResult {
    pub const MAX_SCORE: u8 = 10;

    fn pass() -> Self {
        Self { passed: true, score: Self::MAX_SCORE }
    }

    fn fail() -> Self {
        Self { passed: false, score: 0 }
    }
}

/// Grade a submission. Exact answer correctness decides.
///
/// Nodes without a quiz (or without content at all) pass on submission.
pub fn grade(content: Option<&NodeContent>, selected: Option<usize>) -> QuizResult {
    match content.and_then(|c| c.quiz.as_ref()) {
        None => QuizResult::pass(),
        Some(quiz) if selected == Some(quiz.answer_index) => QuizResult::pass(),
        Some(_) => QuizResult::fail(),
    }
}
