//! Question item value object

use crate::core::error::DomainError;
use crate::core::string::preview;
use serde::{Deserialize, Serialize};

/// Number of characters of question text shown in diagnostics
const PREVIEW_CHARS: usize = 50;

/// An ordered tuple of related questions loaded from a dataset (Value Object)
///
/// Pairs hold a question and its negation (or paraphrase). Quadruples hold,
/// in order, `P(A)`, `P(B)`, the `A∧B`-style cross term and its `B∧A`-style
/// counterpart. Identity is the position in the dataset plus the text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionItem {
    index: usize,
    questions: Vec<String>,
}

impl QuestionItem {
    /// Create an item, validating arity and content.
    pub fn new(index: usize, questions: Vec<String>) -> Result<Self, DomainError> {
        if !matches!(questions.len(), 2 | 4) {
            return Err(DomainError::InvalidQuestion(format!(
                "item {} has {} questions, expected 2 or 4",
                index,
                questions.len()
            )));
        }
        if let Some(slot) = questions.iter().position(|q| q.trim().is_empty()) {
            return Err(DomainError::InvalidQuestion(format!(
                "item {} has an empty question in slot {}",
                index, slot
            )));
        }
        Ok(Self { index, questions })
    }

    /// Position of this item in its source dataset
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn questions(&self) -> &[String] {
        &self.questions
    }

    pub fn arity(&self) -> usize {
        self.questions.len()
    }

    /// Truncated first question, for log lines and diagnostics
    pub fn preview(&self) -> String {
        preview(&self.questions[0], PREVIEW_CHARS)
    }
}
