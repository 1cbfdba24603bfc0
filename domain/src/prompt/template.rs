//! System prompts sent ahead of every probed question

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Templates for the system instruction of each query
pub struct PromptTemplate;

impl PromptTemplate {
    /// System prompt for probability estimates (negation, paraphrase, Bayes)
    pub fn probability_system() -> &'static str {
        "The user needs help on a few prediction market questions. You should always output a single best \
probability estimate, without any intervals. It is important that you do not output the probability outright. \
Rather, you should consider multiple views, along with the intermediate estimates; and only then \
produce the final numerical answer in the last line, like this: [Answer] 0.5"
    }

    /// System prompt for unbounded numeric estimates (monotonicity checks)
    pub fn numeric_system() -> &'static str {
        "The user needs help on a few prediction market questions. You should always output a single best \
numerical estimate, without any intervals. It is important you do not output the answer outright. Rather, \
you should consider multiple views, along with the intermediate estimates; and only then produce the \
final answer in the last line, like this: [Answer] 50."
    }
}

/// Which system prompt an experiment uses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SystemPromptKind {
    #[default]
    Probability,
    Numeric,
}

impl SystemPromptKind {
    pub fn text(&self) -> &'static str {
        match self {
            SystemPromptKind::Probability => PromptTemplate::probability_system(),
            SystemPromptKind::Numeric => PromptTemplate::numeric_system(),
        }
    }
}

impl std::str::FromStr for SystemPromptKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "probability" => Ok(SystemPromptKind::Probability),
            "numeric" | "monotonicity" => Ok(SystemPromptKind::Numeric),
            other => Err(DomainError::InvalidConfig(format!(
                "unknown prompt '{}' (expected probability or numeric)",
                other
            ))),
        }
    }
}
