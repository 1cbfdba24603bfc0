//! Violation scoring.
//!
//! Each [`ScoringMode`] encodes one logical identity between aggregated
//! probability estimates and measures how far the estimates deviate from it.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Violations strictly above this value are strong violations
pub const STRONG_THRESHOLD: f64 = 0.2;

/// Whether a violation metric counts as a strong violation
pub fn is_strong(violation: f64) -> bool {
    violation > STRONG_THRESHOLD
}

/// Logical identity checked for a question item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoringMode {
    /// `P(A) + P(not A) = 1` over `[m, mn]`
    Negation,
    /// `P(A,B)` estimated both ways over `[ma, mb, mab, mba]`
    Bayes,
    /// `P(A) = P(A')` over `[m, mp]`
    Paraphrase,
}

impl ScoringMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScoringMode::Negation => "negation",
            ScoringMode::Bayes => "bayes",
            ScoringMode::Paraphrase => "paraphrase",
        }
    }

    /// Number of question slots this mode scores
    pub fn arity(&self) -> usize {
        match self {
            ScoringMode::Negation | ScoringMode::Paraphrase => 2,
            ScoringMode::Bayes => 4,
        }
    }

    /// Default mode for a dataset of the given arity.
    ///
    /// Two-question items are negation pairs unless configured otherwise.
    pub fn from_arity(arity: usize) -> Option<Self> {
        match arity {
            2 => Some(ScoringMode::Negation),
            4 => Some(ScoringMode::Bayes),
            _ => None,
        }
    }

    /// Violation metric for per-slot aggregated estimates.
    pub fn violation(&self, estimates: &[f64]) -> Result<f64, DomainError> {
        if estimates.len() != self.arity() {
            return Err(DomainError::ArityMismatch {
                mode: self.as_str(),
                expected: self.arity(),
                actual: estimates.len(),
            });
        }

        let violation = match *self {
            ScoringMode::Negation => {
                let (m, mn) = (estimates[0], estimates[1]);
                (m + mn - 1.0).abs()
            }
            ScoringMode::Bayes => {
                let (ma, mb, mab, mba) = (estimates[0], estimates[1], estimates[2], estimates[3]);
                (mab * mb - mba * ma).abs().sqrt()
            }
            ScoringMode::Paraphrase => (estimates[0] - estimates[1]).abs(),
        };

        // Huge but finite answers can overflow to inf or NaN
        if !violation.is_finite() {
            return Err(DomainError::NonFiniteViolation {
                mode: self.as_str(),
                estimates: estimates.to_vec(),
            });
        }
        Ok(violation)
    }

    /// Violation metric together with its strong flag.
    pub fn score(&self, estimates: &[f64]) -> Result<Score, DomainError> {
        self.violation(estimates).map(Score::new)
    }
}

impl std::fmt::Display for ScoringMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ScoringMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "negation" | "negated" => Ok(ScoringMode::Negation),
            "bayes" => Ok(ScoringMode::Bayes),
            "paraphrase" => Ok(ScoringMode::Paraphrase),
            other => Err(DomainError::InvalidConfig(format!(
                "unknown scoring mode '{}' (expected negation, bayes or paraphrase)",
                other
            ))),
        }
    }
}

/// A violation metric and its derived strong flag
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Score {
    pub violation: f64,
    pub strong: bool,
}

impl Score {
    pub fn new(violation: f64) -> Self {
        Self {
            violation,
            strong: is_strong(violation),
        }
    }
}
