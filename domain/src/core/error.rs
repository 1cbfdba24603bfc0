//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Unsupported model: {0}")]
    UnsupportedModel(String),

    #[error("No parseable answer for question slot {slot}")]
    InsufficientSamples { slot: usize },

    #[error("{mode} scoring needs {expected} questions, got {actual}")]
    ArityMismatch {
        mode: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{mode} violation is not a finite number for estimates {estimates:?}")]
    NonFiniteViolation {
        mode: &'static str,
        estimates: Vec<f64>,
    },

    #[error("Invalid question item: {0}")]
    InvalidQuestion(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
