//! Domain layer for consistency-probe
//!
//! This crate contains the pure logic of the consistency probe: question
//! items, answer extraction, median aggregation, violation scoring and the
//! persisted result record. It has no I/O and no async code.
//!
//! # Core Concepts
//!
//! ## Violation metric
//!
//! A model is asked several logically related questions (a question and its
//! negation, or the four questions of a Bayes cross-check). Each answer is a
//! probability; the violation metric measures how far the aggregated answers
//! stray from the identity that should hold between them.
//!
//! - **Negation**: `P(A) + P(not A) = 1`
//! - **Bayes**: `P(A,B) = P(A)·P(B|A) = P(B)·P(A|B)`
//! - **Paraphrase**: `P(A) = P(A')`
//!
//! A violation above [`STRONG_THRESHOLD`] is a *strong* violation.

pub mod core;
pub mod experiment;
pub mod probe;
pub mod prompt;

// Re-export commonly used types
pub use core::{error::DomainError, model::Model, string::preview};
pub use experiment::{
    config::{ExperimentConfig, default_sample_size},
    item_phase::ItemPhase,
};
pub use probe::{
    aggregate::{InsufficientSamples, aggregate, aggregate_slots},
    extraction::{ANSWER_MARKER, extract_answer},
    question::QuestionItem,
    record::{AggregatedSlots, ResultRecord, SlotSamples},
    report::{MissingViolation, ReportEntry, ViolationSummary, summarize},
    scoring::{STRONG_THRESHOLD, Score, ScoringMode, is_strong},
};
pub use prompt::{PromptTemplate, SystemPromptKind};
