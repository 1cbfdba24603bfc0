//! Result record: the persisted outcome of scoring one question item.

use crate::core::error::DomainError;
use crate::probe::aggregate::aggregate_slots;
use crate::probe::extraction::extract_answer;
use crate::probe::question::QuestionItem;
use crate::probe::scoring::{Score, ScoringMode};
use serde::{Deserialize, Serialize};

/// Raw answers and extracted values collected for one question slot
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SlotSamples {
    answers: Vec<String>,
    values: Vec<f64>,
}

impl SlotSamples {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a raw answer and keep its extracted value, if any.
    pub fn push(&mut self, answer: impl Into<String>) -> Option<f64> {
        let answer = answer.into();
        let value = extract_answer(&answer);
        if let Some(v) = value {
            self.values.push(v);
        }
        self.answers.push(answer);
        value
    }

    pub fn answers(&self) -> &[String] {
        &self.answers
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

/// Slot samples whose medians have been computed
///
/// Only [`AggregatedSlots::aggregate`] builds this type, so every median is
/// derived from extracted values and no slot is empty.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedSlots {
    slots: Vec<SlotSamples>,
    median: Vec<f64>,
}

impl AggregatedSlots {
    /// Compute the median of every slot.
    ///
    /// Fails with [`DomainError::InsufficientSamples`] naming the first slot
    /// without any extracted value.
    pub fn aggregate(slots: Vec<SlotSamples>) -> Result<Self, DomainError> {
        let values: Vec<Vec<f64>> = slots.iter().map(|s| s.values.clone()).collect();
        let median = aggregate_slots(&values)?;
        Ok(Self { slots, median })
    }

    pub fn median(&self) -> &[f64] {
        &self.median
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Persisted outcome for one question item (Value Object)
///
/// `strong` always equals `violation_metric > STRONG_THRESHOLD` and every
/// median comes from extracted values. Field names match the output
/// artifact format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    questions: Vec<String>,
    answers: Vec<Vec<String>>,
    extracted_results: Vec<Vec<f64>>,
    median: Vec<f64>,
    violation_metric: f64,
    strong: bool,
}

impl ResultRecord {
    /// Score aggregated samples for `item` under `mode`.
    pub fn score(
        item: &QuestionItem,
        mode: ScoringMode,
        aggregated: AggregatedSlots,
    ) -> Result<Self, DomainError> {
        if item.arity() != mode.arity() || aggregated.len() != mode.arity() {
            return Err(DomainError::ArityMismatch {
                mode: mode.as_str(),
                expected: mode.arity(),
                actual: item.arity().min(aggregated.len()),
            });
        }

        let Score { violation, strong } = mode.score(&aggregated.median)?;
        let (answers, extracted_results): (Vec<_>, Vec<_>) = aggregated
            .slots
            .into_iter()
            .map(|slot| (slot.answers, slot.values))
            .unzip();

        Ok(Self {
            questions: item.questions().to_vec(),
            answers,
            extracted_results,
            median: aggregated.median,
            violation_metric: violation,
            strong,
        })
    }

    /// Aggregate then score in one step.
    pub fn from_samples(
        item: &QuestionItem,
        mode: ScoringMode,
        slots: Vec<SlotSamples>,
    ) -> Result<Self, DomainError> {
        Self::score(item, mode, AggregatedSlots::aggregate(slots)?)
    }

    pub fn questions(&self) -> &[String] {
        &self.questions
    }

    pub fn answers(&self) -> &[Vec<String>] {
        &self.answers
    }

    pub fn extracted_results(&self) -> &[Vec<f64>] {
        &self.extracted_results
    }

    pub fn median(&self) -> &[f64] {
        &self.median
    }

    pub fn violation_metric(&self) -> f64 {
        self.violation_metric
    }

    pub fn is_strong(&self) -> bool {
        self.strong
    }
}
