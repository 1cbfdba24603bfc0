//! Median aggregation of repeated samples.

use crate::core::error::DomainError;
use thiserror::Error;

/// Aggregation was asked to summarise an empty sample set
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("cannot aggregate an empty sample set")]
pub struct InsufficientSamples;

/// Statistical median of `values`.
///
/// Even-sized inputs average the two middle values. Empty input is
/// [`InsufficientSamples`]; callers must not score an item without data.
pub fn aggregate(values: &[f64]) -> Result<f64, InsufficientSamples> {
    if values.is_empty() {
        return Err(InsufficientSamples);
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        Ok(sorted[mid])
    } else {
        Ok((sorted[mid - 1] + sorted[mid]) / 2.0)
    }
}

/// Aggregate every slot, reporting the first slot without samples.
pub fn aggregate_slots(slots: &[Vec<f64>]) -> Result<Vec<f64>, DomainError> {
    slots
        .iter()
        .enumerate()
        .map(|(slot, values)| {
            aggregate(values).map_err(|_| DomainError::InsufficientSamples { slot })
        })
        .collect()
}
