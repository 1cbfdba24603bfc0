//! Summary statistics over scored records.

use crate::core::string::preview;
use crate::probe::record::ResultRecord;
use crate::probe::scoring::is_strong;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// A persisted record that carries no usable violation metric
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("'violation_metric' missing or null for: '{preview}'")]
pub struct MissingViolation {
    pub preview: String,
}

/// The two facts a summary needs from one record
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReportEntry {
    pub violation: f64,
    pub strong: bool,
}

impl ReportEntry {
    /// Read an entry from a loosely-typed JSON record.
    ///
    /// A missing `strong` flag falls back to the threshold rule; a missing or
    /// non-numeric `violation_metric` is a [`MissingViolation`].
    pub fn from_value(value: &Value) -> Result<Self, MissingViolation> {
        let Some(violation) = value.get("violation_metric").and_then(Value::as_f64) else {
            let question = value
                .get("questions")
                .and_then(|q| q.get(0))
                .and_then(Value::as_str)
                .unwrap_or("unknown question");
            return Err(MissingViolation {
                preview: preview(question, 50),
            });
        };

        let strong = value
            .get("strong")
            .and_then(Value::as_bool)
            .unwrap_or_else(|| is_strong(violation));

        Ok(Self { violation, strong })
    }
}

impl From<&ResultRecord> for ReportEntry {
    fn from(record: &ResultRecord) -> Self {
        Self {
            violation: record.violation_metric(),
            strong: record.is_strong(),
        }
    }
}

/// Mean violation and share of strong violations over a set of records
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViolationSummary {
    /// Records that contributed to the statistics
    pub evaluated: usize,
    /// Strong violations among them
    pub strong: usize,
    pub mean_violation: f64,
    /// Percentage (0-100) of strong violations
    pub percent_strong: f64,
}

/// Summarise entries; `None` when there is nothing to summarise.
pub fn summarize(entries: impl IntoIterator<Item = ReportEntry>) -> Option<ViolationSummary> {
    let (count, strong, total) = entries
        .into_iter()
        .fold((0usize, 0usize, 0.0f64), |(n, s, sum), e| {
            (n + 1, s + usize::from(e.strong), sum + e.violation)
        });

    if count == 0 {
        return None;
    }

    Some(ViolationSummary {
        evaluated: count,
        strong,
        mean_violation: total / count as f64,
        percent_strong: 100.0 * strong as f64 / count as f64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_summarize() {
        let summary = summarize([
            ReportEntry {
                violation: 0.1,
                strong: false,
            },
            ReportEntry {
                violation: 0.5,
                strong: true,
            },
        ])
        .unwrap();
        assert_eq!(summary.evaluated, 2);
        assert_eq!(summary.strong, 1);
        assert!((summary.mean_violation - 0.3).abs() < 1e-12);
        assert!((summary.percent_strong - 50.0).abs() < 1e-12);
    }

    #[test]
    fn test_summarize_empty() {
        assert_eq!(summarize(Vec::new()), None);
    }

    #[test]
    fn test_entry_from_value() {
        let entry = ReportEntry::from_value(&json!({
            "questions": ["q1", "q2"],
            "violation_metric": 0.35,
            "strong": true
        }))
        .unwrap();
        assert_eq!(
            entry,
            ReportEntry {
                violation: 0.35,
                strong: true
            }
        );
    }

    #[test]
    fn test_entry_strong_falls_back_to_threshold() {
        let entry = ReportEntry::from_value(&json!({ "violation_metric": 0.25 })).unwrap();
        assert!(entry.strong);
    }

    #[test]
    fn test_entry_missing_violation() {
        let err = ReportEntry::from_value(&json!({
            "questions": ["Will the Fed cut rates before the end of the current quarter of this year?"],
            "violation_metric": null
        }))
        .unwrap_err();
        assert_eq!(
            err.preview,
            "Will the Fed cut rates before the end of the curre..."
        );

        let err = ReportEntry::from_value(&json!({})).unwrap_err();
        assert_eq!(err.preview, "unknown question");
    }
}
