//! Report Results use case
//!
//! Reads a persisted results file and summarises mean violation and the share
//! of strong violations. Records without a usable violation metric are
//! reported and left out of both statistics.

use crate::ports::result_store::{ResultStore, StoreError};
use probe_domain::{MissingViolation, ReportEntry, ViolationSummary, summarize};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tracing::warn;

/// Summary plus the records that could not contribute to it
#[derive(Debug, Clone, PartialEq)]
pub struct ReportOutcome {
    /// `None` when no record carried a violation metric
    pub summary: Option<ViolationSummary>,
    pub excluded: Vec<MissingViolation>,
}

/// Summarise loosely-typed records.
pub fn report(records: &[Value]) -> ReportOutcome {
    let mut entries = Vec::with_capacity(records.len());
    let mut excluded = Vec::new();

    for record in records {
        match ReportEntry::from_value(record) {
            Ok(entry) => entries.push(entry),
            Err(missing) => {
                warn!("{}", missing);
                excluded.push(missing);
            }
        }
    }

    ReportOutcome {
        summary: summarize(entries),
        excluded,
    }
}

/// Use case for reporting on a results file
pub struct ReportResults {
    store: Arc<dyn ResultStore>,
}

impl ReportResults {
    pub fn new(store: Arc<dyn ResultStore>) -> Self {
        Self { store }
    }

    pub fn execute(&self, path: &Path) -> Result<ReportOutcome, StoreError> {
        let records = self.store.load_raw(path)?;
        Ok(report(&records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use probe_domain::{QuestionItem, ResultRecord, ScoringMode, SlotSamples};
    use serde_json::json;
    use std::path::PathBuf;
    use std::sync::Mutex;

    #[test]
    fn test_report_excludes_missing_violation() {
        let records = vec![
            json!({"questions": ["Will A happen?", "Will A not happen?"], "violation_metric": 0.1, "strong": false}),
            json!({"questions": ["Will the central bank raise interest rates before the end of next year?"], "violation_metric": null}),
            json!({"questions": ["Will C happen?"], "violation_metric": 0.5}),
        ];

        let outcome = report(&records);
        let summary = outcome.summary.unwrap();
        assert_eq!(summary.evaluated, 2);
        assert_eq!(summary.strong, 1);
        assert!((summary.mean_violation - 0.3).abs() < 1e-9);
        assert!((summary.percent_strong - 50.0).abs() < 1e-9);
        assert_eq!(outcome.excluded.len(), 1);
        assert_eq!(
            outcome.excluded[0].preview,
            "Will the central bank raise interest rates before ..."
        );
    }

    #[test]
    fn test_report_empty_input() {
        let outcome = report(&[]);
        assert!(outcome.summary.is_none());
        assert!(outcome.excluded.is_empty());

        let outcome = report(&[json!({"questions": []})]);
        assert!(outcome.summary.is_none());
        assert_eq!(outcome.excluded[0].preview, "unknown question");
    }

    /// Store that keeps the last saved file as JSON text
    #[derive(Default)]
    struct TextStore {
        text: Mutex<String>,
    }

    impl ResultStore for TextStore {
        fn save(&self, name: &str, records: &[ResultRecord]) -> Result<PathBuf, StoreError> {
            *self.text.lock().unwrap() = serde_json::to_string_pretty(records).unwrap();
            Ok(PathBuf::from(format!("output_{name}.json")))
        }

        fn load_raw(&self, path: &Path) -> Result<Vec<Value>, StoreError> {
            serde_json::from_str(&self.text.lock().unwrap()).map_err(|e| StoreError::Format {
                path: path.to_path_buf(),
                message: e.to_string(),
            })
        }
    }

    fn record(index: usize, m: &str, mn: &str) -> ResultRecord {
        let item = QuestionItem::new(index, vec!["Q?".into(), "Not Q?".into()]).unwrap();
        let mut first = SlotSamples::new();
        first.push(format!("[Answer] {m}"));
        let mut second = SlotSamples::new();
        second.push(format!("[Answer] {mn}"));
        ResultRecord::from_samples(&item, ScoringMode::Negation, vec![first, second]).unwrap()
    }

    #[test]
    fn test_round_trip_matches_in_process_summary() {
        let records = vec![record(0, "0.7", "0.2"), record(1, "0.9", "0.9"), record(2, "0.35", "0.4")];
        let expected = summarize(records.iter().map(ReportEntry::from));

        let store = Arc::new(TextStore::default());
        let path = store.save("negated", &records).unwrap();
        let outcome = ReportResults::new(store).execute(&path).unwrap();

        assert_eq!(outcome.summary, expected);
        assert!(outcome.excluded.is_empty());
    }
}
