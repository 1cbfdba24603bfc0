//! Console output formatter for experiment results

use colored::Colorize;
use probe_application::{BatchEntry, ExperimentOutcome, ReportOutcome};
use probe_domain::ViolationSummary;
use serde_json::json;
use std::path::Path;

/// Formats experiment outcomes and reports for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format every configuration of a batch, then a one-line tally
    pub fn format_batch(entries: &[BatchEntry]) -> String {
        let mut output = String::new();
        output.push_str(&Self::header("Consistency Probe Results"));
        output.push('\n');

        for entry in entries {
            match &entry.result {
                Ok(outcome) => output.push_str(&Self::format_outcome(outcome)),
                Err(e) => {
                    output.push_str(&Self::section_header(&entry.name));
                    output.push_str(&format!("{} {}\n", "Aborted:".red().bold(), e));
                }
            }
        }

        let failed = entries.iter().filter(|e| e.result.is_err()).count();
        output.push_str(&Self::footer());
        output.push_str(&format!(
            "{} experiments run, {} aborted\n",
            entries.len() - failed,
            if failed > 0 {
                failed.to_string().red().to_string()
            } else {
                failed.to_string()
            }
        ));
        output
    }

    /// Format the outcome of one configuration
    pub fn format_outcome(outcome: &ExperimentOutcome) -> String {
        let mut output = Self::section_header(&outcome.name);

        output.push_str(&format!(
            "{} {}   {} {}   {} {}\n",
            "Mode:".cyan().bold(),
            outcome.mode.as_str(),
            "Recorded:".cyan().bold(),
            outcome.records.len(),
            "Skipped:".cyan().bold(),
            outcome.skipped.len()
        ));

        output.push_str(&Self::format_summary(outcome.summary().as_ref()));

        for skipped in &outcome.skipped {
            output.push_str(&format!(
                "  {} item {} '{}': {}\n",
                "x".red(),
                skipped.index,
                skipped.preview,
                skipped.reason.dimmed()
            ));
        }

        if outcome.cancelled {
            output.push_str(&format!(
                "{}\n",
                "Cancelled before all items were run".yellow()
            ));
        }

        match &outcome.saved_to {
            Some(Ok(path)) => output.push_str(&format!(
                "{} {}\n",
                "Saved:".green().bold(),
                path.display()
            )),
            Some(Err(e)) => output.push_str(&format!("{} {}\n", "Not saved:".red().bold(), e)),
            None => output.push_str(&format!(
                "{} no records, existing results left untouched\n",
                "Not saved:".yellow().bold()
            )),
        }

        output
    }

    /// Format the report for one results file
    pub fn format_report(path: &Path, report: &ReportOutcome) -> String {
        let mut output = Self::section_header(&path.display().to_string());
        output.push_str(&Self::format_summary(report.summary.as_ref()));
        if !report.excluded.is_empty() {
            output.push_str(&format!(
                "{} {} records without a violation metric\n",
                "Excluded:".yellow().bold(),
                report.excluded.len()
            ));
        }
        output
    }

    /// Format reports for several files as one JSON document
    pub fn format_reports_json(reports: &[(&Path, &ReportOutcome)]) -> String {
        let files: Vec<_> = reports
            .iter()
            .map(|(path, report)| {
                json!({
                    "file": path.display().to_string(),
                    "summary": report.summary,
                    "excluded": report.excluded.iter().map(|e| e.preview.clone()).collect::<Vec<_>>(),
                })
            })
            .collect();
        serde_json::to_string_pretty(&files).unwrap_or_else(|_| "[]".to_string())
    }

    /// Format the result of `extract`
    pub fn format_extraction(value: Option<f64>) -> String {
        match value {
            Some(v) => v.to_string(),
            None => "no answer found".yellow().to_string(),
        }
    }

    fn format_summary(summary: Option<&ViolationSummary>) -> String {
        let Some(summary) = summary else {
            return format!("{}\n", "No valid data".yellow());
        };

        let percent = format!("{:.2}%", summary.percent_strong);
        format!(
            "{} {:.4}\n{} {} of {} ({})\n",
            "Mean violation:".bold(),
            summary.mean_violation,
            "Strong violations:".bold(),
            summary.strong,
            summary.evaluated,
            if summary.strong > 0 {
                percent.red().to_string()
            } else {
                percent.green().to_string()
            }
        )
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use probe_domain::MissingViolation;
    use std::path::PathBuf;

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn test_report_summary() {
        plain();
        let report = ReportOutcome {
            summary: Some(ViolationSummary {
                evaluated: 4,
                strong: 1,
                mean_violation: 0.125,
                percent_strong: 25.0,
            }),
            excluded: vec![MissingViolation {
                preview: "Will it rain?".into(),
            }],
        };

        let text = ConsoleFormatter::format_report(Path::new("output_a.json"), &report);
        assert!(text.contains("Mean violation: 0.1250"));
        assert!(text.contains("Strong violations: 1 of 4 (25.00%)"));
        assert!(text.contains("Excluded: 1 records"));
    }

    #[test]
    fn test_report_without_data() {
        plain();
        let report = ReportOutcome {
            summary: None,
            excluded: vec![],
        };
        let text = ConsoleFormatter::format_report(Path::new("output_a.json"), &report);
        assert!(text.contains("No valid data"));
    }

    #[test]
    fn test_reports_json() {
        let report = ReportOutcome {
            summary: None,
            excluded: vec![MissingViolation {
                preview: "Q?".into(),
            }],
        };
        let path = PathBuf::from("output_a.json");
        let text = ConsoleFormatter::format_reports_json(&[(path.as_path(), &report)]);
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value[0]["file"], "output_a.json");
        assert!(value[0]["summary"].is_null());
        assert_eq!(value[0]["excluded"][0], "Q?");
    }

    #[test]
    fn test_outcome_without_records() {
        plain();
        let outcome = ExperimentOutcome {
            name: "negated_gpt-4_T-0.0".into(),
            mode: probe_domain::ScoringMode::Negation,
            records: vec![],
            skipped: vec![],
            cancelled: true,
            saved_to: None,
        };
        let text = ConsoleFormatter::format_outcome(&outcome);
        assert!(text.contains("No valid data"));
        assert!(text.contains("Cancelled before all items were run"));
        assert!(text.contains("Not saved: no records, existing results left untouched"));
    }

    #[test]
    fn test_extraction() {
        plain();
        assert_eq!(ConsoleFormatter::format_extraction(Some(0.7)), "0.7");
        assert_eq!(ConsoleFormatter::format_extraction(None), "no answer found");
    }
}
