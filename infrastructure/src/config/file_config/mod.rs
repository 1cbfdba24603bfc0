//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! Conversion into application and domain types collects [`ConfigIssue`]s
//! instead of stopping at the first problem.

mod experiments;
mod issue;
mod retry;
mod run;
mod service;

pub use experiments::FileExperimentConfig;
pub use issue::{ConfigIssue, Severity};
pub use retry::FileRetryConfig;
pub use run::FileRunConfig;
pub use service::FileServiceConfig;

use probe_domain::ExperimentConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Chat completions endpoint settings
    pub service: FileServiceConfig,
    /// Backoff settings for transient failures
    pub retry: FileRetryConfig,
    /// Batch-wide settings
    pub run: FileRunConfig,
    /// Configurations run top to bottom
    pub experiments: Vec<FileExperimentConfig>,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            service: FileServiceConfig::default(),
            retry: FileRetryConfig::default(),
            run: FileRunConfig::default(),
            experiments: ExperimentConfig::default_set()
                .iter()
                .map(FileExperimentConfig::from)
                .collect(),
        }
    }
}

impl FileConfig {
    /// Convert the experiment list, collecting issues.
    ///
    /// Entries with errors are left out of the returned list.
    pub fn parse_experiments(&self) -> (Vec<ExperimentConfig>, Vec<ConfigIssue>) {
        let mut configs = Vec::with_capacity(self.experiments.len());
        let mut issues = Vec::new();

        if self.experiments.is_empty() {
            issues.push(ConfigIssue::error(
                "experiments",
                "no experiments configured",
            ));
        }

        let mut seen = HashSet::new();
        for (index, entry) in self.experiments.iter().enumerate() {
            if !seen.insert(entry.name.as_str()) {
                issues.push(ConfigIssue::error(
                    format!("experiments[{index}].name"),
                    format!(
                        "duplicate name '{}' would overwrite another result file",
                        entry.name
                    ),
                ));
            }

            let (config, entry_issues) = entry.to_experiment(index, self.service.max_tokens);
            issues.extend(entry_issues);
            configs.extend(config);
        }

        (configs, issues)
    }

    /// Render the resolved configuration as TOML
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        issues.extend(self.service.validate());
        issues.extend(self.retry.validate());
        issues.extend(self.run.validate());
        issues.extend(self.parse_experiments().1);
        issues
    }
}
