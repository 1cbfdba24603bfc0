//! Batch run configuration from TOML (`[run]` section)

use super::issue::ConfigIssue;
use probe_application::RunOptions;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw run configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRunConfig {
    /// Directory receiving `output_<name>.json` files
    pub output_dir: PathBuf,
    /// Queries of one item in flight at once
    pub concurrency: usize,
    /// Seed for dataset sampling
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// JSONL transcript of every query
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_log: Option<PathBuf>,
}

impl Default for FileRunConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("results"),
            concurrency: 1,
            seed: None,
            conversation_log: None,
        }
    }
}

impl FileRunConfig {
    pub fn to_options(&self) -> RunOptions {
        RunOptions::default()
            .with_concurrency(self.concurrency)
            .with_seed(self.seed)
    }

    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        if self.concurrency == 0 {
            issues.push(ConfigIssue::warning(
                "run.concurrency",
                "0 is treated as 1 (sequential)",
            ));
        }
        if self.output_dir.as_os_str().is_empty() {
            issues.push(ConfigIssue::error("run.output_dir", "cannot be empty"));
        }
        issues
    }
}
