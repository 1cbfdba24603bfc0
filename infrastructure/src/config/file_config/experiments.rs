//! Experiment list from TOML (`[[experiments]]` tables)

use super::issue::ConfigIssue;
use probe_domain::{DomainError, ExperimentConfig, Model, ScoringMode, SystemPromptKind};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One raw `[[experiments]]` entry
///
/// Mode and prompt stay strings here so that typos surface as
/// [`ConfigIssue`]s instead of a deserialization failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileExperimentConfig {
    pub name: String,
    /// Dataset path
    pub file: PathBuf,
    pub model: String,
    pub temperature: f32,
    /// Queries per question slot
    pub run: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_size: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl From<&ExperimentConfig> for FileExperimentConfig {
    fn from(config: &ExperimentConfig) -> Self {
        Self {
            name: config.name.clone(),
            file: config.dataset.clone(),
            model: config.model.to_string(),
            temperature: config.temperature,
            run: config.repeats,
            mode: config.mode.map(|m| m.as_str().to_string()),
            sample_size: config.sample_size,
            prompt: None,
            max_tokens: None,
        }
    }
}

impl FileExperimentConfig {
    /// Convert to a domain config, collecting every problem found.
    ///
    /// Returns `None` when any error-level issue was found.
    pub fn to_experiment(
        &self,
        index: usize,
        default_max_tokens: u32,
    ) -> (Option<ExperimentConfig>, Vec<ConfigIssue>) {
        let field = |name: &str| format!("experiments[{index}].{name}");
        let mut issues = Vec::new();

        let Ok(model) = self.model.parse::<Model>();
        let mut config = ExperimentConfig::new(
            self.name.clone(),
            self.file.clone(),
            model,
            self.temperature,
            self.run,
        );
        config.max_tokens = self.max_tokens.unwrap_or(default_max_tokens);
        config.sample_size = self.sample_size;

        if let Some(mode) = &self.mode {
            match mode.parse::<ScoringMode>() {
                Ok(mode) => config.mode = Some(mode),
                Err(e) => issues.push(ConfigIssue::error(field("mode"), e.to_string())),
            }
        }
        if let Some(prompt) = &self.prompt {
            match prompt.parse::<SystemPromptKind>() {
                Ok(prompt) => config.prompt = prompt,
                Err(e) => issues.push(ConfigIssue::error(field("prompt"), e.to_string())),
            }
        }
        match config.validate() {
            Ok(()) => {}
            // The runner rejects the model again and aborts only this experiment
            Err(e @ DomainError::UnsupportedModel(_)) => issues.push(ConfigIssue::warning(
                field("model"),
                format!("{e}; this experiment will be aborted"),
            )),
            Err(e) => issues.push(ConfigIssue::error(field("*"), e.to_string())),
        }
        if config.max_tokens == 0 {
            issues.push(ConfigIssue::error(field("max_tokens"), "cannot be 0"));
        }
        if self.name.contains(['/', '\\']) {
            issues.push(ConfigIssue::error(
                field("name"),
                format!("'{}' is used as a file name and cannot contain path separators", self.name),
            ));
        }

        if ConfigIssue::has_errors(&issues) {
            (None, issues)
        } else {
            (Some(config), issues)
        }
    }
}
