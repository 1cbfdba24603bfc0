//! Experiment configuration (Value Object)

use crate::core::error::DomainError;
use crate::core::model::Model;
use crate::probe::scoring::ScoringMode;
use crate::prompt::SystemPromptKind;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Items drawn from a 4-question (Bayes) dataset
const BAYES_SAMPLE_SIZE: usize = 35;
/// Items drawn from a 2-question dataset
const PAIR_SAMPLE_SIZE: usize = 66;
/// Default completion budget per query
const DEFAULT_MAX_TOKENS: u32 = 200;

/// Number of items sampled from a dataset whose items have `arity` questions
pub fn default_sample_size(arity: usize) -> usize {
    if arity >= 4 {
        BAYES_SAMPLE_SIZE
    } else {
        PAIR_SAMPLE_SIZE
    }
}

/// One entry of the experiment list: a dataset probed against one model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentConfig {
    /// Output name, used for the result file `output_<name>.json`
    pub name: String,
    /// Path to the question dataset
    #[serde(rename = "file")]
    pub dataset: PathBuf,
    pub model: Model,
    pub temperature: f32,
    /// Queries per question slot
    #[serde(rename = "run")]
    pub repeats: u32,
    /// Scoring mode; inferred from dataset arity when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<ScoringMode>,
    /// Items drawn from the dataset; arity-based default when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_size: Option<usize>,
    #[serde(default)]
    pub prompt: SystemPromptKind,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_max_tokens() -> u32 {
    DEFAULT_MAX_TOKENS
}

impl ExperimentConfig {
    pub fn new(
        name: impl Into<String>,
        dataset: impl Into<PathBuf>,
        model: Model,
        temperature: f32,
        repeats: u32,
    ) -> Self {
        Self {
            name: name.into(),
            dataset: dataset.into(),
            model,
            temperature,
            repeats,
            mode: None,
            sample_size: None,
            prompt: SystemPromptKind::default(),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    pub fn with_mode(mut self, mode: ScoringMode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn with_sample_size(mut self, size: usize) -> Self {
        self.sample_size = Some(size);
        self
    }

    /// Scoring mode for a dataset whose items have `arity` questions.
    pub fn resolve_mode(&self, arity: usize) -> Result<ScoringMode, DomainError> {
        let mode = match self.mode {
            Some(mode) => mode,
            None => ScoringMode::from_arity(arity).ok_or_else(|| {
                DomainError::InvalidConfig(format!(
                    "no scoring mode for items with {} questions",
                    arity
                ))
            })?,
        };
        if mode.arity() != arity {
            return Err(DomainError::ArityMismatch {
                mode: mode.as_str(),
                expected: mode.arity(),
                actual: arity,
            });
        }
        Ok(mode)
    }

    /// Number of items to draw from a dataset of `arity`-question items
    pub fn resolve_sample_size(&self, arity: usize) -> usize {
        self.sample_size
            .unwrap_or_else(|| default_sample_size(arity))
    }

    /// Validate values that do not depend on the dataset contents
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::InvalidConfig(
                "experiment name must not be empty".to_string(),
            ));
        }
        if self.repeats == 0 {
            return Err(DomainError::InvalidConfig(format!(
                "{}: repeat count must be at least 1",
                self.name
            )));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(DomainError::InvalidConfig(format!(
                "{}: temperature {} is outside [0, 2]",
                self.name, self.temperature
            )));
        }
        if self.sample_size == Some(0) {
            return Err(DomainError::InvalidConfig(format!(
                "{}: sample size must be at least 1",
                self.name
            )));
        }
        if !self.model.is_supported() {
            return Err(DomainError::UnsupportedModel(self.model.to_string()));
        }
        Ok(())
    }

    /// The Bayes runs of the published experiment: two models, two temperatures
    pub fn default_set() -> Vec<ExperimentConfig> {
        let dataset = |model: &str, t: &str, times: u32| {
            format!("data/bayes_{model}_method_1shot_china_T_{t}_times_{times}_mt_400.json")
        };
        vec![
            ExperimentConfig::new(
                "bayes_gpt-3.5_T-0.0",
                dataset("gpt-3.5-turbo-0301", "0.0", 3),
                Model::Gpt35Turbo,
                0.0,
                3,
            ),
            ExperimentConfig::new(
                "bayes_gpt-3.5_T-0.5",
                dataset("gpt-3.5-turbo-0301", "0.5", 6),
                Model::Gpt35Turbo,
                0.5,
                6,
            ),
            ExperimentConfig::new(
                "bayes_gpt-4_T-0.0",
                dataset("gpt-4-0314", "0.0", 3),
                Model::Gpt4,
                0.0,
                3,
            ),
            ExperimentConfig::new(
                "bayes_gpt-4_T-0.5",
                dataset("gpt-4-0314", "0.5", 6),
                Model::Gpt4,
                0.5,
                6,
            ),
        ]
    }
}
