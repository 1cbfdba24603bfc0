//! Chat service configuration from TOML (`[service]` section)

use super::issue::ConfigIssue;
use crate::openrouter::DEFAULT_BASE_URL;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw service configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileServiceConfig {
    /// Endpoint root; `/chat/completions` is appended
    pub base_url: String,
    /// Name of the environment variable holding the API key
    pub api_key_env: String,
    /// Per-request HTTP timeout
    pub timeout_seconds: u64,
    /// Completion budget for experiments that do not set their own
    pub max_tokens: u32,
}

impl Default for FileServiceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            timeout_seconds: 120,
            max_tokens: 200,
        }
    }
}

impl FileServiceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        if self.timeout_seconds == 0 {
            issues.push(ConfigIssue::error(
                "service.timeout_seconds",
                "timeout cannot be 0",
            ));
        }
        if self.api_key_env.trim().is_empty() {
            issues.push(ConfigIssue::error(
                "service.api_key_env",
                "environment variable name cannot be empty",
            ));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            issues.push(ConfigIssue::error(
                "service.base_url",
                format!("'{}' is not an http(s) URL", self.base_url),
            ));
        }
        if self.max_tokens == 0 {
            issues.push(ConfigIssue::error("service.max_tokens", "cannot be 0"));
        }
        issues
    }
}
