//! Retry configuration from TOML (`[retry]` section)

use super::issue::ConfigIssue;
use probe_application::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw retry configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRetryConfig {
    /// First wait after a transient failure
    pub base_delay_seconds: f64,
    /// Growth factor applied after rate-limit failures
    pub multiplier: u32,
    /// Total wait budget per query
    pub max_wait_seconds: f64,
    /// Attempts allowed to return an unusable response body
    pub max_invalid_responses: u32,
}

impl Default for FileRetryConfig {
    fn default() -> Self {
        let policy = RetryPolicy::default();
        Self {
            base_delay_seconds: policy.base_delay.as_secs_f64(),
            multiplier: policy.multiplier,
            max_wait_seconds: policy.max_total_wait.as_secs_f64(),
            max_invalid_responses: policy.max_invalid_responses,
        }
    }
}

impl FileRetryConfig {
    /// Convert to a policy; invalid durations fall back to the defaults
    pub fn to_policy(&self) -> RetryPolicy {
        let defaults = RetryPolicy::default();
        RetryPolicy::default()
            .with_base_delay(
                Duration::try_from_secs_f64(self.base_delay_seconds)
                    .unwrap_or(defaults.base_delay),
            )
            .with_multiplier(self.multiplier.max(1))
            .with_max_total_wait(
                Duration::try_from_secs_f64(self.max_wait_seconds)
                    .unwrap_or(defaults.max_total_wait),
            )
            .with_max_invalid_responses(self.max_invalid_responses.max(1))
    }

    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        if !(self.base_delay_seconds.is_finite() && self.base_delay_seconds > 0.0) {
            issues.push(ConfigIssue::error(
                "retry.base_delay_seconds",
                "must be a positive number",
            ));
        }
        if !(self.max_wait_seconds.is_finite() && self.max_wait_seconds >= 0.0) {
            issues.push(ConfigIssue::error(
                "retry.max_wait_seconds",
                "must be a non-negative number",
            ));
        } else if self.max_wait_seconds == 0.0 {
            issues.push(ConfigIssue::warning(
                "retry.max_wait_seconds",
                "0 disables retries; every transient failure times out",
            ));
        }
        if self.multiplier == 0 {
            issues.push(ConfigIssue::warning(
                "retry.multiplier",
                "0 is treated as 1 (constant delay)",
            ));
        }
        issues
    }
}
