//! Retry policy for model queries.
//!
//! [`RetryPolicy`] controls how [`QueryClient`](crate::use_cases::query_model::QueryClient)
//! waits between attempts after transient gateway failures.

use std::time::Duration;

/// Bounded exponential backoff.
///
/// Every transient failure waits the current delay. Only rate-limit failures
/// multiply the delay for the next wait. A wait that would take the
/// accumulated wait to `max_total_wait` is not started; the query times out
/// instead. Unusable success responses are retried at most
/// `max_invalid_responses` times in total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// First delay after a transient failure.
    pub base_delay: Duration,
    /// Factor applied to the delay after each rate-limit failure.
    pub multiplier: u32,
    /// Total wait budget across all retries of one query.
    pub max_total_wait: Duration,
    /// Attempts allowed to end in an unusable response body.
    pub max_invalid_responses: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            base_delay: Duration::from_secs(5),
            multiplier: 2,
            max_total_wait: Duration::from_secs(300),
            max_invalid_responses: 3,
        }
    }
}

impl RetryPolicy {
    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    pub fn with_multiplier(mut self, multiplier: u32) -> Self {
        self.multiplier = multiplier;
        self
    }

    pub fn with_max_total_wait(mut self, budget: Duration) -> Self {
        self.max_total_wait = budget;
        self
    }

    pub fn with_max_invalid_responses(mut self, attempts: u32) -> Self {
        self.max_invalid_responses = attempts;
        self
    }

    /// Whether waiting `delay` more would exhaust the budget
    pub fn exhausted_by(&self, waited: Duration, delay: Duration) -> bool {
        waited.saturating_add(delay) >= self.max_total_wait
    }

    /// Delay following `delay` after a failure of the given class
    pub fn next_delay(&self, delay: Duration, rate_limited: bool) -> Duration {
        if rate_limited {
            delay.saturating_mul(self.multiplier)
        } else {
            delay
        }
    }
}
