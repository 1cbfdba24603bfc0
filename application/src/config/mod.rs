//! Application-level configuration.
//!
//! - [`RetryPolicy`]: backoff and wait budget for model queries
//! - [`RunOptions`]: batch-wide execution knobs (sampling seed, fan-out)

pub mod retry_policy;
pub mod run_options;

pub use retry_policy::RetryPolicy;
pub use run_options::RunOptions;
