//! Sleeper port
//!
//! Backoff waits go through this trait so retry behaviour can be tested with
//! a fake clock instead of real time.

use async_trait::async_trait;
use std::time::Duration;

#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}
