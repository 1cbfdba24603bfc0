//! Real-time sleeper backed by the tokio timer

use async_trait::async_trait;
use probe_application::ports::sleeper::Sleeper;
use std::time::Duration;

pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
