//! Query a model with bounded retry.
//!
//! [`QueryClient`] wraps an [`LlmGateway`] with the [`RetryPolicy`]. Transient
//! failures are retried after a backoff wait until the next wait would exceed
//! the budget. Everything else fails immediately.

use crate::config::RetryPolicy;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::llm_gateway::{ChatRequest, GatewayError, LlmGateway};
use crate::ports::sleeper::Sleeper;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// Errors returned by [`QueryClient::query`]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    #[error("Unsupported model: {0}")]
    UnsupportedModel(String),

    #[error("Timed out waiting for {model} to respond after {} seconds", .waited.as_secs())]
    Timeout { model: String, waited: Duration },

    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),
}

/// Model query client with retry/backoff
pub struct QueryClient<G: LlmGateway + ?Sized> {
    gateway: Arc<G>,
    sleeper: Arc<dyn Sleeper>,
    policy: RetryPolicy,
    logger: Arc<dyn ConversationLogger>,
}

impl<G: LlmGateway + ?Sized> QueryClient<G> {
    pub fn new(gateway: Arc<G>, sleeper: Arc<dyn Sleeper>) -> Self {
        Self {
            gateway,
            sleeper,
            policy: RetryPolicy::default(),
            logger: Arc::new(NoConversationLogger),
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Send one system + user exchange and return the model's text.
    pub async fn query(&self, request: &ChatRequest) -> Result<String, QueryError> {
        if !request.model.is_supported() {
            return Err(QueryError::UnsupportedModel(request.model.to_string()));
        }

        let mut waited = Duration::ZERO;
        let mut delay = self.policy.base_delay;
        let mut invalid_responses = 0;

        loop {
            match self.gateway.complete(request).await {
                Ok(text) => {
                    self.logger.log(ConversationEvent::new(
                        "query_response",
                        serde_json::json!({
                            "model": request.model.as_str(),
                            "temperature": request.temperature,
                            "prompt": request.prompt,
                            "response": text,
                        }),
                    ));
                    return Ok(text);
                }
                Err(e) if e.is_transient() => {
                    if matches!(e, GatewayError::InvalidResponse(_)) {
                        invalid_responses += 1;
                        if invalid_responses >= self.policy.max_invalid_responses {
                            debug!("Giving up after {} unusable responses", invalid_responses);
                            self.log_failure(request, &e);
                            return Err(e.into());
                        }
                    }
                    if self.policy.exhausted_by(waited, delay) {
                        self.log_failure(request, &e);
                        break;
                    }

                    info!("{}. Waiting {} seconds...", e, delay.as_secs_f64());
                    self.logger.log(ConversationEvent::new(
                        "query_retry",
                        serde_json::json!({
                            "model": request.model.as_str(),
                            "prompt": request.prompt,
                            "error": e.to_string(),
                            "wait_ms": delay.as_millis() as u64,
                        }),
                    ));
                    self.sleeper.sleep(delay).await;
                    waited += delay;
                    delay = self.policy.next_delay(delay, e.is_rate_limited());
                }
                Err(e) => {
                    debug!("Non-transient gateway error for {}: {}", request.model, e);
                    self.log_failure(request, &e);
                    return Err(e.into());
                }
            }
        }

        Err(QueryError::Timeout {
            model: request.model.to_string(),
            waited,
        })
    }

    fn log_failure(&self, request: &ChatRequest, error: &GatewayError) {
        self.logger.log(ConversationEvent::new(
            "query_failed",
            serde_json::json!({
                "model": request.model.as_str(),
                "prompt": request.prompt,
                "error": error.to_string(),
            }),
        ));
    }
}
