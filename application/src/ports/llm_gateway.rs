//! LLM Gateway port
//!
//! Defines the interface for sending one chat exchange to a model provider.

use async_trait::async_trait;
use probe_domain::Model;
use thiserror::Error;

/// Errors that can occur during LLM gateway operations
///
/// The variants split into the two classes the retry policy cares about:
/// transient faults (retried with backoff) and everything else (fatal).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GatewayError {
    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    #[error("Request rejected: {0}")]
    RequestRejected(String),
}

impl GatewayError {
    /// Rate-limit errors grow the backoff delay
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, GatewayError::RateLimited(_))
    }

    /// Whether retrying the same request may succeed
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            GatewayError::RateLimited(_)
                | GatewayError::Unavailable(_)
                | GatewayError::ConnectionError(_)
                | GatewayError::InvalidResponse(_)
        )
    }
}

/// A single system + user exchange
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub model: Model,
    pub system_prompt: String,
    pub prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl ChatRequest {
    pub fn new(
        model: Model,
        system_prompt: impl Into<String>,
        prompt: impl Into<String>,
        temperature: f32,
    ) -> Self {
        Self {
            model,
            system_prompt: system_prompt.into(),
            prompt: prompt.into(),
            temperature,
            max_tokens: 200,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// Gateway for LLM communication
///
/// Implementations (adapters) live in the infrastructure layer. One call is
/// one remote request; retrying is the caller's job.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Send the exchange and return the assistant's text
    async fn complete(&self, request: &ChatRequest) -> Result<String, GatewayError>;
}
