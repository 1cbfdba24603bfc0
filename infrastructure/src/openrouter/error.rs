//! Error types for the OpenRouter adapter

use thiserror::Error;

/// Errors setting up the HTTP client
///
/// Request-time failures are reported as
/// [`GatewayError`](probe_application::GatewayError) instead.
#[derive(Error, Debug)]
pub enum OpenRouterError {
    #[error("Environment variable {0} is not set")]
    MissingApiKey(String),

    #[error("API key contains characters not allowed in an HTTP header")]
    InvalidApiKey,

    #[error("Failed to create HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}
