//! OpenRouter adapter
//!
//! Implements LlmGateway for any OpenAI-compatible chat completions endpoint,
//! OpenRouter by default.

pub mod error;
pub mod gateway;
mod protocol;

/// Default endpoint root; `/chat/completions` is appended
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
