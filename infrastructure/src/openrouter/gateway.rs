//! OpenRouter LLM Gateway implementation

use super::DEFAULT_BASE_URL;
use super::error::OpenRouterError;
use super::protocol::{ApiMessage, ChatCompletionRequest, ChatCompletionResponse};
use async_trait::async_trait;
use probe_application::ports::llm_gateway::{ChatRequest, GatewayError, LlmGateway};
use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use std::time::Duration;
use tracing::{debug, info};

/// LLM Gateway implementation for an OpenAI-compatible chat completions API
#[derive(Debug, Clone)]
pub struct OpenRouterGateway {
    client: reqwest::Client,
    base_url: String,
}

impl OpenRouterGateway {
    /// Create a gateway against the default endpoint
    pub fn new(api_key: &str) -> Result<Self, OpenRouterError> {
        Self::with_config(api_key, DEFAULT_BASE_URL, Duration::from_secs(120))
    }

    /// Create a gateway reading the API key from environment variable `var`
    pub fn from_env(
        var: &str,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, OpenRouterError> {
        let api_key = std::env::var(var)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| OpenRouterError::MissingApiKey(var.to_string()))?;
        Self::with_config(&api_key, base_url, timeout)
    }

    pub fn with_config(
        api_key: &str,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, OpenRouterError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let auth = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|_| OpenRouterError::InvalidApiKey)?;
        headers.insert(AUTHORIZATION, auth);

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        info!("OpenRouterGateway initialized for {}", base_url);

        Ok(Self { client, base_url })
    }

    fn chat_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

/// Map a non-success HTTP status to the retry class it belongs to
fn classify_status(status: StatusCode, message: String) -> GatewayError {
    let message = format!("HTTP {}: {}", status.as_u16(), message);
    match status {
        StatusCode::TOO_MANY_REQUESTS => GatewayError::RateLimited(message),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => GatewayError::Unauthorized(message),
        s if s.is_server_error() => GatewayError::Unavailable(message),
        _ => GatewayError::RequestRejected(message),
    }
}

fn classify_transport(error: reqwest::Error) -> GatewayError {
    if error.is_timeout() {
        GatewayError::ConnectionError(format!("request timed out: {error}"))
    } else {
        GatewayError::ConnectionError(error.to_string())
    }
}

#[async_trait]
impl LlmGateway for OpenRouterGateway {
    async fn complete(&self, request: &ChatRequest) -> Result<String, GatewayError> {
        let body = ChatCompletionRequest {
            model: request.model.api_id(),
            messages: [
                ApiMessage::system(&request.system_prompt),
                ApiMessage::user(&request.prompt),
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        debug!("POST {} model={}", self.chat_url(), body.model);

        let response = self
            .client
            .post(self.chat_url())
            .json(&body)
            .send()
            .await
            .map_err(classify_transport)?;

        let status = response.status();
        let text = response.text().await.map_err(classify_transport)?;

        if !status.is_success() {
            let message = serde_json::from_str::<ChatCompletionResponse>(&text)
                .ok()
                .and_then(|parsed| parsed.error)
                .and_then(|error| error.message)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("error").to_string());
            return Err(classify_status(status, message));
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&text)
            .map_err(|e| GatewayError::InvalidResponse(format!("invalid JSON: {e}")))?;

        if let Some(error) = parsed.error {
            return Err(GatewayError::InvalidResponse(
                error.message.unwrap_or_else(|| "unknown error".to_string()),
            ));
        }

        parsed
            .into_content()
            .ok_or_else(|| GatewayError::InvalidResponse("no message content in response".into()))
    }
}
