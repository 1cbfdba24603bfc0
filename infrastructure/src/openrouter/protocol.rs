//! Chat completions wire types

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub(super) struct ChatCompletionRequest<'a> {
    pub model: &'a str,
    pub messages: [ApiMessage<'a>; 2],
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Serialize)]
pub(super) struct ApiMessage<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

impl<'a> ApiMessage<'a> {
    pub fn system(content: &'a str) -> Self {
        Self {
            role: "system",
            content,
        }
    }

    pub fn user(content: &'a str) -> Self {
        Self {
            role: "user",
            content,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct ChatCompletionResponse {
    pub choices: Option<Vec<Choice>>,
    pub error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
pub(super) struct Choice {
    pub message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ChoiceMessage {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ApiError {
    pub message: Option<String>,
}

impl ChatCompletionResponse {
    /// Text of the first choice
    pub fn into_content(self) -> Option<String> {
        self.choices?.into_iter().next()?.message?.content
    }
}
