//! Model value object representing a chat model under test

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Chat model family the probe knows how to query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelFamily {
    Gpt35,
    Gpt4,
}

/// Models that can be probed (Value Object)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Model {
    Gpt35Turbo,
    Gpt4,
    Custom(String),
}

impl Model {
    /// Get the string identifier for this model
    pub fn as_str(&self) -> &str {
        match self {
            Model::Gpt35Turbo => "gpt-3.5-turbo",
            Model::Gpt4 => "gpt-4",
            Model::Custom(s) => s,
        }
    }

    /// Identifier sent to the chat completions endpoint
    ///
    /// The endpoint is OpenRouter-compatible, so the built-in models carry
    /// their vendor prefix. Custom identifiers are sent verbatim.
    pub fn api_id(&self) -> &str {
        match self {
            Model::Gpt35Turbo => "openai/gpt-3.5-turbo",
            Model::Gpt4 => "openai/gpt-4",
            Model::Custom(s) => s,
        }
    }

    /// Family of this model, if it is one the probe supports
    pub fn family(&self) -> Option<ModelFamily> {
        match self {
            Model::Gpt35Turbo => Some(ModelFamily::Gpt35),
            Model::Gpt4 => Some(ModelFamily::Gpt4),
            Model::Custom(s) if s.contains("gpt-3.5") => Some(ModelFamily::Gpt35),
            Model::Custom(s) if s.contains("gpt-4") => Some(ModelFamily::Gpt4),
            Model::Custom(_) => None,
        }
    }

    pub fn is_supported(&self) -> bool {
        self.family().is_some()
    }
}

impl Default for Model {
    fn default() -> Self {
        Model::Gpt35Turbo
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Model {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s.trim() {
            "gpt-3.5-turbo" | "openai/gpt-3.5-turbo" => Model::Gpt35Turbo,
            "gpt-4" | "openai/gpt-4" => Model::Gpt4,
            other => Model::Custom(other.to_string()),
        })
    }
}

impl Serialize for Model {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Model {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let Ok(model) = s.parse::<Model>();
        Ok(model)
    }
}
