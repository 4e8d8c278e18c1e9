//! Model identifiers and parsing.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AgentError;

/// A chat model, addressed as `provider:model` (a bare id means `openai`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(tag = "provider", content = "model")]
pub enum LanguageModel {
    /// OpenAI Chat Completions.
    OpenAi(String),
    /// Any server speaking the Chat Completions protocol.
    OpenAiCompatible(String),
}

impl LanguageModel {
    /// Get the model's API identifier string.
    pub fn model_id(&self) -> &str {
        match self {
            Self::OpenAi(id) | Self::OpenAiCompatible(id) => id,
        }
    }

    /// Get the provider name.
    pub fn provider_name(&self) -> &str {
        match self {
            Self::OpenAi(_) => "openai",
            Self::OpenAiCompatible(_) => "openai-compatible",
        }
    }
}

impl fmt::Display for LanguageModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.provider_name(), self.model_id())
    }
}

impl FromStr for LanguageModel {
    type Err = AgentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (provider, model_id) = match s.split_once(':') {
            Some((provider, model_id)) => (provider, model_id),
            None => ("openai", s),
        };
        if model_id.is_empty() {
            return Err(AgentError::ModelNotFound(format!(
                "empty model id in '{s}'"
            )));
        }
        match provider {
            "openai" => Ok(Self::OpenAi(model_id.to_string())),
            "openai-compatible" | "openai_compatible" => {
                Ok(Self::OpenAiCompatible(model_id.to_string()))
            }
            other => Err(AgentError::ModelNotFound(format!(
                "unknown provider '{other}' (use openai or openai-compatible)"
            ))),
        }
    }
}
