//! Model provider trait and the OpenAI Chat Completions implementation.

pub mod http;
pub mod openai;

use async_trait::async_trait;

use crate::config::AgentConfig;
use crate::error::AgentError;
use crate::models::LanguageModel;
use crate::types::{AgentToolCall, FinishReason, GenerationSettings, ModelMessage, Usage};

/// A request sent to a model provider.
#[derive(Debug, Clone)]
pub struct ProviderRequest {
    pub messages: Vec<ModelMessage>,
    pub settings: GenerationSettings,
    pub tools: Option<Vec<ToolDefinition>>,
}

/// Tool definition sent to the provider API.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

/// Response from a provider.
#[derive(Debug, Clone, Default)]
pub struct ProviderResponse {
    pub text: String,
    pub usage: Usage,
    pub tool_calls: Vec<AgentToolCall>,
    pub finish_reason: Option<FinishReason>,
}

impl ProviderResponse {
    /// Convert into the assistant message appended to the conversation.
    pub fn into_message(self) -> ModelMessage {
        if self.tool_calls.is_empty() {
            ModelMessage::assistant(self.text)
        } else {
            ModelMessage::assistant_with_tool_calls(self.text, self.tool_calls)
        }
    }
}

/// Core trait implemented by model providers.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Provider name (e.g., "openai").
    fn provider_name(&self) -> &str;
    /// The model ID this provider instance serves.
    fn model_id(&self) -> &str;

    /// Generate a single response (non-streaming).
    async fn generate_text(&self, request: &ProviderRequest)
        -> Result<ProviderResponse, AgentError>;
}

/// Create a provider for the given model, using the provided config.
pub fn create_provider(
    model: &LanguageModel,
    config: &AgentConfig,
) -> Result<Box<dyn ModelProvider>, AgentError> {
    match model {
        LanguageModel::OpenAi(id) => {
            let api_key = config
                .get_api_key("openai")
                .ok_or_else(|| AgentError::Authentication("Missing OPENAI_API_KEY".into()))?;
            Ok(Box::new(openai::OpenAiProvider::new(
                id.clone(),
                api_key,
                config.get_base_url("openai"),
            )))
        }
        LanguageModel::OpenAiCompatible(id) => {
            let api_key = config
                .get_api_key("openai-compatible")
                .or_else(|| config.get_api_key("openai"))
                .ok_or_else(|| {
                    AgentError::Authentication("Missing OPENAI_COMPAT_API_KEY".into())
                })?;
            let base_url = config
                .get_base_url("openai-compatible")
                .ok_or_else(|| {
                    AgentError::Configuration("Missing OPENAI_COMPAT_BASE_URL".into())
                })?;
            Ok(Box::new(
                openai::OpenAiProvider::new(id.clone(), api_key, Some(base_url))
                    .with_provider_name("openai-compatible"),
            ))
        }
    }
}
