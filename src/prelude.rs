//! Convenience re-exports.

pub use crate::agent::{get_agent, AgentState, InvokeConfig, SearchAgent, DEFAULT_AGENT};
pub use crate::config::{AgentConfig, Credential};
pub use crate::error::{AgentError, Result};
pub use crate::models::LanguageModel;
pub use crate::provider::{ModelProvider, ProviderRequest, ProviderResponse};
pub use crate::search::{SearchResponse, TavilySearch};
pub use crate::tools::{AgentTool, AgentToolParameters, Tool};
pub use crate::types::{ModelMessage, Role};
