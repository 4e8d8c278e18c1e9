//! The search agent graph.
//!
//! Two nodes share one [`AgentState`]:
//!
//! - **model** calls the language model with the tools bound, then passes the
//!   response through the step guard;
//! - **tools** executes every tool call in the last assistant message, in
//!   order, appending one tool-result message per call.
//!
//! After **model**, [`tools_condition`] routes to **tools** when the model
//! asked for tools and ends the run otherwise. **tools** always returns to
//! **model**. State is checkpointed per thread after every node.

use std::sync::Arc;

use strum::Display;
use tracing::{debug, info, warn};

use crate::config::AgentConfig;
use crate::error::{AgentError, Result};
use crate::models::LanguageModel;
use crate::provider::{self, ModelProvider, ProviderRequest, ToolDefinition};
use crate::tools::tool::{Tool, ToolExecutionContext};
use crate::tools::{validate_arguments, ToolArguments};
use crate::types::{AgentToolCall, GenerationSettings, ModelMessage, Role};

use super::checkpoint::{Checkpointer, MemorySaver};
use super::guard::apply_step_guard;
use super::prompt::SYSTEM_PROMPT;
use super::state::{AgentState, StateUpdate, DEFAULT_STEP_BUDGET};

/// Node executions allowed in one invocation before the run is aborted.
pub const DEFAULT_RECURSION_LIMIT: usize = 25;

/// A node of the agent graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Node {
    Model,
    Tools,
}

/// Where to go after the model node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Next {
    Tools,
    End,
}

/// Route to the tools node when the last message is an assistant message
/// carrying tool calls.
pub fn tools_condition(state: &AgentState) -> Next {
    match state.last_message() {
        Some(msg) if msg.role == Role::Assistant && msg.has_tool_calls() => Next::Tools,
        _ => Next::End,
    }
}

/// Per-invocation options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvokeConfig {
    /// Conversation thread to load and save.
    pub thread_id: String,
    /// Model override, as `provider:model` or a bare id.
    pub model: Option<String>,
}

impl InvokeConfig {
    pub fn new(thread_id: impl Into<String>) -> Self {
        Self {
            thread_id: thread_id.into(),
            model: None,
        }
    }

    /// Config for a brand-new thread with a random id.
    pub fn fresh() -> Self {
        Self::new(uuid::Uuid::new_v4().to_string())
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}

/// Conversational agent that alternates between the model and its tools.
pub struct SearchAgent {
    config: AgentConfig,
    tools: Vec<Arc<dyn Tool>>,
    system_prompt: String,
    settings: GenerationSettings,
    step_budget: u32,
    recursion_limit: usize,
    checkpointer: Arc<dyn Checkpointer>,
    provider: Option<Arc<dyn ModelProvider>>,
}

impl SearchAgent {
    /// Create an agent with no tools and an in-memory checkpointer.
    pub fn new(config: AgentConfig) -> Self {
        Self {
            config,
            tools: Vec::new(),
            system_prompt: SYSTEM_PROMPT.to_string(),
            settings: GenerationSettings::default(),
            step_budget: DEFAULT_STEP_BUDGET,
            recursion_limit: DEFAULT_RECURSION_LIMIT,
            checkpointer: Arc::new(MemorySaver::new()),
            provider: None,
        }
    }

    /// Add a tool.
    pub fn with_tool(mut self, tool: Arc<dyn Tool>) -> Self {
        self.tools.push(tool);
        self
    }

    /// Set system prompt.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    /// Set generation settings.
    pub fn with_settings(mut self, settings: GenerationSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Step budget given to threads without a checkpoint.
    pub fn with_step_budget(mut self, steps: u32) -> Self {
        self.step_budget = steps;
        self
    }

    pub fn with_recursion_limit(mut self, limit: usize) -> Self {
        self.recursion_limit = limit;
        self
    }

    pub fn with_checkpointer(mut self, checkpointer: Arc<dyn Checkpointer>) -> Self {
        self.checkpointer = checkpointer;
        self
    }

    /// Use this provider for every invocation instead of resolving one from
    /// the model name.
    pub fn with_provider(mut self, provider: Arc<dyn ModelProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn tools(&self) -> &[Arc<dyn Tool>] {
        &self.tools
    }

    /// Saved state of a thread.
    pub async fn get_state(&self, thread_id: &str) -> Option<AgentState> {
        self.checkpointer.get(thread_id).await
    }

    /// Send one user message on a thread.
    pub async fn ask(&self, question: impl Into<String>, config: &InvokeConfig) -> Result<AgentState> {
        self.invoke(vec![ModelMessage::user(question)], config).await
    }

    /// Append `input` to the thread and run the graph until it ends.
    ///
    /// Returns the full thread state, including messages from earlier
    /// invocations on the same thread.
    ///
    /// State is saved after every node, so a run that fails part way keeps
    /// its progress. When [`AgentError::RecursionLimit`] fires right after a
    /// model node, the thread ends with an assistant message whose tool calls
    /// have no results; chat APIs reject that history, so continue such a
    /// run on a fresh thread id.
    pub async fn invoke(&self, input: Vec<ModelMessage>, config: &InvokeConfig) -> Result<AgentState> {
        let provider = self.resolve_provider(config)?;
        let thread_id = config.thread_id.as_str();

        let mut state = match self.checkpointer.get(thread_id).await {
            Some(state) => state,
            None => AgentState::new(self.step_budget),
        };
        state.messages.extend(input);
        self.checkpointer.put(thread_id, state.clone()).await;

        info!(
            thread_id,
            model = provider.model_id(),
            messages = state.messages.len(),
            remaining_steps = state.remaining_steps,
            "agent run started"
        );

        let mut node = Node::Model;
        let mut executed = 0usize;
        loop {
            if executed >= self.recursion_limit {
                warn!(thread_id, limit = self.recursion_limit, "recursion limit reached");
                return Err(AgentError::RecursionLimit {
                    limit: self.recursion_limit,
                });
            }
            executed += 1;
            debug!(thread_id, %node, step = executed, "executing node");

            let update = match node {
                Node::Model => self.call_model(provider.as_ref(), &state).await?,
                Node::Tools => self.run_tools(&state, thread_id).await,
            };
            update.apply(&mut state);
            self.checkpointer.put(thread_id, state.clone()).await;

            node = match node {
                Node::Model => match tools_condition(&state) {
                    Next::Tools => Node::Tools,
                    Next::End => break,
                },
                Node::Tools => Node::Model,
            };
        }

        info!(
            thread_id,
            nodes = executed,
            remaining_steps = state.remaining_steps,
            "agent run finished"
        );
        Ok(state)
    }

    fn resolve_provider(&self, config: &InvokeConfig) -> Result<Arc<dyn ModelProvider>> {
        if let Some(ref provider) = self.provider {
            return Ok(Arc::clone(provider));
        }
        let name = config
            .model
            .clone()
            .unwrap_or_else(|| self.config.default_model());
        let model: LanguageModel = name.parse()?;
        Ok(Arc::from(provider::create_provider(&model, &self.config)?))
    }

    fn tool_definitions(&self) -> Option<Vec<ToolDefinition>> {
        if self.tools.is_empty() {
            None
        } else {
            Some(self.tools.iter().map(|t| t.definition()).collect())
        }
    }

    async fn call_model(&self, provider: &dyn ModelProvider, state: &AgentState) -> Result<StateUpdate> {
        let mut messages = Vec::with_capacity(state.messages.len() + 1);
        if !state.has_system_message() {
            messages.push(ModelMessage::system(self.system_prompt.clone()));
        }
        messages.extend(state.messages.iter().cloned());

        let request = ProviderRequest {
            messages,
            settings: self.settings.clone(),
            tools: self.tool_definitions(),
        };
        let response = provider.generate_text(&request).await?;
        debug!(
            tool_calls = response.tool_calls.len(),
            output_tokens = response.usage.output_tokens,
            "model responded"
        );
        Ok(apply_step_guard(state.remaining_steps, response))
    }

    async fn run_tools(&self, state: &AgentState, thread_id: &str) -> StateUpdate {
        let calls: Vec<AgentToolCall> = state
            .last_message()
            .map(|m| m.tool_calls().into_iter().cloned().collect())
            .unwrap_or_default();

        let mut messages = Vec::with_capacity(calls.len());
        for call in calls {
            let ctx = ToolExecutionContext {
                thread_id: Some(thread_id.to_string()),
                tool_call_id: Some(call.id.clone()),
            };
            let message = match self.execute_tool(&call, &ctx).await {
                Ok(result) => ModelMessage::tool_result(call.id, call.name, result, false),
                Err(e) => {
                    warn!(tool = call.name.as_str(), error = %e, "tool call failed");
                    ModelMessage::tool_result(
                        call.id,
                        call.name,
                        serde_json::Value::String(format!(
                            "Error: {e}\n Please fix your mistakes."
                        )),
                        true,
                    )
                }
            };
            messages.push(message);
        }

        StateUpdate {
            messages,
            remaining_steps: None,
        }
    }

    async fn execute_tool(&self, call: &AgentToolCall, ctx: &ToolExecutionContext) -> Result<serde_json::Value> {
        let tool = self
            .tools
            .iter()
            .find(|t| t.name() == call.name)
            .ok_or_else(|| {
                let known: Vec<&str> = self.tools.iter().map(|t| t.name()).collect();
                AgentError::tool(
                    call.name.clone(),
                    format!("not a valid tool, try one of [{}]", known.join(", ")),
                )
            })?;

        let args = ToolArguments::new(call.arguments.clone());
        validate_arguments(args.raw(), &tool.parameters().schema)?;
        tool.execute(&args, ctx).await
    }
}

impl std::fmt::Debug for SearchAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tools: Vec<&str> = self.tools.iter().map(|t| t.name()).collect();
        f.debug_struct("SearchAgent")
            .field("tools", &tools)
            .field("step_budget", &self.step_budget)
            .field("recursion_limit", &self.recursion_limit)
            .finish()
    }
}
