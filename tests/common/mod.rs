//! Shared test helpers: a scripted model provider and tool builders.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use tavily_agent::error::AgentError;
use tavily_agent::provider::{ModelProvider, ProviderRequest, ProviderResponse};
use tavily_agent::tools::{AgentTool, AgentToolParameters, Tool};
use tavily_agent::types::{AgentToolCall, FinishReason, Usage};

/// A provider that replays queued responses and records every request.
pub struct ScriptedProvider {
    responses: Mutex<Vec<ProviderResponse>>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl ScriptedProvider {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(Vec::new()),
            requests: Mutex::new(Vec::new()),
        })
    }

    /// Queue a final text response.
    pub fn queue_text(&self, text: &str) {
        self.responses.lock().unwrap().push(ProviderResponse {
            text: text.to_string(),
            usage: Usage {
                input_tokens: 10,
                output_tokens: 20,
                total_tokens: 30,
            },
            tool_calls: vec![],
            finish_reason: Some(FinishReason::Stop),
        });
    }

    /// Queue a response requesting one tool call.
    pub fn queue_tool_call(&self, id: &str, name: &str, args: Value) {
        self.queue_tool_calls(vec![(id, name, args)]);
    }

    /// Queue a response requesting several tool calls at once.
    pub fn queue_tool_calls(&self, calls: Vec<(&str, &str, Value)>) {
        self.responses.lock().unwrap().push(ProviderResponse {
            text: String::new(),
            usage: Usage::default(),
            tool_calls: calls
                .into_iter()
                .map(|(id, name, arguments)| AgentToolCall {
                    id: id.to_string(),
                    name: name.to_string(),
                    arguments,
                })
                .collect(),
            finish_reason: Some(FinishReason::ToolCalls),
        });
    }

    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn remaining(&self) -> usize {
        self.responses.lock().unwrap().len()
    }
}

#[async_trait]
impl ModelProvider for ScriptedProvider {
    fn provider_name(&self) -> &str {
        "scripted"
    }

    fn model_id(&self) -> &str {
        "scripted-model"
    }

    async fn generate_text(&self, request: &ProviderRequest) -> Result<ProviderResponse, AgentError> {
        self.requests.lock().unwrap().push(request.clone());
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Err(AgentError::api(500, "script exhausted"));
        }
        Ok(responses.remove(0))
    }
}

/// A `tavily_search` stand-in that counts calls and echoes the query.
pub fn counting_search_tool(calls: Arc<AtomicUsize>) -> Arc<dyn Tool> {
    Arc::new(AgentTool::new(
        "tavily_search",
        "Search the web",
        AgentToolParameters::object()
            .string("query", "Search query", true)
            .build(),
        move |args, _ctx| {
            let calls = Arc::clone(&calls);
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                let query = args.get_str("query")?;
                Ok(serde_json::json!({
                    "query": query,
                    "answer": format!("answer for {query}"),
                    "results": [],
                }))
            }
        },
    ))
}

/// A tool that always fails.
pub fn failing_tool(name: &str) -> Arc<dyn Tool> {
    let tool_name = name.to_string();
    Arc::new(AgentTool::new(
        name,
        "Always fails",
        AgentToolParameters::empty(),
        move |_args, _ctx| {
            let tool_name = tool_name.clone();
            async move { Err(AgentError::tool(tool_name, "upstream unavailable")) }
        },
    ))
}
