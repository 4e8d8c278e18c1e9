//! Agent graph behavior against a scripted provider.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use common::{counting_search_tool, failing_tool, ScriptedProvider};
use pretty_assertions::assert_eq;
use serde_json::json;
use tavily_agent::agent::{InvokeConfig, SearchAgent, STEP_REFUSAL};
use tavily_agent::config::AgentConfig;
use tavily_agent::error::AgentError;
use tavily_agent::types::{ModelMessage, Role};

fn agent_with(provider: Arc<ScriptedProvider>, calls: Arc<AtomicUsize>) -> SearchAgent {
    SearchAgent::new(AgentConfig::new())
        .with_provider(provider)
        .with_tool(counting_search_tool(calls))
}

fn roles(messages: &[ModelMessage]) -> Vec<Role> {
    messages.iter().map(|m| m.role).collect()
}

#[tokio::test]
async fn direct_answer_skips_tools() {
    let provider = ScriptedProvider::new();
    provider.queue_text("Hello there!");
    let calls = Arc::new(AtomicUsize::new(0));
    let agent = agent_with(provider.clone(), calls.clone());

    let state = agent.ask("hi", &InvokeConfig::new("t1")).await.unwrap();

    assert_eq!(roles(&state.messages), vec![Role::User, Role::Assistant]);
    assert_eq!(state.final_answer().as_deref(), Some("Hello there!"));
    assert_eq!(state.remaining_steps, 9);
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    let requests = provider.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].messages[0].role, Role::System);
    assert!(requests[0].messages[0].text().contains("Tavily search engine"));
    let tools = requests[0].tools.as_ref().expect("tools bound");
    assert_eq!(tools[0].name, "tavily_search");
}

#[tokio::test]
async fn tool_call_round_trip() {
    let provider = ScriptedProvider::new();
    provider.queue_tool_call("call_1", "tavily_search", json!({"query": "AI news 2024"}));
    provider.queue_text("Here is what I found.");
    let calls = Arc::new(AtomicUsize::new(0));
    let agent = agent_with(provider.clone(), calls.clone());

    let state = agent.ask("What's new in AI?", &InvokeConfig::new("t1")).await.unwrap();

    assert_eq!(
        roles(&state.messages),
        vec![Role::User, Role::Assistant, Role::Tool, Role::Assistant]
    );
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(state.remaining_steps, 8);

    let tool_msg = &state.messages[2];
    assert_eq!(tool_msg.name.as_deref(), Some("tavily_search"));
    let result = tool_msg.tool_result_part().unwrap();
    assert_eq!(result.tool_call_id, "call_1");
    assert!(!result.is_error);
    assert_eq!(result.result["answer"], "answer for AI news 2024");

    // The second model call sees the tool output.
    let requests = provider.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1].messages.last().unwrap().role, Role::Tool);
}

#[tokio::test]
async fn guard_refuses_tool_calls_when_budget_is_low() {
    let provider = ScriptedProvider::new();
    provider.queue_tool_call("call_1", "tavily_search", json!({"query": "q"}));
    let calls = Arc::new(AtomicUsize::new(0));
    let agent = agent_with(provider.clone(), calls.clone()).with_step_budget(1);

    let state = agent.ask("q", &InvokeConfig::new("t1")).await.unwrap();

    assert_eq!(roles(&state.messages), vec![Role::User, Role::Assistant]);
    assert_eq!(state.messages[1].text(), STEP_REFUSAL);
    assert!(!state.messages[1].has_tool_calls());
    assert_eq!(state.remaining_steps, 1);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(provider.requests().len(), 1);
}

#[tokio::test]
async fn budget_runs_out_mid_conversation() {
    let provider = ScriptedProvider::new();
    for i in 0..3 {
        provider.queue_tool_call(&format!("call_{i}"), "tavily_search", json!({"query": "again"}));
    }
    let calls = Arc::new(AtomicUsize::new(0));
    let agent = agent_with(provider.clone(), calls.clone()).with_step_budget(3);

    let state = agent.ask("loop", &InvokeConfig::new("t1")).await.unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(provider.requests().len(), 3);
    assert_eq!(state.final_answer().as_deref(), Some(STEP_REFUSAL));
    assert_eq!(state.remaining_steps, 1);
}

#[tokio::test]
async fn thread_state_carries_over_and_threads_are_isolated() {
    let provider = ScriptedProvider::new();
    provider.queue_text("first answer");
    provider.queue_text("second answer");
    provider.queue_text("other thread answer");
    let agent = agent_with(provider.clone(), Arc::new(AtomicUsize::new(0)));
    let thread = InvokeConfig::new("shared");

    agent.ask("first question", &thread).await.unwrap();
    let state = agent.ask("follow-up", &thread).await.unwrap();

    let texts: Vec<String> = state.messages.iter().map(ModelMessage::text).collect();
    assert_eq!(
        texts,
        vec!["first question", "first answer", "follow-up", "second answer"]
    );
    assert_eq!(state.remaining_steps, 8);

    let other = agent.ask("unrelated", &InvokeConfig::new("other")).await.unwrap();
    assert_eq!(other.messages.len(), 2);
    assert_eq!(other.remaining_steps, 9);

    // Second request carried the first turn; system prompt is not stored.
    let requests = provider.requests();
    assert_eq!(requests[1].messages.len(), 4);
    assert!(state.messages.iter().all(|m| m.role != Role::System));
    assert_eq!(agent.get_state("shared").await, Some(state));
}

#[tokio::test]
async fn caller_system_message_is_not_duplicated() {
    let provider = ScriptedProvider::new();
    provider.queue_text("ok");
    let agent = agent_with(provider.clone(), Arc::new(AtomicUsize::new(0)));

    agent
        .invoke(
            vec![ModelMessage::system("Be terse."), ModelMessage::user("hi")],
            &InvokeConfig::new("t1"),
        )
        .await
        .unwrap();

    let request = &provider.requests()[0];
    let systems: Vec<String> = request
        .messages
        .iter()
        .filter(|m| m.role == Role::System)
        .map(ModelMessage::text)
        .collect();
    assert_eq!(systems, vec!["Be terse."]);
}

#[tokio::test]
async fn tool_failures_become_error_results() {
    let provider = ScriptedProvider::new();
    provider.queue_tool_calls(vec![
        ("call_1", "flaky", json!({})),
        ("call_2", "no_such_tool", json!({})),
        ("call_3", "tavily_search", json!({})),
    ]);
    provider.queue_text("Sorry, searching failed.");
    let calls = Arc::new(AtomicUsize::new(0));
    let agent = agent_with(provider.clone(), calls.clone()).with_tool(failing_tool("flaky"));

    let state = agent.ask("q", &InvokeConfig::new("t1")).await.unwrap();

    let results: Vec<_> = state
        .messages
        .iter()
        .filter_map(|m| m.tool_result_part())
        .collect();
    assert_eq!(results.len(), 3);
    let ids: Vec<&str> = results.iter().map(|r| r.tool_call_id.as_str()).collect();
    assert_eq!(ids, vec!["call_1", "call_2", "call_3"]);
    assert!(results.iter().all(|r| r.is_error));

    let text = |i: usize| results[i].result.as_str().unwrap().to_string();
    assert!(text(0).contains("upstream unavailable"));
    assert!(text(1).contains("not a valid tool"));
    assert!(text(2).contains("missing required field 'query'"));
    assert!(text(2).starts_with("Error: "));

    // Invalid arguments never reach the tool.
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(state.final_answer().as_deref(), Some("Sorry, searching failed."));
}

#[tokio::test]
async fn recursion_limit_aborts_and_keeps_progress() {
    let provider = ScriptedProvider::new();
    for i in 0..5 {
        provider.queue_tool_call(&format!("call_{i}"), "tavily_search", json!({"query": "x"}));
    }
    let calls = Arc::new(AtomicUsize::new(0));
    let agent = agent_with(provider.clone(), calls.clone())
        .with_step_budget(100)
        .with_recursion_limit(3);

    let err = agent.ask("q", &InvokeConfig::new("t1")).await.unwrap_err();
    assert!(matches!(err, AgentError::RecursionLimit { limit: 3 }));

    // model, tools, model ran before the limit hit.
    let saved = agent.get_state("t1").await.unwrap();
    assert_eq!(
        roles(&saved.messages),
        vec![Role::User, Role::Assistant, Role::Tool, Role::Assistant]
    );
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    // The aborted run leaves unanswered tool calls at the end of the thread.
    assert!(saved.last_message().unwrap().has_tool_calls());
}

#[tokio::test]
async fn model_errors_propagate_but_input_is_saved() {
    let provider = ScriptedProvider::new();
    let agent = agent_with(provider.clone(), Arc::new(AtomicUsize::new(0)));

    let err = agent.ask("q", &InvokeConfig::new("t1")).await.unwrap_err();
    assert!(matches!(err, AgentError::Api { status: 500, .. }));

    let saved = agent.get_state("t1").await.unwrap();
    assert_eq!(roles(&saved.messages), vec![Role::User]);
    assert_eq!(saved.remaining_steps, 10);
}
