//! Step-budget guard applied to every model response.

use tracing::warn;

use crate::provider::ProviderResponse;
use crate::types::ModelMessage;

use super::state::StateUpdate;

/// Message substituted for a tool request the budget cannot cover.
pub const STEP_REFUSAL: &str = "I need more steps to process this request properly.";

/// Tool calls are refused when fewer steps than this remain.
pub const MIN_STEPS_FOR_TOOLS: u32 = 2;

/// Turn a model response into the model node's state update.
///
/// With fewer than [`MIN_STEPS_FOR_TOOLS`] steps left, a response that asks for
/// tools is replaced by [`STEP_REFUSAL`] and the counter is left alone. Any other
/// response passes through unchanged and costs one step.
pub fn apply_step_guard(remaining_steps: u32, response: ProviderResponse) -> StateUpdate {
    if remaining_steps < MIN_STEPS_FOR_TOOLS && !response.tool_calls.is_empty() {
        warn!(
            remaining_steps,
            requested = response.tool_calls.len(),
            "step budget exhausted, refusing tool calls"
        );
        return StateUpdate {
            messages: vec![ModelMessage::assistant(STEP_REFUSAL)],
            remaining_steps: None,
        };
    }

    StateUpdate {
        messages: vec![response.into_message()],
        remaining_steps: Some(remaining_steps.saturating_sub(1)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AgentToolCall;
    use pretty_assertions::assert_eq;

    fn tool_response() -> ProviderResponse {
        ProviderResponse {
            tool_calls: vec![AgentToolCall {
                id: "call_1".into(),
                name: "tavily_search".into(),
                arguments: serde_json::json!({"query": "rust"}),
            }],
            ..Default::default()
        }
    }

    fn text_response(text: &str) -> ProviderResponse {
        ProviderResponse {
            text: text.into(),
            ..Default::default()
        }
    }

    #[test]
    fn refuses_tool_calls_below_two_steps() {
        for remaining in [0, 1] {
            let update = apply_step_guard(remaining, tool_response());
            assert_eq!(update.remaining_steps, None);
            assert_eq!(update.messages.len(), 1);
            assert_eq!(update.messages[0].text(), STEP_REFUSAL);
            assert!(!update.messages[0].has_tool_calls());
        }
    }

    #[test]
    fn passes_tool_calls_through_with_enough_steps() {
        let update = apply_step_guard(2, tool_response());
        assert_eq!(update.remaining_steps, Some(1));
        let calls = update.messages[0].tool_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].name, "tavily_search");
    }

    #[test]
    fn final_answers_pass_even_at_zero() {
        let update = apply_step_guard(1, text_response("done"));
        assert_eq!(update.messages[0].text(), "done");
        assert_eq!(update.remaining_steps, Some(0));

        let update = apply_step_guard(0, text_response("still done"));
        assert_eq!(update.messages[0].text(), "still done");
        assert_eq!(update.remaining_steps, Some(0));
    }
}
