//! Conversation state threaded through the agent graph.

use serde::{Deserialize, Serialize};

use crate::types::{ModelMessage, Role};

/// Step budget for a thread that has no checkpoint yet.
pub const DEFAULT_STEP_BUDGET: u32 = 10;

/// Messages of one conversation thread plus its remaining step budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentState {
    pub messages: Vec<ModelMessage>,
    pub remaining_steps: u32,
}

impl Default for AgentState {
    fn default() -> Self {
        Self::new(DEFAULT_STEP_BUDGET)
    }
}

impl AgentState {
    pub fn new(remaining_steps: u32) -> Self {
        Self {
            messages: Vec::new(),
            remaining_steps,
        }
    }

    pub fn last_message(&self) -> Option<&ModelMessage> {
        self.messages.last()
    }

    pub fn has_system_message(&self) -> bool {
        self.messages.iter().any(|m| m.role == Role::System)
    }

    /// Text of the last assistant message, if any.
    pub fn final_answer(&self) -> Option<String> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == Role::Assistant && !m.has_tool_calls())
            .map(ModelMessage::text)
    }
}

/// Partial state returned by a node and merged into [`AgentState`].
///
/// Messages are appended; `remaining_steps` replaces the counter only when set.
#[derive(Debug, Clone, PartialEq)]
pub struct StateUpdate {
    pub messages: Vec<ModelMessage>,
    pub remaining_steps: Option<u32>,
}

impl StateUpdate {
    pub fn apply(self, state: &mut AgentState) {
        state.messages.extend(self.messages);
        if let Some(remaining) = self.remaining_steps {
            state.remaining_steps = remaining;
        }
    }
}
