//! Message types for model communication.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Width of the title bar drawn by [`ModelMessage::pretty`].
const TITLE_WIDTH: usize = 80;

/// A message in a conversation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelMessage {
    pub role: Role,
    pub content: Vec<ContentPart>,
    /// Tool name for tool-result messages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl ModelMessage {
    fn text_message(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            content: vec![ContentPart::Text { text: text.into() }],
            name: None,
            timestamp: Some(Utc::now()),
        }
    }

    /// Create a system message.
    pub fn system(text: impl Into<String>) -> Self {
        Self::text_message(Role::System, text)
    }

    /// Create a user message.
    pub fn user(text: impl Into<String>) -> Self {
        Self::text_message(Role::User, text)
    }

    /// Create an assistant message.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::text_message(Role::Assistant, text)
    }

    /// Create an assistant message that requests tool calls.
    ///
    /// Empty text is dropped so the message carries only the calls.
    pub fn assistant_with_tool_calls(text: impl Into<String>, calls: Vec<AgentToolCall>) -> Self {
        let text = text.into();
        let mut content = Vec::with_capacity(calls.len() + 1);
        if !text.is_empty() {
            content.push(ContentPart::Text { text });
        }
        content.extend(calls.into_iter().map(ContentPart::ToolCall));
        Self {
            role: Role::Assistant,
            content,
            name: None,
            timestamp: Some(Utc::now()),
        }
    }

    /// Create a tool result message.
    pub fn tool_result(
        tool_call_id: impl Into<String>,
        tool_name: impl Into<String>,
        result: serde_json::Value,
        is_error: bool,
    ) -> Self {
        Self {
            role: Role::Tool,
            content: vec![ContentPart::ToolResult(AgentToolResult {
                tool_call_id: tool_call_id.into(),
                result,
                is_error,
            })],
            name: Some(tool_name.into()),
            timestamp: Some(Utc::now()),
        }
    }

    /// Extract the text content, concatenating all text parts.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|part| match part {
                ContentPart::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("")
    }

    /// Extract tool calls from this message.
    pub fn tool_calls(&self) -> Vec<&AgentToolCall> {
        self.content
            .iter()
            .filter_map(|part| match part {
                ContentPart::ToolCall(tc) => Some(tc),
                _ => None,
            })
            .collect()
    }

    pub fn has_tool_calls(&self) -> bool {
        self.content
            .iter()
            .any(|part| matches!(part, ContentPart::ToolCall(_)))
    }

    /// Extract the tool result carried by a tool message.
    pub fn tool_result_part(&self) -> Option<&AgentToolResult> {
        self.content.iter().find_map(|part| match part {
            ContentPart::ToolResult(tr) => Some(tr),
            _ => None,
        })
    }

    /// Render the message for terminal output: a centered title bar followed
    /// by the content and any tool calls.
    pub fn pretty(&self) -> String {
        let mut out = title_bar(self.role.title());
        if let Some(ref name) = self.name {
            out.push_str(&format!("\nName: {name}"));
        }
        out.push_str("\n\n");

        match self.tool_result_part() {
            Some(tr) => out.push_str(&render_tool_output(&tr.result)),
            None => out.push_str(&self.text()),
        }

        let calls = self.tool_calls();
        if !calls.is_empty() {
            if !self.text().is_empty() {
                out.push('\n');
            }
            out.push_str("Tool Calls:");
            for call in calls {
                out.push_str(&format!("\n  {} ({})", call.name, call.id));
                out.push_str(&format!("\n Call ID: {}", call.id));
                out.push_str("\n  Args:");
                match call.arguments.as_object() {
                    Some(args) => {
                        for (key, value) in args {
                            out.push_str(&format!("\n    {key}: {}", render_tool_output(value)));
                        }
                    }
                    None => out.push_str(&format!("\n    {}", call.arguments)),
                }
            }
        }
        out
    }
}

impl fmt::Display for ModelMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pretty())
    }
}

/// Center `title` in a bar of `=` characters, [`TITLE_WIDTH`] columns wide.
pub fn title_bar(title: &str) -> String {
    let padded = format!(" {title} ");
    let side = TITLE_WIDTH.saturating_sub(padded.len()) / 2;
    let left = "=".repeat(side);
    let right = if padded.len() % 2 == 1 {
        "=".repeat(side + 1)
    } else {
        left.clone()
    };
    format!("{left}{padded}{right}")
}

fn render_tool_output(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Conversation role.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

impl Role {
    /// Title used when the message is displayed.
    pub fn title(self) -> &'static str {
        match self {
            Self::System => "System Message",
            Self::User => "Human Message",
            Self::Assistant => "Ai Message",
            Self::Tool => "Tool Message",
        }
    }
}

/// A single part of message content.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ToolCall(AgentToolCall),
    ToolResult(AgentToolResult),
}

/// A tool call requested by the model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentToolCall {
    pub id: String,
    pub name: String,
    pub arguments: serde_json::Value,
}

/// A tool execution result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentToolResult {
    pub tool_call_id: String,
    pub result: serde_json::Value,
    #[serde(default)]
    pub is_error: bool,
}
