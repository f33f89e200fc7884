//! Message types for shopkeep's conversation history.
//!
//! Provides a structured [`Message`] type with [`Role`] and [`Content`] enums
//! that represent conversation turns. Assistant turns that used tools carry
//! [`Part::ToolCall`] parts, and the matching [`Part::ToolResult`] parts live in
//! a following [`Role::Tool`] message. These are shopkeep's internal types,
//! converted to rig-core messages when sent to the LLM.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::catalog::Product;

/// A tool invocation requested by the LLM. Immutable once emitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Unique identifier for this tool call (used to match results).
    pub id: String,
    /// Name of the tool to invoke.
    pub name: String,
    /// JSON arguments to pass to the tool.
    pub arguments: Value,
    /// Provider-side call id, distinct from `id` on APIs that keep both
    /// (OpenAI Responses). Replayed with the call and its result.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_id: Option<String>,
}

/// The outcome of one tool call, paired with its [`ToolCall`] by `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    pub id: String,
    pub name: String,
    pub payload: ToolPayload,
}

/// What a tool handed back to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ToolPayload {
    Products { products: Vec<Product> },
    Error { message: String },
}

impl ToolPayload {
    pub fn is_error(&self) -> bool {
        matches!(self, ToolPayload::Error { .. })
    }

    /// Serialized form sent back to the model as the tool result body.
    pub fn to_model_text(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| format!("{{\"status\":\"error\",\"message\":\"{e}\"}}"))
    }
}

/// One typed piece of a structured message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Part {
    Text { text: String },
    ToolCall(ToolCall),
    ToolResult(ToolResult),
}

/// A single message in a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: Content,
}

/// The role of a message sender in the conversation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    Tool,
}

/// Message content: plain text, or an ordered sequence of typed parts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Content {
    Text(String),
    Parts(Vec<Part>),
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: Content::Text(text.into()),
        }
    }

    #[cfg(test)]
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: Content::Text(text.into()),
        }
    }

    /// Assistant turn: the answer text first, then its tool calls in emission order.
    pub fn assistant_with_calls(text: impl Into<String>, calls: &[ToolCall]) -> Self {
        let mut parts = Vec::with_capacity(calls.len() + 1);
        parts.push(Part::Text { text: text.into() });
        parts.extend(calls.iter().cloned().map(Part::ToolCall));
        Self {
            role: Role::Assistant,
            content: Content::Parts(parts),
        }
    }

    /// Tool turn carrying results in completion order.
    pub fn tool_results(results: &[ToolResult]) -> Self {
        Self {
            role: Role::Tool,
            content: Content::Parts(results.iter().cloned().map(Part::ToolResult).collect()),
        }
    }

    /// Concatenated text of the message, ignoring tool parts.
    pub fn text(&self) -> String {
        match &self.content {
            Content::Text(s) => s.clone(),
            Content::Parts(parts) => parts
                .iter()
                .filter_map(|p| match p {
                    Part::Text { text } => Some(text.as_str()),
                    _ => None,
                })
                .collect::<Vec<_>>()
                .join(""),
        }
    }

    /// Borrowed view of the message parts (empty for plain text).
    pub fn parts(&self) -> &[Part] {
        match &self.content {
            Content::Text(_) => &[],
            Content::Parts(parts) => parts,
        }
    }

    pub fn tool_calls(&self) -> impl Iterator<Item = &ToolCall> {
        self.parts().iter().filter_map(|p| match p {
            Part::ToolCall(call) => Some(call),
            _ => None,
        })
    }

    pub fn tool_results_iter(&self) -> impl Iterator<Item = &ToolResult> {
        self.parts().iter().filter_map(|p| match p {
            Part::ToolResult(result) => Some(result),
            _ => None,
        })
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "you"),
            Role::Assistant => write!(f, "shopkeep"),
            Role::Tool => write!(f, "tool"),
        }
    }
}
