//! Provider-agnostic message types for LLM communication.
//!
//! These types keep the agent loop independent of any particular SDK; the
//! provider implementation converts them at the edge.

use serde::{Deserialize, Serialize};

use super::tool::{ToolCall, ToolDefinition};

/// Role of a chat message participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System instructions.
    System,
    /// User input.
    User,
    /// Assistant response.
    Assistant,
    /// Tool result.
    Tool,
}

/// A single chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message sender.
    pub role: Role,
    /// Message content.
    pub content: String,
    /// Tool calls requested by the assistant (only for `Role::Assistant`).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
    /// Tool call ID this message responds to (only for `Role::Tool`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

/// A chat completion request (provider-agnostic).
#[derive(Debug, Clone)]
pub struct ChatRequest {
    /// Model identifier (e.g., "gemini-2.5-flash").
    pub model: String,
    /// Ordered conversation messages.
    pub messages: Vec<ChatMessage>,
    /// Sampling temperature. Forwarded as-is, including `0.0`.
    pub temperature: Option<f32>,
    /// Maximum tokens to generate.
    pub max_tokens: Option<u32>,
    /// Tool definitions available to the model.
    pub tools: Vec<ToolDefinition>,
}

/// Token usage statistics from a completion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Tokens consumed by the prompt.
    pub prompt_tokens: u32,
    /// Tokens generated in the completion.
    pub completion_tokens: u32,
    /// Total tokens used.
    pub total_tokens: u32,
}

impl TokenUsage {
    /// Adds another call's usage to this running total.
    pub fn accumulate(&mut self, other: &Self) {
        self.prompt_tokens = self.prompt_tokens.saturating_add(other.prompt_tokens);
        self.completion_tokens = self
            .completion_tokens
            .saturating_add(other.completion_tokens);
        self.total_tokens = self.total_tokens.saturating_add(other.total_tokens);
    }
}

/// A chat completion response (provider-agnostic).
#[derive(Debug, Clone)]
pub struct ChatResponse {
    /// Generated text content.
    pub content: String,
    /// Token usage statistics.
    pub usage: TokenUsage,
    /// Tool calls requested by the model.
    pub tool_calls: Vec<ToolCall>,
    /// Finish reason from the model (e.g., `"stop"`, `"tool_calls"`).
    pub finish_reason: Option<String>,
}

/// Creates a system message.
#[must_use]
pub fn system_message(content: &str) -> ChatMessage {
    ChatMessage {
        role: Role::System,
        content: content.to_string(),
        tool_calls: Vec::new(),
        tool_call_id: None,
    }
}

/// Creates a user message.
#[must_use]
pub fn user_message(content: &str) -> ChatMessage {
    ChatMessage {
        role: Role::User,
        content: content.to_string(),
        tool_calls: Vec::new(),
        tool_call_id: None,
    }
}

/// Creates a plain assistant text message.
#[must_use]
pub fn assistant_message(content: &str) -> ChatMessage {
    ChatMessage {
        role: Role::Assistant,
        content: content.to_string(),
        tool_calls: Vec::new(),
        tool_call_id: None,
    }
}

/// Creates an assistant message carrying tool calls.
///
/// Some models emit a short preamble alongside their tool calls; it is kept
/// so the transcript stays faithful.
#[must_use]
pub fn assistant_tool_calls_message(content: &str, tool_calls: Vec<ToolCall>) -> ChatMessage {
    ChatMessage {
        role: Role::Assistant,
        content: content.to_string(),
        tool_calls,
        tool_call_id: None,
    }
}

/// Creates a tool result message.
#[must_use]
pub fn tool_message(tool_call_id: &str, content: &str) -> ChatMessage {
    ChatMessage {
        role: Role::Tool,
        content: content.to_string(),
        tool_calls: Vec::new(),
        tool_call_id: Some(tool_call_id.to_string()),
    }
}
