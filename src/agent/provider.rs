//! Pluggable LLM provider trait.
//!
//! Implementations translate provider-agnostic [`ChatRequest`]/[`ChatResponse`]
//! into provider-specific SDK calls, so the agent loop never depends on a
//! particular vendor.

use async_trait::async_trait;

use super::message::{ChatRequest, ChatResponse};
use crate::error::AgentError;

/// Trait for LLM provider backends.
///
/// Implementations own the transport for a specific provider while
/// presenting a uniform interface to agents.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Provider name (e.g., `"gemini"`, `"openai"`).
    fn name(&self) -> &'static str;

    /// Executes a chat completion request.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError`] on API failures or unparseable responses.
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, AgentError>;
}
