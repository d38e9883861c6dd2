//! Agent trait definition.

use async_trait::async_trait;

use super::message::{ChatRequest, TokenUsage, system_message, user_message};
use super::provider::LlmProvider;
use super::tool::ToolSet;
use crate::error::AgentError;

/// Response from an agent execution.
#[derive(Debug, Clone)]
pub struct AgentResponse {
    /// The agent's text output.
    pub content: String,
    /// Token usage summed over the turn.
    pub usage: TokenUsage,
    /// Why the model stopped generating (e.g. `"stop"`, `"length"`).
    pub finish_reason: Option<String>,
}

/// An agent: a persona (system prompt) bound to a model and a tool set.
///
/// The default methods describe a deterministic agent with no tools;
/// implementors override what they need.
#[async_trait]
pub trait Agent: Send + Sync {
    /// Agent name for logging and identification.
    fn name(&self) -> &'static str;

    /// Model identifier to use for this agent.
    fn model(&self) -> &str;

    /// System prompt that defines the agent's role and behavior.
    fn system_prompt(&self) -> &str;

    /// Sampling temperature (0.0 = deterministic, higher = more creative).
    fn temperature(&self) -> f32 {
        0.0
    }

    /// Maximum tokens for the response (provider default when `None`).
    fn max_tokens(&self) -> Option<u32> {
        None
    }

    /// Tools available to this agent.
    fn tools(&self) -> &ToolSet;

    /// Maximum tool-calling loop iterations before aborting.
    fn max_tool_iterations(&self) -> usize {
        10
    }

    /// Builds a request for this agent from the given user message.
    fn request(&self, user_msg: &str) -> ChatRequest {
        ChatRequest {
            model: self.model().to_string(),
            messages: vec![system_message(self.system_prompt()), user_message(user_msg)],
            temperature: Some(self.temperature()),
            max_tokens: self.max_tokens(),
            tools: self.tools().definitions(),
        }
    }

    /// Executes the agent with the given user message (no tools).
    ///
    /// # Errors
    ///
    /// Returns [`AgentError`] on API failures or response parsing errors.
    async fn execute(
        &self,
        provider: &dyn LlmProvider,
        user_msg: &str,
    ) -> Result<AgentResponse, AgentError> {
        let mut request = self.request(user_msg);
        request.tools.clear();

        let response = provider.chat(&request).await?;

        Ok(AgentResponse {
            content: response.content,
            usage: response.usage,
            finish_reason: response.finish_reason,
        })
    }
}

/// Executes a single-turn request with tool-calling support.
///
/// If the agent has tools, runs the agentic loop; otherwise falls through to
/// [`Agent::execute`].
///
/// # Errors
///
/// Returns [`AgentError`] on API failures, tool failures, or if the tool
/// loop exceeds the agent's max iterations.
pub async fn execute_with_tools(
    agent: &dyn Agent,
    provider: &dyn LlmProvider,
    user_msg: &str,
) -> Result<AgentResponse, AgentError> {
    if agent.tools().is_empty() {
        return agent.execute(provider, user_msg).await;
    }

    let mut request = agent.request(user_msg);

    let response = super::agentic_loop::agentic_loop(
        provider,
        &mut request,
        agent.tools(),
        agent.max_tool_iterations(),
    )
    .await?;

    Ok(AgentResponse {
        content: response.content,
        usage: response.usage,
        finish_reason: response.finish_reason,
    })
}
