//! The personal chef agent.
//!
//! [`ChefAgent`] binds an [`AgentConfig`] to the [`Agent`] trait. Single
//! questions go through [`execute_with_tools`](super::execute_with_tools);
//! interactive sessions keep their history in a [`Conversation`] and call
//! [`ChefAgent::respond`] once per user turn.

use async_trait::async_trait;
use tracing::info;

use super::agentic_loop::agentic_loop;
use super::config::AgentConfig;
use super::message::{ChatMessage, ChatRequest, assistant_message, system_message, user_message};
use super::provider::LlmProvider;
use super::tool::ToolSet;
use super::traits::{Agent, AgentResponse};
use crate::error::AgentError;

/// In-memory message history for one session.
///
/// Always starts with the system message. Lives only as long as the value.
#[derive(Debug, Clone)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
}

impl Conversation {
    /// Starts a conversation with the given system prompt.
    #[must_use]
    pub fn new(system_prompt: &str) -> Self {
        Self {
            messages: vec![system_message(system_prompt)],
        }
    }

    /// All messages so far, system message first.
    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Number of messages, including the system message.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Returns `true` if only the system message is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.len() <= 1
    }

    /// Drops everything but the system message.
    pub fn clear(&mut self) {
        self.messages.truncate(1);
    }
}

/// Personal chef: suggests recipes for leftover ingredients using web search.
#[derive(Debug, Clone)]
pub struct ChefAgent {
    config: AgentConfig,
}

impl ChefAgent {
    /// Creates the agent from its configuration.
    #[must_use]
    pub const fn new(config: AgentConfig) -> Self {
        Self { config }
    }

    /// The configuration this agent runs from.
    #[must_use]
    pub const fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Starts an empty conversation seeded with this agent's system prompt.
    #[must_use]
    pub fn conversation(&self) -> Conversation {
        Conversation::new(&self.config.system_prompt)
    }

    /// Runs one user turn within `conversation`.
    ///
    /// On success the user message, any tool traffic, and the assistant's
    /// answer are appended to the history. On failure the history is left
    /// as it was before the turn.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError`] on provider failures, tool failures, or when
    /// the tool loop exceeds its iteration limit.
    pub async fn respond(
        &self,
        provider: &dyn LlmProvider,
        conversation: &mut Conversation,
        user_msg: &str,
    ) -> Result<AgentResponse, AgentError> {
        let mut messages = conversation.messages.clone();
        messages.push(user_message(user_msg));

        let mut request = ChatRequest {
            model: self.model().to_string(),
            messages,
            temperature: Some(self.temperature()),
            max_tokens: self.max_tokens(),
            tools: self.tools().definitions(),
        };

        let response = agentic_loop(
            provider,
            &mut request,
            self.tools(),
            self.max_tool_iterations(),
        )
        .await?;

        info!(
            agent = self.name(),
            messages = request.messages.len(),
            total_tokens = response.usage.total_tokens,
            "turn complete"
        );

        request.messages.push(assistant_message(&response.content));
        conversation.messages = request.messages;

        Ok(AgentResponse {
            content: response.content,
            usage: response.usage,
            finish_reason: response.finish_reason,
        })
    }
}

#[async_trait]
impl Agent for ChefAgent {
    fn name(&self) -> &'static str {
        "personal_chef"
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    fn system_prompt(&self) -> &str {
        &self.config.system_prompt
    }

    fn temperature(&self) -> f32 {
        self.config.temperature
    }

    fn max_tokens(&self) -> Option<u32> {
        self.config.max_tokens
    }

    fn tools(&self) -> &ToolSet {
        &self.config.tools
    }

    fn max_tool_iterations(&self) -> usize {
        self.config.max_tool_iterations
    }
}
