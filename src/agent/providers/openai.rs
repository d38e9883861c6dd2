//! `OpenAI`-compatible provider implementation using the `async-openai` crate.
//!
//! Serves both `OpenAI` and Gemini: Google exposes Gemini models through an
//! `OpenAI`-compatible chat completions endpoint, so only the base URL and
//! key differ.

use async_openai::Client;
use async_openai::config::OpenAIConfig;
use async_openai::types::{
    ChatCompletionMessageToolCall, ChatCompletionRequestAssistantMessage,
    ChatCompletionRequestAssistantMessageContent, ChatCompletionRequestMessage,
    ChatCompletionRequestSystemMessage, ChatCompletionRequestSystemMessageContent,
    ChatCompletionRequestToolMessage, ChatCompletionRequestToolMessageContent,
    ChatCompletionRequestUserMessage, ChatCompletionRequestUserMessageContent, ChatCompletionTool,
    ChatCompletionToolType, CreateChatCompletionRequest, FunctionCall, FunctionObject,
};
use async_trait::async_trait;
use tracing::debug;

use crate::agent::message::{ChatMessage, ChatRequest, ChatResponse, Role, TokenUsage};
use crate::agent::provider::LlmProvider;
use crate::agent::tool::ToolCall;
use crate::error::AgentError;

/// Gemini's `OpenAI`-compatible endpoint.
pub const GEMINI_OPENAI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";

/// `OpenAI`-compatible LLM provider.
pub struct OpenAiProvider {
    client: Client<OpenAIConfig>,
    name: &'static str,
}

impl OpenAiProvider {
    /// Creates a provider for the given key and optional base URL.
    ///
    /// `name` is reported by [`LlmProvider::name`] and in logs.
    #[must_use]
    pub fn new(name: &'static str, api_key: &str, base_url: Option<&str>) -> Self {
        let mut openai_config = OpenAIConfig::new().with_api_key(api_key);

        if let Some(base_url) = base_url {
            openai_config = openai_config.with_api_base(base_url.trim_end_matches('/'));
        }

        Self {
            client: Client::with_config(openai_config),
            name,
        }
    }

    /// Creates a provider talking to Gemini.
    #[must_use]
    pub fn gemini(api_key: &str) -> Self {
        Self::new("gemini", api_key, Some(GEMINI_OPENAI_BASE_URL))
    }

    /// Converts our message type to the `OpenAI` SDK type.
    fn convert_message(msg: &ChatMessage) -> ChatCompletionRequestMessage {
        match msg.role {
            Role::System => {
                ChatCompletionRequestMessage::System(ChatCompletionRequestSystemMessage {
                    content: ChatCompletionRequestSystemMessageContent::Text(msg.content.clone()),
                    name: None,
                })
            }
            Role::User => ChatCompletionRequestMessage::User(ChatCompletionRequestUserMessage {
                content: ChatCompletionRequestUserMessageContent::Text(msg.content.clone()),
                name: None,
            }),
            Role::Assistant => {
                let tool_calls = if msg.tool_calls.is_empty() {
                    None
                } else {
                    Some(
                        msg.tool_calls
                            .iter()
                            .map(|tc| ChatCompletionMessageToolCall {
                                id: tc.id.clone(),
                                r#type: ChatCompletionToolType::Function,
                                function: FunctionCall {
                                    name: tc.name.clone(),
                                    arguments: tc.arguments.clone(),
                                },
                            })
                            .collect(),
                    )
                };

                let content = if msg.content.is_empty() {
                    None
                } else {
                    Some(ChatCompletionRequestAssistantMessageContent::Text(
                        msg.content.clone(),
                    ))
                };

                #[allow(deprecated)]
                ChatCompletionRequestMessage::Assistant(ChatCompletionRequestAssistantMessage {
                    content,
                    name: None,
                    tool_calls,
                    refusal: None,
                    audio: None,
                    function_call: None,
                })
            }
            Role::Tool => ChatCompletionRequestMessage::Tool(ChatCompletionRequestToolMessage {
                content: ChatCompletionRequestToolMessageContent::Text(msg.content.clone()),
                tool_call_id: msg.tool_call_id.clone().unwrap_or_default(),
            }),
        }
    }

    /// Builds an `OpenAI` chat completion request from our generic request.
    fn build_request(request: &ChatRequest) -> CreateChatCompletionRequest {
        let messages: Vec<_> = request.messages.iter().map(Self::convert_message).collect();

        let tools = if request.tools.is_empty() {
            None
        } else {
            Some(
                request
                    .tools
                    .iter()
                    .map(|td| ChatCompletionTool {
                        r#type: ChatCompletionToolType::Function,
                        function: FunctionObject {
                            name: td.name.clone(),
                            description: Some(td.description.clone()),
                            parameters: Some(td.parameters.clone()),
                            strict: None,
                        },
                    })
                    .collect(),
            )
        };

        CreateChatCompletionRequest {
            model: request.model.clone(),
            messages,
            temperature: request.temperature,
            max_completion_tokens: request.max_tokens,
            tools,
            ..Default::default()
        }
    }
}

impl std::fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("name", &self.name)
            .field("client", &"<async-openai::Client>")
            .finish()
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, AgentError> {
        let openai_request = Self::build_request(request);
        debug!(
            provider = self.name,
            model = %request.model,
            messages = request.messages.len(),
            tools = request.tools.len(),
            "sending chat completion"
        );

        let response = self
            .client
            .chat()
            .create(openai_request)
            .await
            .map_err(|e| AgentError::ApiRequest {
                message: e.to_string(),
                status: None,
            })?;

        let choice = response.choices.first();

        let content = choice
            .and_then(|c| c.message.content.as_ref())
            .cloned()
            .unwrap_or_default();

        let tool_calls = choice
            .and_then(|c| c.message.tool_calls.as_ref())
            .map(|tcs| {
                tcs.iter()
                    .map(|tc| ToolCall {
                        id: tc.id.clone(),
                        name: tc.function.name.clone(),
                        arguments: tc.function.arguments.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        let finish_reason = choice.and_then(|c| {
            c.finish_reason
                .as_ref()
                .map(|fr| format!("{fr:?}").to_lowercase())
        });

        let usage = response
            .usage
            .map_or_else(TokenUsage::default, |u| TokenUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            });

        Ok(ChatResponse {
            content,
            usage,
            tool_calls,
            finish_reason,
        })
    }
}
