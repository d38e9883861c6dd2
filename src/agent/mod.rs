//! Personal chef agent.
//!
//! Wires a model provider, a tool-calling loop and the `web_search` tool
//! into a single agent.
//!
//! # Architecture
//!
//! ```text
//! User turn → ChefAgent (AgentConfig: model, temperature, prompt, tools)
//!   └── agentic_loop
//!         ├── LlmProvider::chat  (Gemini / OpenAI via async-openai)
//!         └── ToolSet::dispatch → WebSearchTool → SearchProvider (Tavily)
//! ```

pub mod agentic_loop;
pub mod chef;
pub mod client;
pub mod config;
pub mod message;
pub mod prompt;
pub mod provider;
pub mod providers;
pub mod tool;
pub mod traits;

// Re-export key types
pub use chef::{ChefAgent, Conversation};
pub use client::create_provider;
pub use config::{AgentConfig, AgentConfigBuilder, Credentials, Settings};
pub use message::{ChatMessage, ChatRequest, ChatResponse, Role, TokenUsage};
pub use prompt::PERSONAL_CHEF_SYSTEM_PROMPT;
pub use provider::LlmProvider;
pub use tool::{Tool, ToolCall, ToolDefinition, ToolResult, ToolSet};
pub use traits::{Agent, AgentResponse, execute_with_tools};
