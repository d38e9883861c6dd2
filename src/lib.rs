//! # chef-agent
//!
//! A personal chef: give it the ingredients you have left over and it
//! searches the web for recipes that use them.
//!
//! The crate is split into layers:
//!
//! - [`search`]: the [`SearchProvider`](search::SearchProvider) seam, the
//!   Tavily client, and the `web_search` tool adapter.
//! - [`agent`]: chat messages, the [`LlmProvider`](agent::LlmProvider)
//!   trait and its OpenAI-compatible implementation (Gemini by default),
//!   the tool-calling loop, and the [`ChefAgent`](agent::ChefAgent).
//! - [`cli`]: the `chef-agent` command line.
//! - `mcp` (feature `mcp`): exposes the chef over the Model Context Protocol.
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use chef_agent::agent::{AgentConfig, ChefAgent, Credentials, create_provider, execute_with_tools};
//! use chef_agent::search::{TavilyClient, TavilyConfig};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let credentials = Credentials::from_env();
//! let search = Arc::new(TavilyClient::new(TavilyConfig::from_env()?)?);
//! let agent = ChefAgent::new(AgentConfig::personal_chef(search));
//! let provider = create_provider(&credentials)?;
//!
//! let answer = execute_with_tools(&agent, provider.as_ref(), "chicken, rice, broccoli").await?;
//! println!("{}", answer.content);
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod cli;
pub mod error;
#[cfg(feature = "mcp")]
pub mod mcp;
pub mod search;

pub use agent::{AgentConfig, ChefAgent, Conversation, Credentials, Settings};
pub use error::{AgentError, CommandError, Error, Result, SearchError};
pub use search::{SearchProvider, SearchResult, WebSearchTool};
