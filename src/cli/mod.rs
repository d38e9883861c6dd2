//! CLI layer for chef-agent.
//!
//! Provides the command-line interface using clap: one-shot questions,
//! an interactive chat session, direct web search, configuration display,
//! and (with the `mcp` feature) an MCP server.

pub mod commands;
pub mod output;
pub mod parser;

pub use commands::execute;
pub use output::OutputFormat;
#[cfg(feature = "mcp")]
pub use parser::McpCommands;
pub use parser::{AgentArgs, Cli, Commands};
