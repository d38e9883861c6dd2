//! Command-line argument parsing.
//!
//! Defines the CLI structure using clap derive macros.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// chef-agent: a personal chef that finds recipes for your leftovers.
///
/// Give it the ingredients you have; it searches the web and suggests
/// recipes, with full instructions on request.
#[derive(Parser, Debug)]
#[command(name = "chef-agent")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to a `.env` file with API keys.
    ///
    /// Defaults to `.env` in the current directory, if present.
    #[arg(long, global = true, env = "CHEF_ENV_FILE")]
    pub env_file: Option<PathBuf>,

    /// Enable verbose output (debug logging and usage statistics).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json).
    #[arg(long, default_value = "text", global = true)]
    pub format: String,

    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Agent overrides shared by `ask`, `chat` and `mcp serve`.
#[derive(Args, Debug, Clone, Default)]
pub struct AgentArgs {
    /// Model identifier [env: CHEF_MODEL] (default: gemini-2.5-flash).
    #[arg(short, long)]
    pub model: Option<String>,

    /// Sampling temperature (default: 0.0).
    #[arg(short, long)]
    pub temperature: Option<f32>,

    /// Markdown file with a replacement system prompt [env: CHEF_SYSTEM_PROMPT_FILE].
    #[arg(long)]
    pub prompt_file: Option<PathBuf>,

    /// Maximum tool-calling rounds per turn.
    #[arg(long)]
    pub max_tool_iterations: Option<usize>,

    /// Maximum results per web search.
    #[arg(long)]
    pub max_results: Option<u32>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ask the chef once and print the answer.
    #[command(after_help = r#"Examples:
  chef-agent ask chicken rice broccoli
  chef-agent ask "two eggs, half an onion, stale bread"
  chef-agent --format json ask leeks potatoes | jq -r .response
"#)]
    Ask {
        /// Leftover ingredients (joined with spaces).
        #[arg(required = true, num_args = 1..)]
        ingredients: Vec<String>,

        /// Agent overrides.
        #[command(flatten)]
        agent: AgentArgs,
    },

    /// Start an interactive session with the chef.
    ///
    /// The conversation is kept in memory so you can ask follow-ups such as
    /// "how do I make the second one?". Type `/reset` to start over and
    /// `/quit` (or Ctrl-D) to leave.
    Chat {
        /// Agent overrides.
        #[command(flatten)]
        agent: AgentArgs,
    },

    /// Run the web search tool directly and print its raw result.
    #[command(after_help = r#"Examples:
  chef-agent search "recipes with chicken, rice, broccoli"
  chef-agent --format json search "leek and potato soup" | jq '.results[].url'
"#)]
    Search {
        /// Search query text.
        query: String,

        /// Maximum number of results.
        #[arg(short = 'k', long)]
        max_results: Option<u32>,

        /// Search depth: basic, advanced.
        #[arg(long)]
        depth: Option<String>,
    },

    /// Show the resolved configuration (secrets redacted).
    Config {
        /// Agent overrides to preview.
        #[command(flatten)]
        agent: AgentArgs,
    },

    /// Write the default system prompt to the prompt directory for editing.
    InitPrompt {
        /// Target directory (default: ~/.chef-agent/prompts).
        #[arg(long)]
        dir: Option<PathBuf>,
    },

    /// MCP server operations.
    #[cfg(feature = "mcp")]
    #[command(subcommand)]
    Mcp(McpCommands),
}

/// MCP subcommands.
#[cfg(feature = "mcp")]
#[derive(Subcommand, Debug)]
pub enum McpCommands {
    /// Serve the chef agent and web search tool over MCP.
    Serve {
        /// Transport: stdio or http.
        #[arg(long, default_value = "stdio")]
        transport: String,

        /// Host to bind for the http transport.
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind for the http transport.
        #[arg(long, default_value = "8808")]
        port: u16,

        /// Agent overrides.
        #[command(flatten)]
        agent: AgentArgs,
    },
}
