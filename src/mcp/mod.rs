//! MCP (Model Context Protocol) server for chef-agent.
//!
//! Exposes the `web_search` tool and the personal chef agent to external
//! MCP clients.
//!
//! # Feature Gate
//!
//! This module requires the `mcp` feature flag:
//! ```toml
//! [dependencies]
//! chef-agent = { version = "...", features = ["mcp"] }
//! ```
//!
//! # Architecture
//!
//! ```text
//! MCP Client
//!   ├── web_search(query)      → WebSearchTool → Tavily → raw result JSON
//!   └── ask_chef(ingredients)  → ChefAgent (agentic loop + web_search) → answer
//! ```

pub mod params;
pub mod server;
pub mod transport;

pub use params::{AskChefParams, WebSearchParams};
pub use server::ChefMcpServer;
pub use transport::{serve_http, serve_stdio};
