//! MCP server implementation for chef-agent.

use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{ErrorData as McpError, ServerHandler, tool, tool_handler, tool_router};
use serde_json::json;
use tracing::info;

use crate::agent::{ChefAgent, LlmProvider, execute_with_tools};
use crate::search::WebSearchTool;

use super::params::{AskChefParams, WebSearchParams};

/// chef-agent MCP server.
///
/// Provides the raw `web_search` tool and the full `ask_chef` agent turn.
#[derive(Clone)]
pub struct ChefMcpServer {
    tool_router: ToolRouter<Self>,
    agent: Arc<ChefAgent>,
    provider: Arc<dyn LlmProvider>,
    search: WebSearchTool,
}

#[tool_router]
impl ChefMcpServer {
    /// Search the web and return the provider's result unchanged.
    #[tool(
        name = "web_search",
        description = "Search the web for information. Returns the search provider's JSON result unchanged."
    )]
    async fn web_search(
        &self,
        Parameters(params): Parameters<WebSearchParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = self
            .search
            .search(&params.query)
            .await
            .map_err(|e| McpError::internal_error(format!("Search failed: {e}"), None))?;

        let json = serde_json::to_string_pretty(&result)
            .map_err(|e| McpError::internal_error(format!("Serialization error: {e}"), None))?;

        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    /// Ask the personal chef for recipes using the given ingredients.
    #[tool(
        name = "ask_chef",
        description = "Ask the personal chef agent for recipe suggestions. Give it the ingredients you have left over; it searches the web and returns recipe ideas, or full instructions when asked."
    )]
    async fn ask_chef(
        &self,
        Parameters(params): Parameters<AskChefParams>,
    ) -> Result<CallToolResult, McpError> {
        let response = execute_with_tools(
            self.agent.as_ref(),
            self.provider.as_ref(),
            &params.ingredients,
        )
        .await
        .map_err(|e| McpError::internal_error(format!("Agent turn failed: {e}"), None))?;

        info!(
            total_tokens = response.usage.total_tokens,
            "ask_chef complete"
        );

        let json = serde_json::to_string_pretty(&json!({
            "response": response.content,
            "model": self.agent.config().model,
            "usage": response.usage,
            "finish_reason": response.finish_reason,
        }))
        .map_err(|e| McpError::internal_error(format!("Serialization error: {e}"), None))?;

        Ok(CallToolResult::success(vec![Content::text(json)]))
    }
}

#[tool_handler]
impl ServerHandler for ChefMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "chef-agent".to_string(),
                title: Some("Personal Chef MCP Server".to_string()),
                version: env!("CARGO_PKG_VERSION").to_string(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Personal chef agent. Use `ask_chef` with a list of leftover ingredients to get \
                 recipe suggestions, or `web_search` for a raw web search."
                    .to_string(),
            ),
        }
    }
}

impl ChefMcpServer {
    /// Creates a new MCP server.
    ///
    /// `search` should be the same tool the agent was configured with so
    /// both MCP tools hit the same provider.
    #[must_use]
    pub fn new(agent: ChefAgent, provider: Arc<dyn LlmProvider>, search: WebSearchTool) -> Self {
        Self {
            tool_router: Self::tool_router(),
            agent: Arc::new(agent),
            provider,
            search,
        }
    }
}
