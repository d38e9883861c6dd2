//! The `web_search` tool.
//!
//! Bridges the agent's tool-calling convention (`{"query": "..."}` in,
//! JSON value out) to a [`SearchProvider`]. One invocation is exactly one
//! provider call with the query string as given; the provider's result and
//! errors pass through untouched.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::debug;

use super::{SearchProvider, SearchResult};
use crate::agent::tool::Tool;
use crate::error::{AgentError, SearchError};

/// Tool name exposed to the model.
pub const WEB_SEARCH_TOOL_NAME: &str = "web_search";
/// Tool description exposed to the model.
pub const WEB_SEARCH_TOOL_DESCRIPTION: &str = "Search the web for information";

#[derive(Debug, Deserialize)]
struct WebSearchArgs {
    query: String,
}

/// Web search tool backed by a [`SearchProvider`].
#[derive(Clone)]
pub struct WebSearchTool {
    provider: Arc<dyn SearchProvider>,
}

impl WebSearchTool {
    /// Wraps a search provider.
    #[must_use]
    pub fn new(provider: Arc<dyn SearchProvider>) -> Self {
        Self { provider }
    }

    /// Runs a search directly, bypassing argument decoding.
    ///
    /// # Errors
    ///
    /// Returns the provider's [`SearchError`] unchanged.
    pub async fn search(&self, query: &str) -> Result<SearchResult, SearchError> {
        debug!(
            tool = WEB_SEARCH_TOOL_NAME,
            provider = self.provider.name(),
            query,
            "invoking search provider"
        );
        self.provider.search(query).await
    }
}

impl std::fmt::Debug for WebSearchTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebSearchTool")
            .field("provider", &self.provider.name())
            .finish()
    }
}

#[async_trait]
impl Tool for WebSearchTool {
    fn name(&self) -> &str {
        WEB_SEARCH_TOOL_NAME
    }

    fn description(&self) -> &str {
        WEB_SEARCH_TOOL_DESCRIPTION
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Search query text."
                }
            },
            "required": ["query"],
            "additionalProperties": false
        })
    }

    async fn invoke(&self, args: Value) -> Result<Value, AgentError> {
        let args: WebSearchArgs =
            serde_json::from_value(args).map_err(|e| AgentError::InvalidToolArguments {
                name: WEB_SEARCH_TOOL_NAME.to_string(),
                message: e.to_string(),
            })?;

        let result = self.search(&args.query).await?;
        Ok(Value::Object(result))
    }
}
