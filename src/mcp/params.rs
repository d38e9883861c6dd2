//! MCP tool parameter types.
//!
//! Input schemas for MCP tools, generated with `schemars`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the `web_search` MCP tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct WebSearchParams {
    /// Search query text.
    pub query: String,
}

/// Parameters for the `ask_chef` MCP tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AskChefParams {
    /// Leftover ingredients, or a follow-up request about a recipe.
    pub ingredients: String,
}
