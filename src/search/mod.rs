//! Web search layer.
//!
//! [`SearchProvider`] is the seam between the agent and a concrete search
//! backend. [`TavilyClient`] is the production backend;
//! [`WebSearchTool`] adapts any provider to the agent's tool-calling
//! convention.

pub mod adapter;
pub mod tavily;

use async_trait::async_trait;

use crate::error::SearchError;

pub use adapter::WebSearchTool;
pub use tavily::{TavilyClient, TavilyConfig, TavilyConfigBuilder};

/// Provider-defined search result.
///
/// An open mapping whose shape belongs entirely to the provider. Nothing in
/// this crate validates or reshapes its contents.
pub type SearchResult = serde_json::Map<String, serde_json::Value>;

/// A web search backend.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Provider name for logging (e.g. `"tavily"`).
    fn name(&self) -> &'static str;

    /// Runs one search for `query`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError`] on transport failures, non-success statuses,
    /// or a response body that is not a JSON object.
    async fn search(&self, query: &str) -> Result<SearchResult, SearchError>;
}
