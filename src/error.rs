//! Error types for chef-agent.
//!
//! Each layer has its own error enum: [`SearchError`] for the web search
//! transport, [`AgentError`] for the model provider and tool-calling loop,
//! and [`CommandError`] for the CLI. [`Error`] unifies them for callers that
//! do not care which layer failed.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Agent or provider failure.
    #[error(transparent)]
    Agent(#[from] AgentError),

    /// Web search failure.
    #[error(transparent)]
    Search(#[from] SearchError),

    /// CLI command failure.
    #[error(transparent)]
    Command(#[from] CommandError),
}

/// Errors raised by a search provider.
///
/// The search tool hands these back to its caller untouched.
#[derive(Debug, Error)]
pub enum SearchError {
    /// No API key was configured for the search provider.
    #[error("search API key not found (set TAVILY_API_KEY)")]
    ApiKeyMissing,

    /// Transport-level failure (connection, TLS, timeout, body decode).
    #[error("search request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("search API error (HTTP {status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body or reason phrase.
        message: String,
    },

    /// The provider answered with JSON that is not an object.
    #[error("unexpected search response: expected a JSON object, got {kind}")]
    UnexpectedResponse {
        /// JSON kind that was received.
        kind: &'static str,
    },
}

/// Errors raised by the agent layer.
#[derive(Debug, Error)]
pub enum AgentError {
    /// No API key was configured for the model provider.
    #[error("model API key not found (set GEMINI_API_KEY or OPENAI_API_KEY)")]
    ApiKeyMissing,

    /// The model provider rejected or failed the request.
    #[error("model API request failed: {message}")]
    ApiRequest {
        /// Error description.
        message: String,
        /// HTTP status code, when known.
        status: Option<u16>,
    },

    /// The configured provider name is not recognised.
    #[error("unsupported provider: {name}")]
    UnsupportedProvider {
        /// Provider name that was requested.
        name: String,
    },

    /// The model kept requesting tools past the iteration limit.
    #[error("tool-calling loop exceeded {max_iterations} iterations")]
    ToolLoopExceeded {
        /// Limit that was hit.
        max_iterations: usize,
    },

    /// The model asked for a tool that is not registered.
    #[error("unknown tool: {name}")]
    UnknownTool {
        /// Requested tool name.
        name: String,
    },

    /// The model supplied arguments that do not match the tool schema.
    #[error("invalid arguments for tool '{name}': {message}")]
    InvalidToolArguments {
        /// Tool name.
        name: String,
        /// Parse or validation failure.
        message: String,
    },

    /// A search invoked through the web search tool failed.
    #[error(transparent)]
    Search(#[from] SearchError),

    /// JSON (de)serialization failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A system prompt file could not be read.
    #[error("failed to read prompt file {path}: {source}")]
    PromptFile {
        /// File that was requested.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Errors raised by CLI commands.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Command failed to execute.
    #[error("{0}")]
    ExecutionFailed(String),

    /// Output could not be formatted.
    #[error("output format error: {0}")]
    OutputFormat(String),

    /// Terminal I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_error_display() {
        let err = SearchError::Api {
            status: 401,
            message: "Unauthorized".to_string(),
        };
        assert_eq!(err.to_string(), "search API error (HTTP 401): Unauthorized");
    }

    #[test]
    fn test_agent_error_wraps_search_error_transparently() {
        let inner = SearchError::UnexpectedResponse { kind: "array" };
        let expected = inner.to_string();
        let err: AgentError = inner.into();
        assert_eq!(err.to_string(), expected);
    }

    #[test]
    fn test_top_level_conversion() {
        let err: Error = AgentError::ToolLoopExceeded { max_iterations: 3 }.into();
        assert!(matches!(
            err,
            Error::Agent(AgentError::ToolLoopExceeded { max_iterations: 3 })
        ));
    }
}
