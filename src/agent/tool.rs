//! Tool abstraction for function-calling.
//!
//! A [`Tool`] is a named, described capability with a JSON Schema for its
//! parameters. Agents hold their tools in a [`ToolSet`], which renders
//! provider-facing [`ToolDefinition`]s and dispatches model-issued
//! [`ToolCall`]s to the matching implementation.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AgentError;

/// A tool definition that can be sent to an LLM for function-calling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Tool name (must match [`Tool::name`] of a registered tool).
    pub name: String,
    /// Human-readable description of what the tool does.
    pub description: String,
    /// JSON Schema object describing the tool's parameters.
    pub parameters: Value,
}

/// A tool call requested by the LLM.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Unique identifier for this call (assigned by the provider).
    pub id: String,
    /// Name of the tool to invoke.
    pub name: String,
    /// JSON-encoded arguments for the tool.
    pub arguments: String,
}

/// The result of executing a tool call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// ID of the tool call this result corresponds to.
    pub tool_call_id: String,
    /// JSON-encoded tool output, or `{"error": ...}` when the call was rejected.
    pub content: String,
    /// Whether the call was rejected before or by argument validation.
    #[serde(default)]
    pub is_error: bool,
}

impl ToolResult {
    fn rejected(call: &ToolCall, err: &AgentError) -> Self {
        Self {
            tool_call_id: call.id.clone(),
            content: serde_json::json!({ "error": err.to_string() }).to_string(),
            is_error: true,
        }
    }
}

/// A capability an agent can invoke.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Name the model uses to call this tool.
    fn name(&self) -> &str;

    /// One-line description shown to the model.
    fn description(&self) -> &str;

    /// JSON Schema for the tool's arguments.
    fn parameters(&self) -> Value;

    /// Invokes the tool with already-decoded JSON arguments.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::InvalidToolArguments`] when `args` does not
    /// match the schema, or whatever error the underlying capability raised.
    async fn invoke(&self, args: Value) -> Result<Value, AgentError>;

    /// Provider-facing definition of this tool.
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters(),
        }
    }
}

/// The set of tools available to an agent.
#[derive(Clone, Default)]
pub struct ToolSet {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolSet {
    /// Empty tool set (no tools available).
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Returns this set with `tool` appended.
    #[must_use]
    pub fn with_tool(mut self, tool: Arc<dyn Tool>) -> Self {
        self.tools.push(tool);
        self
    }

    /// Returns the definitions of all tools, in registration order.
    #[must_use]
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|t| t.definition()).collect()
    }

    /// Returns the names of all tools, in registration order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    /// Looks up a tool by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name)
    }

    /// Returns `true` if this set contains no tools.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Returns the number of tools in this set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Decodes a model-issued call and runs the named tool.
    ///
    /// Mistakes on the model's side (an unregistered tool name, malformed
    /// argument JSON, arguments the tool rejects) come back as an error
    /// [`ToolResult`] so the model can correct itself.
    ///
    /// # Errors
    ///
    /// Propagates any other error the tool returns, such as a
    /// [`SearchError`](crate::error::SearchError) from the search provider.
    pub async fn dispatch(&self, call: &ToolCall) -> Result<ToolResult, AgentError> {
        let Some(tool) = self.get(&call.name) else {
            let err = AgentError::UnknownTool {
                name: call.name.clone(),
            };
            return Ok(ToolResult::rejected(call, &err));
        };

        // Some providers send an empty string for zero-argument calls.
        let raw = if call.arguments.trim().is_empty() {
            "{}"
        } else {
            call.arguments.as_str()
        };
        let args: Value = match serde_json::from_str(raw) {
            Ok(args) => args,
            Err(e) => {
                let err = AgentError::InvalidToolArguments {
                    name: call.name.clone(),
                    message: e.to_string(),
                };
                return Ok(ToolResult::rejected(call, &err));
            }
        };

        match tool.invoke(args).await {
            Ok(output) => Ok(ToolResult {
                tool_call_id: call.id.clone(),
                content: serde_json::to_string(&output)?,
                is_error: false,
            }),
            Err(err @ AgentError::InvalidToolArguments { .. }) => {
                Ok(ToolResult::rejected(call, &err))
            }
            Err(err) => Err(err),
        }
    }
}

impl std::fmt::Debug for ToolSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
