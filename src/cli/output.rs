//! Output formatting for CLI commands.

use std::fmt::Write;

use serde_json::{Value, json};

use crate::agent::{AgentConfig, AgentResponse, Credentials};
use crate::search::SearchResult;

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

impl OutputFormat {
    /// Parses a format name; anything unrecognised falls back to text.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

fn to_pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Formats an agent answer.
#[must_use]
pub fn format_response(
    response: &AgentResponse,
    model: &str,
    verbose: bool,
    format: OutputFormat,
) -> String {
    match format {
        OutputFormat::Text => {
            let mut output = response.content.clone();
            if verbose {
                let _ = write!(
                    output,
                    "\n\n---\nModel: {model} | Tokens: {} ({} prompt, {} completion) | Finish: {}",
                    response.usage.total_tokens,
                    response.usage.prompt_tokens,
                    response.usage.completion_tokens,
                    response.finish_reason.as_deref().unwrap_or("unknown"),
                );
            }
            output
        }
        OutputFormat::Json => to_pretty(&json!({
            "response": response.content,
            "model": model,
            "usage": response.usage,
            "finish_reason": response.finish_reason,
        })),
    }
}

/// Formats a raw search result.
///
/// JSON output is the provider's mapping as-is. Text output lists
/// `title` / `url` pairs when the result carries a `results` array and
/// falls back to pretty JSON otherwise.
#[must_use]
pub fn format_search_result(result: &SearchResult, format: OutputFormat) -> String {
    let raw = Value::Object(result.clone());
    if format == OutputFormat::Json {
        return to_pretty(&raw);
    }

    let Some(items) = result.get("results").and_then(Value::as_array) else {
        return to_pretty(&raw);
    };

    let mut output = String::new();
    if let Some(answer) = result.get("answer").and_then(Value::as_str) {
        let _ = writeln!(output, "Answer: {answer}\n");
    }
    if items.is_empty() {
        output.push_str("No results.");
        return output;
    }
    for (i, item) in items.iter().enumerate() {
        let title = item.get("title").and_then(Value::as_str).unwrap_or("(untitled)");
        let url = item.get("url").and_then(Value::as_str).unwrap_or("");
        let _ = writeln!(output, "{}. {title}\n   {url}", i + 1);
    }
    output.trim_end().to_string()
}

/// Formats the resolved configuration with secrets redacted.
#[must_use]
pub fn format_config(config: &AgentConfig, credentials: &Credentials, format: OutputFormat) -> String {
    let key_state = |k: &Option<String>| {
        if k.as_deref().is_some_and(|k| !k.is_empty()) {
            "set"
        } else {
            "missing"
        }
    };

    match format {
        OutputFormat::Text => {
            let mut output = String::new();
            let _ = writeln!(output, "Provider:             {}", credentials.provider);
            let _ = writeln!(output, "Model:                {}", config.model);
            let _ = writeln!(output, "Temperature:          {}", config.temperature);
            let tools = config.tools.names();
            let tools = if tools.is_empty() {
                "none".to_string()
            } else {
                tools.join(", ")
            };
            let _ = writeln!(output, "Tools:                {tools}");
            let _ = writeln!(output, "Max tool iterations:  {}", config.max_tool_iterations);
            let _ = writeln!(
                output,
                "LLM base URL:         {}",
                credentials.llm_base_url.as_deref().unwrap_or("(provider default)")
            );
            let _ = writeln!(output, "LLM API key:          {}", key_state(&credentials.llm_api_key));
            let _ = writeln!(output, "Search API key:       {}", key_state(&credentials.search_api_key));
            let _ = write!(output, "\nSystem prompt:\n{}", config.system_prompt);
            output
        }
        OutputFormat::Json => to_pretty(&json!({
            "provider": credentials.provider,
            "model": config.model,
            "temperature": config.temperature,
            "tools": config.tools.definitions(),
            "max_tool_iterations": config.max_tool_iterations,
            "llm_base_url": credentials.llm_base_url,
            "llm_api_key": key_state(&credentials.llm_api_key),
            "search_api_key": key_state(&credentials.search_api_key),
            "system_prompt": config.system_prompt,
        })),
    }
}
