//! Agentic tool-calling loop.
//!
//! Drives the LLM ↔ tool execution round-trip: sends a request to the model,
//! executes any tool calls in the response, appends results, and repeats
//! until the model produces a final text response or the iteration limit
//! is reached.

use tracing::debug;

use super::message::{ChatRequest, ChatResponse, assistant_tool_calls_message, tool_message};
use super::provider::LlmProvider;
use super::tool::ToolSet;
use crate::error::AgentError;

/// Runs an agentic loop: model → tool calls → tool results → model → …
///
/// Continues until the model responds without tool calls (i.e., it produces
/// a final text answer) or it asks for tools more than `max_iterations`
/// times. The model is always called at least once, so a limit of zero
/// still allows a direct answer.
///
/// # Arguments
///
/// * `provider` - LLM provider to call.
/// * `request` - Chat request; tool traffic is appended to its messages.
/// * `tools` - Dispatches tool calls to their implementations.
/// * `max_iterations` - Maximum number of tool rounds.
///
/// # Returns
///
/// The final [`ChatResponse`] with `usage` summed over every model call in
/// the loop.
///
/// # Errors
///
/// Returns [`AgentError::ToolLoopExceeded`] if the model keeps requesting
/// tools beyond `max_iterations`. Provider errors and tool errors (such as
/// a failed search) end the turn unchanged. Unknown tools and bad
/// arguments are reported back to the model as error tool messages.
pub async fn agentic_loop(
    provider: &dyn LlmProvider,
    request: &mut ChatRequest,
    tools: &ToolSet,
    max_iterations: usize,
) -> Result<ChatResponse, AgentError> {
    let mut usage = super::message::TokenUsage::default();

    for iteration in 0..=max_iterations {
        let mut response = provider.chat(request).await?;
        usage.accumulate(&response.usage);

        if response.tool_calls.is_empty() {
            debug!(iteration, "agentic loop completed with final text response");
            response.usage = usage;
            return Ok(response);
        }
        if iteration == max_iterations {
            break;
        }

        debug!(
            iteration,
            tool_count = response.tool_calls.len(),
            "executing tool calls"
        );

        request.messages.push(assistant_tool_calls_message(
            &response.content,
            response.tool_calls.clone(),
        ));

        for call in &response.tool_calls {
            let result = tools.dispatch(call).await?;
            debug!(
                tool = %call.name,
                call_id = %call.id,
                is_error = result.is_error,
                bytes = result.content.len(),
                "tool execution complete"
            );
            request
                .messages
                .push(tool_message(&result.tool_call_id, &result.content));
        }
    }

    Err(AgentError::ToolLoopExceeded { max_iterations })
}

#[cfg(test)]
#[allow(clippy::panic)]
pub(crate) mod tests {
    use super::*;
    use crate::agent::message::{
        ChatRequest, ChatResponse, Role, TokenUsage, system_message, user_message,
    };
    use crate::agent::tool::ToolCall;
    use crate::error::{AgentError, SearchError};
    use crate::search::{SearchProvider, SearchResult, WebSearchTool};

    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use serde_json::json;

    /// Mock provider that asks for `web_search` on the first N calls,
    /// then returns a final text response.
    pub(crate) struct MockToolProvider {
        pub(crate) call_count: AtomicUsize,
        tool_rounds: usize,
    }

    impl MockToolProvider {
        pub(crate) const fn new(tool_rounds: usize) -> Self {
            Self {
                call_count: AtomicUsize::new(0),
                tool_rounds,
            }
        }
    }

    #[async_trait]
    impl LlmProvider for MockToolProvider {
        fn name(&self) -> &'static str {
            "mock"
        }

        async fn chat(&self, _request: &ChatRequest) -> Result<ChatResponse, AgentError> {
            let count = self.call_count.fetch_add(1, Ordering::SeqCst);

            if count < self.tool_rounds {
                Ok(ChatResponse {
                    content: String::new(),
                    usage: TokenUsage {
                        prompt_tokens: 10,
                        completion_tokens: 2,
                        total_tokens: 12,
                    },
                    tool_calls: vec![ToolCall {
                        id: format!("call_{count}"),
                        name: "web_search".to_string(),
                        arguments: r#"{"query":"chicken, rice, broccoli"}"#.to_string(),
                    }],
                    finish_reason: Some("tool_calls".to_string()),
                })
            } else {
                Ok(ChatResponse {
                    content: "Try a chicken and broccoli stir-fry over rice.".to_string(),
                    usage: TokenUsage {
                        prompt_tokens: 100,
                        completion_tokens: 20,
                        total_tokens: 120,
                    },
                    tool_calls: Vec::new(),
                    finish_reason: Some("stop".to_string()),
                })
            }
        }
    }

    /// Search provider returning a fixed map, or failing when `fail` is set.
    pub(crate) struct StubSearch {
        pub(crate) calls: AtomicUsize,
        fail: bool,
    }

    impl StubSearch {
        pub(crate) const fn ok() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail: false,
            }
        }

        pub(crate) const fn failing() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail: true,
            }
        }
    }

    #[async_trait]
    impl SearchProvider for StubSearch {
        fn name(&self) -> &'static str {
            "stub"
        }

        async fn search(&self, query: &str) -> Result<SearchResult, SearchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(SearchError::Api {
                    status: 500,
                    message: "boom".to_string(),
                });
            }
            let mut map = SearchResult::new();
            map.insert("query".to_string(), json!(query));
            map.insert("results".to_string(), json!([{"title": "Fried rice"}]));
            Ok(map)
        }
    }

    fn web_search_tools(search: Arc<StubSearch>) -> ToolSet {
        ToolSet::none().with_tool(Arc::new(WebSearchTool::new(search)))
    }

    fn request() -> ChatRequest {
        ChatRequest {
            model: "test".to_string(),
            messages: vec![
                system_message("You are a personal chef."),
                user_message("chicken, rice, broccoli"),
            ],
            temperature: Some(0.0),
            max_tokens: None,
            tools: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_agentic_loop_single_tool_round() {
        let search = Arc::new(StubSearch::ok());
        let tools = web_search_tools(Arc::clone(&search));
        let provider = MockToolProvider::new(1);
        let mut request = request();

        let response = agentic_loop(&provider, &mut request, &tools, 10)
            .await
            .unwrap_or_else(|e| panic!("agentic_loop failed: {e}"));

        assert_eq!(
            response.content,
            "Try a chicken and broccoli stir-fry over rice."
        );
        // system + user + assistant(tool_calls) + tool(result)
        assert_eq!(request.messages.len(), 4);
        assert_eq!(request.messages[2].role, Role::Assistant);
        assert_eq!(request.messages[3].role, Role::Tool);
        assert_eq!(request.messages[3].tool_call_id.as_deref(), Some("call_0"));
        assert!(request.messages[3].content.contains("Fried rice"));
        assert_eq!(search.calls.load(Ordering::SeqCst), 1);
        assert_eq!(response.usage.total_tokens, 132);
    }

    #[tokio::test]
    async fn test_agentic_loop_multiple_rounds() {
        let search = Arc::new(StubSearch::ok());
        let tools = web_search_tools(Arc::clone(&search));
        let provider = MockToolProvider::new(3);
        let mut request = request();

        agentic_loop(&provider, &mut request, &tools, 10)
            .await
            .unwrap_or_else(|e| panic!("agentic_loop failed: {e}"));

        // 2 initial + 3 rounds * 2 (assistant + tool)
        assert_eq!(request.messages.len(), 8);
        assert_eq!(search.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_agentic_loop_exceeds_max() {
        let tools = web_search_tools(Arc::new(StubSearch::ok()));
        let provider = MockToolProvider::new(100);
        let mut request = request();

        let err = agentic_loop(&provider, &mut request, &tools, 2)
            .await
            .unwrap_err();
        assert!(
            matches!(err, AgentError::ToolLoopExceeded { max_iterations: 2 }),
            "Expected ToolLoopExceeded, got: {err}"
        );
    }

    #[tokio::test]
    async fn test_agentic_loop_no_tools() {
        let tools = ToolSet::none();
        let provider = MockToolProvider::new(0);
        let mut request = request();

        let response = agentic_loop(&provider, &mut request, &tools, 10)
            .await
            .unwrap_or_else(|e| panic!("agentic_loop failed: {e}"));

        assert_eq!(response.finish_reason.as_deref(), Some("stop"));
        assert_eq!(request.messages.len(), 2);
    }

    #[tokio::test]
    async fn test_agentic_loop_propagates_search_error() {
        let search = Arc::new(StubSearch::failing());
        let tools = web_search_tools(Arc::clone(&search));
        let provider = MockToolProvider::new(1);
        let mut request = request();

        let err = agentic_loop(&provider, &mut request, &tools, 10)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AgentError::Search(SearchError::Api { status: 500, .. })
        ));
        assert_eq!(provider.call_count.load(Ordering::SeqCst), 1);
    }

    /// Provider that replays canned responses in order.
    struct ScriptedProvider {
        responses: std::sync::Mutex<std::collections::VecDeque<ChatResponse>>,
    }

    impl ScriptedProvider {
        fn new(responses: Vec<ChatResponse>) -> Self {
            Self {
                responses: std::sync::Mutex::new(responses.into()),
            }
        }
    }

    #[async_trait]
    impl LlmProvider for ScriptedProvider {
        fn name(&self) -> &'static str {
            "scripted"
        }

        async fn chat(&self, _request: &ChatRequest) -> Result<ChatResponse, AgentError> {
            self.responses
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .pop_front()
                .ok_or_else(|| AgentError::ApiRequest {
                    message: "script exhausted".to_string(),
                    status: None,
                })
        }
    }

    fn tool_call_response(id: &str, name: &str, arguments: &str) -> ChatResponse {
        ChatResponse {
            content: String::new(),
            usage: TokenUsage::default(),
            tool_calls: vec![ToolCall {
                id: id.to_string(),
                name: name.to_string(),
                arguments: arguments.to_string(),
            }],
            finish_reason: Some("tool_calls".to_string()),
        }
    }

    fn text_response(text: &str) -> ChatResponse {
        ChatResponse {
            content: text.to_string(),
            usage: TokenUsage::default(),
            tool_calls: Vec::new(),
            finish_reason: Some("stop".to_string()),
        }
    }

    #[tokio::test]
    async fn test_agentic_loop_reports_unknown_tool_to_model() {
        let provider = MockToolProvider::new(1);
        let mut request = request();

        let response = agentic_loop(&provider, &mut request, &ToolSet::none(), 10)
            .await
            .unwrap_or_else(|e| panic!("agentic_loop failed: {e}"));

        assert_eq!(provider.call_count.load(Ordering::SeqCst), 2);
        assert!(response.content.contains("stir-fry"));
        assert_eq!(request.messages[3].role, Role::Tool);
        assert!(request.messages[3].content.contains("unknown tool: web_search"));
    }

    #[tokio::test]
    async fn test_agentic_loop_recovers_from_bad_arguments() {
        let search = Arc::new(StubSearch::ok());
        let tools = web_search_tools(Arc::clone(&search));
        let provider = ScriptedProvider::new(vec![
            tool_call_response("call_a", "web_search", r#"{"q": "eggs"}"#),
            tool_call_response("call_b", "web_search", "{not json"),
            tool_call_response("call_c", "web_search", r#"{"query": "eggs"}"#),
            text_response("Make a frittata."),
        ]);
        let mut request = request();

        let response = agentic_loop(&provider, &mut request, &tools, 10)
            .await
            .unwrap_or_else(|e| panic!("agentic_loop failed: {e}"));

        assert_eq!(response.content, "Make a frittata.");
        assert_eq!(search.calls.load(Ordering::SeqCst), 1);

        let tool_messages: Vec<&str> = request
            .messages
            .iter()
            .filter(|m| m.role == Role::Tool)
            .map(|m| m.content.as_str())
            .collect();
        assert_eq!(tool_messages.len(), 3);
        assert!(tool_messages[0].contains("\"error\""));
        assert!(tool_messages[1].contains("\"error\""));
        assert!(tool_messages[2].contains("Fried rice"));
    }

    #[tokio::test]
    async fn test_agentic_loop_zero_iterations_allows_direct_answer() {
        let provider = MockToolProvider::new(0);
        let mut request = request();

        let response = agentic_loop(&provider, &mut request, &ToolSet::none(), 0)
            .await
            .unwrap_or_else(|e| panic!("agentic_loop failed: {e}"));
        assert!(response.content.contains("stir-fry"));
        assert_eq!(provider.call_count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_agentic_loop_zero_iterations_rejects_tool_request() {
        let search = Arc::new(StubSearch::ok());
        let tools = web_search_tools(Arc::clone(&search));
        let provider = MockToolProvider::new(1);
        let mut request = request();

        let err = agentic_loop(&provider, &mut request, &tools, 0)
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::ToolLoopExceeded { max_iterations: 0 }));
        assert_eq!(provider.call_count.load(Ordering::SeqCst), 1);
        assert_eq!(search.calls.load(Ordering::SeqCst), 0);
    }
}
