//! Tavily search client.
//!
//! Talks to the Tavily REST API with `reqwest`. The request carries the
//! query plus whichever optional knobs were configured; the response body is
//! returned as-is.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::{SearchProvider, SearchResult};
use crate::error::SearchError;

/// Default Tavily API endpoint.
pub const DEFAULT_TAVILY_BASE_URL: &str = "https://api.tavily.com";
/// Default HTTP client timeout.
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Configuration for [`TavilyClient`].
#[derive(Clone)]
pub struct TavilyConfig {
    /// API key sent as a bearer token.
    pub api_key: String,
    /// API base URL (overridable for proxies and tests).
    pub base_url: String,
    /// HTTP client timeout.
    pub timeout: Duration,
    /// `"basic"` or `"advanced"`.
    pub search_depth: Option<String>,
    /// `"general"`, `"news"` or `"finance"`.
    pub topic: Option<String>,
    /// Maximum number of results.
    pub max_results: Option<u32>,
    /// Ask Tavily to include a generated short answer.
    pub include_answer: Option<bool>,
    /// Include cleaned page content for each result.
    pub include_raw_content: Option<bool>,
    /// Include image URLs.
    pub include_images: Option<bool>,
}

impl std::fmt::Debug for TavilyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TavilyConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("search_depth", &self.search_depth)
            .field("topic", &self.topic)
            .field("max_results", &self.max_results)
            .field("include_answer", &self.include_answer)
            .field("include_raw_content", &self.include_raw_content)
            .field("include_images", &self.include_images)
            .finish()
    }
}

impl TavilyConfig {
    /// Creates a new builder.
    #[must_use]
    pub fn builder() -> TavilyConfigBuilder {
        TavilyConfigBuilder::default()
    }

    /// Creates configuration from environment variables with defaults.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::ApiKeyMissing`] if `TAVILY_API_KEY` is unset.
    pub fn from_env() -> Result<Self, SearchError> {
        Self::builder().from_env().build()
    }
}

/// Builder for [`TavilyConfig`].
#[derive(Clone, Default)]
pub struct TavilyConfigBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    timeout: Option<Duration>,
    search_depth: Option<String>,
    topic: Option<String>,
    max_results: Option<u32>,
    include_answer: Option<bool>,
    include_raw_content: Option<bool>,
    include_images: Option<bool>,
}

impl std::fmt::Debug for TavilyConfigBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TavilyConfigBuilder")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("search_depth", &self.search_depth)
            .field("max_results", &self.max_results)
            .finish_non_exhaustive()
    }
}

impl TavilyConfigBuilder {
    /// Populates unset fields from environment variables.
    #[must_use]
    pub fn from_env(mut self) -> Self {
        if self.api_key.is_none() {
            self.api_key = std::env::var("TAVILY_API_KEY").ok();
        }
        if self.base_url.is_none() {
            self.base_url = std::env::var("TAVILY_BASE_URL").ok();
        }
        if self.search_depth.is_none() {
            self.search_depth = std::env::var("TAVILY_SEARCH_DEPTH").ok();
        }
        if self.max_results.is_none() {
            self.max_results = std::env::var("TAVILY_MAX_RESULTS")
                .ok()
                .and_then(|v| v.parse().ok());
        }
        self
    }

    /// Sets the API key.
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the API base URL.
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the HTTP client timeout.
    #[must_use]
    pub const fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Sets the search depth.
    #[must_use]
    pub fn search_depth(mut self, depth: impl Into<String>) -> Self {
        self.search_depth = Some(depth.into());
        self
    }

    /// Sets the search topic.
    #[must_use]
    pub fn topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = Some(topic.into());
        self
    }

    /// Sets the maximum number of results.
    #[must_use]
    pub const fn max_results(mut self, n: u32) -> Self {
        self.max_results = Some(n);
        self
    }

    /// Requests a generated answer alongside the results.
    #[must_use]
    pub const fn include_answer(mut self, yes: bool) -> Self {
        self.include_answer = Some(yes);
        self
    }

    /// Requests raw page content for each result.
    #[must_use]
    pub const fn include_raw_content(mut self, yes: bool) -> Self {
        self.include_raw_content = Some(yes);
        self
    }

    /// Requests image URLs.
    #[must_use]
    pub const fn include_images(mut self, yes: bool) -> Self {
        self.include_images = Some(yes);
        self
    }

    /// Builds the [`TavilyConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::ApiKeyMissing`] if no API key was set.
    pub fn build(self) -> Result<TavilyConfig, SearchError> {
        let api_key = self
            .api_key
            .filter(|k| !k.is_empty())
            .ok_or(SearchError::ApiKeyMissing)?;

        Ok(TavilyConfig {
            api_key,
            base_url: self
                .base_url
                .unwrap_or_else(|| DEFAULT_TAVILY_BASE_URL.to_string()),
            timeout: self
                .timeout
                .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            search_depth: self.search_depth,
            topic: self.topic,
            max_results: self.max_results,
            include_answer: self.include_answer,
            include_raw_content: self.include_raw_content,
            include_images: self.include_images,
        })
    }
}

/// Request body for `POST /search`.
#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    search_depth: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    topic: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_results: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    include_answer: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    include_raw_content: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    include_images: Option<bool>,
}

/// Tavily web search client.
pub struct TavilyClient {
    http: reqwest::Client,
    config: TavilyConfig,
}

impl TavilyClient {
    /// Creates a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Http`] if the HTTP client cannot be built.
    pub fn new(config: TavilyConfig) -> Result<Self, SearchError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("chef-agent/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http, config })
    }

    /// Returns the client's configuration.
    #[must_use]
    pub const fn config(&self) -> &TavilyConfig {
        &self.config
    }

    fn search_url(&self) -> String {
        format!("{}/search", self.config.base_url.trim_end_matches('/'))
    }

    fn build_request<'a>(&'a self, query: &'a str) -> SearchRequest<'a> {
        SearchRequest {
            query,
            search_depth: self.config.search_depth.as_deref(),
            topic: self.config.topic.as_deref(),
            max_results: self.config.max_results,
            include_answer: self.config.include_answer,
            include_raw_content: self.config.include_raw_content,
            include_images: self.config.include_images,
        }
    }
}

impl std::fmt::Debug for TavilyClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TavilyClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[async_trait]
impl SearchProvider for TavilyClient {
    fn name(&self) -> &'static str {
        "tavily"
    }

    async fn search(&self, query: &str) -> Result<SearchResult, SearchError> {
        debug!(provider = "tavily", query, "sending search request");

        let response = self
            .http
            .post(self.search_url())
            .bearer_auth(&self.config.api_key)
            .json(&self.build_request(query))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    debug!(provider = "tavily", error = %e, "failed to read error body");
                    String::new()
                }
            };
            let message = if body.is_empty() {
                status.canonical_reason().unwrap_or("unknown").to_string()
            } else {
                body
            };
            return Err(SearchError::Api {
                status: status.as_u16(),
                message,
            });
        }

        match response.json::<Value>().await? {
            Value::Object(map) => {
                debug!(provider = "tavily", keys = map.len(), "search complete");
                Ok(map)
            }
            other => Err(SearchError::UnexpectedResponse {
                kind: json_kind(&other),
            }),
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> TavilyClient {
        let config = TavilyConfig::builder()
            .api_key("tvly-test")
            .base_url(server.uri())
            .build()
            .unwrap_or_else(|_| unreachable!());
        TavilyClient::new(config).unwrap_or_else(|e| panic!("client build failed: {e}"))
    }

    #[test]
    fn test_builder_defaults() {
        let config = TavilyConfig::builder()
            .api_key("k")
            .build()
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(config.base_url, DEFAULT_TAVILY_BASE_URL);
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert!(config.max_results.is_none());
        assert!(config.search_depth.is_none());
    }

    #[test]
    fn test_builder_missing_api_key() {
        let result = TavilyConfig::builder().build();
        assert!(matches!(result, Err(SearchError::ApiKeyMissing)));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = TavilyConfig::builder()
            .api_key("tvly-secret")
            .build()
            .unwrap_or_else(|_| unreachable!());
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("tvly-secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_request_omits_unset_options() {
        let config = TavilyConfig::builder()
            .api_key("k")
            .max_results(3)
            .build()
            .unwrap_or_else(|_| unreachable!());
        let client = TavilyClient::new(config).unwrap_or_else(|e| panic!("{e}"));
        let body = serde_json::to_value(client.build_request("pasta"))
            .unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(body, json!({"query": "pasta", "max_results": 3}));
    }

    #[test]
    fn test_search_url_trims_trailing_slash() {
        let config = TavilyConfig::builder()
            .api_key("k")
            .base_url("http://localhost:9999/")
            .build()
            .unwrap_or_else(|_| unreachable!());
        let client = TavilyClient::new(config).unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(client.search_url(), "http://localhost:9999/search");
    }

    #[tokio::test]
    async fn test_search_returns_body_verbatim() {
        let server = MockServer::start().await;
        let body = json!({
            "query": "chicken, rice, broccoli",
            "answer": null,
            "results": [
                {"title": "Chicken Broccoli Rice Casserole", "url": "https://example.com/a", "score": 0.91}
            ],
            "response_time": 1.02
        });

        Mock::given(method("POST"))
            .and(path("/search"))
            .and(header("authorization", "Bearer tvly-test"))
            .and(body_json(json!({"query": "chicken, rice, broccoli"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let result = client
            .search("chicken, rice, broccoli")
            .await
            .unwrap_or_else(|e| panic!("search failed: {e}"));

        assert_eq!(Value::Object(result), body);
    }

    #[tokio::test]
    async fn test_search_maps_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.search("eggs").await.unwrap_err();
        match err {
            SearchError::Api { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "invalid api key");
            }
            other => panic!("expected Api error, got {other}"),
        }
    }

    #[tokio::test]
    async fn test_search_error_without_body_uses_reason_phrase() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.search("eggs").await.unwrap_err();
        match err {
            SearchError::Api { status, message } => {
                assert_eq!(status, 429);
                assert_eq!(message, "Too Many Requests");
            }
            other => panic!("expected Api error, got {other}"),
        }
    }

    #[tokio::test]
    async fn test_search_rejects_non_object_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(["not", "a", "map"])))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.search("eggs").await.unwrap_err();
        assert!(matches!(
            err,
            SearchError::UnexpectedResponse { kind: "array" }
        ));
    }
}
