//! Agent configuration and credentials.
//!
//! [`AgentConfig`] is the static declaration the agent runs from: model,
//! temperature, system prompt and tools. [`Credentials`] carries the API
//! keys loaded once at start-up and is passed explicitly to the clients
//! that need them.
//!
//! Both resolve values in order: explicit values → environment variables →
//! defaults. [`Settings`] bundles the environment layer so it is read once,
//! at start-up, and then passed down.

use std::path::PathBuf;
use std::sync::Arc;

use super::prompt::{self, PERSONAL_CHEF_SYSTEM_PROMPT};
use super::tool::ToolSet;
use crate::error::AgentError;
use crate::search::{SearchProvider, TavilyConfig, TavilyConfigBuilder, WebSearchTool};

/// Default chat model.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
/// Default sampling temperature (most deterministic).
pub const DEFAULT_TEMPERATURE: f32 = 0.0;
/// Default maximum tool-calling loop iterations.
const DEFAULT_MAX_TOOL_ITERATIONS: usize = 10;
/// Default provider name.
pub const DEFAULT_PROVIDER: &str = "gemini";

/// Static configuration of an agent.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Model identifier passed to the provider.
    pub model: String,
    /// Sampling temperature (0.0 = deterministic).
    pub temperature: f32,
    /// Persona and behaviour instructions.
    pub system_prompt: String,
    /// Tools the agent may call.
    pub tools: ToolSet,
    /// Maximum tokens per model response (provider default when unset).
    pub max_tokens: Option<u32>,
    /// Maximum tool-calling loop iterations per user turn.
    pub max_tool_iterations: usize,
}

impl AgentConfig {
    /// Creates a new builder for `AgentConfig`.
    #[must_use]
    pub fn builder() -> AgentConfigBuilder {
        AgentConfigBuilder::default()
    }

    /// The personal chef declaration: default model, temperature 0.0, the
    /// chef system prompt, and `web_search` as the only tool.
    #[must_use]
    pub fn personal_chef(search: Arc<dyn SearchProvider>) -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            system_prompt: PERSONAL_CHEF_SYSTEM_PROMPT.to_string(),
            tools: ToolSet::none().with_tool(Arc::new(WebSearchTool::new(search))),
            max_tokens: None,
            max_tool_iterations: DEFAULT_MAX_TOOL_ITERATIONS,
        }
    }
}

/// Builder for [`AgentConfig`].
#[derive(Debug, Clone, Default)]
pub struct AgentConfigBuilder {
    model: Option<String>,
    temperature: Option<f32>,
    system_prompt: Option<String>,
    system_prompt_file: Option<PathBuf>,
    tools: Option<ToolSet>,
    max_tokens: Option<u32>,
    max_tool_iterations: Option<usize>,
}

impl AgentConfigBuilder {
    /// Populates unset fields from environment variables.
    #[must_use]
    pub fn from_env(mut self) -> Self {
        if self.model.is_none() {
            self.model = std::env::var("CHEF_MODEL").ok();
        }
        if self.temperature.is_none() {
            self.temperature = std::env::var("CHEF_TEMPERATURE")
                .ok()
                .and_then(|v| v.parse().ok());
        }
        if self.system_prompt_file.is_none() {
            self.system_prompt_file = std::env::var("CHEF_SYSTEM_PROMPT_FILE")
                .ok()
                .map(PathBuf::from);
        }
        if self.max_tool_iterations.is_none() {
            self.max_tool_iterations = std::env::var("CHEF_MAX_TOOL_ITERATIONS")
                .ok()
                .and_then(|v| v.parse().ok());
        }
        self
    }

    /// Sets the model identifier.
    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sets the sampling temperature.
    #[must_use]
    pub const fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Sets the system prompt text. Takes precedence over a prompt file.
    #[must_use]
    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Loads the system prompt from a file at build time.
    #[must_use]
    pub fn system_prompt_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.system_prompt_file = Some(path.into());
        self
    }

    /// Uses `path` as the prompt file only if no prompt or prompt file has
    /// been set yet.
    #[must_use]
    pub fn fallback_system_prompt_file(mut self, path: Option<PathBuf>) -> Self {
        if self.system_prompt.is_none() && self.system_prompt_file.is_none() {
            self.system_prompt_file = path;
        }
        self
    }

    /// Sets the tool set.
    #[must_use]
    pub fn tools(mut self, tools: ToolSet) -> Self {
        self.tools = Some(tools);
        self
    }

    /// Registers `web_search` backed by `provider` as the sole tool.
    #[must_use]
    pub fn web_search(self, provider: Arc<dyn SearchProvider>) -> Self {
        self.tools(ToolSet::none().with_tool(Arc::new(WebSearchTool::new(provider))))
    }

    /// Sets the maximum tokens per response.
    #[must_use]
    pub const fn max_tokens(mut self, n: u32) -> Self {
        self.max_tokens = Some(n);
        self
    }

    /// Sets the maximum tool-calling loop iterations.
    #[must_use]
    pub const fn max_tool_iterations(mut self, n: usize) -> Self {
        self.max_tool_iterations = Some(n);
        self
    }

    /// Builds the [`AgentConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::PromptFile`] if a prompt file was given and
    /// cannot be read.
    pub fn build(self) -> Result<AgentConfig, AgentError> {
        let system_prompt = match (self.system_prompt, self.system_prompt_file) {
            (Some(text), _) => text,
            (None, Some(path)) => prompt::load_prompt_file(&path)?,
            (None, None) => PERSONAL_CHEF_SYSTEM_PROMPT.to_string(),
        };

        Ok(AgentConfig {
            model: self.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            temperature: self.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            system_prompt,
            tools: self.tools.unwrap_or_default(),
            max_tokens: self.max_tokens,
            max_tool_iterations: self
                .max_tool_iterations
                .unwrap_or(DEFAULT_MAX_TOOL_ITERATIONS),
        })
    }
}

/// API credentials and endpoints, loaded once at start-up.
#[derive(Clone, Default)]
pub struct Credentials {
    /// Model provider name (`"gemini"` or `"openai"`).
    pub provider: String,
    /// API key for the model provider.
    pub llm_api_key: Option<String>,
    /// Optional base URL override for the model provider.
    pub llm_base_url: Option<String>,
    /// API key for the search provider.
    pub search_api_key: Option<String>,
    /// Optional base URL override for the search provider.
    pub search_base_url: Option<String>,
}

impl Credentials {
    /// Reads credentials from the process environment.
    ///
    /// The model key is taken from `GEMINI_API_KEY`, then `GOOGLE_API_KEY`
    /// for the Gemini provider, or `OPENAI_API_KEY` for `OpenAI`.
    #[must_use]
    pub fn from_env() -> Self {
        let provider = std::env::var("CHEF_PROVIDER").unwrap_or_else(|_| DEFAULT_PROVIDER.to_string());

        let llm_api_key = if provider == "openai" {
            std::env::var("OPENAI_API_KEY").ok()
        } else {
            std::env::var("GEMINI_API_KEY")
                .or_else(|_| std::env::var("GOOGLE_API_KEY"))
                .ok()
        };

        Self {
            provider,
            llm_api_key,
            llm_base_url: std::env::var("CHEF_LLM_BASE_URL").ok(),
            search_api_key: std::env::var("TAVILY_API_KEY").ok(),
            search_base_url: std::env::var("TAVILY_BASE_URL").ok(),
        }
    }

    /// Returns the model API key.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::ApiKeyMissing`] if none was configured.
    pub fn require_llm_key(&self) -> Result<&str, AgentError> {
        self.llm_api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(AgentError::ApiKeyMissing)
    }
}

/// Start-up view of the environment: credentials plus the agent and search
/// builders pre-filled from `CHEF_*` and `TAVILY_*` variables.
///
/// Commands clone the builders and layer command-line overrides on top.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    /// API keys and endpoints.
    pub credentials: Credentials,
    /// Agent settings resolved from the environment.
    pub agent: AgentConfigBuilder,
    /// Search settings resolved from the environment.
    pub search: TavilyConfigBuilder,
}

impl Settings {
    /// Settings with the given credentials and no other environment input.
    #[must_use]
    pub fn new(credentials: Credentials) -> Self {
        let mut search = TavilyConfig::builder();
        if let Some(key) = &credentials.search_api_key {
            search = search.api_key(key);
        }
        if let Some(url) = &credentials.search_base_url {
            search = search.base_url(url);
        }
        Self {
            credentials,
            agent: AgentConfig::builder(),
            search,
        }
    }

    /// Reads the process environment once.
    ///
    /// Call after any `.env` file has been loaded. The system prompt falls
    /// back to `~/.chef-agent/prompts/personal_chef.md` when neither
    /// `CHEF_SYSTEM_PROMPT_FILE` nor a command-line file is given.
    #[must_use]
    pub fn from_env() -> Self {
        let mut settings = Self::new(Credentials::from_env());
        settings.search = settings.search.from_env();
        settings.agent = settings
            .agent
            .from_env()
            .fallback_system_prompt_file(prompt::find_override(None));
        settings
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |k: &Option<String>| k.as_ref().map(|_| "<redacted>");
        f.debug_struct("Credentials")
            .field("provider", &self.provider)
            .field("llm_api_key", &redact(&self.llm_api_key))
            .field("llm_base_url", &self.llm_base_url)
            .field("search_api_key", &redact(&self.search_api_key))
            .field("search_base_url", &self.search_base_url)
            .finish()
    }
}
