//! Provider registry and factory.
//!
//! Maps provider names to concrete [`LlmProvider`] implementations.

use crate::agent::config::Credentials;
use crate::agent::provider::LlmProvider;
use crate::agent::providers::{GEMINI_OPENAI_BASE_URL, OpenAiProvider};
use crate::error::AgentError;

/// Creates an [`LlmProvider`] from the configured credentials.
///
/// # Supported Providers
///
/// - `"gemini"` (default): Gemini via Google's `OpenAI`-compatible endpoint
/// - `"openai"`: `OpenAI` or any compatible API (honours `llm_base_url`)
///
/// # Errors
///
/// Returns [`AgentError::UnsupportedProvider`] for unknown provider names
/// and [`AgentError::ApiKeyMissing`] if no model key is configured.
pub fn create_provider(credentials: &Credentials) -> Result<Box<dyn LlmProvider>, AgentError> {
    let name: &'static str = match credentials.provider.as_str() {
        "" | "gemini" => "gemini",
        "openai" => "openai",
        other => {
            return Err(AgentError::UnsupportedProvider {
                name: other.to_string(),
            });
        }
    };

    let api_key = credentials.require_llm_key()?;
    let base_url = credentials.llm_base_url.as_deref().or(match name {
        "gemini" => Some(GEMINI_OPENAI_BASE_URL),
        _ => None,
    });

    Ok(Box::new(OpenAiProvider::new(name, api_key, base_url)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn credentials(provider: &str) -> Credentials {
        Credentials {
            provider: provider.to_string(),
            llm_api_key: Some("test".to_string()),
            ..Credentials::default()
        }
    }

    #[test_case("gemini", "gemini" ; "gemini")]
    #[test_case("", "gemini" ; "empty defaults to gemini")]
    #[test_case("openai", "openai" ; "openai")]
    fn test_create_provider(requested: &str, expected: &str) {
        let provider = create_provider(&credentials(requested));
        assert!(provider.is_ok());
        assert_eq!(provider.unwrap_or_else(|_| unreachable!()).name(), expected);
    }

    #[test]
    fn test_create_unknown_provider() {
        let result = create_provider(&credentials("anthropic"));
        assert!(matches!(
            result,
            Err(AgentError::UnsupportedProvider { ref name }) if name == "anthropic"
        ));
    }

    #[test]
    fn test_create_provider_without_key() {
        let creds = Credentials {
            provider: "gemini".to_string(),
            ..Credentials::default()
        };
        assert!(matches!(
            create_provider(&creds),
            Err(AgentError::ApiKeyMissing)
        ));
    }
}
