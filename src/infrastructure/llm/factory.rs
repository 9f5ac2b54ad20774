use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use super::{AnthropicProvider, OpenAiProvider};
use crate::domain::{DomainError, LlmProvider};
use crate::infrastructure::http_client::HttpClient;

/// Supported chat-completion backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LlmProviderType {
    #[default]
    #[serde(rename = "openai")]
    OpenAi,
    #[serde(rename = "anthropic")]
    Anthropic,
}

/// LLM provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmProviderConfig {
    #[serde(default, rename = "type")]
    pub provider: LlmProviderType,
    /// Override for OpenAI-compatible gateways or local servers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_request_timeout_secs() -> u64 {
    60
}

impl Default for LlmProviderConfig {
    fn default() -> Self {
        Self {
            provider: LlmProviderType::default(),
            base_url: None,
            api_key_env: default_api_key_env(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

/// Factory for creating LLM providers
#[derive(Debug)]
pub struct LlmProviderFactory;

impl LlmProviderFactory {
    /// Create a provider, reading the API key from the configured environment variable
    pub fn create(config: &LlmProviderConfig) -> Result<Arc<dyn LlmProvider>, DomainError> {
        let api_key = std::env::var(&config.api_key_env).map_err(|_| {
            DomainError::configuration(format!(
                "Environment variable {} is not set",
                config.api_key_env
            ))
        })?;

        Self::create_with_key(config, api_key)
    }

    /// Create a provider with an explicit API key
    pub fn create_with_key(
        config: &LlmProviderConfig,
        api_key: impl Into<String>,
    ) -> Result<Arc<dyn LlmProvider>, DomainError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(DomainError::configuration("LLM API key cannot be empty"));
        }

        let http_client = HttpClient::with_timeout(Duration::from_secs(config.request_timeout_secs))?;

        let provider: Arc<dyn LlmProvider> = match (config.provider, config.base_url.as_deref()) {
            (LlmProviderType::OpenAi, Some(base_url)) => Arc::new(OpenAiProvider::with_base_url(
                http_client,
                api_key,
                base_url,
            )),
            (LlmProviderType::OpenAi, None) => Arc::new(OpenAiProvider::new(http_client, api_key)),
            (LlmProviderType::Anthropic, Some(base_url)) => Arc::new(
                AnthropicProvider::with_base_url(http_client, api_key, base_url),
            ),
            (LlmProviderType::Anthropic, None) => {
                Arc::new(AnthropicProvider::new(http_client, api_key))
            }
        };

        Ok(provider)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_openai() {
        let provider =
            LlmProviderFactory::create_with_key(&LlmProviderConfig::default(), "sk-test").unwrap();
        assert_eq!(provider.provider_name(), "openai");
    }

    #[test]
    fn test_create_anthropic_with_base_url() {
        let config = LlmProviderConfig {
            provider: LlmProviderType::Anthropic,
            base_url: Some("http://localhost:9000".to_string()),
            ..Default::default()
        };

        let provider = LlmProviderFactory::create_with_key(&config, "key").unwrap();
        assert_eq!(provider.provider_name(), "anthropic");
    }

    #[test]
    fn test_empty_key_rejected() {
        let result = LlmProviderFactory::create_with_key(&LlmProviderConfig::default(), "  ");
        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }

    #[test]
    fn test_missing_env_var_rejected() {
        let config = LlmProviderConfig {
            api_key_env: "RETRIEVAL_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
            ..Default::default()
        };

        assert!(matches!(
            LlmProviderFactory::create(&config),
            Err(DomainError::Configuration { .. })
        ));
    }

    #[test]
    fn test_deserialize_provider_type() {
        let config: LlmProviderConfig =
            serde_json::from_str(r#"{"type": "anthropic", "api_key_env": "ANTHROPIC_API_KEY"}"#)
                .unwrap();

        assert_eq!(config.provider, LlmProviderType::Anthropic);
        assert_eq!(config.api_key_env, "ANTHROPIC_API_KEY");
    }
}
