//! Config-selected provider

use crate::config::{LlmConfig, ProviderKind};
use crate::{GeminiProvider, LlmError, MockProvider, OllamaProvider};
use mailsift_domain::{LlmProvider, LlmRequest};
use std::time::Duration;
use tracing::info;

/// One of the concrete providers, picked at runtime from an [`LlmConfig`]
#[derive(Debug, Clone)]
pub enum LlmBackend {
    /// Google Gemini
    Gemini(GeminiProvider),
    /// Local Ollama
    Ollama(OllamaProvider),
    /// Canned responses
    Mock(MockProvider),
}

impl LlmBackend {
    /// Build the backend named by `config`, reading the Gemini API key from
    /// the environment variable `config.api_key_env`
    ///
    /// # Errors
    ///
    /// Returns `LlmError::Config` when the API key variable is unset or the
    /// HTTP client cannot be built.
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        let api_key = match config.provider {
            ProviderKind::Gemini => Some(std::env::var(&config.api_key_env).map_err(|_| {
                LlmError::Config(format!("environment variable {} is not set", config.api_key_env))
            })?),
            _ => None,
        };
        Self::from_config_with_key(config, api_key)
    }

    /// Build the backend named by `config` with an explicit API key
    pub fn from_config_with_key(config: &LlmConfig, api_key: Option<String>) -> Result<Self, LlmError> {
        let timeout = Duration::from_secs(config.timeout_secs);

        let backend = match config.provider {
            ProviderKind::Gemini => {
                let api_key = api_key.ok_or_else(|| LlmError::Config("Gemini requires an API key".to_string()))?;
                let endpoint = config.endpoint.as_deref().unwrap_or(crate::gemini::DEFAULT_ENDPOINT);
                LlmBackend::Gemini(
                    GeminiProvider::with_endpoint(endpoint, api_key, &config.model, timeout)?
                        .with_max_retries(config.max_retries),
                )
            }
            ProviderKind::Ollama => {
                let endpoint = config.endpoint.as_deref().unwrap_or(crate::ollama::DEFAULT_ENDPOINT);
                LlmBackend::Ollama(
                    OllamaProvider::with_timeout(endpoint, &config.model, timeout)?
                        .with_max_retries(config.max_retries),
                )
            }
            ProviderKind::Mock => LlmBackend::Mock(match &config.mock_response {
                Some(response) => MockProvider::new(response.clone()),
                None => MockProvider::default(),
            }),
        };

        info!("Using {} LLM backend with model {}", config.provider, backend.model_name());
        Ok(backend)
    }
}

impl LlmProvider for LlmBackend {
    type Error = LlmError;

    async fn generate(&self, request: &LlmRequest) -> Result<String, Self::Error> {
        match self {
            LlmBackend::Gemini(provider) => provider.generate(request).await,
            LlmBackend::Ollama(provider) => provider.generate(request).await,
            LlmBackend::Mock(provider) => provider.generate(request).await,
        }
    }

    fn model_name(&self) -> &str {
        match self {
            LlmBackend::Gemini(provider) => provider.model_name(),
            LlmBackend::Ollama(provider) => provider.model_name(),
            LlmBackend::Mock(provider) => provider.model_name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gemini_without_key_fails() {
        let config = LlmConfig::default();
        let result = LlmBackend::from_config_with_key(&config, None);
        assert!(matches!(result, Err(LlmError::Config(_))));
    }

    #[test]
    fn test_missing_env_var_fails() {
        let config = LlmConfig {
            api_key_env: "MAILSIFT_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
            ..LlmConfig::default()
        };
        let err = LlmBackend::from_config(&config).unwrap_err();
        assert!(err.to_string().contains("MAILSIFT_TEST_KEY_THAT_IS_NEVER_SET"));
    }

    #[test]
    fn test_gemini_with_key() {
        let backend = LlmBackend::from_config_with_key(&LlmConfig::default(), Some("key".to_string())).unwrap();
        assert!(matches!(backend, LlmBackend::Gemini(_)));
        assert_eq!(backend.model_name(), "gemini-1.5-pro");
    }

    #[test]
    fn test_ollama_needs_no_key() {
        let config = LlmConfig {
            provider: ProviderKind::Ollama,
            model: "llama3".to_string(),
            ..LlmConfig::default()
        };
        let backend = LlmBackend::from_config(&config).unwrap();
        assert!(matches!(backend, LlmBackend::Ollama(_)));
        assert_eq!(backend.model_name(), "llama3");
    }

    #[tokio::test]
    async fn test_mock_backend_dispatch() {
        let config = LlmConfig {
            provider: ProviderKind::Mock,
            mock_response: Some("Closing Notice".to_string()),
            ..LlmConfig::default()
        };
        let backend = LlmBackend::from_config(&config).unwrap();
        let reply = backend.generate(&LlmRequest::new("anything")).await.unwrap();
        assert_eq!(reply, "Closing Notice");
    }
}
