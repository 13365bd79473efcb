//! Mailsift LLM Provider Layer
//!
//! Implementations of the `LlmProvider` trait from `mailsift-domain`.
//!
//! # Providers
//!
//! - `GeminiProvider`: hosted Google Gemini `generateContent` API
//! - `OllamaProvider`: local Ollama API
//! - `MockProvider`: deterministic mock for testing
//! - `LlmBackend`: one of the above, chosen from an `LlmConfig`
//!
//! # Examples
//!
//! ```
//! use mailsift_domain::{LlmProvider, LlmRequest};
//! use mailsift_llm::MockProvider;
//!
//! let provider = MockProvider::new("Hello from LLM!");
//! let runtime = tokio::runtime::Runtime::new().unwrap();
//! let result = runtime.block_on(provider.generate(&LlmRequest::new("test prompt"))).unwrap();
//! assert_eq!(result, "Hello from LLM!");
//! ```

#![warn(missing_docs)]

pub mod backend;
pub mod config;
pub mod gemini;
mod http;
pub mod ollama;

use mailsift_domain::{LlmProvider, LlmRequest};
use std::sync::{Arc, Mutex};
use thiserror::Error;

pub use backend::LlmBackend;
pub use config::{LlmConfig, ProviderKind};
pub use gemini::GeminiProvider;
pub use ollama::OllamaProvider;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// API key rejected
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Provider could not be configured
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

#[derive(Debug, Default)]
struct MockState {
    responses: Vec<(String, Result<String, String>)>,
    requests: Vec<LlmRequest>,
}

/// Mock LLM provider for deterministic testing
///
/// Returns pre-configured responses without making any network calls. A
/// response registered with [`add_response`](MockProvider::add_response) is
/// used for any prompt containing its pattern; the first registered match wins.
///
/// # Examples
///
/// ```
/// use mailsift_llm::MockProvider;
///
/// let mut provider = MockProvider::default();
/// provider.add_response("Classify", "Fee Payment");
/// provider.add_response("primary intent", "Pay a fee");
/// provider.add_error("Extract");
/// assert_eq!(provider.call_count(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    model: String,
    state: Arc<Mutex<MockState>>,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            model: "mock".to_string(),
            state: Arc::new(Mutex::new(MockState::default())),
        }
    }

    /// Respond with `response` to prompts containing `pattern`
    pub fn add_response(&mut self, pattern: impl Into<String>, response: impl Into<String>) {
        self.lock().responses.push((pattern.into(), Ok(response.into())));
    }

    /// Fail prompts containing `pattern`
    pub fn add_error(&mut self, pattern: impl Into<String>) {
        let pattern = pattern.into();
        let message = format!("Mock error for '{}'", pattern);
        self.lock().responses.push((pattern, Err(message)));
    }

    /// Get the number of times generate was called
    pub fn call_count(&self) -> usize {
        self.lock().requests.len()
    }

    /// Requests received so far, oldest first
    pub fn requests(&self) -> Vec<LlmRequest> {
        self.lock().requests.clone()
    }

    /// Forget recorded requests
    pub fn reset_call_count(&self) {
        self.lock().requests.clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        // A poisoned mock only happens after a panicking test; keep going.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

impl LlmProvider for MockProvider {
    type Error = LlmError;

    async fn generate(&self, request: &LlmRequest) -> Result<String, Self::Error> {
        let mut state = self.lock();
        state.requests.push(request.clone());

        let matched = state
            .responses
            .iter()
            .find(|(pattern, _)| request.prompt.contains(pattern.as_str()))
            .map(|(_, response)| response.clone());

        match matched {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(LlmError::Other(message)),
            None => Ok(self.default_response.clone()),
        }
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
