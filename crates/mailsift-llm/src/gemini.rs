//! Google Gemini Provider Implementation
//!
//! Calls the `generateContent` REST endpoint. The API key travels in the
//! `x-goog-api-key` header.
//!
//! # Examples
//!
//! ```no_run
//! use mailsift_llm::GeminiProvider;
//!
//! let api_key = std::env::var("GOOGLE_API_KEY").unwrap();
//! let provider = GeminiProvider::new(api_key, "gemini-1.5-pro").unwrap();
//! ```

use crate::http::{build_client, send_with_retry};
use crate::LlmError;
use mailsift_domain::{LlmProvider, LlmRequest};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Default Gemini API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";

/// Default Gemini model
pub const DEFAULT_MODEL: &str = "gemini-1.5-pro";

/// Default timeout for LLM requests (60 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Default number of attempts per request
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Gemini API provider
#[derive(Clone)]
pub struct GeminiProvider {
    endpoint: String,
    model: String,
    api_key: String,
    client: reqwest::Client,
    max_retries: u32,
}

impl std::fmt::Debug for GeminiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiProvider")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("api_key", &"<redacted>")
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

#[derive(Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateContentRequest {
    fn from_request(request: &LlmRequest) -> Self {
        Self {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: request.prompt.clone(),
                }],
            }],
            system_instruction: request.system.as_ref().map(|system| Content {
                role: None,
                parts: vec![Part { text: system.clone() }],
            }),
        }
    }
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate
    fn into_text(self) -> Result<String, LlmError> {
        let candidate = self
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::InvalidResponse("response has no candidates".to_string()))?;

        if let Some(reason) = candidate.finish_reason.as_deref() {
            if reason != "STOP" && reason != "MAX_TOKENS" {
                warn!("Gemini candidate finished with {}", reason);
            }
        }

        let text: String = candidate
            .content
            .map(|content| content.parts.into_iter().map(|part| part.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(LlmError::InvalidResponse("candidate has no text".to_string()));
        }
        Ok(text.trim().to_string())
    }
}

impl GeminiProvider {
    /// Create a provider against the public Gemini endpoint
    ///
    /// # Errors
    ///
    /// Returns `LlmError::Config` if the API key is empty or the HTTP client
    /// cannot be built.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self, LlmError> {
        Self::with_endpoint(DEFAULT_ENDPOINT, api_key, model, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a provider against a custom endpoint
    pub fn with_endpoint(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(LlmError::Config("Gemini API key is empty".to_string()));
        }

        Ok(Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key,
            client: build_client(timeout)?,
            max_retries: DEFAULT_MAX_RETRIES,
        })
    }

    /// Set the maximum number of attempts
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    fn url(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.endpoint, self.model)
    }
}

impl LlmProvider for GeminiProvider {
    type Error = LlmError;

    async fn generate(&self, request: &LlmRequest) -> Result<String, Self::Error> {
        let url = self.url();
        let body = GenerateContentRequest::from_request(request);

        debug!("Sending {} char prompt to Gemini model {}", request.prompt.len(), self.model);
        let response: GenerateContentResponse = send_with_retry(
            || {
                self.client
                    .post(&url)
                    .header("x-goog-api-key", &self.api_key)
                    .json(&body)
            },
            self.max_retries,
            &self.model,
        )
        .await?;

        response.into_text()
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gemini_provider_creation() {
        let provider = GeminiProvider::new("key", DEFAULT_MODEL).unwrap();
        assert_eq!(provider.model_name(), "gemini-1.5-pro");
        assert_eq!(
            provider.url(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-pro:generateContent"
        );
    }

    #[test]
    fn test_empty_api_key_rejected() {
        let result = GeminiProvider::new("  ", DEFAULT_MODEL);
        assert!(matches!(result, Err(LlmError::Config(_))));
    }

    #[test]
    fn test_debug_redacts_key() {
        let provider = GeminiProvider::new("super-secret", DEFAULT_MODEL).unwrap();
        let rendered = format!("{:?}", provider);
        assert!(!rendered.contains("super-secret"));
    }

    #[test]
    fn test_request_body_shape() {
        let request = LlmRequest::new("Classify this").with_system("You are a classifier.");
        let json = serde_json::to_value(GenerateContentRequest::from_request(&request)).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "contents": [{"role": "user", "parts": [{"text": "Classify this"}]}],
                "systemInstruction": {"parts": [{"text": "You are a classifier."}]}
            })
        );
    }

    #[test]
    fn test_request_body_without_system() {
        let json = serde_json::to_value(GenerateContentRequest::from_request(&LlmRequest::new("hi"))).unwrap();
        assert!(json.get("systemInstruction").is_none());
    }

    #[test]
    fn test_response_text_joins_parts() {
        let response: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "Fee "}, {"text": "Payment\n"}]},
                "finishReason": "STOP"
            }]
        }))
        .unwrap();
        assert_eq!(response.into_text().unwrap(), "Fee Payment");
    }

    #[test]
    fn test_response_without_candidates() {
        let response: GenerateContentResponse =
            serde_json::from_value(serde_json::json!({"promptFeedback": {"blockReason": "SAFETY"}})).unwrap();
        assert!(matches!(response.into_text(), Err(LlmError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn test_gemini_unreachable_endpoint() {
        let provider = GeminiProvider::with_endpoint("http://127.0.0.1:1", "key", DEFAULT_MODEL, Duration::from_secs(2))
            .unwrap()
            .with_max_retries(1);

        let result = provider.generate(&LlmRequest::new("test")).await;
        assert!(matches!(result, Err(LlmError::Communication(_))));
    }
}
