//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

use std::future::Future;

/// A single completion request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmRequest {
    /// Optional system instruction that frames the task
    pub system: Option<String>,

    /// User prompt
    pub prompt: String,
}

impl LlmRequest {
    /// Create a request with no system instruction
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            system: None,
            prompt: prompt.into(),
        }
    }

    /// Attach a system instruction
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }
}

/// Trait for LLM provider operations
///
/// Implemented by the infrastructure layer (mailsift-llm)
pub trait LlmProvider {
    /// Error type for LLM operations
    type Error;

    /// Generate a text completion
    fn generate(
        &self,
        request: &LlmRequest,
    ) -> impl Future<Output = Result<String, Self::Error>> + Send;

    /// Name of the model answering requests
    fn model_name(&self) -> &str;
}
