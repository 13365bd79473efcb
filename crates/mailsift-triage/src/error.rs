//! Error types for triage

use mailsift_parser::ParserError;
use thiserror::Error;

/// Errors that can occur while triaging an email
#[derive(Error, Debug)]
pub enum TriageError {
    /// Email or attachment could not be parsed
    #[error(transparent)]
    Parse(#[from] ParserError),

    /// LLM provider error
    #[error("LLM error during {stage}: {message}")]
    Llm {
        /// Pipeline stage that failed
        stage: &'static str,
        /// Provider error message
        message: String,
    },

    /// LLM call did not finish in time
    #[error("LLM timeout during {0}")]
    Timeout(&'static str),

    /// Classification came back empty
    #[error("LLM returned an empty classification")]
    EmptyClassification,

    /// Text exceeds maximum length
    #[error("Text too long: {0} chars (max: {1})")]
    TextTooLong(usize, usize),

    /// Blocking parse task panicked or was cancelled
    #[error("Parse task failed: {0}")]
    Task(String),
}

impl From<tokio::task::JoinError> for TriageError {
    fn from(e: tokio::task::JoinError) -> Self {
        TriageError::Task(e.to_string())
    }
}
