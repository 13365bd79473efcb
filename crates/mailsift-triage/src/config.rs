//! Configuration for triage

use mailsift_dedup::DEFAULT_SIMILARITY_THRESHOLD;
use mailsift_domain::{default_extract_fields, default_request_types};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// `[triage]` configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriageConfig {
    /// Request types offered to the classifier
    #[serde(default = "default_request_types")]
    pub request_types: Vec<String>,

    /// Fields asked for during extraction
    #[serde(default = "default_extract_fields")]
    pub extract_fields: Vec<String>,

    /// Maximum composed email text length (characters)
    #[serde(default = "default_max_text_length")]
    pub max_text_length: usize,

    /// Maximum time for a single LLM call (seconds)
    #[serde(default = "default_llm_timeout_secs")]
    pub llm_timeout_secs: u64,

    /// Cosine similarity a pair must exceed to count as duplicates
    #[serde(default = "default_duplicate_threshold")]
    pub duplicate_threshold: f64,
}

fn default_max_text_length() -> usize {
    100_000
}

fn default_llm_timeout_secs() -> u64 {
    120
}

fn default_duplicate_threshold() -> f64 {
    DEFAULT_SIMILARITY_THRESHOLD
}

impl TriageConfig {
    /// Get the LLM timeout as a Duration
    pub fn llm_timeout(&self) -> Duration {
        Duration::from_secs(self.llm_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.request_types.is_empty() {
            return Err("request_types must not be empty".to_string());
        }
        if self.request_types.iter().any(|rt| rt.trim().is_empty()) {
            return Err("request_types must not contain blank names".to_string());
        }
        if self.extract_fields.is_empty() {
            return Err("extract_fields must not be empty".to_string());
        }
        if self.max_text_length == 0 {
            return Err("max_text_length must be greater than 0".to_string());
        }
        if self.llm_timeout_secs == 0 {
            return Err("llm_timeout_secs must be greater than 0".to_string());
        }
        if !(0.0..=1.0).contains(&self.duplicate_threshold) {
            return Err("duplicate_threshold must be between 0 and 1".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            request_types: default_request_types(),
            extract_fields: default_extract_fields(),
            max_text_length: default_max_text_length(),
            llm_timeout_secs: default_llm_timeout_secs(),
            duplicate_threshold: default_duplicate_threshold(),
        }
    }
}
