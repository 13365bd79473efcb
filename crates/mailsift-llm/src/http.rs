//! Shared request loop for HTTP providers

use crate::LlmError;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

/// Longest wait between attempts
const MAX_BACKOFF_SECS: u64 = 60;

/// Send a request built by `build`, retrying transient failures
///
/// Transport errors, 5xx and 429 responses are retried with exponential
/// backoff (1s, 2s, 4s, ...). 401/403 and 404 fail immediately.
pub(crate) async fn send_with_retry<R, F>(build: F, max_retries: u32, model: &str) -> Result<R, LlmError>
where
    R: DeserializeOwned,
    F: Fn() -> reqwest::RequestBuilder,
{
    let max_attempts = max_retries.max(1);
    let mut attempts = 0;
    let mut last_error = None;

    while attempts < max_attempts {
        match build().send().await {
            Ok(response) => {
                let status = response.status();
                if status.is_success() {
                    return response
                        .json::<R>()
                        .await
                        .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)));
                }

                match status {
                    StatusCode::NOT_FOUND => return Err(LlmError::ModelNotAvailable(model.to_string())),
                    StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                        let error_text = response.text().await.unwrap_or_default();
                        return Err(LlmError::Authentication(format!("HTTP {}: {}", status, error_text)));
                    }
                    StatusCode::TOO_MANY_REQUESTS => last_error = Some(LlmError::RateLimitExceeded),
                    _ => {
                        let error_text = response
                            .text()
                            .await
                            .unwrap_or_else(|_| "Unknown error".to_string());
                        let error = LlmError::Communication(format!("HTTP {}: {}", status, error_text));
                        if status.is_client_error() {
                            return Err(error);
                        }
                        last_error = Some(error);
                    }
                }
            }
            Err(e) => {
                last_error = Some(LlmError::Communication(format!("Request failed: {}", e)));
            }
        }

        attempts += 1;
        if attempts < max_attempts {
            let delay = backoff_delay(attempts);
            warn!("LLM request to {} failed (attempt {}), retrying in {:?}", model, attempts, delay);
            tokio::time::sleep(delay).await;
        }
    }

    debug!("Giving up on {} after {} attempt(s)", model, attempts);
    Err(last_error.unwrap_or_else(|| LlmError::Communication("Max retries exceeded".to_string())))
}

/// 1s, 2s, 4s, ... after the given failed attempt, capped at [`MAX_BACKOFF_SECS`]
fn backoff_delay(attempt: u32) -> Duration {
    let secs = 2u64.saturating_pow(attempt.saturating_sub(1));
    Duration::from_secs(secs.min(MAX_BACKOFF_SECS))
}

/// Build a client with a per-request timeout
pub(crate) fn build_client(timeout: Duration) -> Result<reqwest::Client, LlmError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| LlmError::Config(format!("Failed to build HTTP client: {}", e)))
}
