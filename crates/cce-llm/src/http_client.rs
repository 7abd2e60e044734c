//! Retrying HTTP client for the live backend boundary
//!
//! The external service is a blocking, potentially slow, network-bound
//! dependency. Every attempt gets a bounded timeout and transient
//! failures (connect errors, timeouts, 429, 5xx) are retried with
//! exponential backoff under a small fixed budget. The stub and
//! local-repair paths never go through this module.

use std::time::Duration;
use tracing::{debug, warn};

use crate::types::GenerationError;

const MAX_ATTEMPTS: u32 = 3;
const INITIAL_BACKOFF_MS: u64 = 500;

pub(crate) struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    /// # Errors
    ///
    /// Returns `GenerationError::Misconfiguration` if the underlying
    /// client cannot be constructed.
    pub fn new() -> Result<Self, GenerationError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| GenerationError::Misconfiguration(e.to_string()))?;
        Ok(Self { client })
    }

    pub fn post(&self, url: &str) -> reqwest::RequestBuilder {
        self.client.post(url)
    }

    /// Execute `request` with the retry policy.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError::Timeout` when every attempt timed out,
    /// `GenerationError::Http` on a non-retryable status, and
    /// `GenerationError::Transport` for other network failures.
    pub async fn execute_with_retry(
        &self,
        request: reqwest::RequestBuilder,
        timeout: Duration,
        provider: &str,
    ) -> Result<reqwest::Response, GenerationError> {
        let mut backoff_ms = INITIAL_BACKOFF_MS;

        for attempt in 1..=MAX_ATTEMPTS {
            let attempt_request = request
                .try_clone()
                .ok_or_else(|| {
                    GenerationError::Transport("request body is not cloneable".to_string())
                })?
                .timeout(timeout);

            match attempt_request.send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        debug!(provider, attempt, "backend request succeeded");
                        return Ok(response);
                    }

                    let retryable = status.as_u16() == 429 || status.is_server_error();
                    if retryable && attempt < MAX_ATTEMPTS {
                        warn!(
                            provider,
                            attempt,
                            status = status.as_u16(),
                            "retryable provider status, backing off"
                        );
                    } else {
                        let message = response.text().await.unwrap_or_default();
                        return Err(GenerationError::Http {
                            status: status.as_u16(),
                            message: truncate(&message, 200),
                        });
                    }
                }
                Err(err) => {
                    let retryable = err.is_timeout() || err.is_connect();
                    if retryable && attempt < MAX_ATTEMPTS {
                        warn!(provider, attempt, error = %err, "transient transport error, backing off");
                    } else if err.is_timeout() {
                        return Err(GenerationError::Timeout {
                            seconds: timeout.as_secs(),
                        });
                    } else {
                        return Err(GenerationError::Transport(err.to_string()));
                    }
                }
            }

            tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
            backoff_ms *= 2;
        }

        Err(GenerationError::Transport(format!(
            "{provider} request failed after {MAX_ATTEMPTS} attempts"
        )))
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
