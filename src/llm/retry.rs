//! Retry wrapper around a [`TextGenerator`].

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::TextGenerator;
use crate::error::LlmError;

/// Markers of an endpoint that is still starting up.
const WARMING_MARKERS: [&str; 3] = ["loading", "initializing", "503"];

/// Outcome of generating a response for one prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult {
    /// Whether any attempt succeeded.
    pub success: bool,
    /// Generated text; empty on failure.
    pub response_text: String,
    /// Last error message when every attempt failed.
    pub error: Option<String>,
}

impl GenerationResult {
    /// Successful generation.
    pub fn success(response_text: impl Into<String>) -> Self {
        Self {
            success: true,
            response_text: response_text.into(),
            error: None,
        }
    }

    /// Failed generation.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            response_text: String::new(),
            error: Some(error.into()),
        }
    }
}

/// Delays between failed attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Wait after an ordinary failure.
    pub retry_delay: Duration,
    /// Warm-up wait per attempt number when the endpoint is starting.
    pub warmup_step: Duration,
    /// Upper bound on the warm-up wait.
    pub warmup_cap: Duration,
}

impl RetryPolicy {
    /// Policy with the given ordinary delay and the standard warm-up schedule.
    pub fn new(retry_delay: Duration) -> Self {
        Self {
            retry_delay,
            warmup_step: Duration::from_secs(30),
            warmup_cap: Duration::from_secs(90),
        }
    }

    /// Policy for the AgentBench-style tasks.
    pub fn agentbench() -> Self {
        Self::new(Duration::from_secs(5))
    }

    /// Policy for the BFCL tasks.
    pub fn bfcl() -> Self {
        Self::new(Duration::from_secs(3))
    }

    /// Policy that never waits.
    pub fn immediate() -> Self {
        Self {
            retry_delay: Duration::ZERO,
            warmup_step: Duration::ZERO,
            warmup_cap: Duration::ZERO,
        }
    }

    /// Warm-up wait after the failed attempt with zero-based index `attempt`.
    pub fn warmup_delay(&self, attempt: u32) -> Duration {
        self.warmup_step
            .saturating_mul(attempt.saturating_add(1))
            .min(self.warmup_cap)
    }

    /// Wait after a failed attempt with the given error message.
    pub fn delay_for(&self, attempt: u32, message: &str) -> Duration {
        if is_endpoint_warming(message) {
            self.warmup_delay(attempt)
        } else {
            self.retry_delay
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::agentbench()
    }
}

/// Returns true if the error message says the endpoint is still starting.
pub fn is_endpoint_warming(message: &str) -> bool {
    let message = message.to_lowercase();
    WARMING_MARKERS.iter().any(|marker| message.contains(*marker))
}

/// Generates responses with bounded retries.
#[derive(Clone)]
pub struct GenerationClient {
    generator: Arc<dyn TextGenerator>,
    policy: RetryPolicy,
}

impl GenerationClient {
    /// Wraps a generator with a retry policy.
    pub fn new(generator: Arc<dyn TextGenerator>, policy: RetryPolicy) -> Self {
        Self { generator, policy }
    }

    /// Get the retry policy.
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Generates a response, trying at most `max_retries` times.
    ///
    /// Never fails: when every attempt fails the last error message is
    /// returned in a failed [`GenerationResult`]. A wait only happens when
    /// another attempt follows.
    pub async fn generate(&self, prompt: &str, max_retries: u32) -> GenerationResult {
        let mut last_error: Option<String> = None;

        for attempt in 0..max_retries {
            match self.generator.generate_text(prompt).await {
                Ok(text) => return GenerationResult::success(text),
                Err(err) => {
                    let message = err.to_string();
                    let has_next = attempt + 1 < max_retries;
                    if has_next {
                        let delay = self.policy.delay_for(attempt, &message);
                        tracing::warn!(
                            attempt = attempt + 1,
                            max_retries = max_retries,
                            delay_ms = delay.as_millis() as u64,
                            warming = is_endpoint_warming(&message),
                            error = %message,
                            "Generation failed, will retry"
                        );
                        if !delay.is_zero() {
                            tokio::time::sleep(delay).await;
                        }
                    } else {
                        tracing::warn!(
                            attempt = attempt + 1,
                            max_retries = max_retries,
                            error = %message,
                            "Generation failed, no attempts left"
                        );
                    }
                    last_error = Some(message);
                }
            }
        }

        GenerationResult::failure(
            last_error.unwrap_or_else(|| LlmError::RetriesExhausted.to_string()),
        )
    }
}
