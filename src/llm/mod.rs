//! Text generation against a hosted inference endpoint.
//!
//! [`TextGenerator`] is a single attempt that may fail. [`GenerationClient`]
//! wraps any generator with the retry policy and turns the final outcome
//! into a [`GenerationResult`], so transport failures never escape as errors.
//!
//! ```ignore
//! use std::sync::Arc;
//! use agent_bench::config::{EvalConfig, GenerationParams};
//! use agent_bench::llm::{GenerationClient, InferenceEndpointClient, RetryPolicy};
//!
//! let config = EvalConfig::from_env()?;
//! let endpoint = InferenceEndpointClient::from_config(&config, GenerationParams::bfcl())?;
//! let client = GenerationClient::new(Arc::new(endpoint), RetryPolicy::bfcl());
//!
//! let result = client.generate("get_weather(city='Paris')?", config.max_retries).await;
//! if result.success {
//!     println!("{}", result.response_text);
//! }
//! ```

pub mod endpoint;
pub mod retry;

use async_trait::async_trait;

use crate::error::LlmError;

pub use endpoint::{extract_generated_text, InferenceEndpointClient};
pub use retry::{is_endpoint_warming, GenerationClient, GenerationResult, RetryPolicy};

/// Something that turns a prompt into generated text in one attempt.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generates text for the prompt.
    async fn generate_text(&self, prompt: &str) -> Result<String, LlmError>;
}
