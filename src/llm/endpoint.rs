//! HTTP client for text-generation inference endpoints.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::TextGenerator;
use crate::config::{mask_secret, EvalConfig, GenerationParams};
use crate::error::LlmError;

/// Keys that may hold the generated text in an object response, in order.
const TEXT_KEYS: [&str; 3] = ["generated_text", "text", "output"];

/// Client for a single inference endpoint.
pub struct InferenceEndpointClient {
    /// Endpoint URL; requests are posted here directly.
    endpoint_url: String,
    /// Bearer token.
    api_token: String,
    /// Parameters sent with every prompt.
    params: GenerationParams,
    /// HTTP client with the per-attempt timeout applied.
    http_client: Client,
}

impl InferenceEndpointClient {
    /// Creates a client for the endpoint.
    ///
    /// # Errors
    ///
    /// Returns `LlmError::RequestFailed` if the HTTP client cannot be built.
    pub fn new(
        endpoint_url: impl Into<String>,
        api_token: impl Into<String>,
        params: GenerationParams,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::RequestFailed(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint_url: endpoint_url.into(),
            api_token: api_token.into(),
            params,
            http_client,
        })
    }

    /// Creates a client from the run configuration.
    pub fn from_config(config: &EvalConfig, params: GenerationParams) -> Result<Self, LlmError> {
        Self::new(
            config.endpoint_url.clone(),
            config.api_token.clone(),
            params,
            config.request_timeout,
        )
    }

    /// Get the endpoint URL.
    pub fn endpoint_url(&self) -> &str {
        &self.endpoint_url
    }

    /// Get the generation parameters.
    pub fn params(&self) -> &GenerationParams {
        &self.params
    }

    /// Get the API token (for debugging, returns masked value).
    pub fn api_token_masked(&self) -> String {
        mask_secret(&self.api_token)
    }
}

/// Request body for the endpoint.
#[derive(Debug, Serialize)]
struct EndpointRequest<'a> {
    inputs: &'a str,
    parameters: &'a GenerationParams,
}

/// Error body returned by hosted endpoints, e.g. while a model loads.
#[derive(Debug, Deserialize)]
struct EndpointErrorBody {
    error: String,
}

#[async_trait]
impl TextGenerator for InferenceEndpointClient {
    async fn generate_text(&self, prompt: &str) -> Result<String, LlmError> {
        let request = EndpointRequest {
            inputs: prompt,
            parameters: &self.params,
        };

        let http_response = self
            .http_client
            .post(&self.endpoint_url)
            .header("Accept", "application/json")
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", self.api_token))
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::RequestFailed(e.to_string()))?;

        let status = http_response.status();

        if !status.is_success() {
            let error_text = http_response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error response".to_string());

            let message = match serde_json::from_str::<EndpointErrorBody>(&error_text) {
                Ok(body) => body.error,
                Err(_) => error_text,
            };

            return Err(LlmError::ApiError {
                code: status.as_u16(),
                message,
            });
        }

        let body: Value = http_response
            .json()
            .await
            .map_err(|e| {
                LlmError::ParseError(format!("Failed to parse endpoint response: {}", e))
            })?;

        Ok(extract_generated_text(&body))
    }
}

/// Pulls the generated text out of an endpoint response.
///
/// Endpoints disagree on the response shape, so all of these are accepted:
/// - an array: the first element is used (object by text key, string as is)
/// - an object: the first present key of `generated_text`, `text`, `output`
/// - any other value: its JSON rendering
///
/// An object without usable text yields an empty string; an empty array is
/// rendered as `[]`.
pub fn extract_generated_text(body: &Value) -> String {
    match body {
        Value::Array(items) => match items.first() {
            Some(Value::String(text)) => text.clone(),
            Some(Value::Object(_)) => text_from_object(&items[0]),
            Some(other) => stringify(other),
            None => {
                tracing::debug!("Endpoint returned an empty array");
                body.to_string()
            }
        },
        Value::Object(_) => text_from_object(body),
        other => stringify(other),
    }
}

fn text_from_object(object: &Value) -> String {
    match TEXT_KEYS.iter().find_map(|key| object.get(*key)) {
        Some(value) => stringify(value),
        None => {
            tracing::debug!(response = %object, "No text field in endpoint response");
            String::new()
        }
    }
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
