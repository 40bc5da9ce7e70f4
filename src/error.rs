//! Error types for agent-bench operations.
//!
//! Defines error types for each subsystem:
//! - Configuration resolution at startup
//! - Inference endpoint interactions
//! - Dataset loading
//! - Result and summary reporting
//!
//! Judging never produces an error: an unrecognizable model response is an
//! ordinary "incorrect" verdict.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while resolving the run configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing API token: HF_TOKEN environment variable not set")]
    MissingToken,

    #[error("Missing inference endpoint URL: HF_ENDPOINT_URL environment variable not set")]
    MissingEndpoint,

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Unknown suite '{0}': must be 'all', 'agentbench', or 'bfcl'")]
    UnknownSuite(String),
}

/// Errors that can occur during a single call to the inference endpoint.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(String),

    #[error("Failed to parse endpoint response: {0}")]
    ParseError(String),

    #[error("API error ({code}): {message}")]
    ApiError { code: u16, message: String },

    #[error("Max retries exceeded")]
    RetriesExhausted,
}

/// Errors that can occur while loading problem sets from disk.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Dataset file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Malformed record {line} in '{}': {reason}", .path.display())]
    MalformedRecord {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors that can occur while writing result files and summaries.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to write '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
