//! agent-bench: heuristic LLM benchmark runner.
//!
//! Prompts a hosted inference endpoint with AgentBench-style tasks and BFCL
//! function-calling categories, judges every free-text answer with a
//! task-specific heuristic, and writes per-task JSON results plus Markdown
//! summaries.

pub mod cli;
pub mod config;
pub mod dataset;
pub mod error;
pub mod function_call;
pub mod judge;
pub mod llm;
pub mod problem;
pub mod prompts;
pub mod report;
pub mod runner;
pub mod suite;

// Re-export commonly used error types
pub use error::{ConfigError, DatasetError, LlmError, ReportError};
