//! Run configuration.
//!
//! [`EvalConfig`] is resolved once at startup, from CLI arguments or the
//! environment, and passed explicitly to everything that needs it. Nothing
//! below the CLI reads process-wide state.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default model identifier reported in result files.
pub const DEFAULT_MODEL_ID: &str = "Qwen/Qwen2.5-3B-Instruct";

/// Default attempts per prompt.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default per-attempt request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

/// Default number of records read from each AgentBench dataset file.
pub const DEFAULT_AGENTBENCH_FILE_LIMIT: usize = 10;

/// Which benchmark suites a run covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuiteSelection {
    #[default]
    All,
    AgentBench,
    Bfcl,
}

impl SuiteSelection {
    /// Returns true if the AgentBench-style suite runs.
    pub fn includes_agentbench(&self) -> bool {
        matches!(self, SuiteSelection::All | SuiteSelection::AgentBench)
    }

    /// Returns true if the BFCL suite runs.
    pub fn includes_bfcl(&self) -> bool {
        matches!(self, SuiteSelection::All | SuiteSelection::Bfcl)
    }
}

impl fmt::Display for SuiteSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SuiteSelection::All => write!(f, "all"),
            SuiteSelection::AgentBench => write!(f, "agentbench"),
            SuiteSelection::Bfcl => write!(f, "bfcl"),
        }
    }
}

impl FromStr for SuiteSelection {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(SuiteSelection::All),
            "agentbench" | "agent-bench" => Ok(SuiteSelection::AgentBench),
            "bfcl" | "berkeley" => Ok(SuiteSelection::Bfcl),
            _ => Err(ConfigError::UnknownSuite(s.to_string())),
        }
    }
}

/// Generation parameters sent with every prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    /// Maximum number of new tokens to generate.
    pub max_new_tokens: u32,
    /// Sampling temperature.
    pub temperature: f64,
    /// Nucleus sampling probability.
    pub top_p: f64,
    /// Whether the endpoint echoes the prompt before the completion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_full_text: Option<bool>,
}

impl GenerationParams {
    /// Parameters for the AgentBench-style tasks.
    pub fn agentbench() -> Self {
        Self {
            max_new_tokens: 512,
            temperature: 0.7,
            top_p: 0.95,
            return_full_text: None,
        }
    }

    /// Parameters for the BFCL function-calling tasks.
    pub fn bfcl() -> Self {
        Self {
            max_new_tokens: 256,
            temperature: 0.1,
            top_p: 0.95,
            return_full_text: Some(false),
        }
    }
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self::agentbench()
    }
}

/// Configuration for one evaluation run.
#[derive(Clone)]
pub struct EvalConfig {
    /// Inference endpoint URL.
    pub endpoint_url: String,
    /// Bearer token for the endpoint.
    pub api_token: String,
    /// Model identifier written into result files.
    pub model_id: String,
    /// Directory for result files and summaries.
    pub results_dir: PathBuf,
    /// Root of the AgentBench data (`dbbench/`, `knowledgegraph/`).
    pub agentbench_data_dir: PathBuf,
    /// Root of the BFCL data (`BFCL_v4_*.json`, `possible_answer/`).
    pub bfcl_data_dir: PathBuf,
    /// Attempts per prompt.
    pub max_retries: u32,
    /// Per-attempt request timeout.
    pub request_timeout: Duration,
    /// Overrides the per-suite record limit for file-backed tasks.
    pub problem_limit: Option<usize>,
    /// Suites to run.
    pub suites: SuiteSelection,
}

impl fmt::Debug for EvalConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EvalConfig")
            .field("endpoint_url", &self.endpoint_url)
            .field("api_token", &mask_secret(&self.api_token))
            .field("model_id", &self.model_id)
            .field("results_dir", &self.results_dir)
            .field("agentbench_data_dir", &self.agentbench_data_dir)
            .field("bfcl_data_dir", &self.bfcl_data_dir)
            .field("max_retries", &self.max_retries)
            .field("request_timeout", &self.request_timeout)
            .field("problem_limit", &self.problem_limit)
            .field("suites", &self.suites)
            .finish()
    }
}

impl EvalConfig {
    /// Creates a configuration with default paths and limits.
    pub fn new(endpoint_url: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self {
            endpoint_url: endpoint_url.into(),
            api_token: api_token.into(),
            model_id: DEFAULT_MODEL_ID.to_string(),
            results_dir: PathBuf::from("./Results"),
            agentbench_data_dir: PathBuf::from("./AgentBench/data"),
            bfcl_data_dir: PathBuf::from("./bfcl_eval/data"),
            max_retries: DEFAULT_MAX_RETRIES,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            problem_limit: None,
            suites: SuiteSelection::All,
        }
    }

    /// Creates configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `HF_TOKEN`: Endpoint bearer token (required)
    /// - `HF_ENDPOINT_URL`: Inference endpoint URL (required)
    /// - `MODEL_ID`: Model identifier (default: Qwen/Qwen2.5-3B-Instruct)
    /// - `RESULTS_DIR`: Output directory (default: ./Results)
    /// - `AGENTBENCH_DATA_DIR`: AgentBench data root (default: ./AgentBench/data)
    /// - `BFCL_DATA_DIR`: BFCL data root (default: ./bfcl_eval/data)
    /// - `MAX_RETRIES`: Attempts per prompt (default: 3)
    /// - `REQUEST_TIMEOUT_SECS`: Per-attempt timeout (default: 120)
    /// - `PROBLEM_LIMIT`: Record limit for file-backed tasks
    /// - `EVAL_SUITES`: `all`, `agentbench`, or `bfcl` (default: all)
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a required variable is missing or a value
    /// does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Creates configuration from an arbitrary key lookup.
    ///
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_token = get("HF_TOKEN").ok_or(ConfigError::MissingToken)?;
        let endpoint_url = get("HF_ENDPOINT_URL").ok_or(ConfigError::MissingEndpoint)?;
        let mut config = Self::new(endpoint_url, api_token);

        if let Some(val) = get("MODEL_ID") {
            config.model_id = val;
        }
        if let Some(val) = get("RESULTS_DIR") {
            config.results_dir = PathBuf::from(val);
        }
        if let Some(val) = get("AGENTBENCH_DATA_DIR") {
            config.agentbench_data_dir = PathBuf::from(val);
        }
        if let Some(val) = get("BFCL_DATA_DIR") {
            config.bfcl_data_dir = PathBuf::from(val);
        }
        if let Some(val) = get("MAX_RETRIES") {
            config.max_retries = parse_value(&val, "MAX_RETRIES")?;
        }
        if let Some(val) = get("REQUEST_TIMEOUT_SECS") {
            let secs: u64 = parse_value(&val, "REQUEST_TIMEOUT_SECS")?;
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(val) = get("PROBLEM_LIMIT") {
            config.problem_limit = Some(parse_value(&val, "PROBLEM_LIMIT")?);
        }
        if let Some(val) = get("EVAL_SUITES") {
            config.suites = val.parse()?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for an empty token or endpoint, or a zero
    /// request timeout.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_token.trim().is_empty() {
            return Err(ConfigError::MissingToken);
        }
        if self.endpoint_url.trim().is_empty() {
            return Err(ConfigError::MissingEndpoint);
        }
        if !self.endpoint_url.starts_with("http://") && !self.endpoint_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                field: "endpoint_url".to_string(),
                reason: format!("'{}' is not an http(s) URL", self.endpoint_url),
            });
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "request_timeout".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }
        Ok(())
    }

    /// Record limit for a file-backed task, falling back to `default`.
    pub fn limit_or(&self, default: Option<usize>) -> Option<usize> {
        self.problem_limit.or(default)
    }

    /// Token masked for logging.
    pub fn api_token_masked(&self) -> String {
        mask_secret(&self.api_token)
    }

    /// Sets the model identifier.
    pub fn with_model_id(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = model_id.into();
        self
    }

    /// Sets the results directory.
    pub fn with_results_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.results_dir = dir.into();
        self
    }

    /// Sets the AgentBench data root.
    pub fn with_agentbench_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.agentbench_data_dir = dir.into();
        self
    }

    /// Sets the BFCL data root.
    pub fn with_bfcl_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.bfcl_data_dir = dir.into();
        self
    }

    /// Sets the attempts per prompt.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the per-attempt request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Sets the record limit for file-backed tasks.
    pub fn with_problem_limit(mut self, limit: usize) -> Self {
        self.problem_limit = Some(limit);
        self
    }

    /// Sets which suites run.
    pub fn with_suites(mut self, suites: SuiteSelection) -> Self {
        self.suites = suites;
        self
    }
}

/// Masks all but the first and last four characters of a secret.
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 8 {
        "*".repeat(chars.len())
    } else {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}...{}", head, tail)
    }
}

fn parse_value<T: FromStr>(value: &str, key: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        field: key.to_string(),
        reason: format!("could not parse '{}'", value),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const REQUIRED: [(&str, &str); 2] = [
        ("HF_TOKEN", "hf_abcdefghijklmnop"),
        ("HF_ENDPOINT_URL", "https://example.endpoints.huggingface.cloud"),
    ];

    #[test]
    fn test_defaults_from_required_vars() {
        let config = EvalConfig::from_lookup(lookup(&REQUIRED)).unwrap();
        assert_eq!(config.model_id, DEFAULT_MODEL_ID);
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.request_timeout, Duration::from_secs(120));
        assert_eq!(config.results_dir, PathBuf::from("./Results"));
        assert_eq!(config.problem_limit, None);
        assert_eq!(config.suites, SuiteSelection::All);
    }

    #[test]
    fn test_missing_token_is_fatal() {
        let err = EvalConfig::from_lookup(lookup(&[REQUIRED[1]])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingToken));

        let mut pairs = REQUIRED.to_vec();
        pairs[0] = ("HF_TOKEN", "   ");
        let err = EvalConfig::from_lookup(lookup(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::MissingToken));
    }

    #[test]
    fn test_missing_endpoint_is_fatal() {
        let err = EvalConfig::from_lookup(lookup(&[REQUIRED[0]])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEndpoint));
    }

    #[test]
    fn test_overrides() {
        let mut pairs = REQUIRED.to_vec();
        pairs.extend([
            ("MODEL_ID", "my/model"),
            ("RESULTS_DIR", "/tmp/out"),
            ("MAX_RETRIES", "5"),
            ("REQUEST_TIMEOUT_SECS", "30"),
            ("PROBLEM_LIMIT", "2"),
            ("EVAL_SUITES", "bfcl"),
        ]);
        let config = EvalConfig::from_lookup(lookup(&pairs)).unwrap();
        assert_eq!(config.model_id, "my/model");
        assert_eq!(config.results_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.problem_limit, Some(2));
        assert_eq!(config.suites, SuiteSelection::Bfcl);
    }

    #[test]
    fn test_invalid_numeric_value() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("MAX_RETRIES", "three"));
        let err = EvalConfig::from_lookup(lookup(&pairs)).unwrap_err();
        assert!(
            matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "MAX_RETRIES")
        );
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = EvalConfig::new("https://e", "token");
        assert!(config.validate().is_ok());
        assert!(EvalConfig::new("", "token").validate().is_err());
        assert!(EvalConfig::new("ftp://e", "token").validate().is_err());
        assert!(config
            .clone()
            .with_request_timeout(Duration::ZERO)
            .validate()
            .is_err());
    }

    #[test]
    fn test_suite_selection_parse() {
        assert_eq!("ALL".parse::<SuiteSelection>().unwrap(), SuiteSelection::All);
        assert_eq!(
            "agentbench".parse::<SuiteSelection>().unwrap(),
            SuiteSelection::AgentBench
        );
        assert!("mmlu".parse::<SuiteSelection>().is_err());
        assert!(SuiteSelection::All.includes_bfcl());
        assert!(!SuiteSelection::AgentBench.includes_bfcl());
    }

    #[test]
    fn test_generation_presets() {
        let bfcl = GenerationParams::bfcl();
        assert_eq!(bfcl.max_new_tokens, 256);
        assert_eq!(bfcl.return_full_text, Some(false));

        let json = serde_json::to_value(GenerationParams::agentbench()).unwrap();
        assert_eq!(json["max_new_tokens"], 512);
        assert!(json.get("return_full_text").is_none());
    }

    #[test]
    fn test_debug_masks_token() {
        let config = EvalConfig::new("https://e", "hf_abcdefghijklmnop");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("hf_abcdefghijklmnop"));
        assert!(debug.contains("hf_a...mnop"));
        assert_eq!(mask_secret("short"), "*****");
    }
}
