//! CLI argument definitions and the run entry point.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing::{info, warn};

use crate::config::{
    EvalConfig, SuiteSelection, DEFAULT_MAX_RETRIES, DEFAULT_MODEL_ID, DEFAULT_REQUEST_TIMEOUT_SECS,
};
use crate::error::ConfigError;
use crate::suite::{self, Suite};

/// Default output directory for result files.
const DEFAULT_RESULTS_DIR: &str = "./Results";

/// Default AgentBench data root.
const DEFAULT_AGENTBENCH_DATA_DIR: &str = "./AgentBench/data";

/// Default BFCL data root.
const DEFAULT_BFCL_DATA_DIR: &str = "./bfcl_eval/data";

/// Benchmark runner for hosted LLM inference endpoints.
#[derive(Parser, Debug)]
#[command(name = "agent-bench")]
#[command(about = "Run AgentBench and BFCL evaluations against an inference endpoint")]
#[command(version)]
#[command(
    long_about = "agent-bench prompts a hosted inference endpoint with AgentBench-style tasks (math, common-sense QA, SQL, knowledge graph, OS) and BFCL function-calling categories, judges every answer heuristically, and writes per-task JSON results plus a Markdown summary.\n\nExample usage:\n  HF_TOKEN=hf_xxx agent-bench --endpoint https://xyz.endpoints.huggingface.cloud --suites bfcl --limit 20"
)]
pub struct Cli {
    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info", global = true)]
    pub log_level: String,

    /// Inference endpoint URL.
    #[arg(short, long, env = "HF_ENDPOINT_URL")]
    pub endpoint: Option<String>,

    /// Bearer token for the endpoint.
    #[arg(long, env = "HF_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Model identifier written into result files.
    #[arg(short, long, env = "MODEL_ID", default_value = DEFAULT_MODEL_ID)]
    pub model: String,

    /// Suites to run: all, agentbench, or bfcl.
    #[arg(short, long, env = "EVAL_SUITES", default_value = "all")]
    pub suites: SuiteSelection,

    /// Directory for result files and summaries.
    #[arg(short = 'o', long, env = "RESULTS_DIR", default_value = DEFAULT_RESULTS_DIR)]
    pub results_dir: PathBuf,

    /// AgentBench data root (contains dbbench/ and knowledgegraph/).
    #[arg(long, env = "AGENTBENCH_DATA_DIR", default_value = DEFAULT_AGENTBENCH_DATA_DIR)]
    pub agentbench_data_dir: PathBuf,

    /// BFCL data root (contains BFCL_v4_*.json and possible_answer/).
    #[arg(long, env = "BFCL_DATA_DIR", default_value = DEFAULT_BFCL_DATA_DIR)]
    pub bfcl_data_dir: PathBuf,

    /// Attempts per prompt before recording a failure.
    #[arg(long, env = "MAX_RETRIES", default_value_t = DEFAULT_MAX_RETRIES)]
    pub max_retries: u32,

    /// Per-attempt request timeout in seconds.
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Record limit for each file-backed task.
    /// AgentBench files default to 10 records; BFCL categories are read in full.
    #[arg(short = 'n', long, env = "PROBLEM_LIMIT")]
    pub limit: Option<usize>,

    /// List the selected tasks and their problem counts without calling the endpoint.
    #[arg(long)]
    pub list_tasks: bool,
}

impl Cli {
    /// Builds the run configuration without validating it.
    pub fn to_config(&self) -> EvalConfig {
        let mut config = EvalConfig::new(
            self.endpoint.clone().unwrap_or_default(),
            self.token.clone().unwrap_or_default(),
        )
        .with_model_id(self.model.clone())
        .with_results_dir(self.results_dir.clone())
        .with_agentbench_data_dir(self.agentbench_data_dir.clone())
        .with_bfcl_data_dir(self.bfcl_data_dir.clone())
        .with_max_retries(self.max_retries)
        .with_request_timeout(Duration::from_secs(self.timeout))
        .with_suites(self.suites);
        if let Some(limit) = self.limit {
            config = config.with_problem_limit(limit);
        }
        config
    }

    /// Builds and validates the run configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the token or endpoint is missing or a value
    /// is out of range.
    pub fn into_config(self) -> Result<EvalConfig, ConfigError> {
        let config = self.to_config();
        config.validate()?;
        Ok(config)
    }
}

/// Parse CLI arguments without running.
///
/// Use this together with `run_with_cli()` when logging has to be set up
/// from the parsed arguments first.
pub fn parse_cli() -> Cli {
    Cli::parse()
}

/// Parse CLI arguments and run.
pub async fn run() -> anyhow::Result<()> {
    run_with_cli(parse_cli()).await
}

/// Run the CLI with the parsed arguments.
pub async fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    if cli.list_tasks {
        list_tasks(&cli.to_config());
        return Ok(());
    }

    let config = cli.into_config()?;
    info!(
        endpoint = %config.endpoint_url,
        token = %config.api_token_masked(),
        model = %config.model_id,
        max_retries = config.max_retries,
        "Configuration loaded"
    );

    let reports = suite::run_all(&config).await?;
    for report in &reports {
        info!(
            suite = %report.suite,
            tasks = report.summaries.len(),
            summary = %report.summary_path.display(),
            "Suite finished"
        );
    }
    Ok(())
}

fn list_tasks(config: &EvalConfig) {
    for suite in Suite::selected(config.suites) {
        info!("{}:", suite.title());
        for plan in suite.plans() {
            match plan.load(config) {
                Ok(problems) => info!("  {:25}: {} problems", plan.name, problems.len()),
                Err(e) => warn!("  {:25}: unavailable ({})", plan.name, e),
            }
        }
    }
}
