//! Benchmark suites and whole-run orchestration.
//!
//! A suite is an ordered list of tasks sharing generation parameters,
//! pacing, and a result-file prefix. Running a suite loads each task's
//! problems, runs them, writes one result file per task, and finishes with
//! a Markdown summary. A task whose dataset is missing or unreadable is
//! reported as empty; it never stops the suite.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing::{error, info, warn};

use crate::config::{EvalConfig, GenerationParams, SuiteSelection, DEFAULT_AGENTBENCH_FILE_LIMIT};
use crate::dataset::{self, BfclCategory, BFCL_CATEGORIES};
use crate::error::{DatasetError, ReportError};
use crate::llm::{GenerationClient, InferenceEndpointClient, RetryPolicy, TextGenerator};
use crate::problem::Problem;
use crate::report::{self, RunMetadata, TaskGroup};
use crate::runner::{TaskRunner, TaskSummary};

/// A benchmark suite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Suite {
    /// Math, common-sense QA, SQL, knowledge graph, and OS tasks.
    AgentBench,
    /// Berkeley Function Calling Leaderboard categories.
    Bfcl,
}

impl Suite {
    /// Every suite, in run order.
    pub const ALL: [Suite; 2] = [Suite::AgentBench, Suite::Bfcl];

    /// Suites covered by a selection, in run order.
    pub fn selected(selection: SuiteSelection) -> Vec<Suite> {
        Suite::ALL
            .into_iter()
            .filter(|suite| match suite {
                Suite::AgentBench => selection.includes_agentbench(),
                Suite::Bfcl => selection.includes_bfcl(),
            })
            .collect()
    }

    /// Short name.
    pub fn name(&self) -> &'static str {
        match self {
            Suite::AgentBench => "agentbench",
            Suite::Bfcl => "bfcl",
        }
    }

    /// Prefix of the per-task result files.
    pub fn file_prefix(&self) -> &'static str {
        match self {
            Suite::AgentBench => "",
            Suite::Bfcl => "bfcl_",
        }
    }

    /// Generation parameters for every prompt of the suite.
    pub fn params(&self) -> GenerationParams {
        match self {
            Suite::AgentBench => GenerationParams::agentbench(),
            Suite::Bfcl => GenerationParams::bfcl(),
        }
    }

    /// Heading of the Markdown summary.
    pub fn title(&self) -> &'static str {
        match self {
            Suite::AgentBench => "AgentBench Evaluation Results",
            Suite::Bfcl => "BFCL Full Evaluation Results",
        }
    }

    /// File name of the Markdown summary.
    pub fn summary_file_name(&self, meta: &RunMetadata) -> String {
        match self {
            Suite::AgentBench => format!("EVALUATION_SUMMARY_{}.md", meta.timestamp()),
            Suite::Bfcl => format!("BFCL_FULL_SUMMARY_{}.md", meta.timestamp()),
        }
    }

    /// Tasks of the suite, in run order.
    pub fn plans(&self) -> Vec<TaskPlan> {
        match self {
            Suite::AgentBench => vec![
                TaskPlan::new("math_reasoning", TaskSource::Builtin(dataset::math_problems)),
                TaskPlan::new(
                    "common_sense_qa",
                    TaskSource::Builtin(dataset::multiple_choice_problems),
                ),
                TaskPlan::new("sql_generation", TaskSource::Sql),
                TaskPlan::new("knowledge_graph", TaskSource::KnowledgeGraph),
                TaskPlan::new("os_interaction", TaskSource::Builtin(dataset::os_problems)),
            ],
            Suite::Bfcl => BFCL_CATEGORIES
                .iter()
                .map(|category| TaskPlan::new(category.name, TaskSource::Bfcl(*category)))
                .collect(),
        }
    }

    /// Groups task summaries into report sections.
    pub fn groups<'a>(&self, summaries: &'a [TaskSummary]) -> Vec<TaskGroup<'a>> {
        match self {
            Suite::AgentBench => vec![TaskGroup::new(None, summaries.iter().collect())],
            Suite::Bfcl => {
                let is_live = |s: &&TaskSummary| {
                    BfclCategory::by_name(&s.task).is_some_and(|c| c.live)
                };
                let (live, non_live): (Vec<&TaskSummary>, Vec<&TaskSummary>) =
                    summaries.iter().partition(is_live);
                vec![
                    TaskGroup::new(Some("Non-Live"), non_live),
                    TaskGroup::new(Some("Live"), live),
                ]
            }
        }
    }
}

impl fmt::Display for Suite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where a task's problems come from.
#[derive(Debug, Clone, Copy)]
pub enum TaskSource {
    /// A built-in table.
    Builtin(fn() -> Vec<Problem>),
    /// `dbbench/dev.jsonl` under the AgentBench data root.
    Sql,
    /// `knowledgegraph/dev.json` under the AgentBench data root.
    KnowledgeGraph,
    /// A BFCL category under the BFCL data root.
    Bfcl(BfclCategory),
}

/// One task of a suite.
#[derive(Debug, Clone, Copy)]
pub struct TaskPlan {
    /// Task name used in logs, result files, and the summary.
    pub name: &'static str,
    /// Problem source.
    pub source: TaskSource,
}

impl TaskPlan {
    pub fn new(name: &'static str, source: TaskSource) -> Self {
        Self { name, source }
    }

    /// Loads the task's problems.
    ///
    /// AgentBench files read the first 10 records unless the configuration
    /// sets a limit; BFCL categories are read in full by default.
    pub fn load(&self, config: &EvalConfig) -> Result<Vec<Problem>, DatasetError> {
        match self.source {
            TaskSource::Builtin(table) => Ok(table()),
            TaskSource::Sql => dataset::load_sql_problems(
                &config.agentbench_data_dir,
                config.limit_or(Some(DEFAULT_AGENTBENCH_FILE_LIMIT)),
            ),
            TaskSource::KnowledgeGraph => dataset::load_knowledge_graph_problems(
                &config.agentbench_data_dir,
                config.limit_or(Some(DEFAULT_AGENTBENCH_FILE_LIMIT)),
            ),
            TaskSource::Bfcl(category) => {
                dataset::load_bfcl_problems(&config.bfcl_data_dir, &category, config.limit_or(None))
            }
        }
    }
}

/// Delays applied while running a suite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    /// Pause after each problem.
    pub request_delay: Duration,
    /// Waits between failed attempts.
    pub retry: RetryPolicy,
}

impl Pacing {
    /// Standard pacing toward a rate-limited endpoint.
    pub fn for_suite(suite: Suite) -> Self {
        match suite {
            Suite::AgentBench => Self {
                request_delay: Duration::from_secs(1),
                retry: RetryPolicy::agentbench(),
            },
            Suite::Bfcl => Self {
                request_delay: Duration::from_millis(300),
                retry: RetryPolicy::bfcl(),
            },
        }
    }

    /// No waiting at all.
    pub fn none() -> Self {
        Self {
            request_delay: Duration::ZERO,
            retry: RetryPolicy::immediate(),
        }
    }
}

/// Outcome of one suite.
#[derive(Debug, Clone)]
pub struct SuiteReport {
    /// The suite that ran.
    pub suite: Suite,
    /// One summary per task, in run order.
    pub summaries: Vec<TaskSummary>,
    /// Per-task result files that were written.
    pub result_files: Vec<PathBuf>,
    /// The Markdown summary.
    pub summary_path: PathBuf,
}

/// Runs every task of a suite and writes its result files and summary.
///
/// # Errors
///
/// Only a failure to write the Markdown summary is an error; task result
/// files that cannot be written are logged and skipped.
pub async fn run_suite(
    config: &EvalConfig,
    suite: Suite,
    generator: Arc<dyn TextGenerator>,
    pacing: Pacing,
    meta: &RunMetadata,
) -> Result<SuiteReport, ReportError> {
    let client = GenerationClient::new(generator, pacing.retry);
    let runner = TaskRunner::new(client, config.max_retries)
        .with_request_delay(pacing.request_delay);

    let plans = suite.plans();
    let mut summaries = Vec::with_capacity(plans.len());
    let mut result_files = Vec::new();

    for (idx, plan) in plans.iter().enumerate() {
        info!(suite = %suite, "[{}/{}] Testing {}", idx + 1, plans.len(), plan.name);

        let problems = match plan.load(config) {
            Ok(problems) => problems,
            Err(e) => {
                warn!(task = plan.name, error = %e, "No problems loaded, reporting empty task");
                Vec::new()
            }
        };

        let summary = if problems.is_empty() {
            TaskSummary::empty(plan.name)
        } else {
            runner.run(plan.name, &problems).await
        };

        match report::write_task_result(&config.results_dir, suite.file_prefix(), &summary, meta) {
            Ok(path) => result_files.push(path),
            Err(e) => error!(task = plan.name, error = %e, "Failed to write task results"),
        }
        summaries.push(summary);
    }

    let groups = suite.groups(&summaries);
    let markdown = report::render_summary(suite.title(), meta, suite.file_prefix(), &groups);
    let summary_path =
        report::write_summary(&config.results_dir, &suite.summary_file_name(meta), &markdown)?;
    report::log_console_summary(&format!("{} COMPLETE", suite.title().to_uppercase()), &groups);

    Ok(SuiteReport {
        suite,
        summaries,
        result_files,
        summary_path,
    })
}

/// Runs every selected suite against the configured endpoint.
pub async fn run_all(config: &EvalConfig) -> anyhow::Result<Vec<SuiteReport>> {
    config.validate()?;
    let meta = RunMetadata::new(config.model_id.clone(), config.endpoint_url.clone());
    info!(
        run_id = %meta.run_id,
        model = %config.model_id,
        endpoint = %config.endpoint_url,
        suites = %config.suites,
        "Starting evaluation"
    );

    let suites = Suite::selected(config.suites);
    let mut reports = Vec::with_capacity(suites.len());
    for suite in suites {
        let endpoint = InferenceEndpointClient::from_config(config, suite.params())
            .with_context(|| format!("Failed to create endpoint client for {}", suite))?;
        let report = run_suite(config, suite, Arc::new(endpoint), Pacing::for_suite(suite), &meta)
            .await
            .with_context(|| format!("Failed to write {} summary", suite))?;
        reports.push(report);
    }

    info!(results_dir = %config.results_dir.display(), "All results saved");
    Ok(reports)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agentbench_plans() {
        let names: Vec<&str> = Suite::AgentBench.plans().iter().map(|p| p.name).collect();
        assert_eq!(
            names,
            vec![
                "math_reasoning",
                "common_sense_qa",
                "sql_generation",
                "knowledge_graph",
                "os_interaction"
            ]
        );
    }

    #[test]
    fn test_bfcl_plans_cover_all_categories() {
        assert_eq!(Suite::Bfcl.plans().len(), 13);
        assert_eq!(Suite::Bfcl.file_prefix(), "bfcl_");
        assert_eq!(Suite::Bfcl.params(), GenerationParams::bfcl());
    }

    #[test]
    fn test_bfcl_groups() {
        let summaries = vec![
            TaskSummary::empty("simple_python"),
            TaskSummary::empty("live_simple"),
            TaskSummary::empty("irrelevance"),
        ];
        let groups = Suite::Bfcl.groups(&summaries);
        assert_eq!(groups[0].label, Some("Non-Live"));
        let non_live: Vec<&str> = groups[0].summaries.iter().map(|s| s.task.as_str()).collect();
        assert_eq!(non_live, vec!["simple_python", "irrelevance"]);
        assert_eq!(groups[1].summaries[0].task, "live_simple");
    }

    #[test]
    fn test_builtin_plan_ignores_data_dirs() {
        let config = EvalConfig::new("https://e", "t").with_agentbench_data_dir("/nonexistent");
        let plan = Suite::AgentBench.plans()[0];
        assert_eq!(plan.load(&config).unwrap().len(), 10);
        let sql = Suite::AgentBench.plans()[2];
        assert!(matches!(sql.load(&config), Err(DatasetError::NotFound(_))));
    }

    #[test]
    fn test_selected_suites() {
        assert_eq!(Suite::selected(SuiteSelection::All), vec![Suite::AgentBench, Suite::Bfcl]);
        assert_eq!(Suite::selected(SuiteSelection::Bfcl), vec![Suite::Bfcl]);
    }

    #[test]
    fn test_pacing() {
        assert_eq!(Pacing::for_suite(Suite::Bfcl).request_delay, Duration::from_millis(300));
        assert_eq!(Pacing::for_suite(Suite::AgentBench).retry.retry_delay, Duration::from_secs(5));
        assert!(Pacing::none().request_delay.is_zero());
    }
}
