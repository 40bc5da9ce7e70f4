//! Result files and run summaries.
//!
//! Each task gets a JSON file `<prefix><task>_<YYYYMMDD_HHMMSS>.json` with
//! the run metadata and every record. Each suite gets a Markdown summary and
//! a console table in the log.

pub mod markdown;

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::error::ReportError;
use crate::runner::TaskSummary;

pub use markdown::{render_summary, SummaryTotals, TaskGroup};

/// Identity of a run, shared by every file it writes.
#[derive(Debug, Clone, PartialEq)]
pub struct RunMetadata {
    /// Model identifier.
    pub model_id: String,
    /// Endpoint URL.
    pub endpoint: String,
    /// Unique run id.
    pub run_id: Uuid,
    /// Start of the run; also the file-name timestamp.
    pub started_at: DateTime<Local>,
}

impl RunMetadata {
    /// Metadata for a run starting now.
    pub fn new(model_id: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self::at(model_id, endpoint, Local::now())
    }

    /// Metadata for a run that started at the given time.
    pub fn at(
        model_id: impl Into<String>,
        endpoint: impl Into<String>,
        started_at: DateTime<Local>,
    ) -> Self {
        Self {
            model_id: model_id.into(),
            endpoint: endpoint.into(),
            run_id: Uuid::new_v4(),
            started_at,
        }
    }

    /// File-name timestamp, `YYYYMMDD_HHMMSS`.
    pub fn timestamp(&self) -> String {
        self.started_at.format("%Y%m%d_%H%M%S").to_string()
    }

    /// Name of the result file for a task.
    pub fn task_file_name(&self, prefix: &str, task: &str) -> String {
        format!("{}{}_{}.json", prefix, task, self.timestamp())
    }
}

#[derive(Serialize)]
struct TaskResultFile<'a> {
    model: &'a str,
    endpoint: &'a str,
    run_id: Uuid,
    test_date: String,
    #[serde(flatten)]
    summary: &'a TaskSummary,
}

/// Writes the result file of one task and returns its path.
pub fn write_task_result(
    results_dir: &Path,
    prefix: &str,
    summary: &TaskSummary,
    meta: &RunMetadata,
) -> Result<PathBuf, ReportError> {
    fs::create_dir_all(results_dir)?;
    let path = results_dir.join(meta.task_file_name(prefix, &summary.task));

    let file = TaskResultFile {
        model: &meta.model_id,
        endpoint: &meta.endpoint,
        run_id: meta.run_id,
        test_date: Local::now().to_rfc3339(),
        summary,
    };
    let json = serde_json::to_string_pretty(&file)?;
    fs::write(&path, json).map_err(|source| ReportError::Write {
        path: path.clone(),
        source,
    })?;

    info!(task = %summary.task, path = %path.display(), "Saved task results");
    Ok(path)
}

/// Writes a Markdown summary and returns its path.
pub fn write_summary(
    results_dir: &Path,
    file_name: &str,
    content: &str,
) -> Result<PathBuf, ReportError> {
    fs::create_dir_all(results_dir)?;
    let path = results_dir.join(file_name);
    fs::write(&path, content).map_err(|source| ReportError::Write {
        path: path.clone(),
        source,
    })?;
    info!(path = %path.display(), "Saved summary");
    Ok(path)
}

/// Console table lines: one per task plus the totals.
pub fn console_table(groups: &[TaskGroup<'_>]) -> Vec<String> {
    let mut lines = Vec::new();
    for group in groups {
        if let Some(label) = group.label {
            lines.push(format!("{}:", label));
        }
        for summary in &group.summaries {
            lines.push(format!(
                "  {:25}: {:2}/{:2} ({:5.1}%)  responses {:2}/{:2}",
                summary.task,
                summary.correct,
                summary.total,
                summary.success_rate,
                summary.successful_responses,
                summary.total
            ));
        }
    }

    let totals = SummaryTotals::from_groups(groups);
    lines.push(format!(
        "Total: {}/{} ({:.1}%), responses {}/{}",
        totals.correct,
        totals.total,
        totals.overall_accuracy,
        totals.successful_responses,
        totals.total
    ));
    lines.push(format!("Average task rate: {:.1}%", totals.average_rate));
    lines
}

/// Logs the console table.
pub fn log_console_summary(title: &str, groups: &[TaskGroup<'_>]) {
    info!("{}", "=".repeat(80));
    info!("{}", title);
    info!("{}", "=".repeat(80));
    for line in console_table(groups) {
        info!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn meta() -> RunMetadata {
        let started = Local.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap();
        RunMetadata::at("Qwen/Qwen2.5-3B-Instruct", "https://example.cloud", started)
    }

    #[test]
    fn test_task_file_name() {
        assert_eq!(meta().timestamp(), "20250314_092653");
        assert_eq!(
            meta().task_file_name("bfcl_", "simple_python"),
            "bfcl_simple_python_20250314_092653.json"
        );
    }

    #[test]
    fn test_write_task_result() {
        let dir = TempDir::new().unwrap();
        let results_dir = dir.path().join("Results");
        let summary = TaskSummary::empty("math_reasoning");

        let path = write_task_result(&results_dir, "", &summary, &meta()).unwrap();
        assert_eq!(path, results_dir.join("math_reasoning_20250314_092653.json"));

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["model"], "Qwen/Qwen2.5-3B-Instruct");
        assert_eq!(json["endpoint"], "https://example.cloud");
        assert_eq!(json["task"], "math_reasoning");
        assert_eq!(json["total"], 0);
        assert_eq!(json["successful_responses"], 0);
        assert_eq!(json["success_rate"], 0.0);
        assert!(json["results"].as_array().unwrap().is_empty());
        assert!(json["test_date"].is_string());
    }

    #[test]
    fn test_write_summary() {
        let dir = TempDir::new().unwrap();
        let path = write_summary(dir.path(), "SUMMARY.md", "# Results\n").unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "# Results\n");
    }

    #[test]
    fn test_write_failure_is_reported() {
        let dir = TempDir::new().unwrap();
        // A file where the directory should be.
        let blocked = dir.path().join("blocked");
        fs::write(&blocked, "").unwrap();
        assert!(write_summary(&blocked, "SUMMARY.md", "x").is_err());
    }

    #[test]
    fn test_console_table() {
        let summary = TaskSummary::empty("knowledge_graph");
        let groups = vec![TaskGroup::new(None, vec![&summary])];
        let lines = console_table(&groups);
        assert_eq!(lines[0], "  knowledge_graph          :  0/ 0 (  0.0%)  responses  0/ 0");
        assert_eq!(lines[1], "Total: 0/0 (0.0%), responses 0/0");
    }
}
