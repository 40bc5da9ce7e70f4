//! Markdown run summary.

use std::fmt::Write;

use chrono::Local;

use super::RunMetadata;
use crate::runner::{success_rate, TaskSummary};

/// Task summaries shown under an optional section label.
#[derive(Debug, Clone)]
pub struct TaskGroup<'a> {
    /// Section label, e.g. "Non-Live".
    pub label: Option<&'a str>,
    /// Summaries in report order.
    pub summaries: Vec<&'a TaskSummary>,
}

impl<'a> TaskGroup<'a> {
    pub fn new(label: Option<&'a str>, summaries: Vec<&'a TaskSummary>) -> Self {
        Self { label, summaries }
    }
}

/// Totals over every task of a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryTotals {
    /// Problems across all tasks.
    pub total: usize,
    /// Problems the endpoint answered across all tasks.
    pub successful_responses: usize,
    /// Correct answers across all tasks.
    pub correct: usize,
    /// `100 * correct / total` over all problems.
    pub overall_accuracy: f64,
    /// Mean success rate over tasks with at least one problem.
    pub average_rate: f64,
}

impl SummaryTotals {
    /// Totals over the given summaries.
    pub fn from_summaries<'a>(summaries: impl IntoIterator<Item = &'a TaskSummary>) -> Self {
        let mut total = 0;
        let mut successful_responses = 0;
        let mut correct = 0;
        let mut rates = Vec::new();
        for summary in summaries {
            total += summary.total;
            successful_responses += summary.successful_responses;
            correct += summary.correct;
            if !summary.is_empty() {
                rates.push(summary.success_rate);
            }
        }
        let average_rate = if rates.is_empty() {
            0.0
        } else {
            rates.iter().sum::<f64>() / rates.len() as f64
        };

        Self {
            total,
            successful_responses,
            correct,
            overall_accuracy: success_rate(correct, total),
            average_rate,
        }
    }

    /// Totals over every summary in the groups.
    pub fn from_groups(groups: &[TaskGroup<'_>]) -> Self {
        Self::from_summaries(groups.iter().flat_map(|g| g.summaries.iter().copied()))
    }
}

/// Renders the Markdown summary of a suite run.
///
/// `file_prefix` is the result-file prefix used for the task files, listed
/// at the end of the document.
pub fn render_summary(
    title: &str,
    meta: &RunMetadata,
    file_prefix: &str,
    groups: &[TaskGroup<'_>],
) -> String {
    let totals = SummaryTotals::from_groups(groups);
    let mut out = String::new();

    let _ = writeln!(out, "# {}\n", title);
    let _ = writeln!(out, "**Model**: {}", meta.model_id);
    let _ = writeln!(out, "**Endpoint**: {}", meta.endpoint);
    let _ = writeln!(out, "**Run ID**: {}", meta.run_id);
    let _ = writeln!(out, "**Test Date**: {}", meta.started_at.format("%Y-%m-%d %H:%M:%S"));
    let _ = writeln!(out, "**Evaluation Method**: Heuristic judgment for each response\n");
    let _ = writeln!(out, "---\n");

    let _ = writeln!(out, "## Task Success Rates\n");
    let _ = writeln!(out, "| Task | Total | Responses | Correct | Success Rate |");
    let _ = writeln!(out, "|------|-------|-----------|---------|--------------|");
    for group in groups {
        if let Some(label) = group.label {
            let _ = writeln!(out, "| **{}** | | | | |", label);
        }
        for summary in &group.summaries {
            let _ = writeln!(
                out,
                "| {} | {} | {} | {} | **{:.1}%** |",
                summary.task,
                summary.total,
                summary.successful_responses,
                summary.correct,
                summary.success_rate
            );
        }
    }

    let _ = writeln!(out, "\n---\n");
    let _ = writeln!(out, "## Summary\n");
    let _ = writeln!(out, "| Metric | Value |");
    let _ = writeln!(out, "|--------|-------|");
    let _ = writeln!(out, "| Total Questions | {} |", totals.total);
    let _ = writeln!(out, "| Successful Responses | {} |", totals.successful_responses);
    let _ = writeln!(out, "| Total Correct | {} |", totals.correct);
    let _ = writeln!(out, "| Overall Accuracy | {:.1}% |", totals.overall_accuracy);
    let _ = writeln!(out, "| Average Task Rate | {:.1}% |", totals.average_rate);

    let _ = writeln!(out, "\n## Result Files\n");
    for summary in groups.iter().flat_map(|g| g.summaries.iter()) {
        let _ = writeln!(out, "- `{}`", meta.task_file_name(file_prefix, &summary.task));
    }

    let _ = writeln!(out, "\n*Generated: {}*", Local::now().to_rfc3339());
    out
}
