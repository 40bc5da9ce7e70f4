//! Per-problem results and per-task summaries.

use serde::{Deserialize, Serialize};

use crate::function_call::ParsedFunctionCall;
use crate::judge::Verdict;
use crate::llm::GenerationResult;
use crate::problem::{ExpectedAnswer, Problem, ProblemMetadata, TaskType};

/// Outcome of one problem: what was asked, what came back, how it was judged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    /// Problem identifier.
    pub id: String,
    /// Question text.
    pub question: String,
    /// Task type that selected the judge.
    pub task_type: TaskType,
    /// Expected answer.
    pub expected_answer: ExpectedAnswer,
    /// Raw model response; empty when generation failed.
    pub model_response: String,
    /// Verdict and the evidence behind it.
    pub verdict: Verdict,
    /// Whether generation succeeded.
    pub success: bool,
    /// Generation error, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Problem metadata.
    #[serde(default, skip_serializing_if = "ProblemMetadata::is_empty")]
    pub metadata: ProblemMetadata,
}

impl ResultRecord {
    /// Builds the record for a problem from its generation and verdict.
    pub fn new(problem: &Problem, generation: GenerationResult, verdict: Verdict) -> Self {
        Self {
            id: problem.id.clone(),
            question: problem.question.clone(),
            task_type: problem.task_type(),
            expected_answer: problem.expected.clone(),
            model_response: generation.response_text,
            verdict,
            success: generation.success,
            error: generation.error,
            metadata: problem.metadata.clone(),
        }
    }

    /// Whether the response was judged correct.
    pub fn is_correct(&self) -> bool {
        self.verdict.correct
    }

    /// Function call extracted from the response, if any.
    pub fn parsed_call(&self) -> Option<&ParsedFunctionCall> {
        self.verdict.parsed_call()
    }
}

/// Percentage of correct answers; zero when there are no problems.
pub fn success_rate(correct: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        correct as f64 / total as f64 * 100.0
    }
}

/// Aggregate over all problems of one task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskSummary {
    /// Task name.
    pub task: String,
    /// Number of problems.
    pub total: usize,
    /// Number of problems the endpoint answered.
    pub successful_responses: usize,
    /// Number judged correct.
    pub correct: usize,
    /// `100 * correct / total`, or 0 for an empty task.
    pub success_rate: f64,
    /// Records in problem order.
    pub results: Vec<ResultRecord>,
}

impl TaskSummary {
    /// Summarizes the records of a task.
    pub fn from_records(task: impl Into<String>, results: Vec<ResultRecord>) -> Self {
        let total = results.len();
        let successful_responses = results.iter().filter(|r| r.success).count();
        let correct = results.iter().filter(|r| r.is_correct()).count();
        Self {
            task: task.into(),
            total,
            successful_responses,
            correct,
            success_rate: success_rate(correct, total),
            results,
        }
    }

    /// Summary of a task with no problems.
    pub fn empty(task: impl Into<String>) -> Self {
        Self::from_records(task, Vec::new())
    }

    /// Returns true if the task had no problems.
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Number of problems whose generation failed.
    pub fn failed_generations(&self) -> usize {
        self.total.saturating_sub(self.successful_responses)
    }
}
