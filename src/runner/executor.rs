//! Task runner: prompt, judge, and tally each problem in order.

use std::time::Duration;

use tracing::info;

use super::result::{ResultRecord, TaskSummary};
use crate::judge::{JudgeRegistry, Verdict};
use crate::llm::GenerationClient;
use crate::problem::Problem;

/// Characters of the question shown in progress logs.
const PREVIEW_CHARS: usize = 60;

/// Runs the problems of a task strictly one after another.
pub struct TaskRunner {
    client: GenerationClient,
    registry: JudgeRegistry,
    max_retries: u32,
    request_delay: Duration,
}

impl TaskRunner {
    /// Creates a runner with the standard judges and no inter-request delay.
    pub fn new(client: GenerationClient, max_retries: u32) -> Self {
        Self {
            client,
            registry: JudgeRegistry::standard(),
            max_retries,
            request_delay: Duration::ZERO,
        }
    }

    /// Sets the judge registry.
    pub fn with_registry(mut self, registry: JudgeRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Sets the pause after each problem.
    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }

    /// Runs every problem in order and summarizes the task.
    pub async fn run(&self, task: &str, problems: &[Problem]) -> TaskSummary {
        let total = problems.len();
        info!(task = task, total = total, "Running task");

        let mut results = Vec::with_capacity(total);
        for (idx, problem) in problems.iter().enumerate() {
            info!("[{}/{}] {}", idx + 1, total, preview(&problem.question, PREVIEW_CHARS));

            let record = self.run_problem(problem).await;
            if !record.success {
                info!(
                    "  ERROR: {}",
                    preview(record.error.as_deref().unwrap_or("unknown"), PREVIEW_CHARS)
                );
            } else if record.is_correct() {
                info!("  CORRECT");
            } else {
                info!("  INCORRECT (expected: {})", record.expected_answer);
            }
            results.push(record);

            if !self.request_delay.is_zero() {
                tokio::time::sleep(self.request_delay).await;
            }
        }

        let summary = TaskSummary::from_records(task, results);
        info!(
            task = task,
            correct = summary.correct,
            total = summary.total,
            success_rate = format!("{:.1}%", summary.success_rate),
            "Task complete"
        );
        summary
    }

    /// Generates and judges one problem.
    ///
    /// A failed generation is recorded as incorrect without judging.
    pub async fn run_problem(&self, problem: &Problem) -> ResultRecord {
        let generation = self.client.generate(&problem.prompt, self.max_retries).await;

        let verdict = if generation.success {
            self.registry.judge(problem, &generation.response_text)
        } else {
            Verdict::generation_failed(generation.error.clone().unwrap_or_default())
        };

        ResultRecord::new(problem, generation, verdict)
    }
}

/// First `max` characters of the text, with "..." when cut.
fn preview(text: &str, max: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LlmError;
    use crate::judge::Evidence;
    use crate::llm::{RetryPolicy, TextGenerator};
    use crate::problem::ExpectedAnswer;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Replies with canned responses in order.
    struct Scripted {
        replies: Vec<Result<&'static str, &'static str>>,
        next: AtomicUsize,
    }

    #[async_trait]
    impl TextGenerator for Scripted {
        async fn generate_text(&self, _prompt: &str) -> Result<String, LlmError> {
            let idx = self.next.fetch_add(1, Ordering::SeqCst);
            match self.replies.get(idx) {
                Some(Ok(text)) => Ok(text.to_string()),
                Some(Err(msg)) => Err(LlmError::RequestFailed(msg.to_string())),
                None => Err(LlmError::RequestFailed("script exhausted".to_string())),
            }
        }
    }

    fn runner(replies: Vec<Result<&'static str, &'static str>>, max_retries: u32) -> TaskRunner {
        let generator = Arc::new(Scripted {
            replies,
            next: AtomicUsize::new(0),
        });
        TaskRunner::new(GenerationClient::new(generator, RetryPolicy::immediate()), max_retries)
    }

    fn math(id: &str, answer: f64) -> Problem {
        Problem::new(id, format!("question {}", id), ExpectedAnswer::Math { answer })
    }

    #[tokio::test]
    async fn test_run_preserves_order_and_counts() {
        let runner = runner(vec![Ok("42"), Ok("the answer is 7"), Ok("13")], 1);
        let problems = vec![math("a", 42.0), math("b", 8.0), math("c", 13.0)];

        let summary = runner.run("math_reasoning", &problems).await;
        assert_eq!(summary.task, "math_reasoning");
        assert_eq!(summary.total, 3);
        assert_eq!(summary.correct, 2);
        let ids: Vec<&str> = summary.results.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(summary.results[1].verdict.evidence, Evidence::Number(7.0));
    }

    #[tokio::test]
    async fn test_failed_generation_is_incorrect() {
        let runner = runner(vec![Err("connection refused")], 1);
        let summary = runner.run("math_reasoning", &[math("a", 42.0)]).await;

        let record = &summary.results[0];
        assert!(!record.success);
        assert!(!record.is_correct());
        assert_eq!(record.error.as_deref(), Some("HTTP request failed: connection refused"));
        assert_eq!(
            record.verdict.evidence,
            Evidence::GenerationFailed("HTTP request failed: connection refused".to_string())
        );
        assert_eq!(summary.success_rate, 0.0);
    }

    #[tokio::test]
    async fn test_retry_inside_problem() {
        let runner = runner(vec![Err("503"), Ok("42")], 2);
        let summary = runner.run("math_reasoning", &[math("a", 42.0)]).await;
        assert_eq!(summary.correct, 1);
    }

    #[tokio::test]
    async fn test_empty_task() {
        let runner = runner(vec![], 3);
        let summary = runner.run("knowledge_graph", &[]).await;
        assert_eq!(summary.total, 0);
        assert_eq!(summary.success_rate, 0.0);
    }

    #[tokio::test]
    async fn test_custom_registry() {
        let runner = runner(vec![Ok("42")], 1).with_registry(JudgeRegistry::empty());
        let summary = runner.run("math_reasoning", &[math("a", 42.0)]).await;
        assert_eq!(summary.correct, 0);
        assert!(summary.results[0].success);
    }

    #[test]
    fn test_preview_is_char_safe() {
        assert_eq!(preview("short", 60), "short");
        assert_eq!(preview("héllo wörld", 5), "héllo...");
        assert_eq!(preview("", 3), "");
    }
}
