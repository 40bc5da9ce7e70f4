//! End-to-end runner scenarios with a stub generator.

use std::sync::Arc;

use agent_bench::dataset;
use agent_bench::llm::{GenerationClient, RetryPolicy, TextGenerator};
use agent_bench::problem::ExpectedAnswer;
use agent_bench::runner::TaskRunner;
use agent_bench::LlmError;
use async_trait::async_trait;

/// Answers each built-in math question with its exact expected number.
struct ExactAnswers {
    answers: Vec<(String, f64)>,
}

impl ExactAnswers {
    fn for_builtin_math() -> Self {
        let answers = dataset::math_problems()
            .into_iter()
            .filter_map(|p| match p.expected {
                ExpectedAnswer::Math { answer } => Some((p.question, answer)),
                _ => None,
            })
            .collect();
        Self { answers }
    }
}

#[async_trait]
impl TextGenerator for ExactAnswers {
    async fn generate_text(&self, prompt: &str) -> Result<String, LlmError> {
        self.answers
            .iter()
            .find(|(question, _)| prompt.contains(question.as_str()))
            .map(|(_, answer)| answer.to_string())
            .ok_or_else(|| LlmError::RequestFailed("unknown question".to_string()))
    }
}

fn runner(generator: Arc<dyn TextGenerator>) -> TaskRunner {
    TaskRunner::new(GenerationClient::new(generator, RetryPolicy::immediate()), 3)
}

#[tokio::test]
async fn test_exact_math_answers_score_full_marks() {
    let problems = dataset::math_problems();
    assert_eq!(problems.len(), 10);

    let runner = runner(Arc::new(ExactAnswers::for_builtin_math()));
    let summary = runner.run("math_reasoning", &problems).await;

    assert_eq!(summary.total, 10);
    assert_eq!(summary.correct, 10);
    assert!((summary.success_rate - 100.0).abs() < 1e-6);
    assert_eq!(summary.failed_generations(), 0);
    assert!(summary.results.iter().all(|r| r.is_correct()));
}

#[tokio::test]
async fn test_zero_problems_has_zero_rate() {
    let runner = runner(Arc::new(ExactAnswers::for_builtin_math()));
    let summary = runner.run("math_reasoning", &[]).await;

    assert_eq!(summary.total, 0);
    assert_eq!(summary.correct, 0);
    assert_eq!(summary.success_rate, 0.0);
}

#[tokio::test]
async fn test_unanswerable_prompts_are_recorded_as_errors() {
    let runner = runner(Arc::new(ExactAnswers::for_builtin_math()));
    let summary = runner.run("common_sense_qa", &dataset::multiple_choice_problems()).await;

    assert_eq!(summary.total, 10);
    assert_eq!(summary.correct, 0);
    assert_eq!(summary.failed_generations(), 10);
    assert_eq!(
        summary.results[0].error.as_deref(),
        Some("HTTP request failed: unknown question")
    );
}
