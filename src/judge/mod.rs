//! Heuristic answer judges.
//!
//! Each judge maps `(response, expected answer, question)` to a [`Verdict`].
//! Judges are lenient by design: substring, keyword, and last-number
//! heuristics that accept stylistic variation at the cost of occasional
//! false positives. They never fail; an unrecognizable response is simply
//! incorrect.
//!
//! Dispatch goes through an explicit [`JudgeRegistry`] keyed by
//! [`TaskType`], so each judge can be tested in isolation and there is no
//! cross-type fallback.
//!
//! ```
//! use agent_bench::judge::JudgeRegistry;
//! use agent_bench::problem::{ExpectedAnswer, Problem};
//!
//! let registry = JudgeRegistry::standard();
//! let problem = Problem::new("1", "What is 15 + 27?", ExpectedAnswer::Math { answer: 42.0 });
//! assert!(registry.judge(&problem, "15 + 27 = 42").correct);
//! ```

pub mod choice;
pub mod function_call;
pub mod lexical;
pub mod math;
pub mod os;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::function_call::ParsedFunctionCall;
use crate::problem::{ExpectedAnswer, Problem, TaskType};

pub use choice::judge_multiple_choice;
pub use function_call::judge_function_call;
pub use lexical::{judge_irrelevance, judge_knowledge_graph, judge_sql};
pub use math::{judge_math, MATH_TOLERANCE};
pub use os::judge_os_command;

/// Evidence a judge relied on when reaching its verdict.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Evidence {
    /// Nothing recognizable was found.
    #[default]
    None,
    /// The number taken as the final answer.
    Number(f64),
    /// The option letter found in the response.
    Letter(char),
    /// The matched phrase, keyword, or entity.
    Text(String),
    /// The function call extracted from the response.
    Call(ParsedFunctionCall),
    /// Generation failed; the verdict is incorrect without judging.
    GenerationFailed(String),
}

/// Correctness judgment for one response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    /// Whether the response was judged correct.
    pub correct: bool,
    /// What the judgment was based on.
    pub evidence: Evidence,
}

impl Verdict {
    /// Creates a verdict.
    pub fn new(correct: bool, evidence: Evidence) -> Self {
        Self { correct, evidence }
    }

    /// Incorrect verdict with the given evidence.
    pub fn incorrect(evidence: Evidence) -> Self {
        Self::new(false, evidence)
    }

    /// Incorrect verdict for a failed generation.
    pub fn generation_failed(error: impl Into<String>) -> Self {
        Self::incorrect(Evidence::GenerationFailed(error.into()))
    }

    /// The parsed function call, if the judge extracted one.
    pub fn parsed_call(&self) -> Option<&ParsedFunctionCall> {
        match &self.evidence {
            Evidence::Call(call) => Some(call),
            _ => None,
        }
    }
}

/// Signature shared by all judges: `(response, expected, question)`.
pub type JudgeFn = fn(&str, &ExpectedAnswer, &str) -> Verdict;

/// Lookup table from task type to judge.
#[derive(Debug, Clone)]
pub struct JudgeRegistry {
    judges: HashMap<TaskType, JudgeFn>,
}

impl JudgeRegistry {
    /// Registry with no judges.
    pub fn empty() -> Self {
        Self {
            judges: HashMap::new(),
        }
    }

    /// Registry with the built-in judge for every task type.
    pub fn standard() -> Self {
        let mut registry = Self::empty();
        registry.register(TaskType::Math, judge_math);
        registry.register(TaskType::MultipleChoice, judge_multiple_choice);
        registry.register(TaskType::Sql, judge_sql);
        registry.register(TaskType::KnowledgeGraph, judge_knowledge_graph);
        registry.register(TaskType::OsInteraction, judge_os_command);
        registry.register(TaskType::Irrelevance, judge_irrelevance);
        registry.register(TaskType::FunctionCall, judge_function_call);
        registry
    }

    /// Registers a judge, returning the one it replaced.
    pub fn register(&mut self, task_type: TaskType, judge: JudgeFn) -> Option<JudgeFn> {
        self.judges.insert(task_type, judge)
    }

    /// Judge for a task type.
    pub fn get(&self, task_type: TaskType) -> Option<JudgeFn> {
        self.judges.get(&task_type).copied()
    }

    /// Number of registered judges.
    pub fn len(&self) -> usize {
        self.judges.len()
    }

    /// Returns true if no judge is registered.
    pub fn is_empty(&self) -> bool {
        self.judges.is_empty()
    }

    /// Judges a response to a problem with the judge for its task type.
    ///
    /// A task type without a registered judge is judged incorrect.
    pub fn judge(&self, problem: &Problem, response: &str) -> Verdict {
        let task_type = problem.task_type();
        match self.get(task_type) {
            Some(judge) => judge(response, &problem.expected, &problem.question),
            None => {
                warn!(task_type = %task_type, problem = %problem.id, "No judge registered");
                Verdict::incorrect(Evidence::None)
            }
        }
    }
}

impl Default for JudgeRegistry {
    fn default() -> Self {
        Self::standard()
    }
}
