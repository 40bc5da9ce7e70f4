//! Benchmark problems and their expected answers.
//!
//! A [`Problem`] is immutable once built. Its [`ExpectedAnswer`] is a tagged
//! union whose variant fixes the [`TaskType`], which in turn selects exactly
//! one judge in the registry.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::function_call::GroundTruth;

/// Task type tag used to dispatch a problem to its judge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TaskType {
    /// Arithmetic and word problems with a numeric answer.
    #[serde(rename = "math")]
    Math,
    /// Multiple-choice questions answered with a letter A-D.
    #[serde(rename = "mcq")]
    MultipleChoice,
    /// Natural language to SQL.
    #[serde(rename = "sql")]
    Sql,
    /// Knowledge-graph question answering.
    #[serde(rename = "kg")]
    KnowledgeGraph,
    /// Shell command generation for OS tasks.
    #[serde(rename = "os")]
    OsInteraction,
    /// The model should decline to call any function.
    #[serde(rename = "irrelevance")]
    Irrelevance,
    /// The model should emit a function call matching the ground truth.
    #[serde(rename = "function_call")]
    FunctionCall,
}

impl TaskType {
    /// All task types, in registry order.
    pub const ALL: [TaskType; 7] = [
        TaskType::Math,
        TaskType::MultipleChoice,
        TaskType::Sql,
        TaskType::KnowledgeGraph,
        TaskType::OsInteraction,
        TaskType::Irrelevance,
        TaskType::FunctionCall,
    ];

    /// Short tag for this task type.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::Math => "math",
            TaskType::MultipleChoice => "mcq",
            TaskType::Sql => "sql",
            TaskType::KnowledgeGraph => "kg",
            TaskType::OsInteraction => "os",
            TaskType::Irrelevance => "irrelevance",
            TaskType::FunctionCall => "function_call",
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        TaskType::ALL
            .into_iter()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| format!("unknown task type '{}'", s))
    }
}

/// One acceptable answer entity for a knowledge-graph question.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct KgEntity {
    /// Human-readable entity name, matched against the response.
    #[serde(default)]
    pub entity_name: Option<String>,
    /// Knowledge-base identifier, carried for reporting only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer_argument: Option<String>,
}

impl KgEntity {
    /// Entity with only a name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            entity_name: Some(name.into()),
            answer_argument: None,
        }
    }
}

/// Expected answer, shaped per task type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExpectedAnswer {
    /// Numeric answer compared with an absolute tolerance.
    Math { answer: f64 },
    /// Correct option letter.
    MultipleChoice { letter: String },
    /// Label values of the query result; the first one is matched lexically.
    Sql { labels: Vec<String> },
    /// Answer entities; the first one's name is matched.
    KnowledgeGraph { entities: Vec<KgEntity> },
    /// Judged from the question text; the commands are informational.
    OsInteraction { expected_commands: Vec<String> },
    /// No function should be called.
    Irrelevance,
    /// Alternative acceptable calls; any one matching is enough.
    FunctionCall { ground_truth: Vec<GroundTruth> },
}

impl ExpectedAnswer {
    /// Task type implied by this answer shape.
    pub fn task_type(&self) -> TaskType {
        match self {
            ExpectedAnswer::Math { .. } => TaskType::Math,
            ExpectedAnswer::MultipleChoice { .. } => TaskType::MultipleChoice,
            ExpectedAnswer::Sql { .. } => TaskType::Sql,
            ExpectedAnswer::KnowledgeGraph { .. } => TaskType::KnowledgeGraph,
            ExpectedAnswer::OsInteraction { .. } => TaskType::OsInteraction,
            ExpectedAnswer::Irrelevance => TaskType::Irrelevance,
            ExpectedAnswer::FunctionCall { .. } => TaskType::FunctionCall,
        }
    }
}

impl fmt::Display for ExpectedAnswer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpectedAnswer::Math { answer } => write!(f, "{}", answer),
            ExpectedAnswer::MultipleChoice { letter } => f.write_str(letter),
            ExpectedAnswer::Sql { labels } => write!(f, "[{}]", labels.join(", ")),
            ExpectedAnswer::KnowledgeGraph { entities } => {
                let names: Vec<&str> = entities
                    .iter()
                    .filter_map(|e| e.entity_name.as_deref())
                    .collect();
                write!(f, "[{}]", names.join(", "))
            }
            ExpectedAnswer::OsInteraction { expected_commands } => {
                write!(f, "commands: {}", expected_commands.join(", "))
            }
            ExpectedAnswer::Irrelevance => f.write_str("no function call"),
            ExpectedAnswer::FunctionCall { ground_truth } => {
                let names: Vec<&str> = ground_truth
                    .iter()
                    .flat_map(|gt| gt.keys().map(String::as_str))
                    .collect();
                write!(f, "call: {}", names.join(" | "))
            }
        }
    }
}

/// Optional descriptive fields carried alongside a problem.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProblemMetadata {
    /// Answer options shown to the model (multiple choice).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    /// Database schema or other task context.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    /// Difficulty label ("easy", "medium", "hard").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
}

impl ProblemMetadata {
    /// Returns true if no field is set.
    pub fn is_empty(&self) -> bool {
        self.options.is_empty() && self.schema.is_none() && self.difficulty.is_none()
    }
}

/// A single benchmark problem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Problem {
    /// Identifier, unique within a task.
    pub id: String,
    /// Question text as posed to the model.
    pub question: String,
    /// Full prompt sent to the endpoint.
    pub prompt: String,
    /// Expected answer; its variant fixes the task type.
    pub expected: ExpectedAnswer,
    /// Descriptive metadata.
    #[serde(default, skip_serializing_if = "ProblemMetadata::is_empty")]
    pub metadata: ProblemMetadata,
}

impl Problem {
    /// Creates a problem whose prompt is the bare question.
    pub fn new(
        id: impl Into<String>,
        question: impl Into<String>,
        expected: ExpectedAnswer,
    ) -> Self {
        let question = question.into();
        Self {
            id: id.into(),
            prompt: question.clone(),
            question,
            expected,
            metadata: ProblemMetadata::default(),
        }
    }

    /// Sets the prompt sent to the endpoint.
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Sets the answer options.
    pub fn with_options(mut self, options: Vec<String>) -> Self {
        self.metadata.options = options;
        self
    }

    /// Sets the schema/context text.
    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.metadata.schema = Some(schema.into());
        self
    }

    /// Sets the difficulty label.
    pub fn with_difficulty(mut self, difficulty: impl Into<String>) -> Self {
        self.metadata.difficulty = Some(difficulty.into());
        self
    }

    /// Task type of this problem.
    pub fn task_type(&self) -> TaskType {
        self.expected.task_type()
    }
}
