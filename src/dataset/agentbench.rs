//! AgentBench dataset files: `dbbench/dev.jsonl` and
//! `knowledgegraph/dev.json` under the data root.

use std::path::Path;

use serde_json::Value;
use tracing::warn;

use super::{load_records_limited, scalar_text, str_field};
use crate::error::DatasetError;
use crate::problem::{ExpectedAnswer, KgEntity, Problem};
use crate::prompts::{build_knowledge_graph_prompt, build_sql_prompt};

/// Path of the SQL task file relative to the data root.
pub const SQL_FILE: &str = "dbbench/dev.jsonl";

/// Path of the knowledge-graph task file relative to the data root.
pub const KNOWLEDGE_GRAPH_FILE: &str = "knowledgegraph/dev.json";

/// Loads SQL generation problems.
///
/// Each record needs `description` and `label`; `add_description` is the
/// optional table description. A scalar label becomes a one-element list.
pub fn load_sql_problems(
    data_dir: &Path,
    limit: Option<usize>,
) -> Result<Vec<Problem>, DatasetError> {
    let path = data_dir.join(SQL_FILE);
    let records = load_records_limited(&path, limit)?;

    let problems = records
        .iter()
        .enumerate()
        .filter_map(|(idx, record)| {
            let Some(question) = str_field(record, "description") else {
                warn!(
                    path = %path.display(),
                    record = idx + 1,
                    "SQL record without description, skipping"
                );
                return None;
            };
            let labels = match record.get("label") {
                Some(Value::Array(items)) => items.iter().map(scalar_text).collect(),
                Some(Value::Null) | None => Vec::new(),
                Some(other) => vec![scalar_text(other)],
            };
            let schema = str_field(record, "add_description").unwrap_or_default();

            let expected = ExpectedAnswer::Sql { labels };
            let mut problem = Problem::new((idx + 1).to_string(), question, expected)
                .with_prompt(build_sql_prompt(question, schema));
            if !schema.is_empty() {
                problem = problem.with_schema(schema);
            }
            Some(problem)
        })
        .collect();

    Ok(problems)
}

/// Loads knowledge-graph QA problems.
///
/// Each record needs `question` and an `answer` list of entities.
pub fn load_knowledge_graph_problems(
    data_dir: &Path,
    limit: Option<usize>,
) -> Result<Vec<Problem>, DatasetError> {
    let path = data_dir.join(KNOWLEDGE_GRAPH_FILE);
    let records = load_records_limited(&path, limit)?;

    let problems = records
        .iter()
        .enumerate()
        .filter_map(|(idx, record)| {
            let Some(question) = str_field(record, "question") else {
                warn!(
                    path = %path.display(),
                    record = idx + 1,
                    "KG record without question, skipping"
                );
                return None;
            };
            let entities = match record.get("answer") {
                Some(Value::Array(items)) => items.iter().map(entity_from_value).collect(),
                _ => Vec::new(),
            };

            Some(
                Problem::new(
                    (idx + 1).to_string(),
                    question,
                    ExpectedAnswer::KnowledgeGraph { entities },
                )
                .with_prompt(build_knowledge_graph_prompt(question)),
            )
        })
        .collect();

    Ok(problems)
}

fn entity_from_value(value: &Value) -> KgEntity {
    match value {
        Value::String(name) => KgEntity::named(name.clone()),
        _ => KgEntity {
            entity_name: str_field(value, "entity_name").map(str::to_string),
            answer_argument: str_field(value, "answer_argument").map(str::to_string),
        },
    }
}
