//! Berkeley Function Calling Leaderboard (BFCL) v4 data.
//!
//! Questions live in `BFCL_v4_<category>.json` under the data root and
//! ground truths in `possible_answer/BFCL_v4_<category>.json`, both keyed by
//! record `id`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};

use super::{load_records, load_records_limited, str_field};
use crate::error::DatasetError;
use crate::function_call::{ground_truth_from_value, GroundTruth};
use crate::problem::{ExpectedAnswer, Problem};
use crate::prompts::{
    build_function_call_prompt, build_irrelevance_prompt, build_parallel_function_call_prompt,
};

/// A BFCL test category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BfclCategory {
    /// Category name as used in file names.
    pub name: &'static str,
    /// The model should decline to call any function.
    pub irrelevance: bool,
    /// The query may need several calls.
    pub parallel: bool,
    /// User-contributed ("live") rather than synthetic data.
    pub live: bool,
}

impl BfclCategory {
    const fn new(name: &'static str, irrelevance: bool, parallel: bool, live: bool) -> Self {
        Self {
            name,
            irrelevance,
            parallel,
            live,
        }
    }

    /// Question file for this category.
    pub fn data_file(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(format!("BFCL_v4_{}.json", self.name))
    }

    /// Ground-truth file for this category.
    pub fn answer_file(&self, data_dir: &Path) -> PathBuf {
        data_dir
            .join("possible_answer")
            .join(format!("BFCL_v4_{}.json", self.name))
    }

    /// Looks up a category by name.
    pub fn by_name(name: &str) -> Option<BfclCategory> {
        BFCL_CATEGORIES.iter().copied().find(|c| c.name == name)
    }
}

/// Single-turn categories, non-live first.
pub const BFCL_CATEGORIES: [BfclCategory; 13] = [
    BfclCategory::new("simple_python", false, false, false),
    BfclCategory::new("simple_java", false, false, false),
    BfclCategory::new("simple_javascript", false, false, false),
    BfclCategory::new("multiple", false, false, false),
    BfclCategory::new("parallel", false, true, false),
    BfclCategory::new("parallel_multiple", false, true, false),
    BfclCategory::new("irrelevance", true, false, false),
    BfclCategory::new("live_simple", false, false, true),
    BfclCategory::new("live_multiple", false, false, true),
    BfclCategory::new("live_parallel", false, true, true),
    BfclCategory::new("live_parallel_multiple", false, true, true),
    BfclCategory::new("live_irrelevance", true, false, true),
    BfclCategory::new("live_relevance", false, false, true),
];

/// Names of the non-live categories, in report order.
pub const NON_LIVE_CATEGORIES: [&str; 7] = [
    "simple_python",
    "simple_java",
    "simple_javascript",
    "multiple",
    "parallel",
    "parallel_multiple",
    "irrelevance",
];

/// Names of the live categories, in report order.
pub const LIVE_CATEGORIES: [&str; 6] = [
    "live_simple",
    "live_multiple",
    "live_parallel",
    "live_parallel_multiple",
    "live_irrelevance",
    "live_relevance",
];

/// Loads the ground truths of a category, keyed by record id.
///
/// A missing answer file yields an empty map; problems without a ground
/// truth are then judged incorrect.
pub fn load_bfcl_answers(
    data_dir: &Path,
    category: &BfclCategory,
) -> Result<HashMap<String, Vec<GroundTruth>>, DatasetError> {
    let path = category.answer_file(data_dir);
    let records = match load_records(&path) {
        Ok(records) => records,
        Err(DatasetError::NotFound(_)) => {
            debug!(category = category.name, path = %path.display(), "No answer file");
            return Ok(HashMap::new());
        }
        Err(e) => return Err(e),
    };

    Ok(records
        .iter()
        .filter_map(|record| {
            let id = str_field(record, "id")?;
            let ground_truth = record.get("ground_truth").map(ground_truth_from_value)?;
            Some((id.to_string(), ground_truth))
        })
        .collect())
}

/// Loads the problems of a category, at most `limit` of them.
///
/// Each record needs `id`, `question[0][0].content` and a `function` list.
pub fn load_bfcl_problems(
    data_dir: &Path,
    category: &BfclCategory,
    limit: Option<usize>,
) -> Result<Vec<Problem>, DatasetError> {
    let path = category.data_file(data_dir);
    let records = load_records_limited(&path, limit)?;
    let answers = if category.irrelevance {
        HashMap::new()
    } else {
        load_bfcl_answers(data_dir, category)?
    };

    let problems = records
        .iter()
        .enumerate()
        .filter_map(|(idx, record)| {
            let id = str_field(record, "id");
            let question = record.pointer("/question/0/0/content").and_then(Value::as_str);
            let (Some(id), Some(question)) = (id, question) else {
                warn!(
                    category = category.name,
                    record = idx + 1,
                    "BFCL record without id or question, skipping"
                );
                return None;
            };
            let functions = match record.get("function") {
                Some(Value::Array(items)) => items.clone(),
                Some(Value::Object(_)) => vec![record["function"].clone()],
                _ => Vec::new(),
            };

            let (expected, prompt) = if category.irrelevance {
                (
                    ExpectedAnswer::Irrelevance,
                    build_irrelevance_prompt(question, &functions),
                )
            } else {
                let ground_truth = answers.get(id).cloned().unwrap_or_default();
                let prompt = if category.parallel {
                    build_parallel_function_call_prompt(question, &functions)
                } else {
                    build_function_call_prompt(question, &functions)
                };
                (ExpectedAnswer::FunctionCall { ground_truth }, prompt)
            };

            Some(Problem::new(id, question, expected).with_prompt(prompt))
        })
        .collect();

    Ok(problems)
}
