//! Function-call extraction and ground-truth matching.
//!
//! Model output for function-calling tasks is free text. The parser pulls a
//! single structured call out of it, and the matcher checks that call against
//! the alternative ground truths of a problem.
//!
//! # Example
//!
//! ```
//! use agent_bench::function_call::parse_function_call;
//!
//! let call = parse_function_call("calculate_area(base=10, height=5.5, unit='cm')")
//!     .expect("call syntax should parse");
//! assert_eq!(call.name, "calculate_area");
//! assert_eq!(call.arguments["base"], 10);
//! assert_eq!(call.arguments["height"], 5.5);
//! assert_eq!(call.arguments["unit"], "cm");
//! ```

pub mod matcher;
pub mod parser;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub use matcher::{ground_truth_from_value, loose_text, match_ground_truth, values_equal};
pub use parser::{coerce_argument, parse_function_call};

/// One acceptable call: function name to argument name to acceptable values.
///
/// An argument whose acceptable values include the empty string is optional.
pub type GroundTruth = BTreeMap<String, BTreeMap<String, Vec<Value>>>;

/// A function call extracted from model output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedFunctionCall {
    /// Called function, possibly a dotted path.
    pub name: String,
    /// Keyword arguments.
    pub arguments: Map<String, Value>,
}

impl ParsedFunctionCall {
    /// Creates a call with the given name and arguments.
    pub fn new(name: impl Into<String>, arguments: Map<String, Value>) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }
}

impl std::fmt::Display for ParsedFunctionCall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let args: Vec<String> = self
            .arguments
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect();
        write!(f, "{}({})", self.name, args.join(", "))
    }
}
