//! Matching a parsed call against alternative ground truths.

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::debug;

use super::{GroundTruth, ParsedFunctionCall};

/// Returns the expected function name of the first ground-truth alternative
/// the call satisfies, or `None` if no alternative matches.
///
/// A call matches an alternative when its name equals the expected name or
/// ends with it (so `math.factorial` matches `factorial`), and every expected
/// argument is either present with an acceptable value or absent and marked
/// optional by an empty-string acceptable value. Extra arguments are ignored.
pub fn match_ground_truth<'a>(
    call: &ParsedFunctionCall,
    ground_truth: &'a [GroundTruth],
) -> Option<&'a str> {
    for alternative in ground_truth {
        for (function_name, expected_args) in alternative {
            if !name_matches(&call.name, function_name) {
                continue;
            }
            if arguments_match(call, expected_args) {
                return Some(function_name.as_str());
            }
            debug!(
                function = %function_name,
                "Function name matched but arguments did not"
            );
        }
    }
    None
}

fn name_matches(called: &str, expected: &str) -> bool {
    called == expected || called.ends_with(expected)
}

fn arguments_match(
    call: &ParsedFunctionCall,
    expected_args: &BTreeMap<String, Vec<Value>>,
) -> bool {
    expected_args.iter().all(|(arg_name, acceptable)| {
        match call.arguments.get(arg_name) {
            Some(actual) => is_acceptable(actual, acceptable),
            None => acceptable.iter().any(|v| v.as_str() == Some("")),
        }
    })
}

fn is_acceptable(actual: &Value, acceptable: &[Value]) -> bool {
    if acceptable.iter().any(|v| values_equal(actual, v)) {
        return true;
    }
    let actual_text = loose_text(actual);
    acceptable.iter().any(|v| loose_text(v) == actual_text)
}

/// Structural equality where integers and floats compare numerically.
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => x == y,
            _ => x == y,
        },
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| values_equal(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(k, x)| ys.get(k).is_some_and(|y| values_equal(x, y)))
        }
        _ => a == b,
    }
}

/// Text form of a value used for the string-comparison fallback.
///
/// Strings are taken verbatim, floats keep their decimal point (`3.0`), and
/// booleans and null use the spelling found in the ground-truth files.
pub fn loose_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Null => "None".to_string(),
        Value::Number(n) => match (n.as_i64(), n.as_u64(), n.as_f64()) {
            (Some(i), _, _) => i.to_string(),
            (_, Some(u), _) => u.to_string(),
            (_, _, Some(f)) if f.fract() == 0.0 && f.abs() < 1e16 => format!("{:.1}", f),
            _ => n.to_string(),
        },
        other => other.to_string(),
    }
}

/// Decodes the `ground_truth` field of an answer record.
///
/// Accepts a list of alternatives or a single alternative object. Argument
/// values that are not lists are treated as a single acceptable value.
pub fn ground_truth_from_value(value: &Value) -> Vec<GroundTruth> {
    let alternatives: Vec<&Value> = match value {
        Value::Array(items) => items.iter().collect(),
        Value::Object(_) => vec![value],
        _ => Vec::new(),
    };

    alternatives
        .into_iter()
        .filter_map(Value::as_object)
        .map(|alternative| {
            alternative
                .iter()
                .map(|(function_name, args)| {
                    let args = args
                        .as_object()
                        .map(|args| {
                            args.iter()
                                .map(|(arg, acceptable)| {
                                    let values = match acceptable {
                                        Value::Array(values) => values.clone(),
                                        single => vec![single.clone()],
                                    };
                                    (arg.clone(), values)
                                })
                                .collect()
                        })
                        .unwrap_or_default();
                    (function_name.clone(), args)
                })
                .collect()
        })
        .collect()
}
