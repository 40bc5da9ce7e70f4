//! Function-calling judge.

use super::{Evidence, Verdict};
use crate::function_call::{match_ground_truth, parse_function_call};
use crate::problem::ExpectedAnswer;

/// Parses a call from the response and checks it against the ground truth.
///
/// No recognizable call, or no matching alternative, is incorrect. The
/// parsed call is kept as evidence either way.
pub fn judge_function_call(response: &str, expected: &ExpectedAnswer, _question: &str) -> Verdict {
    let ExpectedAnswer::FunctionCall { ground_truth } = expected else {
        return Verdict::incorrect(Evidence::None);
    };
    let Some(call) = parse_function_call(response) else {
        return Verdict::incorrect(Evidence::None);
    };

    let correct = match_ground_truth(&call, ground_truth).is_some();
    Verdict::new(correct, Evidence::Call(call))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::function_call::ground_truth_from_value;
    use serde_json::json;

    fn expected() -> ExpectedAnswer {
        ExpectedAnswer::FunctionCall {
            ground_truth: ground_truth_from_value(&json!([{
                "calculate_triangle_area": {"base": [10], "height": [5], "unit": ["units", ""]}
            }])),
        }
    }

    #[test]
    fn test_matching_call_syntax() {
        let response = "calculate_triangle_area(base=10, height=5)";
        let verdict = judge_function_call(response, &expected(), "");
        assert!(verdict.correct);
        assert_eq!(
            verdict.parsed_call().map(|c| c.name.as_str()),
            Some("calculate_triangle_area")
        );
    }

    #[test]
    fn test_matching_json_call() {
        let response = r#"{"name": "calculate_triangle_area", "arguments": {"base": 10, "height": 5, "unit": "units"}}"#;
        assert!(judge_function_call(response, &expected(), "").correct);
    }

    #[test]
    fn test_wrong_arguments_keep_evidence() {
        let response = "calculate_triangle_area(base=3, height=5)";
        let verdict = judge_function_call(response, &expected(), "");
        assert!(!verdict.correct);
        assert!(verdict.parsed_call().is_some());
    }

    #[test]
    fn test_unparseable_response() {
        let verdict = judge_function_call("I would compute the area.", &expected(), "");
        assert!(!verdict.correct);
        assert_eq!(verdict.evidence, Evidence::None);
    }
}
