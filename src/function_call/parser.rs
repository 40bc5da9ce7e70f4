//! Two-tier function-call parser.
//!
//! Tier 1 looks for an embedded `{"name": ..., "arguments": {...}}` object.
//! Tier 2 looks for `identifier(keyword=value, ...)` call syntax. The first
//! tier to produce a call wins; a tier-1 match whose arguments fail to decode
//! falls through to tier 2.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::{Map, Number, Value};
use tracing::debug;

use super::ParsedFunctionCall;

static JSON_CALL: OnceLock<Regex> = OnceLock::new();
static CALL_SYNTAX: OnceLock<Regex> = OnceLock::new();
static KEYWORD_ARG: OnceLock<Regex> = OnceLock::new();

fn json_call_pattern() -> &'static Regex {
    JSON_CALL.get_or_init(|| {
        Regex::new(r#"\{\s*"name"\s*:\s*"([^"]+)"\s*,\s*"arguments"\s*:\s*(\{[^{}]*\})\s*\}"#)
            .expect("Invalid regex for JSON function call")
    })
}

fn call_syntax_pattern() -> &'static Regex {
    CALL_SYNTAX.get_or_init(|| {
        Regex::new(r"(\w+(?:\.\w+)*)\s*\(\s*([^)]*)\s*\)").expect("Invalid regex for call syntax")
    })
}

fn keyword_arg_pattern() -> &'static Regex {
    KEYWORD_ARG.get_or_init(|| {
        Regex::new(r"(\w+)\s*=\s*([^,]+)").expect("Invalid regex for keyword argument")
    })
}

/// Extracts a function call from free-text model output.
///
/// Returns `None` when neither pattern matches; the caller treats that as an
/// incorrect answer, not an error.
pub fn parse_function_call(response: &str) -> Option<ParsedFunctionCall> {
    parse_json_call(response).or_else(|| parse_call_syntax(response))
}

fn parse_json_call(response: &str) -> Option<ParsedFunctionCall> {
    let caps = json_call_pattern().captures(response)?;
    let name = caps.get(1)?.as_str();
    let raw_arguments = caps.get(2)?.as_str();

    match serde_json::from_str::<Map<String, Value>>(raw_arguments) {
        Ok(arguments) => Some(ParsedFunctionCall::new(name, arguments)),
        Err(e) => {
            debug!(
                function = name,
                error = %e,
                "JSON call arguments did not decode, trying call syntax"
            );
            None
        }
    }
}

fn parse_call_syntax(response: &str) -> Option<ParsedFunctionCall> {
    let caps = call_syntax_pattern().captures(response)?;
    let name = caps.get(1)?.as_str();
    let raw_arguments = caps.get(2).map_or("", |m| m.as_str());

    let mut arguments = Map::new();
    for arg in keyword_arg_pattern().captures_iter(raw_arguments) {
        let key = &arg[1];
        let raw_value = arg[2].trim().trim_matches(|c: char| c == '"' || c == '\'');
        arguments.insert(key.to_string(), coerce_argument(raw_value));
    }

    Some(ParsedFunctionCall::new(name, arguments))
}

/// Interprets a bare argument value: integer, then float, then string.
///
/// The output has no declared schema, so this is deliberately lossy: `"3"`
/// becomes the integer 3 even if the function expects a string.
pub fn coerce_argument(raw: &str) -> Value {
    if let Ok(int) = raw.parse::<i64>() {
        return Value::from(int);
    }
    if let Some(number) = raw.parse::<f64>().ok().and_then(Number::from_f64) {
        return Value::Number(number);
    }
    Value::String(raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_json_call() {
        let response = r#"I will call {"name": "get_weather", "arguments": {"city": "Paris", "days": 3}} now."#;
        let call = parse_function_call(response).expect("should parse JSON call");
        assert_eq!(call.name, "get_weather");
        assert_eq!(call.arguments["city"], json!("Paris"));
        assert_eq!(call.arguments["days"], json!(3));
    }

    #[test]
    fn test_parse_json_call_multiline() {
        let response =
            "{\n  \"name\": \"math.factorial\",\n  \"arguments\": {\n    \"number\": 5\n  }\n}";
        let call = parse_function_call(response).expect("should parse multiline JSON call");
        assert_eq!(call.name, "math.factorial");
        assert_eq!(call.arguments["number"], json!(5));
    }

    #[test]
    fn test_json_decode_failure_falls_through_to_call_syntax() {
        // Single-quoted keys are not JSON, so tier 1 fails on the arguments.
        let response = r#"{"name": "broken", "arguments": {'x': 1}} fallback(x=2)"#;
        let call = parse_function_call(response).expect("should fall back to call syntax");
        assert_eq!(call.name, "fallback");
        assert_eq!(call.arguments["x"], json!(2));
    }

    #[test]
    fn test_parse_call_syntax_with_coercion() {
        let response = "calculate_triangle_area(base=10, height=5.5, unit=\"units\")";
        let call = parse_function_call(response).expect("should parse call syntax");
        assert_eq!(call.name, "calculate_triangle_area");
        assert_eq!(call.arguments["base"], json!(10));
        assert!(call.arguments["base"].is_i64());
        assert_eq!(call.arguments["height"], json!(5.5));
        assert_eq!(call.arguments["unit"], json!("units"));
    }

    #[test]
    fn test_parse_dotted_name_and_single_quotes() {
        let call = parse_function_call("Response: math.hypot(x='4', y=3)").expect("should parse");
        assert_eq!(call.name, "math.hypot");
        // Quotes are stripped before coercion, so '4' becomes an integer.
        assert_eq!(call.arguments["x"], json!(4));
        assert_eq!(call.arguments["y"], json!(3));
    }

    #[test]
    fn test_parse_call_without_arguments() {
        let call = parse_function_call("get_time()").expect("should parse");
        assert_eq!(call.name, "get_time");
        assert!(call.arguments.is_empty());
    }

    #[test]
    fn test_no_call_is_none() {
        assert!(parse_function_call("NO_FUNCTION_NEEDED").is_none());
        assert!(parse_function_call("").is_none());
    }

    #[test]
    fn test_coercion_order() {
        assert_eq!(coerce_argument("3"), json!(3));
        assert!(coerce_argument("3").is_i64());
        assert_eq!(coerce_argument("-7"), json!(-7));
        assert_eq!(coerce_argument("3.0"), json!(3.0));
        assert!(coerce_argument("3.0").is_f64());
        assert_eq!(coerce_argument("1e3"), json!(1000.0));
        assert_eq!(coerce_argument("New York"), json!("New York"));
        assert_eq!(coerce_argument("NaN"), json!("NaN"));
    }
}
