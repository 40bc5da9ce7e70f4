//! Prompt templates for each task type.
//!
//! Templates use `{placeholder}` markers filled with `str::replace`. Each
//! prompt ends with an answer cue ("Answer:", "Response:", ...) so the
//! completion starts with the answer itself.
//!
//! ```
//! use agent_bench::prompts::build_math_prompt;
//!
//! let prompt = build_math_prompt("What is 15 + 27?");
//! assert!(prompt.contains("Question: What is 15 + 27?"));
//! assert!(prompt.ends_with("Answer:"));
//! ```

use serde_json::Value;

const MATH_TEMPLATE: &str = "Solve this math problem and provide just the numerical answer.

Question: {question}

Answer:";

const MULTIPLE_CHOICE_TEMPLATE: &str = "Answer this common sense question by selecting the correct option.

Question: {question}

Options:
{options}

Provide your answer as just the letter (A, B, C, or D).

Answer:";

const SQL_TEMPLATE: &str = "Generate a SQL query for this question.

Database Schema: {schema}

Question: {question}

SQL Query:";

const KNOWLEDGE_GRAPH_TEMPLATE: &str = "Answer this question concisely.

Question: {question}

Answer:";

const OS_TEMPLATE: &str = "You are a Linux system administrator. Solve the following problem by providing the appropriate bash commands.

Problem: {question}

Context: {context}

Provide your solution with:
1. Explanation of your approach
2. The specific bash command(s) to solve this
3. Expected output or result

Solution:";

const FUNCTION_CALL_TEMPLATE: &str = "You are a helpful assistant that can call functions.

Available Functions:
{functions}

User Query: {question}

Respond with ONLY the function call in this format:
function_name(arg1=value1, arg2=value2)

Response:";

const PARALLEL_FUNCTION_CALL_TEMPLATE: &str = "You are a helpful assistant. Call MULTIPLE functions if needed.

Available Functions:
{functions}

User Query: {question}

Respond with function calls, one per line:
function_name(arg1=value1, arg2=value2)

Response:";

const IRRELEVANCE_TEMPLATE: &str = "You are a helpful assistant.
If none of the functions can answer the query, say \"NO_FUNCTION_NEEDED\".

Available Functions:
{functions}

User Query: {question}

If applicable: function_name(args)
If not applicable: NO_FUNCTION_NEEDED

Response:";

/// Arithmetic or word problem.
pub fn build_math_prompt(question: &str) -> String {
    MATH_TEMPLATE.replace("{question}", question)
}

/// Multiple-choice question with one option per line.
pub fn build_multiple_choice_prompt(question: &str, options: &[String]) -> String {
    MULTIPLE_CHOICE_TEMPLATE
        .replace("{options}", &options.join("\n"))
        .replace("{question}", question)
}

/// Natural language to SQL with the table description as schema.
pub fn build_sql_prompt(question: &str, schema: &str) -> String {
    SQL_TEMPLATE
        .replace("{schema}", schema)
        .replace("{question}", question)
}

/// Short-answer knowledge-graph question.
pub fn build_knowledge_graph_prompt(question: &str) -> String {
    KNOWLEDGE_GRAPH_TEMPLATE.replace("{question}", question)
}

/// Shell task with background context.
pub fn build_os_prompt(question: &str, context: &str) -> String {
    OS_TEMPLATE
        .replace("{context}", context)
        .replace("{question}", question)
}

/// Single function call over the given function definitions.
pub fn build_function_call_prompt(question: &str, functions: &[Value]) -> String {
    FUNCTION_CALL_TEMPLATE
        .replace("{functions}", &format_function_schema(functions))
        .replace("{question}", question)
}

/// One or more function calls, one per line.
pub fn build_parallel_function_call_prompt(question: &str, functions: &[Value]) -> String {
    PARALLEL_FUNCTION_CALL_TEMPLATE
        .replace("{functions}", &format_function_schema(functions))
        .replace("{question}", question)
}

/// Function-call prompt that invites the model to decline.
pub fn build_irrelevance_prompt(question: &str, functions: &[Value]) -> String {
    IRRELEVANCE_TEMPLATE
        .replace("{functions}", &format_function_schema(functions))
        .replace("{question}", question)
}

/// Renders function definitions as `Function / Description / Parameters`
/// blocks separated by blank lines. Parameters are pretty-printed JSON in
/// their original key order.
pub fn format_function_schema(functions: &[Value]) -> String {
    functions
        .iter()
        .map(|func| {
            let name = func.get("name").and_then(Value::as_str).unwrap_or("unknown");
            let description = func
                .get("description")
                .and_then(Value::as_str)
                .unwrap_or("No description");
            let empty = Value::Object(serde_json::Map::new());
            let parameters = func.get("parameters").unwrap_or(&empty);
            let parameters =
                serde_json::to_string_pretty(parameters).unwrap_or_else(|_| parameters.to_string());
            format!(
                "Function: {}\nDescription: {}\nParameters: {}",
                name, description, parameters
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
