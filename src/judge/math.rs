//! Numeric answer judge.

use std::sync::OnceLock;

use regex::Regex;

use super::{Evidence, Verdict};
use crate::problem::ExpectedAnswer;

/// Absolute tolerance between the final number and the expected answer.
pub const MATH_TOLERANCE: f64 = 0.01;

static NUMBER_TOKEN: OnceLock<Regex> = OnceLock::new();
static DECIMAL_DIGIT: OnceLock<Regex> = OnceLock::new();

fn number_token_pattern() -> &'static Regex {
    NUMBER_TOKEN.get_or_init(|| {
        Regex::new(r"\b\d+\.?\d*\b").expect("Invalid regex for number tokens")
    })
}

fn decimal_digit_pattern() -> &'static Regex {
    DECIMAL_DIGIT.get_or_init(|| Regex::new(r"^\p{Nd}$").expect("Invalid regex for decimal digit"))
}

/// Last number token in the text, if any.
///
/// Models tend to show their work before concluding, so the last number is
/// taken as the answer. Digits of any script count (`４２` is 42). A last
/// token that still does not parse yields `None`, never an earlier number.
pub fn last_number(text: &str) -> Option<f64> {
    let token = number_token_pattern().find_iter(text).last()?;
    to_ascii_digits(token.as_str()).parse::<f64>().ok()
}

fn to_ascii_digits(token: &str) -> String {
    token
        .chars()
        .map(|c| match decimal_value(c) {
            Some(d) => char::from(b'0' + d),
            None => c,
        })
        .collect()
}

fn is_decimal_digit(c: char) -> bool {
    decimal_digit_pattern().is_match(c.encode_utf8(&mut [0; 4]))
}

/// Value of a Unicode decimal digit.
///
/// Decimal digits are encoded in contiguous runs of whole 0..9 sequences,
/// so the value is the offset from the start of the run, modulo 10.
fn decimal_value(c: char) -> Option<u8> {
    if c.is_ascii_digit() {
        return Some(c as u8 - b'0');
    }
    if !is_decimal_digit(c) {
        return None;
    }
    let mut start = c as u32;
    while let Some(prev) = start.checked_sub(1).and_then(char::from_u32) {
        if !is_decimal_digit(prev) {
            break;
        }
        start -= 1;
    }
    Some(((c as u32 - start) % 10) as u8)
}

/// Correct iff the last number in the response is within
/// [`MATH_TOLERANCE`] of the expected answer.
pub fn judge_math(response: &str, expected: &ExpectedAnswer, _question: &str) -> Verdict {
    let ExpectedAnswer::Math { answer } = expected else {
        return Verdict::incorrect(Evidence::None);
    };

    match last_number(&response.to_lowercase()) {
        Some(found) => {
            let correct = (found - answer).abs() < MATH_TOLERANCE;
            Verdict::new(correct, Evidence::Number(found))
        }
        None => Verdict::incorrect(Evidence::None),
    }
}
