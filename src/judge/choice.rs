//! Multiple-choice letter judge.

use std::sync::OnceLock;

use regex::Regex;

use super::{Evidence, Verdict};
use crate::problem::ExpectedAnswer;

static OPTION_LETTER: OnceLock<Regex> = OnceLock::new();

fn option_letter_pattern() -> &'static Regex {
    OPTION_LETTER
        .get_or_init(|| Regex::new(r"\b([a-d])\b").expect("Invalid regex for option letter"))
}

/// First isolated option letter (a-d) in the text, upper-cased.
pub fn find_option_letter(text: &str) -> Option<char> {
    option_letter_pattern()
        .captures(&text.to_lowercase())
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().chars().next())
        .map(|c| c.to_ascii_uppercase())
}

/// Correct iff the first isolated option letter equals the expected letter,
/// ignoring case.
pub fn judge_multiple_choice(
    response: &str,
    expected: &ExpectedAnswer,
    _question: &str,
) -> Verdict {
    let ExpectedAnswer::MultipleChoice { letter } = expected else {
        return Verdict::incorrect(Evidence::None);
    };
    let expected_letter = letter.trim().to_uppercase();
    if expected_letter.is_empty() {
        return Verdict::incorrect(Evidence::None);
    }

    match find_option_letter(response) {
        Some(found) => Verdict::new(found.to_string() == expected_letter, Evidence::Letter(found)),
        None => Verdict::incorrect(Evidence::None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expect(letter: &str) -> ExpectedAnswer {
        ExpectedAnswer::MultipleChoice {
            letter: letter.to_string(),
        }
    }

    #[test]
    fn test_case_and_position_insensitive() {
        assert!(judge_multiple_choice("The answer is B.", &expect("B"), "").correct);
        assert!(judge_multiple_choice("b", &expect("B"), "").correct);
        assert!(judge_multiple_choice("B) It likely breaks", &expect("b"), "").correct);
    }

    #[test]
    fn test_wrong_letter() {
        let verdict = judge_multiple_choice("A", &expect("B"), "");
        assert!(!verdict.correct);
        assert_eq!(verdict.evidence, Evidence::Letter('A'));
    }

    #[test]
    fn test_letters_inside_words_are_ignored() {
        assert_eq!(find_option_letter("Because"), None);
        assert!(!judge_multiple_choice("Because water", &expect("B"), "").correct);
    }

    #[test]
    fn test_first_isolated_letter_is_used() {
        // The article "a" comes first and is taken as the answer.
        assert_eq!(find_option_letter("It is a fish, so D"), Some('A'));
    }

    #[test]
    fn test_empty_expected_letter() {
        assert!(!judge_multiple_choice("B", &expect(""), "").correct);
    }
}
