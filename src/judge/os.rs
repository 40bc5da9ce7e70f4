//! OS-interaction judge.
//!
//! Keyed off the question rather than the answer: a trigger phrase in the
//! question selects the command keywords a useful response should mention.

use super::{Evidence, Verdict};
use crate::problem::ExpectedAnswer;

/// A trigger rule: any of `triggers` in the question means the response
/// should contain any of `keywords`.
#[derive(Debug, Clone, Copy)]
pub struct CommandRule {
    pub triggers: &'static [&'static str],
    pub keywords: &'static [&'static str],
}

/// Rules tried in order; the first rule whose trigger matches decides.
pub const COMMAND_RULES: &[CommandRule] = &[
    CommandRule {
        triggers: &["hidden files"],
        keywords: &["ls -a", "find"],
    },
    CommandRule {
        triggers: &["interval", "seconds"],
        keywords: &["watch", "tail", "stat", "grep"],
    },
    CommandRule {
        triggers: &["calc", "alias"],
        keywords: &["alias", "bc", "function"],
    },
];

/// Responses longer than this count as substantive when no rule applies.
pub const MIN_SUBSTANTIVE_CHARS: usize = 50;

/// Judges a shell-command answer by the keyword rule its question triggers,
/// falling back to a length check.
pub fn judge_os_command(response: &str, _expected: &ExpectedAnswer, question: &str) -> Verdict {
    let response = response.to_lowercase();
    let question = question.to_lowercase();

    let rule = COMMAND_RULES
        .iter()
        .find(|rule| rule.triggers.iter().any(|t| question.contains(*t)));

    match rule {
        Some(rule) => match rule.keywords.iter().find(|k| response.contains(**k)) {
            Some(keyword) => Verdict::new(true, Evidence::Text(keyword.to_string())),
            None => Verdict::incorrect(Evidence::None),
        },
        None => Verdict::new(
            response.chars().count() > MIN_SUBSTANTIVE_CHARS,
            Evidence::None,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expected() -> ExpectedAnswer {
        ExpectedAnswer::OsInteraction {
            expected_commands: vec![],
        }
    }

    #[test]
    fn test_hidden_files_rule() {
        let q = "How many hidden files are in /home?";
        let verdict = judge_os_command("Run `ls -a /home | grep '^\\.' | wc -l`", &expected(), q);
        assert!(verdict.correct);
        assert_eq!(verdict.evidence, Evidence::Text("ls -a".to_string()));
        assert!(judge_os_command("find /home -maxdepth 1 -name '.*'", &expected(), q).correct);
        assert!(!judge_os_command("echo 3", &expected(), q).correct);
    }

    #[test]
    fn test_interval_rule() {
        let q = "A program writes to /root/log every 1-3 seconds. Find the interval.";
        assert!(judge_os_command("Use tail -f /root/log", &expected(), q).correct);
        assert!(!judge_os_command("cat /root/log", &expected(), q).correct);
    }

    #[test]
    fn test_calc_alias_rule() {
        let q = "Create a bash alias 'calc' that evaluates expressions.";
        assert!(judge_os_command("calc() { echo \"$*\" | bc; }", &expected(), q).correct);
        assert!(!judge_os_command("python3 -c 'print(6)'", &expected(), q).correct);
    }

    #[test]
    fn test_first_matching_rule_decides() {
        // Both "hidden files" and "seconds" appear; the hidden-files rule wins.
        let q = "List hidden files every 5 seconds";
        assert!(!judge_os_command("watch ls", &expected(), q).correct);
        assert!(judge_os_command("watch ls -a", &expected(), q).correct);
    }

    #[test]
    fn test_length_fallback() {
        let q = "What is the filename being modified?";
        let short = "stat it";
        let long = "Inspect modification times with a directory listing sorted by time.";
        assert!(!judge_os_command(short, &expected(), q).correct);
        assert!(judge_os_command(long, &expected(), q).correct);
    }
}
