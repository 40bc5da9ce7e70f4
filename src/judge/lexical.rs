//! Substring judges: SQL generation, knowledge-graph QA, and irrelevance
//! detection.

use super::{Evidence, Verdict};
use crate::problem::ExpectedAnswer;

/// Phrases signalling the model declined to call a function.
pub const DECLINE_PHRASES: &[&str] = &["no_function", "none", "cannot", "not applicable"];

/// Correct iff the response contains "select" and overlaps lexically with
/// the first expected label (the whole label or any of its words).
///
/// With no labels, containing "select" is enough. Overlap on common words
/// in multi-word labels is accepted as is.
pub fn judge_sql(response: &str, expected: &ExpectedAnswer, _question: &str) -> Verdict {
    let ExpectedAnswer::Sql { labels } = expected else {
        return Verdict::incorrect(Evidence::None);
    };
    let response = response.to_lowercase();
    let has_select = response.contains("select");

    let Some(first) = labels.first() else {
        return Verdict::new(has_select, Evidence::None);
    };
    let label = first.to_lowercase();

    let overlap = if response.contains(&label) {
        Some(label.clone())
    } else {
        label
            .split_whitespace()
            .find(|word| response.contains(*word))
            .map(str::to_string)
    };

    match overlap {
        Some(text) => Verdict::new(has_select, Evidence::Text(text)),
        None => Verdict::incorrect(Evidence::None),
    }
}

/// Correct iff the first expected entity's name appears in the response.
pub fn judge_knowledge_graph(
    response: &str,
    expected: &ExpectedAnswer,
    _question: &str,
) -> Verdict {
    let ExpectedAnswer::KnowledgeGraph { entities } = expected else {
        return Verdict::incorrect(Evidence::None);
    };
    let entity = entities
        .first()
        .and_then(|e| e.entity_name.as_deref())
        .map(str::to_lowercase)
        .unwrap_or_default();
    if entity.is_empty() {
        return Verdict::incorrect(Evidence::None);
    }

    if response.to_lowercase().contains(&entity) {
        Verdict::new(true, Evidence::Text(entity))
    } else {
        Verdict::incorrect(Evidence::None)
    }
}

/// Correct iff the response contains any of [`DECLINE_PHRASES`].
pub fn judge_irrelevance(response: &str, _expected: &ExpectedAnswer, _question: &str) -> Verdict {
    let response = response.to_lowercase();
    match DECLINE_PHRASES.iter().find(|phrase| response.contains(**phrase)) {
        Some(phrase) => Verdict::new(true, Evidence::Text(phrase.to_string())),
        None => Verdict::incorrect(Evidence::None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::KgEntity;

    fn sql(labels: &[&str]) -> ExpectedAnswer {
        ExpectedAnswer::Sql {
            labels: labels.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_sql_requires_select_and_overlap() {
        let expected = sql(&["Toronto Huskies"]);
        assert!(!judge_sql("SELECT name FROM t", &expected, "").correct);
        assert!(judge_sql("SELECT team FROM t WHERE name = 'Toronto'", &expected, "").correct);
        assert!(judge_sql("select * from t where team like '%huskies%'", &expected, "").correct);
        assert!(judge_sql("SELECT 'Toronto Huskies'", &expected, "").correct);
    }

    #[test]
    fn test_sql_without_select_is_always_incorrect() {
        let expected = sql(&["Toronto Huskies"]);
        let verdict = judge_sql("The answer is Toronto Huskies", &expected, "");
        assert!(!verdict.correct);
        assert_eq!(verdict.evidence, Evidence::Text("toronto huskies".to_string()));
    }

    #[test]
    fn test_sql_without_labels_needs_only_select() {
        assert!(judge_sql("SELECT 1", &sql(&[]), "").correct);
        assert!(!judge_sql("I don't know", &sql(&[]), "").correct);
    }

    #[test]
    fn test_sql_only_first_label_counts() {
        let expected = sql(&["42", "Toronto"]);
        assert!(!judge_sql("SELECT city FROM t -- Toronto", &expected, "").correct);
    }

    #[test]
    fn test_kg_entity_substring() {
        let expected = ExpectedAnswer::KnowledgeGraph {
            entities: vec![KgEntity::named("Live MOS"), KgEntity::named("CMOS")],
        };
        assert!(judge_knowledge_graph("The sensor is a live mos sensor.", &expected, "").correct);
        assert!(!judge_knowledge_graph("It uses CMOS.", &expected, "").correct);
    }

    #[test]
    fn test_kg_missing_entity_name() {
        let expected = ExpectedAnswer::KnowledgeGraph {
            entities: vec![KgEntity::default()],
        };
        assert!(!judge_knowledge_graph("anything", &expected, "").correct);
        let empty = ExpectedAnswer::KnowledgeGraph { entities: vec![] };
        assert!(!judge_knowledge_graph("anything", &empty, "").correct);
    }

    #[test]
    fn test_irrelevance_detects_decline() {
        let verdict = judge_irrelevance(
            "I cannot help with that, NO_FUNCTION_NEEDED",
            &ExpectedAnswer::Irrelevance,
            "",
        );
        assert!(verdict.correct);
        assert_eq!(verdict.evidence, Evidence::Text("no_function".to_string()));
        let verdict = judge_irrelevance("Not applicable here.", &ExpectedAnswer::Irrelevance, "");
        assert!(verdict.correct);
    }

    #[test]
    fn test_irrelevance_concrete_call_is_incorrect() {
        let verdict = judge_irrelevance(
            "get_weather(city=\"Paris\")",
            &ExpectedAnswer::Irrelevance,
            "",
        );
        assert!(!verdict.correct);
    }
}
