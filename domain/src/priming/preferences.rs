//! Preference answers submitted during the priming phase

use std::collections::HashMap;

/// One participant's declared preferences: question id -> selected option values
pub type PreferenceAnswers = HashMap<String, Vec<String>>;

/// Merge every member's answers into a single preference profile.
///
/// The deck is built for the whole group, so the merged profile is the
/// per-question union of everyone's selections. Duplicate values are
/// collapsed; relative order follows first submission encountered.
pub fn merge_answers<'a, I>(all_answers: I) -> PreferenceAnswers
where
    I: IntoIterator<Item = &'a PreferenceAnswers>,
{
    let mut merged: PreferenceAnswers = HashMap::new();
    for answers in all_answers {
        for (question, values) in answers {
            let entry = merged.entry(question.clone()).or_default();
            for value in values {
                if !entry.contains(value) {
                    entry.push(value.clone());
                }
            }
        }
    }
    merged
}

/// True when the selection expresses no constraint for a question
/// (empty, or the explicit "any" opt-out).
pub fn is_unconstrained(values: &[String]) -> bool {
    values.is_empty() || values.iter().any(|v| v == "any")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answers(pairs: &[(&str, &[&str])]) -> PreferenceAnswers {
        pairs
            .iter()
            .map(|(q, vs)| (q.to_string(), vs.iter().map(|v| v.to_string()).collect()))
            .collect()
    }

    #[test]
    fn test_merge_unions_per_question() {
        let a = answers(&[("genre", &["comedy", "drama"]), ("era", &["modern"])]);
        let b = answers(&[("genre", &["drama", "horror"])]);

        let merged = merge_answers([&a, &b]);

        let genres = &merged["genre"];
        assert_eq!(genres.len(), 3);
        assert!(genres.contains(&"comedy".to_string()));
        assert!(genres.contains(&"horror".to_string()));
        assert_eq!(merged["era"], vec!["modern"]);
    }

    #[test]
    fn test_merge_empty_is_empty() {
        let merged = merge_answers(std::iter::empty::<&PreferenceAnswers>());
        assert!(merged.is_empty());
    }

    #[test]
    fn test_is_unconstrained() {
        assert!(is_unconstrained(&[]));
        assert!(is_unconstrained(&["comedy".to_string(), "any".to_string()]));
        assert!(!is_unconstrained(&["comedy".to_string()]));
    }
}
