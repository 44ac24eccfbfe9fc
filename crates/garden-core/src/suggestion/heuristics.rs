//! Local checks and canned answers that never need the collaborator.

use once_cell::sync::Lazy;
use regex::Regex;

/// Responses shorter than this (after trimming) count as vague.
pub const MIN_SPECIFIC_LENGTH: usize = 10;

/// Fewer nodes than this never reach the clustering collaborator.
pub const MIN_NODES_FOR_CLUSTERING: usize = 5;

/// Nudge used when the collaborator cannot phrase one.
pub const FALLBACK_NUDGE: &str =
    "Can you describe a specific situation or moment when you noticed this?";

/// Reflection used when the collaborator cannot write one.
pub const FALLBACK_REFLECTION: &str = "This session explored multiple interconnected themes. \
Consider reviewing the clusters to identify which area feels most important to address next.";

/// Follow-up questions indexed by depth; deeper nodes reuse the last entry.
pub const FALLBACK_FOLLOW_UPS: [&str; 4] = [
    "Why might that be?",
    "What contributes to that?",
    "What makes that true?",
    "Can you give an example of when this happens?",
];

static VAGUE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)i don't know",
        r"(?i)not sure",
        r"(?i)maybe",
        r"(?i)just is",
        r"(?i)it's like that",
        r"(?i)^(yes|no|ok|okay)$",
    ]
    .iter()
    .filter_map(|pattern| Regex::new(pattern).ok())
    .collect()
});

/// Whether a response is too vague to become a useful node.
///
/// Matches stock non-answers ("not sure", "maybe", a bare "ok"...) or any
/// text shorter than [`MIN_SPECIFIC_LENGTH`] characters.
pub fn is_vague(text: &str) -> bool {
    text.trim().chars().count() < MIN_SPECIFIC_LENGTH
        || VAGUE_PATTERNS.iter().any(|pattern| pattern.is_match(text))
}

/// Canned follow-up for a depth, clamped to the last question.
pub fn fallback_follow_up(depth: u32, questions: &[String]) -> String {
    if questions.is_empty() {
        return FALLBACK_FOLLOW_UPS[0].to_string();
    }
    let index = (depth as usize).min(questions.len() - 1);
    questions[index].clone()
}

/// Splits text into sentences on `.`, `!` and `?`, keeping the punctuation.
pub fn split_sentences(text: &str) -> Vec<String> {
    let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut sentences = Vec::new();
    let mut current = String::new();

    for ch in normalized.chars() {
        current.push(ch);
        if matches!(ch, '.' | '!' | '?') {
            let sentence = current.trim();
            if !sentence.is_empty() {
                sentences.push(sentence.to_string());
            }
            current.clear();
        }
    }

    let tail = current.trim();
    if !tail.is_empty() {
        sentences.push(tail.to_string());
    }
    sentences
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> Vec<String> {
        FALLBACK_FOLLOW_UPS.iter().map(|q| q.to_string()).collect()
    }

    #[test]
    fn test_stock_answers_are_vague() {
        assert!(is_vague("ok"));
        assert!(is_vague("OKAY"));
        assert!(is_vague("I don't know why people leave"));
        assert!(is_vague("Maybe the commute is too long for most"));
        assert!(is_vague("short one"));
    }

    #[test]
    fn test_specific_answers_are_not_vague() {
        assert!(!is_vague("The night shift has no manager on site"));
        assert!(!is_vague("Nobody replies to our tickets for a week"));
    }

    #[test]
    fn test_anchored_pattern_needs_whole_text() {
        // "no" inside a longer sentence is not a bare "no".
        assert!(!is_vague("There is no onboarding plan for new starters"));
    }

    #[test]
    fn test_fallback_follow_up_clamps_depth() {
        let questions = defaults();
        assert_eq!(fallback_follow_up(0, &questions), "Why might that be?");
        assert_eq!(fallback_follow_up(2, &questions), "What makes that true?");
        assert_eq!(
            fallback_follow_up(17, &questions),
            "Can you give an example of when this happens?"
        );
        assert_eq!(fallback_follow_up(3, &[]), "Why might that be?");
    }

    #[test]
    fn test_split_sentences() {
        let text = "Themes emerged around pay.  People felt unheard!\nWhat next? Start small";
        assert_eq!(
            split_sentences(text),
            vec![
                "Themes emerged around pay.",
                "People felt unheard!",
                "What next?",
                "Start small"
            ]
        );
        assert!(split_sentences("   ").is_empty());
    }
}
