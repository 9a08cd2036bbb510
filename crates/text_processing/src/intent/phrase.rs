//! Phrase regex scoring

use std::sync::Arc;
use ticket_intent_core::IntentLabel;

use crate::library::PatternLibrary;

pub const MAX_PHRASE_SCORE: f32 = 0.95;

const MATCH_BASE: f32 = 0.4;
/// Longer, more specific patterns earn more: `len / 50`
const SPECIFICITY_DIVISOR: f32 = 50.0;
const REPEAT_BONUS: f32 = 0.1;
const REPEAT_CAP: f32 = 0.3;

/// Phrase score plus the sources of the patterns that matched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PhraseMatch {
    pub score: f32,
    pub matched: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct PhraseScorer {
    library: Arc<PatternLibrary>,
}

impl PhraseScorer {
    pub fn new(library: Arc<PatternLibrary>) -> Self {
        Self { library }
    }

    pub fn score(&self, text: &str, intent: &IntentLabel) -> PhraseMatch {
        let Some(patterns) = self.library.intent(intent) else {
            return PhraseMatch::default();
        };

        let mut result = PhraseMatch::default();
        for pattern in &patterns.phrase_patterns {
            let count = pattern.regex.find_iter(text).count();
            if count == 0 {
                continue;
            }

            let specificity = pattern.source.len() as f32 / SPECIFICITY_DIVISOR;
            let repeat = (REPEAT_BONUS * count as f32).min(REPEAT_CAP);
            result.score += MATCH_BASE + specificity + repeat;
            result.matched.push(pattern.source.clone());
        }

        result.score = result.score.min(MAX_PHRASE_SCORE);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::default_library;

    #[test]
    fn test_phrase_match_reports_pattern() {
        let scorer = PhraseScorer::new(default_library());
        let result = scorer.score("where is my order it has not arrived", &IntentLabel::OrderManagement);
        assert!(result.score > 0.4);
        assert!(result.score <= MAX_PHRASE_SCORE);
        assert!(result.matched.iter().any(|p| p.contains("where")));
    }

    #[test]
    fn test_no_match() {
        let scorer = PhraseScorer::new(default_library());
        let result = scorer.score("the weather is nice", &IntentLabel::BillingInquiry);
        assert_eq!(result, PhraseMatch::default());
    }

    #[test]
    fn test_complaint_intensity_phrase() {
        let scorer = PhraseScorer::new(default_library());
        let result = scorer.score(
            "i am very disappointed and want a refund",
            &IntentLabel::ComplaintIssue,
        );
        assert_eq!(result.matched.len(), 1);
        assert_eq!(result.score, MAX_PHRASE_SCORE);
    }
}
