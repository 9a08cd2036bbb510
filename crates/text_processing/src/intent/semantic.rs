//! Semantic word-group boosting
//!
//! Each intent owns named groups of related words. A group contributes the
//! fraction of its words present, capped per group. Refund requests get
//! extra fixed bonuses for financial language.

use std::sync::Arc;
use ticket_intent_core::IntentLabel;

use crate::library::PatternLibrary;
use crate::terms::{contains_any, distinct_hits};

pub const MAX_SEMANTIC_SCORE: f32 = 0.5;

const GROUP_CAP: f32 = 0.3;
const FINANCIAL_TERM_BONUS: f32 = 0.1;
const WANT_MONEY_BONUS: f32 = 0.15;
const REFUND_VERB_BONUS: f32 = 0.1;
const MONEY_REQUEST_BONUS: f32 = 0.3;

#[derive(Debug, Clone)]
pub struct SemanticBooster {
    library: Arc<PatternLibrary>,
}

impl SemanticBooster {
    pub fn new(library: Arc<PatternLibrary>) -> Self {
        Self { library }
    }

    pub fn score(&self, text: &str, intent: &IntentLabel) -> f32 {
        let Some(patterns) = self.library.intent(intent) else {
            return 0.0;
        };

        let mut score: f32 = patterns
            .semantic_groups
            .iter()
            .filter(|(_, words)| !words.is_empty())
            .map(|(_, words)| {
                let hits = distinct_hits(text, words);
                (hits as f32 / words.len() as f32).min(GROUP_CAP)
            })
            .sum();

        if *intent == IntentLabel::RefundRequest {
            score += self.refund_bonus(text);
        }

        score.min(MAX_SEMANTIC_SCORE)
    }

    fn refund_bonus(&self, text: &str) -> f32 {
        let semantics = self.library.refund_semantics();
        let mut bonus = 0.0;

        if contains_any(text, &semantics.financial_terms) {
            bonus += FINANCIAL_TERM_BONUS;
        }
        if contains_any(text, &semantics.want_terms) && contains_any(text, &semantics.money_terms) {
            bonus += WANT_MONEY_BONUS;
        }
        if contains_any(text, &semantics.refund_verbs) {
            bonus += REFUND_VERB_BONUS;
        }
        if contains_any(text, &semantics.money_request_phrases) {
            bonus += MONEY_REQUEST_BONUS;
        }

        bonus
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::default_library;

    fn booster() -> SemanticBooster {
        SemanticBooster::new(default_library())
    }

    #[test]
    fn test_group_fraction() {
        // "crash" and "error" hit the 7-word failure group: 2/7
        let score = booster().score("crash and error", &IntentLabel::TechnicalSupport);
        assert!((score - 2.0 / 7.0).abs() < 1e-6);
    }

    #[test]
    fn test_refund_extras() {
        let b = booster();
        let with_money = b.score("i want my money back", &IntentLabel::RefundRequest);
        assert!(with_money > 0.5 - 1e-6);
        assert_eq!(b.score("hello there", &IntentLabel::RefundRequest), 0.0);
    }

    #[test]
    fn test_capped() {
        let score = booster().score(
            "great excellent amazing awesome fantastic love thank appreciate grateful",
            &IntentLabel::Feedback,
        );
        assert!(score <= MAX_SEMANTIC_SCORE);
    }
}
