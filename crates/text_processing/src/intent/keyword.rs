//! Context-gated keyword scoring
//!
//! Scores an intent from its weighted keyword categories, an explicit
//! phrase boost and intent-specific bonuses. Refund requests are gated on
//! refund context; information requests are promoted by question context
//! and suppressed by action verbs.

use std::sync::Arc;
use ticket_intent_core::IntentLabel;

use crate::context::ContextValidator;
use crate::library::{IntentPatterns, KeywordCategory, PatternLibrary};
use crate::terms::{contains_any, contains_term, first_hit};

pub const MAX_KEYWORD_SCORE: f32 = 0.98;

const INFO_CONTEXT_BASE: f32 = 0.4;
const EXPLICIT_PHRASE_BOOST: f32 = 0.6;
const EXPLICIT_MONEY_PHRASE_BOOST: f32 = 0.8;
const MULTI_WORD_EXTRA: f32 = 0.5;
const REPEAT_MATCH_BONUS: f32 = 0.3;
const REPEAT_MATCH_CAP: f32 = 0.4;

const REFUND_MONEY_BONUS: f32 = 0.4;
const REFUND_PRIMARY_BONUS: f32 = 0.3;
const REFUND_MULTI_MATCH_BONUS: f32 = 0.2;

const INFO_CONTEXT_BONUS: f32 = 0.3;
const INFO_HIT_BONUS: f32 = 0.2;
const INFO_QUESTION_MARK_BONUS: f32 = 0.2;
const INFO_ACTION_FACTOR: f32 = 0.3;

const CANCEL_PRIMARY_BONUS: f32 = 0.3;
const CANCEL_MULTI_MATCH_BONUS: f32 = 0.2;

const NEGATION_FACTOR: f32 = 0.8;

/// Relative importance of a keyword category, by name
pub fn category_importance(name: &str) -> f32 {
    match name {
        "primary" | "financial" | "question" => 1.0,
        "action" | "urgency" => 0.8,
        "possession" => 0.3,
        _ => 0.6,
    }
}

#[derive(Debug, Clone)]
pub struct KeywordScorer {
    library: Arc<PatternLibrary>,
    context: ContextValidator,
}

impl KeywordScorer {
    pub fn new(library: Arc<PatternLibrary>) -> Self {
        Self {
            context: ContextValidator::new(Arc::clone(&library)),
            library,
        }
    }

    /// Whether any negation pattern matches
    pub fn is_negated(&self, text: &str) -> bool {
        self.library
            .negation_patterns()
            .iter()
            .any(|p| p.regex.is_match(text))
    }

    /// Keyword score in `[0, 0.98]`; 0 for intents without tables
    pub fn score(&self, text: &str, intent: &IntentLabel) -> f32 {
        let Some(patterns) = self.library.intent(intent) else {
            return 0.0;
        };

        if *intent == IntentLabel::RefundRequest && !self.context.has_refund_context(text) {
            return 0.0;
        }

        let info_context = self.context.has_information_context(text);
        let mut score = 0.0;
        if *intent == IntentLabel::InformationRequest && info_context {
            score += INFO_CONTEXT_BASE;
        }

        let negated = self.is_negated(text);
        let explicit_boost = self.explicit_boost(text, intent, patterns);

        let mut total_hits = 0usize;
        let mut primary_hit = false;
        for category in &patterns.categories {
            let (matches, hits) = category_matches(text, category);
            if hits == 0 {
                continue;
            }

            let coverage = matches / category.keywords.len() as f32;
            let repeat = (REPEAT_MATCH_BONUS * (matches - 1.0)).min(REPEAT_MATCH_CAP);
            score += (coverage * category.weight + repeat) * category_importance(&category.name);

            total_hits += hits;
            if category.name == "primary" {
                primary_hit = true;
            }
        }

        score += explicit_boost;

        match intent {
            IntentLabel::RefundRequest => {
                if contains_any(text, &self.library.refund_semantics().money_terms) {
                    score += REFUND_MONEY_BONUS;
                }
                if primary_hit {
                    score += REFUND_PRIMARY_BONUS;
                }
                if total_hits >= 2 {
                    score += REFUND_MULTI_MATCH_BONUS;
                }
            }
            IntentLabel::InformationRequest => {
                if info_context {
                    score += INFO_CONTEXT_BONUS;
                }
                if primary_hit {
                    score += INFO_HIT_BONUS;
                }
                if text.contains('?') {
                    score += INFO_QUESTION_MARK_BONUS;
                }
            }
            IntentLabel::CancellationRequest => {
                if primary_hit {
                    score += CANCEL_PRIMARY_BONUS;
                }
                if total_hits >= 2 {
                    score += CANCEL_MULTI_MATCH_BONUS;
                }
            }
            _ => {}
        }

        if *intent == IntentLabel::InformationRequest
            && self.context.has_action_words(text)
            && !self.context.has_question_phrase(text)
        {
            score *= INFO_ACTION_FACTOR;
        }

        score *= patterns.weight;

        if negated
            && matches!(
                intent,
                IntentLabel::FeatureRequest | IntentLabel::InformationRequest
            )
        {
            score *= NEGATION_FACTOR;
        }

        score.clamp(0.0, MAX_KEYWORD_SCORE)
    }

    fn explicit_boost(&self, text: &str, intent: &IntentLabel, patterns: &IntentPatterns) -> f32 {
        match first_hit(text, &patterns.explicit_phrases) {
            Some(phrase) if *intent == IntentLabel::RefundRequest && phrase.contains("money") => {
                EXPLICIT_MONEY_PHRASE_BOOST
            }
            Some(_) => EXPLICIT_PHRASE_BOOST,
            None => 0.0,
        }
    }
}

/// Weighted match count (multi-word keywords count 1.5) and raw hit count
fn category_matches(text: &str, category: &KeywordCategory) -> (f32, usize) {
    category
        .keywords
        .iter()
        .filter(|k| contains_term(text, k))
        .fold((0.0, 0), |(matches, hits), keyword| {
            let extra = if keyword.contains(' ') {
                MULTI_WORD_EXTRA
            } else {
                0.0
            };
            (matches + 1.0 + extra, hits + 1)
        })
}
