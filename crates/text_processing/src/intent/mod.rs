//! Rule-Based Intent Scoring
//!
//! Scores every intent in the pattern library from normalized ticket text.
//!
//! # Signals
//!
//! - **Keyword**: weighted keyword categories with context gates and bonuses
//! - **Phrase**: phrase regexes, weighted by specificity
//! - **Semantic**: coverage of related-word groups
//! - **Multi-intent**: cross-intent regex pairs
//!
//! Keyword, phrase and semantic evidence are fused per intent by the
//! [`EnhancedScoreCombiner`] together with entity and temporal boosts.
//! Multi-intent signals are kept apart; the ensemble uses them as a floor.
//!
//! # Example
//!
//! ```ignore
//! use ticket_intent_text_processing::{default_library, RuleBasedScorer, TicketAnalyzer};
//!
//! let library = default_library();
//! let context = TicketAnalyzer::new(library.clone()).analyze(&ticket);
//! let scores = RuleBasedScorer::new(library).score(&context);
//! ```

mod combiner;
mod keyword;
mod multi_intent;
mod phrase;
mod semantic;

pub use combiner::{EnhancedScoreCombiner, RuleEvidence, MAX_ENHANCED_SCORE};
pub use keyword::{category_importance, KeywordScorer, MAX_KEYWORD_SCORE};
pub use multi_intent::{MultiIntentDetector, MULTI_INTENT_SCORE};
pub use phrase::{PhraseMatch, PhraseScorer, MAX_PHRASE_SCORE};
pub use semantic::{SemanticBooster, MAX_SEMANTIC_SCORE};

use std::collections::BTreeMap;
use std::sync::Arc;
use ticket_intent_core::IntentLabel;

use crate::analysis::TicketContext;
use crate::context::ContextValidator;
use crate::entities::EntityExtractor;
use crate::library::PatternLibrary;

/// Rule evidence for one intent
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IntentRuleScore {
    pub keyword: f32,
    pub phrase: f32,
    pub semantic: f32,
    /// Combined rule-based score
    pub enhanced: f32,
    /// Phrase patterns that matched
    pub matched_patterns: Vec<String>,
}

/// Rule scores for every scored intent of one ticket
#[derive(Debug, Clone, Default)]
pub struct RuleScores {
    pub intents: BTreeMap<IntentLabel, IntentRuleScore>,
    pub multi_intent: BTreeMap<IntentLabel, f32>,
}

impl RuleScores {
    pub fn enhanced(&self, intent: &IntentLabel) -> f32 {
        self.intents.get(intent).map_or(0.0, |s| s.enhanced)
    }
}

/// Runs every rule-based strategy over a ticket
#[derive(Debug, Clone)]
pub struct RuleBasedScorer {
    library: Arc<PatternLibrary>,
    context: ContextValidator,
    extractor: EntityExtractor,
    keyword: KeywordScorer,
    phrase: PhraseScorer,
    semantic: SemanticBooster,
    multi_intent: MultiIntentDetector,
    combiner: EnhancedScoreCombiner,
}

impl RuleBasedScorer {
    pub fn new(library: Arc<PatternLibrary>) -> Self {
        Self {
            context: ContextValidator::new(Arc::clone(&library)),
            extractor: EntityExtractor::new(Arc::clone(&library)),
            keyword: KeywordScorer::new(Arc::clone(&library)),
            phrase: PhraseScorer::new(Arc::clone(&library)),
            semantic: SemanticBooster::new(Arc::clone(&library)),
            multi_intent: MultiIntentDetector::new(Arc::clone(&library)),
            combiner: EnhancedScoreCombiner::new(Arc::clone(&library)),
            library,
        }
    }

    /// Full rule scoring: all strategies plus the enhanced combination
    pub fn score(&self, context: &TicketContext) -> RuleScores {
        let text = context.text.as_str();
        let mut scores = RuleScores::default();

        for (intent, _) in self.library.intents() {
            if !self.context.allows(intent, text) {
                scores.intents.insert(intent.clone(), IntentRuleScore::default());
                continue;
            }

            let keyword = self.keyword.score(text, intent);
            let phrase = self.phrase.score(text, intent);
            let semantic = self.semantic.score(text, intent);
            let evidence = RuleEvidence {
                keyword,
                phrase: phrase.score,
                semantic,
                entity_count: self.extractor.relevant_entity_count(intent, &context.entities),
            };
            let enhanced = self.combiner.combine(intent, evidence, text);

            tracing::debug!(
                intent = %intent,
                keyword,
                phrase = phrase.score,
                semantic,
                enhanced,
                "Rule scores"
            );

            scores.intents.insert(
                intent.clone(),
                IntentRuleScore {
                    keyword,
                    phrase: phrase.score,
                    semantic,
                    enhanced,
                    matched_patterns: phrase.matched,
                },
            );
        }

        scores.multi_intent = self
            .multi_intent
            .scores(text)
            .into_iter()
            .filter(|(intent, _)| self.context.allows(intent, text))
            .collect();

        scores
    }

    /// Keyword scores only, used on the fallback path
    pub fn keyword_scores(&self, text: &str) -> BTreeMap<IntentLabel, f32> {
        self.library
            .intents()
            .map(|(intent, _)| (intent.clone(), self.keyword.score(text, intent)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::TicketAnalyzer;
    use crate::library::default_library;
    use ticket_intent_core::Ticket;

    fn score(subject: &str, description: &str) -> RuleScores {
        let library = default_library();
        let context = TicketAnalyzer::new(Arc::clone(&library)).analyze(&Ticket::new(subject, description));
        RuleBasedScorer::new(library).score(&context)
    }

    fn top(scores: &RuleScores) -> IntentLabel {
        scores
            .intents
            .iter()
            .max_by(|a, b| a.1.enhanced.total_cmp(&b.1.enhanced).then_with(|| b.0.cmp(a.0)))
            .map(|(intent, _)| intent.clone())
            .unwrap()
    }

    #[test]
    fn test_refund_requires_context() {
        let scores = score("", "I don't like my new phone");
        assert_eq!(scores.enhanced(&IntentLabel::RefundRequest), 0.0);
        assert!(!scores.multi_intent.contains_key(&IntentLabel::RefundRequest));
    }

    #[test]
    fn test_refund_request_scores_high() {
        let scores = score("", "I want a refund, please give me my money back");
        assert_eq!(top(&scores), IntentLabel::RefundRequest);
        assert!(scores.enhanced(&IntentLabel::RefundRequest) > 0.9);
    }

    #[test]
    fn test_multi_intent_detected() {
        let scores = score("", "I am very disappointed and want a refund for my broken item");
        assert!(scores.multi_intent.contains_key(&IntentLabel::ComplaintIssue));
        assert!(scores.multi_intent.contains_key(&IntentLabel::RefundRequest));
        let complaint = &scores.intents[&IntentLabel::ComplaintIssue];
        assert!(!complaint.matched_patterns.is_empty());
    }

    #[test]
    fn test_typo_corrected_cancellation() {
        let scores = score("", "I want to cencel my order");
        assert_eq!(top(&scores), IntentLabel::CancellationRequest);
    }

    #[test]
    fn test_keyword_only_scores_cover_library() {
        let library = default_library();
        let scorer = RuleBasedScorer::new(Arc::clone(&library));
        let scores = scorer.keyword_scores("my app keeps crashing");
        assert_eq!(scores.len(), library.intents().count());
        assert!(scores[&IntentLabel::TechnicalSupport] > 0.0);
    }
}
