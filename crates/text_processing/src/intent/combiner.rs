//! Fuses keyword, phrase, semantic, entity and temporal evidence into one
//! rule-based score per intent.

use std::sync::Arc;
use ticket_intent_core::IntentLabel;

use crate::library::PatternLibrary;
use crate::terms::contains_any;

pub const MAX_ENHANCED_SCORE: f32 = 0.98;

const ENTITY_BOOST: f32 = 0.15;
const ESCALATION_SIGNAL_BOOST: f32 = 0.2;
const URGENCY_SIGNAL_BOOST: f32 = 0.1;
/// Weight of the weaker of keyword and phrase evidence
const PHRASE_LEAD_KEYWORD_WEIGHT: f32 = 0.3;
const KEYWORD_LEAD_PHRASE_WEIGHT: f32 = 0.5;

/// Per-intent inputs to the combiner
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RuleEvidence {
    pub keyword: f32,
    pub phrase: f32,
    pub semantic: f32,
    /// Relevant entity types present
    pub entity_count: usize,
}

#[derive(Debug, Clone)]
pub struct EnhancedScoreCombiner {
    library: Arc<PatternLibrary>,
}

impl EnhancedScoreCombiner {
    pub fn new(library: Arc<PatternLibrary>) -> Self {
        Self { library }
    }

    pub fn combine(&self, intent: &IntentLabel, evidence: RuleEvidence, text: &str) -> f32 {
        let entity = ENTITY_BOOST * evidence.entity_count as f32;
        let temporal = self.temporal_boost(intent, text);

        let base = if evidence.phrase > evidence.keyword {
            evidence.phrase + PHRASE_LEAD_KEYWORD_WEIGHT * evidence.keyword
        } else {
            evidence.keyword + KEYWORD_LEAD_PHRASE_WEIGHT * evidence.phrase
        };

        (base + evidence.semantic + entity + temporal).clamp(0.0, MAX_ENHANCED_SCORE)
    }

    fn temporal_boost(&self, intent: &IntentLabel, text: &str) -> f32 {
        let mut boost = 0.0;
        if *intent == IntentLabel::Escalation
            && contains_any(text, self.library.escalation_signals())
        {
            boost += ESCALATION_SIGNAL_BOOST;
        }
        if matches!(
            intent,
            IntentLabel::TechnicalSupport | IntentLabel::Escalation
        ) && contains_any(text, self.library.urgency_signals())
        {
            boost += URGENCY_SIGNAL_BOOST;
        }
        boost
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::default_library;

    fn combiner() -> EnhancedScoreCombiner {
        EnhancedScoreCombiner::new(default_library())
    }

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_keyword_leads() {
        let evidence = RuleEvidence {
            keyword: 0.4,
            phrase: 0.2,
            semantic: 0.1,
            entity_count: 0,
        };
        let score = combiner().combine(&IntentLabel::BillingInquiry, evidence, "my invoice");
        assert!(approx(score, 0.4 + 0.5 * 0.2 + 0.1));
    }

    #[test]
    fn test_phrase_leads_with_entities() {
        let evidence = RuleEvidence {
            keyword: 0.2,
            phrase: 0.5,
            semantic: 0.0,
            entity_count: 1,
        };
        let score = combiner().combine(&IntentLabel::OrderManagement, evidence, "where is my order");
        assert!(approx(score, 0.5 + 0.3 * 0.2 + 0.15));
    }

    #[test]
    fn test_temporal_boosts() {
        let c = combiner();
        let evidence = RuleEvidence {
            keyword: 0.1,
            ..Default::default()
        };
        let text = "contacted you again, this is urgent";
        assert!(approx(c.combine(&IntentLabel::Escalation, evidence, text), 0.1 + 0.2 + 0.1));
        assert!(approx(c.combine(&IntentLabel::TechnicalSupport, evidence, text), 0.1 + 0.1));
        assert!(approx(c.combine(&IntentLabel::Feedback, evidence, text), 0.1));
    }

    #[test]
    fn test_clamped() {
        let evidence = RuleEvidence {
            keyword: 0.98,
            phrase: 0.95,
            semantic: 0.5,
            entity_count: 2,
        };
        assert_eq!(
            combiner().combine(&IntentLabel::RefundRequest, evidence, ""),
            MAX_ENHANCED_SCORE
        );
    }
}
