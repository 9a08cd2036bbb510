//! Ensemble fusion of rule-based and classifier scores
//!
//! The weighting adapts to whichever source is confident: a strong rule
//! score dominates a weak classifier score and vice versa. Fused scores are
//! then adjusted by ticket context (text quality, subject/description
//! consistency, relevant entities) and, for weaker candidates, by urgency
//! and sentiment.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use ticket_intent_config::{EnsembleConfig, ThresholdConfig};
use ticket_intent_core::{compare_scores, EnsembleScore, IntentLabel, Sentiment};
use ticket_intent_text_processing::{EntityExtractor, PatternLibrary, RuleScores, TicketContext};

#[derive(Debug, Clone)]
pub struct EnsembleCombiner {
    config: EnsembleConfig,
    min_rule_score: f32,
    min_ml_score: f32,
    extractor: EntityExtractor,
}

impl EnsembleCombiner {
    pub fn new(library: Arc<PatternLibrary>, config: EnsembleConfig, thresholds: &ThresholdConfig) -> Self {
        Self {
            config,
            min_rule_score: thresholds.min_rule_score,
            min_ml_score: thresholds.min_ml_score,
            extractor: EntityExtractor::new(library),
        }
    }

    /// Fuse rule scores, classifier scores and multi-intent signals
    ///
    /// Returns one score per candidate intent, sorted descending.
    pub fn combine(
        &self,
        rules: &RuleScores,
        ml: &BTreeMap<IntentLabel, f32>,
        context: &TicketContext,
    ) -> Vec<EnsembleScore> {
        let rule_candidates: BTreeMap<&IntentLabel, f32> = rules
            .intents
            .iter()
            .filter(|(_, s)| s.enhanced > self.min_rule_score)
            .map(|(intent, s)| (intent, s.enhanced))
            .collect();
        let ml_candidates: BTreeMap<&IntentLabel, f32> = ml
            .iter()
            .filter(|(_, score)| **score >= self.min_ml_score)
            .map(|(intent, score)| (intent, *score))
            .collect();

        let intents: BTreeSet<&IntentLabel> = rule_candidates
            .keys()
            .chain(ml_candidates.keys())
            .copied()
            .chain(rules.multi_intent.keys())
            .collect();

        let mut scores: Vec<EnsembleScore> = intents
            .into_iter()
            .map(|intent| {
                let fused = self.fuse(
                    rule_candidates.get(intent).copied(),
                    ml_candidates.get(intent).copied(),
                );
                let fused = match rules.multi_intent.get(intent) {
                    Some(multi) => fused.max(*multi),
                    None => fused,
                };
                let adjusted = self.adjust(intent, fused, context);

                tracing::debug!(intent = %intent, fused, adjusted, "Ensemble score");
                EnsembleScore::new(intent.clone(), adjusted)
            })
            .collect();

        scores.sort_by(compare_scores);
        scores
    }

    /// Confidence-adaptive weighting of the two sources
    pub fn fuse(&self, enhanced: Option<f32>, ml: Option<f32>) -> f32 {
        let c = &self.config;
        match (enhanced, ml) {
            (Some(e), ml) if e > c.rule_dominance_threshold => {
                c.rule_dominant_weight * e + (1.0 - c.rule_dominant_weight) * ml.unwrap_or(0.0)
            }
            (e, Some(m)) if m > c.ml_dominance_threshold => {
                c.ml_dominant_weight * m + (1.0 - c.ml_dominant_weight) * e.unwrap_or(0.0)
            }
            (Some(e), Some(m)) => {
                let w = if e > m {
                    c.rule_lead_weight
                } else {
                    c.balanced_weight
                };
                w * e + (1.0 - w) * m
            }
            (Some(e), None) => c.rule_only_factor * e,
            (None, Some(m)) => c.ml_only_factor * m,
            (None, None) => 0.0,
        }
    }

    /// Contextual adjustments, clamped to the configured maximum
    pub fn adjust(&self, intent: &IntentLabel, score: f32, context: &TicketContext) -> f32 {
        let c = &self.config;
        let mut score = score * (c.quality_base + c.quality_span * context.quality.score);

        if context.consistency > c.consistency_threshold {
            score += c.consistency_bonus;
        }

        let relevant = self.extractor.relevant_entity_count(intent, &context.entities);
        score += (c.entity_bonus * relevant as f32).min(c.entity_bonus_cap);

        if score < c.adjustment_ceiling {
            if matches!(
                intent,
                IntentLabel::TechnicalSupport | IntentLabel::ComplaintIssue | IntentLabel::Escalation
            ) {
                score += context.urgency * c.urgency_factor;
            }
            match context.sentiment {
                Sentiment::Negative
                    if matches!(
                        intent,
                        IntentLabel::ComplaintIssue
                            | IntentLabel::RefundRequest
                            | IntentLabel::TechnicalSupport
                    ) =>
                {
                    score += c.negative_sentiment_bonus;
                }
                Sentiment::Positive
                    if matches!(intent, IntentLabel::FeatureRequest | IntentLabel::Feedback) =>
                {
                    score += c.positive_sentiment_bonus;
                }
                _ => {}
            }
        }

        score.clamp(0.0, c.max_score)
    }
}
