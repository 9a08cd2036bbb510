//! Merges synonymous labels into canonical intents

use std::collections::BTreeMap;
use std::sync::Arc;
use ticket_intent_core::{compare_scores, EnsembleScore, IntentLabel};
use ticket_intent_text_processing::PatternLibrary;

#[derive(Debug, Clone)]
pub struct IntentConsolidator {
    library: Arc<PatternLibrary>,
    max_score: f32,
}

impl IntentConsolidator {
    /// `max_score` caps each merged sum
    pub fn new(library: Arc<PatternLibrary>, max_score: f32) -> Self {
        Self { library, max_score }
    }

    /// Sum probabilities under canonical labels; ungrouped labels pass through
    pub fn consolidate(&self, scores: Vec<EnsembleScore>) -> Vec<EnsembleScore> {
        let mut merged: BTreeMap<IntentLabel, f32> = BTreeMap::new();
        for score in scores {
            let intent = match self.library.canonical_label(score.intent.as_str()) {
                Some(canonical) => canonical.clone(),
                None => score.intent,
            };
            *merged.entry(intent).or_insert(0.0) += score.probability;
        }

        let mut out: Vec<EnsembleScore> = merged
            .into_iter()
            .map(|(intent, probability)| {
                EnsembleScore::new(intent, probability.clamp(0.0, self.max_score))
            })
            .collect();
        out.sort_by(compare_scores);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ticket_intent_text_processing::default_library;

    fn consolidator() -> IntentConsolidator {
        IntentConsolidator::new(default_library(), 0.98)
    }

    #[test]
    fn test_synonyms_summed() {
        let consolidator = consolidator();
        let out = consolidator.consolidate(vec![
            EnsembleScore::new(IntentLabel::from_name("login_issue"), 0.2),
            EnsembleScore::new(IntentLabel::AccountManagement, 0.3),
            EnsembleScore::new(IntentLabel::from_name("authentication"), 0.1),
            EnsembleScore::new(IntentLabel::Feedback, 0.25),
        ]);

        assert_eq!(out.len(), 2);
        assert_eq!(out[0].intent, IntentLabel::AccountManagement);
        assert!((out[0].probability - 0.6).abs() < 1e-6);
        assert_eq!(out[1].intent, IntentLabel::Feedback);
    }

    #[test]
    fn test_ungrouped_pass_through() {
        let consolidator = consolidator();
        let out = consolidator.consolidate(vec![EnsembleScore::new(
            IntentLabel::from_name("warranty_claim"),
            0.4,
        )]);
        assert_eq!(out[0].intent, IntentLabel::Unmapped("warranty_claim".into()));
    }

    #[test]
    fn test_merged_sum_capped() {
        let out = consolidator().consolidate(vec![
            EnsembleScore::new(IntentLabel::AccountManagement, 0.9),
            EnsembleScore::new(IntentLabel::from_name("login_issue"), 0.9),
            EnsembleScore::new(IntentLabel::Feedback, 0.2),
        ]);
        assert_eq!(out[0].intent, IntentLabel::AccountManagement);
        assert_eq!(out[0].probability, 0.98);
    }
}
