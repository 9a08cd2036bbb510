//! External classifier label mapping
//!
//! Maps raw model labels (`TECH_ISSUE`, `get_refund`, ...) onto catalog
//! intents using the pattern library's label table. Labels without an
//! entry pass through lowercased. Scores are rounded to 4 decimals.

use std::collections::BTreeMap;
use std::sync::Arc;
use ticket_intent_core::{IntentLabel, IntentSignal, LabelScore, SignalSource};
use ticket_intent_text_processing::PatternLibrary;

use crate::normalize::round4;

#[derive(Debug, Clone)]
pub struct LabelMapper {
    library: Arc<PatternLibrary>,
}

impl LabelMapper {
    pub fn new(library: Arc<PatternLibrary>) -> Self {
        Self { library }
    }

    pub fn map_label(&self, external: &str) -> IntentLabel {
        match self.library.mapped_label(external) {
            Some(intent) => intent.clone(),
            None => IntentLabel::from_name(&external.to_lowercase()),
        }
    }

    /// One `ml` signal per raw prediction; non-finite scores are dropped
    pub fn map(&self, predictions: &[LabelScore]) -> Vec<IntentSignal> {
        predictions
            .iter()
            .filter(|p| p.score.is_finite())
            .map(|p| IntentSignal::new(self.map_label(&p.label), SignalSource::Ml, round4(p.score)))
            .collect()
    }

    /// Strongest classifier score per intent
    pub fn scores(&self, predictions: &[LabelScore]) -> BTreeMap<IntentLabel, f32> {
        let mut scores: BTreeMap<IntentLabel, f32> = BTreeMap::new();
        for signal in self.map(predictions) {
            let entry = scores.entry(signal.intent).or_insert(0.0);
            *entry = entry.max(signal.score);
        }
        scores
    }
}
