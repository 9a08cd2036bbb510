//! Compound intent detection
//!
//! Some tickets state two intents at once ("disappointed ... want a refund").
//! Each configured pair has regexes spanning both intents; the first match
//! of a pair emits a fixed-strength signal for both members.

use std::collections::BTreeMap;
use std::sync::Arc;
use ticket_intent_core::{IntentLabel, IntentSignal, SignalSource};

use crate::library::PatternLibrary;

pub const MULTI_INTENT_SCORE: f32 = 0.6;

#[derive(Debug, Clone)]
pub struct MultiIntentDetector {
    library: Arc<PatternLibrary>,
}

impl MultiIntentDetector {
    pub fn new(library: Arc<PatternLibrary>) -> Self {
        Self { library }
    }

    /// One signal per member of every matching pair
    pub fn detect(&self, text: &str) -> Vec<IntentSignal> {
        let mut signals = Vec::new();
        for pair in self.library.multi_intent_pairs() {
            if let Some(pattern) = pair.patterns.iter().find(|p| p.regex.is_match(text)) {
                tracing::trace!(
                    first = %pair.intents[0],
                    second = %pair.intents[1],
                    pattern = %pattern.source,
                    "Multi-intent pair matched"
                );
                for intent in &pair.intents {
                    signals.push(IntentSignal::new(
                        intent.clone(),
                        SignalSource::MultiIntent,
                        MULTI_INTENT_SCORE,
                    ));
                }
            }
        }
        signals
    }

    /// Strongest multi-intent signal per intent
    pub fn scores(&self, text: &str) -> BTreeMap<IntentLabel, f32> {
        let mut scores: BTreeMap<IntentLabel, f32> = BTreeMap::new();
        for signal in self.detect(text) {
            let entry = scores.entry(signal.intent).or_insert(0.0);
            *entry = entry.max(signal.score);
        }
        scores
    }
}
