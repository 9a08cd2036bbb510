//! Signals, ensemble scores and ranked classification results

use crate::entity::ExtractedEntities;
use crate::ticket::IntentLabel;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Where a piece of evidence came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalSource {
    Ml,
    MultiIntent,
}

/// Raw evidence for one intent from one source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentSignal {
    pub intent: IntentLabel,
    pub source: SignalSource,
    /// Always within [0, 1]
    pub score: f32,
}

impl IntentSignal {
    pub fn new(intent: IntentLabel, source: SignalSource, score: f32) -> Self {
        Self {
            intent,
            source,
            score: score.clamp(0.0, 1.0),
        }
    }
}

/// Overall customer sentiment of a ticket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Negative,
    #[default]
    Neutral,
    Positive,
}

/// Final fused confidence for one intent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnsembleScore {
    pub intent: IntentLabel,
    pub probability: f32,
}

impl EnsembleScore {
    pub fn new(intent: IntentLabel, probability: f32) -> Self {
        Self {
            intent,
            probability,
        }
    }
}

/// Descending by probability, ties broken by label name so ordering is stable
pub fn compare_scores(a: &EnsembleScore, b: &EnsembleScore) -> Ordering {
    b.probability
        .partial_cmp(&a.probability)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.intent.as_str().cmp(b.intent.as_str()))
}

/// Ranked classification result
///
/// Never empty and always sorted descending by probability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassificationResult {
    scores: Vec<EnsembleScore>,
}

impl ClassificationResult {
    /// Build from unsorted scores; `None` when there is nothing to rank
    pub fn from_scores(mut scores: Vec<EnsembleScore>) -> Option<Self> {
        if scores.is_empty() {
            return None;
        }
        scores.sort_by(compare_scores);
        Some(Self { scores })
    }

    /// A result holding a single intent
    pub fn single(intent: IntentLabel, probability: f32) -> Self {
        Self {
            scores: vec![EnsembleScore::new(intent, probability)],
        }
    }

    pub fn unknown() -> Self {
        Self::single(IntentLabel::Unknown, 1.0)
    }

    pub fn classification_error() -> Self {
        Self::single(IntentLabel::ClassificationError, 1.0)
    }

    pub fn top(&self) -> &EnsembleScore {
        &self.scores[0]
    }

    pub fn scores(&self) -> &[EnsembleScore] {
        &self.scores
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EnsembleScore> {
        self.scores.iter()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    /// Always false; kept for symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn probability_of(&self, intent: &IntentLabel) -> Option<f32> {
        self.scores
            .iter()
            .find(|s| &s.intent == intent)
            .map(|s| s.probability)
    }

    /// Position of an intent in the ranking, 0-based
    pub fn rank_of(&self, intent: &IntentLabel) -> Option<usize> {
        self.scores.iter().position(|s| &s.intent == intent)
    }

    pub fn total_probability(&self) -> f32 {
        self.scores.iter().map(|s| s.probability).sum()
    }
}

impl<'a> IntoIterator for &'a ClassificationResult {
    type Item = &'a EnsembleScore;
    type IntoIter = std::slice::Iter<'a, EnsembleScore>;

    fn into_iter(self) -> Self::IntoIter {
        self.scores.iter()
    }
}

/// Per-intent score decomposition for debug output
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntentScoreBreakdown {
    pub keyword: f32,
    pub phrase: f32,
    pub semantic: f32,
    /// Rule-based score after the enhanced combiner
    pub enhanced: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ml: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multi_intent: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ensemble: Option<f32>,
}

/// Debug decomposition of one classification
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DebugInfo {
    pub scores: BTreeMap<IntentLabel, IntentScoreBreakdown>,
    pub pattern_matches: BTreeMap<IntentLabel, Vec<String>>,
    pub entities: ExtractedEntities,
    pub urgency: f32,
    pub sentiment: Sentiment,
    pub quality: f32,
    pub consistency: f32,
    pub used_fallback: bool,
}

/// Response shape of the exposed `classify` contract
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClassifyResponse {
    Debug {
        results: ClassificationResult,
        debug: DebugInfo,
    },
    Results(ClassificationResult),
}

impl ClassifyResponse {
    pub fn results(&self) -> &ClassificationResult {
        match self {
            Self::Results(results) => results,
            Self::Debug { results, .. } => results,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_is_sorted() {
        let result = ClassificationResult::from_scores(vec![
            EnsembleScore::new(IntentLabel::Feedback, 0.1),
            EnsembleScore::new(IntentLabel::RefundRequest, 0.7),
            EnsembleScore::new(IntentLabel::ComplaintIssue, 0.2),
        ])
        .unwrap();

        assert_eq!(result.top().intent, IntentLabel::RefundRequest);
        assert_eq!(result.rank_of(&IntentLabel::Feedback), Some(2));
    }

    #[test]
    fn test_ties_break_by_name() {
        let result = ClassificationResult::from_scores(vec![
            EnsembleScore::new(IntentLabel::RefundRequest, 0.5),
            EnsembleScore::new(IntentLabel::ComplaintIssue, 0.5),
        ])
        .unwrap();

        assert_eq!(result.top().intent, IntentLabel::ComplaintIssue);
    }

    #[test]
    fn test_empty_scores_rejected() {
        assert!(ClassificationResult::from_scores(vec![]).is_none());
    }

    #[test]
    fn test_plain_response_serializes_as_list() {
        let response = ClassifyResponse::Results(ClassificationResult::unknown());
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{"intent": "unknown", "probability": 1.0}])
        );
    }

    #[test]
    fn test_debug_response_has_results_and_debug() {
        let response = ClassifyResponse::Debug {
            results: ClassificationResult::single(IntentLabel::Feedback, 1.0),
            debug: DebugInfo::default(),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["results"][0]["intent"], "feedback");
        assert_eq!(json["debug"]["sentiment"], "neutral");
    }
}
