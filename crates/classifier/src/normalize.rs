//! Probability normalization
//!
//! Turns fused scores into a distribution. A dominant leader (above 0.7)
//! keeps its score and the remaining mass `1 - top` is shared
//! proportionally among the others; otherwise everything is rescaled to
//! sum to 1. Output is rounded to 4 decimals and stays sorted.

use ticket_intent_core::{compare_scores, EnsembleScore};

pub const DEFAULT_DOMINANCE_THRESHOLD: f32 = 0.7;

/// Round to 4 decimal places
pub fn round4(value: f32) -> f32 {
    (value * 10_000.0).round() / 10_000.0
}

#[derive(Debug, Clone, Copy)]
pub struct ProbabilityNormalizer {
    dominance_threshold: f32,
}

impl Default for ProbabilityNormalizer {
    fn default() -> Self {
        Self {
            dominance_threshold: DEFAULT_DOMINANCE_THRESHOLD,
        }
    }
}

impl ProbabilityNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn normalize(&self, mut scores: Vec<EnsembleScore>) -> Vec<EnsembleScore> {
        if scores.is_empty() {
            return scores;
        }
        scores.sort_by(compare_scores);

        for score in &mut scores {
            score.probability = score.probability.clamp(0.0, 1.0);
        }

        let top = scores[0].probability;
        if top > self.dominance_threshold {
            let rest: f32 = scores[1..].iter().map(|s| s.probability).sum();
            if rest > 0.0 {
                let factor = (1.0 - top) / rest;
                for score in &mut scores[1..] {
                    score.probability *= factor;
                }
            }
        } else {
            let total: f32 = scores.iter().map(|s| s.probability).sum();
            if total > 0.0 {
                for score in &mut scores {
                    score.probability /= total;
                }
            } else {
                let share = 1.0 / scores.len() as f32;
                for score in &mut scores {
                    score.probability = share;
                }
            }
        }

        for score in &mut scores {
            score.probability = round4(score.probability);
        }
        // Rounding can tie neighbours; re-sort so ties order by name
        scores.sort_by(compare_scores);
        scores
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ticket_intent_core::IntentLabel;

    fn s(intent: IntentLabel, p: f32) -> EnsembleScore {
        EnsembleScore::new(intent, p)
    }

    #[test]
    fn test_dominant_leader_preserved() {
        let out = ProbabilityNormalizer::new().normalize(vec![
            s(IntentLabel::ComplaintIssue, 0.3),
            s(IntentLabel::RefundRequest, 0.9),
            s(IntentLabel::Feedback, 0.1),
        ]);
        assert_eq!(out[0].intent, IntentLabel::RefundRequest);
        assert_eq!(out[0].probability, 0.9);
        assert_eq!(out[1].probability, 0.075);
        assert_eq!(out[2].probability, 0.025);
    }

    #[test]
    fn test_dominant_leader_alone() {
        let out = ProbabilityNormalizer::new().normalize(vec![s(IntentLabel::RefundRequest, 0.98)]);
        assert_eq!(out, vec![s(IntentLabel::RefundRequest, 0.98)]);
    }

    #[test]
    fn test_dominant_leader_with_zero_rest() {
        let out = ProbabilityNormalizer::new().normalize(vec![
            s(IntentLabel::RefundRequest, 0.8),
            s(IntentLabel::Feedback, 0.0),
        ]);
        assert_eq!(out[0].probability, 0.8);
        assert_eq!(out[1].probability, 0.0);
    }

    #[test]
    fn test_plain_normalization() {
        let out = ProbabilityNormalizer::new().normalize(vec![
            s(IntentLabel::BillingInquiry, 0.3),
            s(IntentLabel::RefundRequest, 0.5),
            s(IntentLabel::Feedback, 0.2),
        ]);
        assert_eq!(out[0].intent, IntentLabel::RefundRequest);
        assert_eq!(out[0].probability, 0.5);
        assert_eq!(out[1].probability, 0.3);
        assert_eq!(out[2].probability, 0.2);
    }

    #[test]
    fn test_all_zero_split_equally() {
        let out = ProbabilityNormalizer::new().normalize(vec![
            s(IntentLabel::BillingInquiry, 0.0),
            s(IntentLabel::Feedback, 0.0),
        ]);
        assert!(out.iter().all(|x| x.probability == 0.5));
        // Ties order by name
        assert_eq!(out[0].intent, IntentLabel::BillingInquiry);
    }

    #[test]
    fn test_rounded_to_four_decimals() {
        let out = ProbabilityNormalizer::new().normalize(vec![
            s(IntentLabel::BillingInquiry, 0.3),
            s(IntentLabel::Feedback, 0.3),
            s(IntentLabel::Other, 0.3),
        ]);
        assert!(out.iter().all(|x| x.probability == 0.3333));
    }

    #[test]
    fn test_out_of_range_leader_stays_bounded() {
        let out = ProbabilityNormalizer::new().normalize(vec![
            s(IntentLabel::AccountManagement, 1.75),
            s(IntentLabel::Feedback, 0.2),
            s(IntentLabel::Other, 0.1),
        ]);
        assert_eq!(out[0].probability, 1.0);
        assert!(out[1..].iter().all(|x| x.probability == 0.0));
    }

    #[test]
    fn test_all_tied_above_dominance() {
        let out = ProbabilityNormalizer::new().normalize(vec![
            s(IntentLabel::BillingInquiry, 1.0),
            s(IntentLabel::Feedback, 1.0),
        ]);
        assert_eq!(out[0].probability, 1.0);
        assert_eq!(out[1].probability, 0.0);
    }

    #[test]
    fn test_round4() {
        assert_eq!(round4(0.123456), 0.1235);
        assert_eq!(round4(0.98), 0.98);
    }
}
