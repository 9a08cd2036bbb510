//! Ticket-level context analysis
//!
//! Produces everything the ensemble needs besides per-intent scores:
//! normalized scoring text, entities, urgency, sentiment, text quality and
//! subject/description consistency.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;
use ticket_intent_core::{ExtractedEntities, Sentiment, Ticket};
use unicode_segmentation::UnicodeSegmentation;

use crate::entities::EntityExtractor;
use crate::library::PatternLibrary;
use crate::normalizer::TextNormalizer;
use crate::sentiment::SentimentAnalyzer;
use crate::terms::contains_term;

/// Word count at which the length component of quality saturates
const QUALITY_FULL_LENGTH: f32 = 20.0;
const QUALITY_LENGTH_WEIGHT: f32 = 0.4;
const QUALITY_ALPHA_WEIGHT: f32 = 0.3;
const QUALITY_DIVERSITY_WEIGHT: f32 = 0.3;

/// Added to urgency when the ticket contains an exclamation mark
const EXCLAMATION_URGENCY: f32 = 0.1;

/// Words this short never count towards consistency
const MIN_CONTENT_WORD_LEN: usize = 3;

/// Text quality metrics, all within [0, 1] except `word_count`
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TextQuality {
    pub score: f32,
    pub word_count: usize,
    pub alpha_ratio: f32,
    pub lexical_diversity: f32,
}

/// Request-scoped analysis of one ticket
#[derive(Debug, Clone, Default)]
pub struct TicketContext {
    /// Normalized scoring text, subject weighted by duplication
    pub text: String,
    pub entities: ExtractedEntities,
    pub urgency: f32,
    pub sentiment: Sentiment,
    pub quality: TextQuality,
    pub consistency: f32,
}

/// Computes a [`TicketContext`] from a raw ticket
#[derive(Debug, Clone)]
pub struct TicketAnalyzer {
    library: Arc<PatternLibrary>,
    normalizer: TextNormalizer,
    extractor: EntityExtractor,
    sentiment: SentimentAnalyzer,
}

impl TicketAnalyzer {
    pub fn new(library: Arc<PatternLibrary>) -> Self {
        Self {
            normalizer: TextNormalizer::new(Arc::clone(&library)),
            extractor: EntityExtractor::new(Arc::clone(&library)),
            sentiment: SentimentAnalyzer::new(Arc::clone(&library)),
            library,
        }
    }

    pub fn normalizer(&self) -> &TextNormalizer {
        &self.normalizer
    }

    pub fn extractor(&self) -> &EntityExtractor {
        &self.extractor
    }

    pub fn analyze(&self, ticket: &Ticket) -> TicketContext {
        let text = self.normalizer.normalize_ticket(ticket);
        let entities = self.extractor.extract(&self.normalizer.entity_text(ticket));

        let raw = [ticket.subject(), ticket.description()].join(" ");

        let context = TicketContext {
            urgency: self.urgency(&text),
            sentiment: self.sentiment.analyze(&text),
            quality: text_quality(&raw),
            consistency: self.consistency(ticket),
            entities,
            text,
        };

        tracing::debug!(
            urgency = context.urgency,
            sentiment = ?context.sentiment,
            quality = context.quality.score,
            consistency = context.consistency,
            entity_types = context.entities.len(),
            "Analyzed ticket"
        );

        context
    }

    /// Strongest urgency term, plus a small bump for `!`, clamped to 1
    pub fn urgency(&self, text: &str) -> f32 {
        let strongest = self
            .library
            .urgency_terms()
            .iter()
            .filter(|t| contains_term(text, &t.term))
            .map(|t| t.weight)
            .fold(0.0_f32, f32::max);

        let bump = if text.contains('!') {
            EXCLAMATION_URGENCY
        } else {
            0.0
        };

        (strongest + bump).clamp(0.0, 1.0)
    }

    /// Jaccard overlap of content words between subject and description
    ///
    /// 0 when either part has no content words.
    pub fn consistency(&self, ticket: &Ticket) -> f32 {
        let subject = self.content_words(&self.normalizer.normalize(ticket.subject()));
        let description = self.content_words(&self.normalizer.normalize(ticket.description()));

        if subject.is_empty() || description.is_empty() {
            return 0.0;
        }

        let shared = subject.intersection(&description).count();
        let union = subject.union(&description).count();
        shared as f32 / union as f32
    }

    fn content_words(&self, text: &str) -> BTreeSet<String> {
        text.unicode_words()
            .filter(|w| w.chars().count() >= MIN_CONTENT_WORD_LEN)
            .filter(|w| !self.library.is_stopword(w))
            .map(str::to_string)
            .collect()
    }
}

/// Quality of raw ticket text
///
/// `0.4 * min(words / 20, 1) + 0.3 * alphabetic ratio + 0.3 * lexical diversity`
pub fn text_quality(raw: &str) -> TextQuality {
    let words: Vec<String> = raw.unicode_words().map(|w| w.to_lowercase()).collect();
    if words.is_empty() {
        return TextQuality::default();
    }

    let word_count = words.len();
    let length = (word_count as f32 / QUALITY_FULL_LENGTH).min(1.0);

    let (alpha, visible) = raw
        .chars()
        .filter(|c| !c.is_whitespace())
        .fold((0usize, 0usize), |(alpha, visible), c| {
            (alpha + usize::from(c.is_alphabetic()), visible + 1)
        });
    let alpha_ratio = if visible == 0 {
        0.0
    } else {
        alpha as f32 / visible as f32
    };

    let unique: BTreeSet<&str> = words.iter().map(String::as_str).collect();
    let lexical_diversity = unique.len() as f32 / word_count as f32;

    let score = QUALITY_LENGTH_WEIGHT * length
        + QUALITY_ALPHA_WEIGHT * alpha_ratio
        + QUALITY_DIVERSITY_WEIGHT * lexical_diversity;

    TextQuality {
        score: score.clamp(0.0, 1.0),
        word_count,
        alpha_ratio,
        lexical_diversity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::default_library;
    use ticket_intent_core::EntityType;

    fn analyzer() -> TicketAnalyzer {
        TicketAnalyzer::new(default_library())
    }

    #[test]
    fn test_quality_bounds() {
        assert_eq!(text_quality("").score, 0.0);
        assert_eq!(text_quality("   ").word_count, 0);

        let q = text_quality(
            "My order arrived yesterday but the box was crushed and two items inside are damaged beyond use",
        );
        assert!(q.score > 0.5 && q.score <= 1.0);
        assert_eq!(q.word_count, 17);
        assert_eq!(q.lexical_diversity, 1.0);
    }

    #[test]
    fn test_quality_penalizes_noise() {
        let clean = text_quality("Please help me with my invoice");
        let noisy = text_quality("??? 1234 !!! 5678 ???");
        assert!(clean.score > noisy.score);
        assert!(noisy.alpha_ratio < 0.01);
    }

    #[test]
    fn test_urgency() {
        let a = analyzer();
        assert_eq!(a.urgency("where is my order"), 0.0);
        assert!((a.urgency("this is urgent") - 0.9).abs() < 1e-6);
        assert!((a.urgency("emergency! fix it asap") - 1.0).abs() < 1e-6);
        assert!((a.urgency("please help!") - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_consistency() {
        let a = analyzer();
        let related = Ticket::new("Refund for damaged blender", "The blender arrived damaged, I want a refund");
        let unrelated = Ticket::new("Hello", "My invoice shows the wrong amount");
        assert!(a.consistency(&related) > 0.3);
        assert_eq!(a.consistency(&unrelated), 0.0);
        assert_eq!(a.consistency(&Ticket::new("", "anything here")), 0.0);
    }

    #[test]
    fn test_analyze_collects_context() {
        let ctx = analyzer().analyze(&Ticket::new(
            "Refund",
            "I was charged $40 twice for order #88231 and I am very disappointed!",
        ));
        assert!(ctx.text.starts_with("refund refund"));
        assert!(ctx.entities.contains(EntityType::MoneyAmount));
        assert!(ctx.entities.contains(EntityType::OrderNumber));
        assert_eq!(ctx.sentiment, Sentiment::Negative);
        assert!(ctx.urgency > 0.0);
        assert!(ctx.quality.score > 0.0);
    }
}
