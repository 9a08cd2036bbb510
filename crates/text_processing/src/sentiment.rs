//! Lexicon-based ticket sentiment
//!
//! Counts negative and positive lexicon terms. A positive term directly
//! preceded by a negator ("not happy", "never helpful") is not counted.

use std::sync::Arc;
use ticket_intent_core::Sentiment;

use crate::library::PatternLibrary;
use crate::terms::count_term;

const NEGATORS: [&str; 4] = ["not", "never", "no", "hardly"];

/// Lexicon hit counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SentimentCounts {
    pub negative: usize,
    pub positive: usize,
}

impl SentimentCounts {
    pub fn sentiment(&self) -> Sentiment {
        match self.negative.cmp(&self.positive) {
            std::cmp::Ordering::Greater => Sentiment::Negative,
            std::cmp::Ordering::Less => Sentiment::Positive,
            std::cmp::Ordering::Equal => Sentiment::Neutral,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SentimentAnalyzer {
    library: Arc<PatternLibrary>,
}

impl SentimentAnalyzer {
    pub fn new(library: Arc<PatternLibrary>) -> Self {
        Self { library }
    }

    pub fn analyze(&self, text: &str) -> Sentiment {
        self.counts(text).sentiment()
    }

    pub fn counts(&self, text: &str) -> SentimentCounts {
        let lexicon = self.library.sentiment_lexicon();

        let negative = lexicon
            .negative
            .iter()
            .map(|term| count_term(text, term))
            .sum();

        let positive = lexicon
            .positive
            .iter()
            .map(|term| count_unnegated(text, term))
            .sum();

        SentimentCounts { negative, positive }
    }
}

fn count_unnegated(text: &str, term: &str) -> usize {
    if term.is_empty() {
        return 0;
    }
    text.match_indices(term)
        .filter(|(idx, _)| {
            let before = &text[..*idx];
            let on_boundary = before
                .chars()
                .next_back()
                .map_or(true, |c| !c.is_alphanumeric());
            on_boundary && !preceded_by_negator(before)
        })
        .count()
}

fn preceded_by_negator(before: &str) -> bool {
    before
        .split_whitespace()
        .next_back()
        .map_or(false, |word| NEGATORS.contains(&word))
}
