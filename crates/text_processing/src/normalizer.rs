//! Ticket text normalization
//!
//! Layered, pure normalization applied before any scoring:
//!
//! 1. lowercase and trim
//! 2. collapse whitespace
//! 3. whole-word typo correction
//! 4. contraction expansion
//! 5. strip characters other than word characters, whitespace and `. ! ? -`
//! 6. collapse repeated terminal punctuation
//!
//! Entity extraction runs on the output of stage 3 so that `$`, `@` and `#`
//! survive for the entity regexes.

use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;
use ticket_intent_core::Ticket;
use unicode_segmentation::UnicodeSegmentation;

use crate::library::PatternLibrary;

static DISALLOWED_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s.!?-]").unwrap());

static REPEATED_TERMINAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"([.!?])[.!?]+").unwrap());

/// Text normalizer backed by the pattern library's typo and contraction tables
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    library: Arc<PatternLibrary>,
}

impl TextNormalizer {
    pub fn new(library: Arc<PatternLibrary>) -> Self {
        Self { library }
    }

    /// Fully normalize a piece of text
    pub fn normalize(&self, text: &str) -> String {
        let corrected = self.normalize_for_entities(text);
        if corrected.is_empty() {
            return corrected;
        }

        let expanded = self.expand_contractions(&corrected);
        let stripped = DISALLOWED_CHARS.replace_all(&expanded, "");
        let collapsed = REPEATED_TERMINAL.replace_all(&stripped, "$1");
        collapse_whitespace(&collapsed)
    }

    /// Stages 1-3 only: case, whitespace and typos
    pub fn normalize_for_entities(&self, text: &str) -> String {
        let lowered = text.trim().to_lowercase().replace('\u{2019}', "'");
        let collapsed = collapse_whitespace(&lowered);
        self.correct_typos(&collapsed)
    }

    /// Scoring text for a ticket
    ///
    /// The subject is counted twice so that its terms weigh more than the
    /// description's: `subject subject description`. Empty parts are skipped.
    pub fn normalize_ticket(&self, ticket: &Ticket) -> String {
        let subject = self.normalize(ticket.subject());
        let description = self.normalize(ticket.description());

        let mut parts: Vec<&str> = Vec::with_capacity(3);
        if !subject.is_empty() {
            parts.push(&subject);
            parts.push(&subject);
        }
        if !description.is_empty() {
            parts.push(&description);
        }
        parts.join(" ")
    }

    /// Entity text for a ticket: subject then description, each lightly normalized
    pub fn entity_text(&self, ticket: &Ticket) -> String {
        [ticket.subject(), ticket.description()]
            .iter()
            .map(|part| self.normalize_for_entities(part))
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn correct_typos(&self, text: &str) -> String {
        let corrections = self.library.typo_corrections();
        if corrections.is_empty() {
            return text.to_string();
        }

        text.split_word_bounds()
            .map(|token| {
                corrections
                    .get(token)
                    .map(String::as_str)
                    .unwrap_or(token)
            })
            .collect()
    }

    fn expand_contractions(&self, text: &str) -> String {
        self.library
            .contractions()
            .iter()
            .fold(text.to_string(), |acc, (from, to)| acc.replace(from.as_str(), to))
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::default_library;

    fn normalizer() -> TextNormalizer {
        TextNormalizer::new(default_library())
    }

    #[test]
    fn test_case_and_whitespace() {
        assert_eq!(
            normalizer().normalize("  My   ORDER\tnever\narrived  "),
            "my order never arrived"
        );
    }

    #[test]
    fn test_typo_correction_whole_word() {
        let n = normalizer();
        assert_eq!(n.normalize("I want to cencel my order"), "i want to cancel my order");
        // Only whole words are corrected
        assert_eq!(n.normalize("cencelled"), "cencelled");
    }

    #[test]
    fn test_contractions_expanded() {
        let n = normalizer();
        assert_eq!(n.normalize("I can't log in"), "i cannot log in");
        assert_eq!(n.normalize("I don't like my new phone"), "i do not like my new phone");
        assert_eq!(n.normalize("It won't load"), "it will not load");
        assert_eq!(n.normalize("I\u{2019}m stuck"), "i am stuck");
    }

    #[test]
    fn test_punctuation_stripped_and_collapsed() {
        let n = normalizer();
        assert_eq!(
            n.normalize("Refund, please!!! Now???"),
            "refund please! now?"
        );
        assert_eq!(n.normalize("two-factor (2FA) code..."), "two-factor 2fa code.");
        assert_eq!(n.normalize("a & b"), "a b");
    }

    #[test]
    fn test_empty_input() {
        let n = normalizer();
        assert_eq!(n.normalize(""), "");
        assert_eq!(n.normalize("   "), "");
        assert_eq!(n.normalize_ticket(&Ticket::default()), "");
    }

    #[test]
    fn test_subject_weighted_by_duplication() {
        let n = normalizer();
        let ticket = Ticket::new("Refund", "Item arrived damaged");
        assert_eq!(n.normalize_ticket(&ticket), "refund refund item arrived damaged");

        let no_subject = Ticket::new("", "Item arrived damaged");
        assert_eq!(n.normalize_ticket(&no_subject), "item arrived damaged");
    }

    #[test]
    fn test_entity_text_keeps_symbols() {
        let n = normalizer();
        let ticket = Ticket::new("Order #12345", "Charged $25.00, email me at Jo@Example.com");
        assert_eq!(
            n.entity_text(&ticket),
            "order #12345 charged $25.00, email me at jo@example.com"
        );
    }

    #[test]
    fn test_deterministic() {
        let n = normalizer();
        let text = "Why was I charged TWICE?? I can't believe this!";
        assert_eq!(n.normalize(text), n.normalize(text));
    }
}
