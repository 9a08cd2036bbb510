//! Context gates
//!
//! Some intents are only credible with corroborating evidence. A refund
//! request needs explicit refund or money-back language; an information
//! request is promoted by a question mark or a question/help phrase.

use std::sync::Arc;
use ticket_intent_core::IntentLabel;

use crate::library::PatternLibrary;
use crate::terms::{contains_any, contains_phrase};

#[derive(Debug, Clone)]
pub struct ContextValidator {
    library: Arc<PatternLibrary>,
}

impl ContextValidator {
    pub fn new(library: Arc<PatternLibrary>) -> Self {
        Self { library }
    }

    /// Explicit refund or money-action language is present
    pub fn has_refund_context(&self, text: &str) -> bool {
        contains_phrase(text, self.library.refund_phrases())
    }

    /// A question mark or a question/help phrase is present
    pub fn has_information_context(&self, text: &str) -> bool {
        text.contains('?') || self.has_question_phrase(text)
    }

    /// A question/help phrase is present; a bare `?` does not count
    pub fn has_question_phrase(&self, text: &str) -> bool {
        contains_phrase(text, self.library.information_phrases())
    }

    /// Action verbs that point away from a plain information request
    pub fn has_action_words(&self, text: &str) -> bool {
        contains_any(text, self.library.action_words())
    }

    /// Whether rule evidence for `intent` may count at all
    pub fn allows(&self, intent: &IntentLabel, text: &str) -> bool {
        match intent {
            IntentLabel::RefundRequest => self.has_refund_context(text),
            _ => true,
        }
    }
}
