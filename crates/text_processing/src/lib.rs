//! Text processing for support ticket intent classification
//!
//! This crate provides the rule-based side of the classifier:
//! - **Normalization**: typo correction, contraction expansion, punctuation cleanup
//! - **Pattern Library**: compiled keyword, phrase, entity and semantic tables
//! - **Context Gates**: refund and information-request corroboration
//! - **Entity Extraction**: money amounts, order numbers, emails, phones, dates, products
//! - **Ticket Analysis**: urgency, sentiment, text quality, subject/description consistency
//! - **Intent Scoring**: keyword, phrase, semantic and multi-intent scorers
//!
//! # Example
//!
//! ```ignore
//! use ticket_intent_text_processing::{default_library, RuleBasedScorer, TicketAnalyzer};
//!
//! let library = default_library();
//! let analyzer = TicketAnalyzer::new(library.clone());
//! let scorer = RuleBasedScorer::new(library);
//!
//! let context = analyzer.analyze(&Ticket::new("Refund", "Item arrived broken"));
//! let scores = scorer.score(&context);
//! ```

pub mod analysis;
pub mod context;
pub mod entities;
pub mod intent;
pub mod library;
pub mod normalizer;
pub mod sentiment;
pub mod terms;

mod error;

pub use error::{PatternError, Result};

pub use analysis::{text_quality, TextQuality, TicketAnalyzer, TicketContext};
pub use context::ContextValidator;
pub use entities::EntityExtractor;
pub use intent::{
    EnhancedScoreCombiner, IntentRuleScore, KeywordScorer, MultiIntentDetector, PhraseMatch,
    PhraseScorer, RuleBasedScorer, RuleEvidence, RuleScores, SemanticBooster,
};
pub use library::{default_library, CompiledPattern, IntentPatterns, PatternLibrary};
pub use normalizer::TextNormalizer;
pub use sentiment::{SentimentAnalyzer, SentimentCounts};
