//! Core traits and types for support ticket intent classification
//!
//! This crate provides foundational types used across all other crates:
//! - Ticket input and the intent label catalog
//! - Typed entities extracted from ticket text
//! - Signals, ensemble scores and the ranked classification result
//! - The `TextClassifier` trait for the external statistical classifier
//! - Error types

pub mod classification;
pub mod entity;
pub mod error;
pub mod ticket;
pub mod traits;

pub use classification::{
    compare_scores, ClassificationResult, ClassifyResponse, DebugInfo, EnsembleScore,
    IntentScoreBreakdown, IntentSignal, Sentiment, SignalSource,
};
pub use entity::{EntityType, ExtractedEntities};
pub use error::{ClassifierError, Error, Result};
pub use ticket::{IntentLabel, Ticket};

pub use traits::{LabelScore, RawPredictions, TextClassifier};
