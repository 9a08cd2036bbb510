//! Orchestrator construction errors
//!
//! Classification itself never fails towards the caller; these only arise
//! while wiring the orchestrator from settings.

use thiserror::Error;
use ticket_intent_core::ClassifierError;
use ticket_intent_text_processing::PatternError;

#[derive(Error, Debug)]
pub enum OrchestratorError {
    #[error("Failed to build pattern library: {0}")]
    Patterns(#[from] PatternError),

    #[error("Failed to build text classifier: {0}")]
    Classifier(#[from] ClassifierError),
}

pub type Result<T> = std::result::Result<T, OrchestratorError>;
