//! Error types shared across the workspace

use thiserror::Error;

/// Failures of the external text classifier collaborator.
///
/// None of these reach the caller of the orchestrator; every variant routes
/// the request into the rule-only fallback path.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClassifierError {
    /// Classifier missing or failed to initialize
    #[error("Classifier unavailable: {0}")]
    Unavailable(String),

    /// Classifier raised during a call
    #[error("Classifier invocation failed: {0}")]
    Invocation(String),

    /// Call exceeded the configured deadline
    #[error("Classifier timed out after {0}ms")]
    Timeout(u64),

    /// Response could not be decoded into label/score pairs
    #[error("Malformed classifier response: {0}")]
    MalformedResponse(String),
}

impl ClassifierError {
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    pub fn invocation(msg: impl Into<String>) -> Self {
        Self::Invocation(msg.into())
    }
}

/// Internal scoring failure, reported in-band as `classification_error`
#[derive(Error, Debug)]
pub enum Error {
    #[error("Scoring failed: {0}")]
    Scoring(String),
}

pub type Result<T> = std::result::Result<T, Error>;
