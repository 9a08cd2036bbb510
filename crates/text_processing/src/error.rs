//! Text processing errors

use thiserror::Error;
use ticket_intent_config::ConfigError;

/// Failures while building the compiled pattern library
#[derive(Error, Debug)]
pub enum PatternError {
    #[error("Invalid regex in {context} '{pattern}': {source}")]
    InvalidRegex {
        context: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Pattern library configuration error: {0}")]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, PatternError>;
