//! Configuration management for ticket intent classification
//!
//! Supports loading configuration from:
//! - YAML files (`config/default.yaml`, `config/{env}.yaml`)
//! - Environment variables (TICKET_INTENT__ prefix)
//!
//! # Pattern Library
//!
//! Keyword categories, phrase regexes, semantic groups, entity regexes and
//! the other scoring tables live in a versioned YAML document
//! (`config/intent_patterns.yaml`). A copy is embedded in the binary and
//! used unless `patterns_path` points elsewhere.

pub mod patterns;
pub mod settings;

pub use patterns::{
    ContextConfig, IntentPatternConfig, IntentPatternsConfig, KeywordCategoryConfig,
    MultiIntentPairConfig, NormalizationConfig, RefundSemanticsConfig, SentimentLexiconConfig,
    TemporalConfig, WeightedTerm, DEFAULT_PATTERNS_YAML,
};
pub use settings::{
    load_settings, ClassifierSettings, EnsembleConfig, ObservabilityConfig, RuntimeEnvironment,
    Settings, ThresholdConfig,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Unsupported pattern library version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}
