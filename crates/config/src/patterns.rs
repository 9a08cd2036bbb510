//! Intent Pattern Library Configuration
//!
//! Declarative scoring tables for the rule-based intent engine: typo and
//! contraction tables, context phrases, entity regexes, per-intent keyword
//! categories, phrase regexes and semantic groups, multi-intent pairs, label
//! consolidation groups and the external classifier label mapping.
//!
//! Regexes are stored as strings here and compiled once by the text
//! processing crate.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use ticket_intent_core::{EntityType, IntentLabel};

use crate::ConfigError;

/// Schema version this build understands
pub const SUPPORTED_VERSION: u32 = 1;

/// Embedded default pattern library
pub const DEFAULT_PATTERNS_YAML: &str = include_str!("../../../config/intent_patterns.yaml");

/// Root pattern library document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentPatternsConfig {
    /// Schema version
    pub version: u32,

    /// Free-form revision tag of the tables
    #[serde(default)]
    pub revision: String,

    #[serde(default)]
    pub normalization: NormalizationConfig,

    #[serde(default)]
    pub context: ContextConfig,

    /// Regexes whose match marks the ticket as negated
    #[serde(default)]
    pub negation_patterns: Vec<String>,

    #[serde(default)]
    pub temporal: TemporalConfig,

    /// Entity regexes per entity type
    #[serde(default)]
    pub entities: BTreeMap<EntityType, Vec<String>>,

    /// Per-intent scoring tables
    #[serde(default)]
    pub intents: BTreeMap<IntentLabel, IntentPatternConfig>,

    /// Extra refund evidence used by the semantic booster
    #[serde(default)]
    pub refund_semantics: RefundSemanticsConfig,

    #[serde(default)]
    pub multi_intent: Vec<MultiIntentPairConfig>,

    /// Canonical intent -> synonymous labels merged into it
    #[serde(default)]
    pub consolidation: BTreeMap<IntentLabel, Vec<String>>,

    /// External classifier label -> catalog intent
    #[serde(default)]
    pub label_mapping: BTreeMap<String, IntentLabel>,

    #[serde(default)]
    pub sentiment: SentimentLexiconConfig,

    /// Weighted urgency terms
    #[serde(default)]
    pub urgency: Vec<WeightedTerm>,

    /// Words ignored when comparing subject and description
    #[serde(default)]
    pub stopwords: Vec<String>,
}

impl IntentPatternsConfig {
    /// Load from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ConfigError::FileNotFound(format!("{}: {}", path.as_ref().display(), e))
        })?;
        Self::from_yaml_str(&content)
    }

    /// Parse and validate a YAML document
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        tracing::debug!(
            version = config.version,
            revision = %config.revision,
            intents = config.intents.len(),
            "Loaded intent pattern library"
        );
        Ok(config)
    }

    /// The library compiled into the binary
    pub fn embedded() -> Result<Self, ConfigError> {
        Self::from_yaml_str(DEFAULT_PATTERNS_YAML)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version != SUPPORTED_VERSION {
            return Err(ConfigError::UnsupportedVersion {
                found: self.version,
                expected: SUPPORTED_VERSION,
            });
        }

        for (intent, patterns) in &self.intents {
            if patterns.weight <= 0.0 {
                return Err(ConfigError::InvalidValue {
                    field: format!("intents.{}.weight", intent),
                    message: format!("Must be positive, got {}", patterns.weight),
                });
            }
            for category in &patterns.categories {
                if category.keywords.is_empty() {
                    return Err(ConfigError::InvalidValue {
                        field: format!("intents.{}.categories.{}", intent, category.name),
                        message: "Keyword category must not be empty".to_string(),
                    });
                }
            }
        }

        for pair in &self.multi_intent {
            if pair.intents[0] == pair.intents[1] {
                return Err(ConfigError::InvalidValue {
                    field: "multi_intent".to_string(),
                    message: format!("Pair must name two different intents, got {}", pair.intents[0]),
                });
            }
        }

        Ok(())
    }

    pub fn intent(&self, intent: &IntentLabel) -> Option<&IntentPatternConfig> {
        self.intents.get(intent)
    }
}

/// Text normalization tables
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NormalizationConfig {
    /// Whole-word typo corrections
    #[serde(default)]
    pub typo_corrections: BTreeMap<String, String>,

    /// Contraction expansions, applied in order
    #[serde(default)]
    pub contractions: Vec<(String, String)>,
}

/// Context gate phrases
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContextConfig {
    /// Explicit refund / money-action phrases
    #[serde(default)]
    pub refund_phrases: Vec<String>,

    /// Question and help phrases
    #[serde(default)]
    pub information_phrases: Vec<String>,

    /// Action verbs that suppress information_request without a real question
    #[serde(default)]
    pub action_words: Vec<String>,
}

/// Temporal indicator words
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemporalConfig {
    #[serde(default)]
    pub escalation_signals: Vec<String>,

    #[serde(default)]
    pub urgency_signals: Vec<String>,
}

/// Scoring tables for one intent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentPatternConfig {
    /// Overall multiplier for the keyword score
    #[serde(default = "default_intent_weight")]
    pub weight: f32,

    /// Weighted keyword categories, in scoring order
    #[serde(default)]
    pub categories: Vec<KeywordCategoryConfig>,

    /// Literal unambiguous phrases; the first hit adds a fixed boost
    #[serde(default)]
    pub explicit_phrases: Vec<String>,

    /// Phrase regexes
    #[serde(default)]
    pub phrase_patterns: Vec<String>,

    /// Named semantic word groups
    #[serde(default)]
    pub semantic_groups: BTreeMap<String, Vec<String>>,

    /// Entity types that corroborate this intent
    #[serde(default)]
    pub relevant_entities: Vec<EntityType>,
}

fn default_intent_weight() -> f32 {
    1.0
}

/// Weighted keyword category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordCategoryConfig {
    pub name: String,
    #[serde(default = "default_category_weight")]
    pub weight: f32,
    pub keywords: Vec<String>,
}

fn default_category_weight() -> f32 {
    1.0
}

/// Extra refund evidence
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RefundSemanticsConfig {
    #[serde(default)]
    pub financial_terms: Vec<String>,
    #[serde(default)]
    pub want_terms: Vec<String>,
    #[serde(default)]
    pub money_terms: Vec<String>,
    #[serde(default)]
    pub refund_verbs: Vec<String>,
    /// Explicit money-request phrases
    #[serde(default)]
    pub money_request_phrases: Vec<String>,
}

/// Two intents that commonly co-occur, with regexes detecting both
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultiIntentPairConfig {
    pub intents: [IntentLabel; 2],
    pub patterns: Vec<String>,
}

/// Sentiment lexicon
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SentimentLexiconConfig {
    #[serde(default)]
    pub negative: Vec<String>,
    #[serde(default)]
    pub positive: Vec<String>,
}

/// A term with an associated strength
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedTerm {
    pub term: String,
    pub weight: f32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_embedded_library_loads() {
        let config = IntentPatternsConfig::embedded().unwrap();
        assert_eq!(config.version, SUPPORTED_VERSION);
        assert!(config.intent(&IntentLabel::RefundRequest).is_some());
        assert!(config.intent(&IntentLabel::InformationRequest).is_some());
        assert_eq!(
            config.normalization.typo_corrections.get("cencel").map(String::as_str),
            Some("cancel")
        );
        assert_eq!(
            config.label_mapping.get("get_refund"),
            Some(&IntentLabel::RefundRequest)
        );
    }

    #[test]
    fn test_every_catalog_intent_scored_by_embedded_library() {
        let config = IntentPatternsConfig::embedded().unwrap();
        for intent in [
            IntentLabel::TechnicalSupport,
            IntentLabel::BillingInquiry,
            IntentLabel::AccountManagement,
            IntentLabel::FeatureRequest,
            IntentLabel::ComplaintIssue,
            IntentLabel::InformationRequest,
            IntentLabel::RefundRequest,
            IntentLabel::CancellationRequest,
            IntentLabel::OrderManagement,
            IntentLabel::Escalation,
            IntentLabel::Feedback,
        ] {
            assert!(config.intent(&intent).is_some(), "missing {}", intent);
        }
    }

    #[test]
    fn test_version_mismatch_rejected() {
        let yaml = "version: 99\n";
        let err = IntentPatternsConfig::from_yaml_str(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedVersion { found: 99, .. }));
    }

    #[test]
    fn test_empty_category_rejected() {
        let yaml = r#"
version: 1
intents:
  feedback:
    categories:
      - name: primary
        keywords: []
"#;
        assert!(IntentPatternsConfig::from_yaml_str(yaml).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
version: 1
revision: test
intents:
  escalation:
    weight: 1.1
    explicit_phrases: ["speak to a manager"]
multi_intent:
  - intents: [complaint_issue, escalation]
    patterns: ["(?i)terrible.*manager"]
"#
        )
        .unwrap();

        let config = IntentPatternsConfig::load(file.path()).unwrap();
        assert_eq!(config.revision, "test");
        let escalation = config.intent(&IntentLabel::Escalation).unwrap();
        assert_eq!(escalation.weight, 1.1);
        assert!(escalation.categories.is_empty());
        assert_eq!(config.multi_intent[0].intents[1], IntentLabel::Escalation);
    }

    #[test]
    fn test_missing_file() {
        let err = IntentPatternsConfig::load("/nonexistent/patterns.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }
}
