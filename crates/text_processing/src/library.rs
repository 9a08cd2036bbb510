//! Compiled pattern library
//!
//! Turns an [`IntentPatternsConfig`] into ready-to-use tables: regexes are
//! compiled once, synonym groups are inverted into a lookup map and
//! stopwords become a set. The library is immutable after construction and
//! shared behind an `Arc`.

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::Arc;
use ticket_intent_config::{
    IntentPatternConfig, IntentPatternsConfig, RefundSemanticsConfig, SentimentLexiconConfig,
    WeightedTerm,
};
use ticket_intent_core::{EntityType, IntentLabel};

use crate::error::{PatternError, Result};

static DEFAULT_LIBRARY: Lazy<Arc<PatternLibrary>> = Lazy::new(|| {
    Arc::new(PatternLibrary::embedded().expect("embedded pattern library must compile"))
});

/// Process-wide library built from the embedded pattern document
pub fn default_library() -> Arc<PatternLibrary> {
    Arc::clone(&DEFAULT_LIBRARY)
}

/// A regex together with the source it was compiled from
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    pub source: String,
    pub regex: Regex,
}

/// Weighted keyword category
#[derive(Debug, Clone)]
pub struct KeywordCategory {
    pub name: String,
    pub weight: f32,
    pub keywords: Vec<String>,
}

/// Compiled scoring tables for one intent
#[derive(Debug, Clone)]
pub struct IntentPatterns {
    pub weight: f32,
    pub categories: Vec<KeywordCategory>,
    pub explicit_phrases: Vec<String>,
    pub phrase_patterns: Vec<CompiledPattern>,
    pub semantic_groups: Vec<(String, Vec<String>)>,
    pub relevant_entities: Vec<EntityType>,
}

/// Two intents detected together by any of `patterns`
#[derive(Debug, Clone)]
pub struct MultiIntentPair {
    pub intents: [IntentLabel; 2],
    pub patterns: Vec<CompiledPattern>,
}

/// Compiled, immutable pattern library
#[derive(Debug)]
pub struct PatternLibrary {
    revision: String,
    typo_corrections: BTreeMap<String, String>,
    contractions: Vec<(String, String)>,
    refund_phrases: Vec<String>,
    information_phrases: Vec<String>,
    action_words: Vec<String>,
    negation: Vec<CompiledPattern>,
    escalation_signals: Vec<String>,
    urgency_signals: Vec<String>,
    entities: Vec<(EntityType, Vec<CompiledPattern>)>,
    intents: BTreeMap<IntentLabel, IntentPatterns>,
    refund_semantics: RefundSemanticsConfig,
    multi_intent: Vec<MultiIntentPair>,
    consolidation: BTreeMap<String, IntentLabel>,
    label_mapping: BTreeMap<String, IntentLabel>,
    sentiment: SentimentLexiconConfig,
    urgency: Vec<WeightedTerm>,
    stopwords: BTreeSet<String>,
}

impl PatternLibrary {
    /// Compile a validated pattern document
    pub fn from_config(config: IntentPatternsConfig) -> Result<Self> {
        config.validate()?;

        let negation = compile_all("negation", &config.negation_patterns)?;

        let entities = config
            .entities
            .iter()
            .map(|(entity_type, patterns)| -> Result<(EntityType, Vec<CompiledPattern>)> {
                let context = format!("entities.{}", entity_type);
                Ok((*entity_type, compile_all(&context, patterns)?))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut intents = BTreeMap::new();
        for (label, patterns) in config.intents {
            let compiled = compile_intent(&label, patterns)?;
            intents.insert(label, compiled);
        }

        let multi_intent = config
            .multi_intent
            .into_iter()
            .map(|pair| -> Result<MultiIntentPair> {
                let context = format!("multi_intent.{}+{}", pair.intents[0], pair.intents[1]);
                Ok(MultiIntentPair {
                    patterns: compile_all(&context, &pair.patterns)?,
                    intents: pair.intents,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        // Invert canonical -> synonyms into synonym -> canonical
        let mut consolidation = BTreeMap::new();
        for (canonical, synonyms) in config.consolidation {
            for synonym in synonyms {
                consolidation.insert(synonym.to_lowercase(), canonical.clone());
            }
        }

        let stopwords = config
            .stopwords
            .into_iter()
            .map(|w| w.to_lowercase())
            .collect();

        tracing::debug!(
            revision = %config.revision,
            intents = intents.len(),
            multi_intent_pairs = multi_intent.len(),
            "Compiled pattern library"
        );

        Ok(Self {
            revision: config.revision,
            typo_corrections: config.normalization.typo_corrections,
            contractions: config.normalization.contractions,
            refund_phrases: config.context.refund_phrases,
            information_phrases: config.context.information_phrases,
            action_words: config.context.action_words,
            negation,
            escalation_signals: config.temporal.escalation_signals,
            urgency_signals: config.temporal.urgency_signals,
            entities,
            intents,
            refund_semantics: config.refund_semantics,
            multi_intent,
            consolidation,
            label_mapping: config.label_mapping,
            sentiment: config.sentiment,
            urgency: config.urgency,
            stopwords,
        })
    }

    /// Compile the embedded pattern document
    pub fn embedded() -> Result<Self> {
        Self::from_config(IntentPatternsConfig::embedded()?)
    }

    /// Load and compile a pattern document from disk
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_config(IntentPatternsConfig::load(path)?)
    }

    pub fn revision(&self) -> &str {
        &self.revision
    }

    pub fn typo_corrections(&self) -> &BTreeMap<String, String> {
        &self.typo_corrections
    }

    pub fn contractions(&self) -> &[(String, String)] {
        &self.contractions
    }

    pub fn refund_phrases(&self) -> &[String] {
        &self.refund_phrases
    }

    pub fn information_phrases(&self) -> &[String] {
        &self.information_phrases
    }

    pub fn action_words(&self) -> &[String] {
        &self.action_words
    }

    pub fn negation_patterns(&self) -> &[CompiledPattern] {
        &self.negation
    }

    pub fn escalation_signals(&self) -> &[String] {
        &self.escalation_signals
    }

    pub fn urgency_signals(&self) -> &[String] {
        &self.urgency_signals
    }

    pub fn entity_patterns(&self) -> &[(EntityType, Vec<CompiledPattern>)] {
        &self.entities
    }

    /// Intents with scoring tables, in label order
    pub fn intents(&self) -> impl Iterator<Item = (&IntentLabel, &IntentPatterns)> {
        self.intents.iter()
    }

    pub fn intent(&self, intent: &IntentLabel) -> Option<&IntentPatterns> {
        self.intents.get(intent)
    }

    pub fn refund_semantics(&self) -> &RefundSemanticsConfig {
        &self.refund_semantics
    }

    pub fn multi_intent_pairs(&self) -> &[MultiIntentPair] {
        &self.multi_intent
    }

    /// Canonical intent for a synonymous label, if it belongs to a group
    pub fn canonical_label(&self, label: &str) -> Option<&IntentLabel> {
        self.consolidation.get(label)
    }

    /// Catalog intent for an external classifier label, matched exactly
    pub fn mapped_label(&self, external: &str) -> Option<&IntentLabel> {
        self.label_mapping.get(external)
    }

    pub fn sentiment_lexicon(&self) -> &SentimentLexiconConfig {
        &self.sentiment
    }

    pub fn urgency_terms(&self) -> &[WeightedTerm] {
        &self.urgency
    }

    pub fn is_stopword(&self, word: &str) -> bool {
        self.stopwords.contains(word)
    }
}

fn compile_intent(label: &IntentLabel, config: IntentPatternConfig) -> Result<IntentPatterns> {
    let context = format!("intents.{}.phrase_patterns", label);
    Ok(IntentPatterns {
        weight: config.weight,
        categories: config
            .categories
            .into_iter()
            .map(|c| KeywordCategory {
                name: c.name,
                weight: c.weight,
                keywords: c.keywords.into_iter().map(|k| k.to_lowercase()).collect(),
            })
            .collect(),
        explicit_phrases: config
            .explicit_phrases
            .into_iter()
            .map(|p| p.to_lowercase())
            .collect(),
        phrase_patterns: compile_all(&context, &config.phrase_patterns)?,
        semantic_groups: config.semantic_groups.into_iter().collect(),
        relevant_entities: config.relevant_entities,
    })
}

fn compile_all(context: &str, patterns: &[String]) -> Result<Vec<CompiledPattern>> {
    patterns
        .iter()
        .map(|pattern| -> Result<CompiledPattern> {
            let regex = RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .map_err(|source| PatternError::InvalidRegex {
                    context: context.to_string(),
                    pattern: pattern.clone(),
                    source,
                })?;
            Ok(CompiledPattern {
                source: pattern.clone(),
                regex,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_embedded_library_compiles() {
        let library = default_library();
        assert!(!library.revision().is_empty());
        assert!(library.intent(&IntentLabel::RefundRequest).is_some());
        assert!(!library.multi_intent_pairs().is_empty());
        assert!(library
            .entity_patterns()
            .iter()
            .any(|(t, _)| *t == EntityType::MoneyAmount));
    }

    #[test]
    fn test_consolidation_is_inverted() {
        let library = default_library();
        assert_eq!(
            library.canonical_label("login_issue"),
            Some(&IntentLabel::AccountManagement)
        );
        assert_eq!(library.canonical_label("refund_request"), None);
    }

    #[test]
    fn test_label_mapping() {
        let library = default_library();
        assert_eq!(
            library.mapped_label("TECH_ISSUE"),
            Some(&IntentLabel::TechnicalSupport)
        );
        assert_eq!(
            library.mapped_label("contact_human_agent"),
            Some(&IntentLabel::Escalation)
        );
        assert_eq!(library.mapped_label("tech_issue"), None);
    }

    #[test]
    fn test_invalid_regex_reported_with_context() {
        let yaml = r#"
version: 1
intents:
  feedback:
    phrase_patterns: ['(unclosed']
"#;
        let config = IntentPatternsConfig::from_yaml_str(yaml).unwrap();
        let err = PatternLibrary::from_config(config).unwrap_err();
        match err {
            PatternError::InvalidRegex { context, pattern, .. } => {
                assert_eq!(context, "intents.feedback.phrase_patterns");
                assert_eq!(pattern, "(unclosed");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
version: 1
revision: disk
stopwords: [The, and]
intents:
  escalation:
    phrase_patterns: ['\bmanager\b']
"#
        )
        .unwrap();

        let library = PatternLibrary::load(file.path()).unwrap();
        assert_eq!(library.revision(), "disk");
        assert!(library.is_stopword("the"));
        let escalation = library.intent(&IntentLabel::Escalation).unwrap();
        assert!(escalation.phrase_patterns[0].regex.is_match("A MANAGER please"));
    }
}
