//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Runtime environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    #[default]
    Development,
    Staging,
    Production,
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub environment: RuntimeEnvironment,

    /// External text classifier
    #[serde(default)]
    pub classifier: ClassifierSettings,

    /// Confidence thresholds applied by the orchestrator
    #[serde(default)]
    pub thresholds: ThresholdConfig,

    /// Ensemble fusion weights and contextual adjustments
    #[serde(default)]
    pub ensemble: EnsembleConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,

    /// Pattern library override; the embedded library is used when unset
    #[serde(default)]
    pub patterns_path: Option<String>,
}

/// External text classifier settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierSettings {
    /// When false the orchestrator runs rule-only
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Text-classification endpoint
    #[serde(default = "default_classifier_endpoint")]
    pub endpoint: String,

    /// Model identifier reported in logs
    #[serde(default = "default_model_name")]
    pub model: String,

    /// Deadline for one classifier call
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_true() -> bool {
    true
}

fn default_classifier_endpoint() -> String {
    "http://127.0.0.1:8000/classify".to_string()
}

fn default_model_name() -> String {
    "customer-support-intent".to_string()
}

fn default_timeout_ms() -> u64 {
    2000
}

impl Default for ClassifierSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: default_classifier_endpoint(),
            model: default_model_name(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

/// Candidate thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThresholdConfig {
    /// Threshold when text quality is above `quality_cutoff`
    #[serde(default = "default_high_quality_threshold")]
    pub high_quality: f32,

    /// Threshold for low-quality text
    #[serde(default = "default_low_quality_threshold")]
    pub low_quality: f32,

    #[serde(default = "default_quality_cutoff")]
    pub quality_cutoff: f32,

    /// Threshold on the keyword-only fallback path
    #[serde(default = "default_fallback_threshold")]
    pub fallback: f32,

    /// Confidence of the default intent when the fallback finds nothing
    #[serde(default = "default_fallback_confidence")]
    pub fallback_default_confidence: f32,

    /// Rule scores at or below this are dropped before fusion
    #[serde(default = "default_min_rule_score")]
    pub min_rule_score: f32,

    /// Classifier scores below this are dropped before fusion
    #[serde(default = "default_min_ml_score")]
    pub min_ml_score: f32,
}

fn default_high_quality_threshold() -> f32 {
    0.01
}

fn default_low_quality_threshold() -> f32 {
    0.005
}

fn default_quality_cutoff() -> f32 {
    0.5
}

fn default_fallback_threshold() -> f32 {
    0.02
}

fn default_fallback_confidence() -> f32 {
    0.7
}

fn default_min_rule_score() -> f32 {
    0.01
}

fn default_min_ml_score() -> f32 {
    0.08
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            high_quality: default_high_quality_threshold(),
            low_quality: default_low_quality_threshold(),
            quality_cutoff: default_quality_cutoff(),
            fallback: default_fallback_threshold(),
            fallback_default_confidence: default_fallback_confidence(),
            min_rule_score: default_min_rule_score(),
            min_ml_score: default_min_ml_score(),
        }
    }
}

impl ThresholdConfig {
    /// Candidate threshold for a given text quality
    pub fn for_quality(&self, quality: f32) -> f32 {
        if quality > self.quality_cutoff {
            self.high_quality
        } else {
            self.low_quality
        }
    }
}

/// Ensemble fusion constants
///
/// These are tuning parameters, not invariants; revalidate against a
/// labeled ticket set before changing them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnsembleConfig {
    /// Rule score above which the rule engine dominates
    #[serde(default = "default_rule_dominance")]
    pub rule_dominance_threshold: f32,
    #[serde(default = "default_rule_dominant_weight")]
    pub rule_dominant_weight: f32,

    /// Classifier score above which the classifier dominates
    #[serde(default = "default_ml_dominance")]
    pub ml_dominance_threshold: f32,
    #[serde(default = "default_ml_dominant_weight")]
    pub ml_dominant_weight: f32,

    /// Rule weight when both sources are present and rules lead
    #[serde(default = "default_rule_lead_weight")]
    pub rule_lead_weight: f32,
    /// Rule weight when both sources are present and the classifier leads
    #[serde(default = "default_balanced_weight")]
    pub balanced_weight: f32,

    #[serde(default = "default_rule_only_factor")]
    pub rule_only_factor: f32,
    #[serde(default = "default_ml_only_factor")]
    pub ml_only_factor: f32,

    /// Quality multiplier is `quality_base + quality_span * quality`
    #[serde(default = "default_quality_base")]
    pub quality_base: f32,
    #[serde(default = "default_quality_span")]
    pub quality_span: f32,

    #[serde(default = "default_consistency_threshold")]
    pub consistency_threshold: f32,
    #[serde(default = "default_consistency_bonus")]
    pub consistency_bonus: f32,

    #[serde(default = "default_entity_bonus")]
    pub entity_bonus: f32,
    #[serde(default = "default_entity_bonus_cap")]
    pub entity_bonus_cap: f32,

    /// Contextual adjustments only apply below this score
    #[serde(default = "default_adjustment_ceiling")]
    pub adjustment_ceiling: f32,
    #[serde(default = "default_urgency_factor")]
    pub urgency_factor: f32,
    #[serde(default = "default_negative_bonus")]
    pub negative_sentiment_bonus: f32,
    #[serde(default = "default_positive_bonus")]
    pub positive_sentiment_bonus: f32,

    #[serde(default = "default_max_score")]
    pub max_score: f32,
}

fn default_rule_dominance() -> f32 {
    0.7
}

fn default_rule_dominant_weight() -> f32 {
    0.85
}

fn default_ml_dominance() -> f32 {
    0.7
}

fn default_ml_dominant_weight() -> f32 {
    0.75
}

fn default_rule_lead_weight() -> f32 {
    0.7
}

fn default_balanced_weight() -> f32 {
    0.5
}

fn default_rule_only_factor() -> f32 {
    0.9
}

fn default_ml_only_factor() -> f32 {
    0.85
}

fn default_quality_base() -> f32 {
    0.8
}

fn default_quality_span() -> f32 {
    0.4
}

fn default_consistency_threshold() -> f32 {
    0.3
}

fn default_consistency_bonus() -> f32 {
    0.05
}

fn default_entity_bonus() -> f32 {
    0.1
}

fn default_entity_bonus_cap() -> f32 {
    0.2
}

fn default_adjustment_ceiling() -> f32 {
    0.6
}

fn default_urgency_factor() -> f32 {
    0.15
}

fn default_negative_bonus() -> f32 {
    0.08
}

fn default_positive_bonus() -> f32 {
    0.05
}

fn default_max_score() -> f32 {
    0.98
}

impl Default for EnsembleConfig {
    fn default() -> Self {
        Self {
            rule_dominance_threshold: default_rule_dominance(),
            rule_dominant_weight: default_rule_dominant_weight(),
            ml_dominance_threshold: default_ml_dominance(),
            ml_dominant_weight: default_ml_dominant_weight(),
            rule_lead_weight: default_rule_lead_weight(),
            balanced_weight: default_balanced_weight(),
            rule_only_factor: default_rule_only_factor(),
            ml_only_factor: default_ml_only_factor(),
            quality_base: default_quality_base(),
            quality_span: default_quality_span(),
            consistency_threshold: default_consistency_threshold(),
            consistency_bonus: default_consistency_bonus(),
            entity_bonus: default_entity_bonus(),
            entity_bonus_cap: default_entity_bonus_cap(),
            adjustment_ceiling: default_adjustment_ceiling(),
            urgency_factor: default_urgency_factor(),
            negative_sentiment_bonus: default_negative_bonus(),
            positive_sentiment_bonus: default_positive_bonus(),
            max_score: default_max_score(),
        }
    }
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit JSON log lines
    #[serde(default)]
    pub log_json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
        }
    }
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_classifier()?;
        self.validate_thresholds()?;
        self.validate_ensemble()?;
        Ok(())
    }

    fn validate_classifier(&self) -> Result<(), ConfigError> {
        if self.classifier.enabled && self.classifier.endpoint.trim().is_empty() {
            return Err(ConfigError::MissingField("classifier.endpoint".to_string()));
        }

        if self.classifier.timeout_ms == 0 || self.classifier.timeout_ms > 60_000 {
            return Err(ConfigError::InvalidValue {
                field: "classifier.timeout_ms".to_string(),
                message: format!(
                    "Must be between 1 and 60000, got {}",
                    self.classifier.timeout_ms
                ),
            });
        }

        Ok(())
    }

    fn validate_thresholds(&self) -> Result<(), ConfigError> {
        let t = &self.thresholds;
        let unit_fields = [
            ("thresholds.high_quality", t.high_quality),
            ("thresholds.low_quality", t.low_quality),
            ("thresholds.quality_cutoff", t.quality_cutoff),
            ("thresholds.fallback", t.fallback),
            ("thresholds.fallback_default_confidence", t.fallback_default_confidence),
            ("thresholds.min_rule_score", t.min_rule_score),
            ("thresholds.min_ml_score", t.min_ml_score),
        ];
        check_unit_range(&unit_fields)
    }

    fn validate_ensemble(&self) -> Result<(), ConfigError> {
        let e = &self.ensemble;
        let unit_fields = [
            ("ensemble.rule_dominance_threshold", e.rule_dominance_threshold),
            ("ensemble.rule_dominant_weight", e.rule_dominant_weight),
            ("ensemble.ml_dominance_threshold", e.ml_dominance_threshold),
            ("ensemble.ml_dominant_weight", e.ml_dominant_weight),
            ("ensemble.rule_lead_weight", e.rule_lead_weight),
            ("ensemble.balanced_weight", e.balanced_weight),
            ("ensemble.rule_only_factor", e.rule_only_factor),
            ("ensemble.ml_only_factor", e.ml_only_factor),
            ("ensemble.consistency_threshold", e.consistency_threshold),
            ("ensemble.adjustment_ceiling", e.adjustment_ceiling),
            ("ensemble.max_score", e.max_score),
        ];
        check_unit_range(&unit_fields)?;

        if e.quality_base < 0.0 || e.quality_span < 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "ensemble.quality_base".to_string(),
                message: "Quality multiplier terms must be non-negative".to_string(),
            });
        }

        Ok(())
    }
}

fn check_unit_range(fields: &[(&str, f32)]) -> Result<(), ConfigError> {
    for (field, value) in fields {
        if !(0.0..=1.0).contains(value) {
            return Err(ConfigError::InvalidValue {
                field: field.to_string(),
                message: format!("Must be between 0.0 and 1.0, got {}", value),
            });
        }
    }
    Ok(())
}

/// Load settings from files and environment
///
/// Priority: env vars > config/{env}.yaml > config/default.yaml > defaults
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    builder = builder.add_source(File::with_name("config/default").required(false));

    if let Some(env_name) = env {
        builder =
            builder.add_source(File::with_name(&format!("config/{}", env_name)).required(false));
    }

    builder = builder.add_source(
        Environment::with_prefix("TICKET_INTENT")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    let settings: Settings = config.try_deserialize()?;

    settings.validate()?;

    Ok(settings)
}
