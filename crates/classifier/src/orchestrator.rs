//! End-to-end classification driver
//!
//! Per request:
//!
//! 1. Empty ticket → `unknown@1.0`
//! 2. Call the external classifier (under a deadline) while the rule engine
//!    analyzes and scores the ticket
//! 3. Classifier succeeded: fuse, threshold by text quality, consolidate,
//!    normalize
//! 4. Classifier absent, failing or timed out, or nothing passed the
//!    threshold: keyword-only fallback
//!
//! Any internal failure, including a panic, is reported in-band as
//! `classification_error@1.0`; nothing propagates to the caller.

use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use ticket_intent_config::{Settings, ThresholdConfig};
use ticket_intent_core::{
    ClassificationResult, ClassifierError, ClassifyResponse, DebugInfo, EnsembleScore, Error,
    IntentLabel, LabelScore, TextClassifier, Ticket,
};
use ticket_intent_text_processing::{
    default_library, PatternLibrary, RuleBasedScorer, RuleScores, TicketAnalyzer, TicketContext,
};

use crate::consolidate::IntentConsolidator;
use crate::ensemble::EnsembleCombiner;
use crate::error::Result;
use crate::http::HttpTextClassifier;
use crate::labels::LabelMapper;
use crate::normalize::ProbabilityNormalizer;

/// Ticket intent classifier
///
/// Stateless per request and cheap to clone; share one instance across
/// tasks.
#[derive(Clone)]
pub struct Orchestrator {
    classifier: Option<Arc<dyn TextClassifier>>,
    analyzer: TicketAnalyzer,
    scorer: RuleBasedScorer,
    mapper: LabelMapper,
    ensemble: EnsembleCombiner,
    consolidator: IntentConsolidator,
    normalizer: ProbabilityNormalizer,
    thresholds: ThresholdConfig,
    timeout: Duration,
}

impl Default for Orchestrator {
    /// Rule-only orchestrator over the embedded pattern library
    fn default() -> Self {
        Self::new(default_library(), &Settings::default())
    }
}

impl Orchestrator {
    /// Rule-only orchestrator; attach a classifier with [`Self::with_classifier`]
    pub fn new(library: Arc<PatternLibrary>, settings: &Settings) -> Self {
        Self {
            classifier: None,
            analyzer: TicketAnalyzer::new(Arc::clone(&library)),
            scorer: RuleBasedScorer::new(Arc::clone(&library)),
            mapper: LabelMapper::new(Arc::clone(&library)),
            ensemble: EnsembleCombiner::new(
                Arc::clone(&library),
                settings.ensemble.clone(),
                &settings.thresholds,
            ),
            consolidator: IntentConsolidator::new(library, settings.ensemble.max_score),
            normalizer: ProbabilityNormalizer::new(),
            thresholds: settings.thresholds.clone(),
            timeout: Duration::from_millis(settings.classifier.timeout_ms),
        }
    }

    /// Build from settings: pattern library override and HTTP classifier
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let library = match &settings.patterns_path {
            Some(path) => {
                tracing::info!(path = %path, "Loading pattern library from disk");
                Arc::new(PatternLibrary::load(path)?)
            }
            None => default_library(),
        };

        let orchestrator = Self::new(library, settings);
        if !settings.classifier.enabled {
            tracing::info!("External classifier disabled, running rule-only");
            return Ok(orchestrator);
        }

        let classifier = HttpTextClassifier::new(&settings.classifier)?;
        tracing::info!(
            endpoint = %classifier.endpoint(),
            model = %settings.classifier.model,
            timeout_ms = settings.classifier.timeout_ms,
            "Using remote text classifier"
        );
        Ok(orchestrator.with_classifier(Arc::new(classifier)))
    }

    pub fn with_classifier(mut self, classifier: Arc<dyn TextClassifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn has_classifier(&self) -> bool {
        self.classifier.is_some()
    }

    /// Ranked intents for a ticket
    pub async fn classify(&self, subject: &str, description: &str) -> ClassificationResult {
        self.classify_debug(subject, description).await.0
    }

    /// Ranked intents plus the per-intent score decomposition
    pub async fn classify_debug(
        &self,
        subject: &str,
        description: &str,
    ) -> (ClassificationResult, DebugInfo) {
        let ticket = Ticket::new(subject, description);
        if ticket.is_empty() {
            tracing::warn!("Empty ticket text provided");
            return (ClassificationResult::unknown(), DebugInfo::default());
        }

        match AssertUnwindSafe(self.run(&ticket)).catch_unwind().await {
            Ok(Ok((results, info))) => {
                let top = results.top();
                tracing::info!(
                    intent = %top.intent,
                    probability = top.probability,
                    candidates = results.len(),
                    used_fallback = info.used_fallback,
                    "Classified ticket"
                );
                (results, info)
            }
            Ok(Err(e)) => {
                tracing::error!(error = %e, "Error classifying ticket intent");
                (ClassificationResult::classification_error(), DebugInfo::default())
            }
            Err(panic) => {
                tracing::error!(
                    panic = %panic_message(panic.as_ref()),
                    "Ticket intent classification panicked"
                );
                (ClassificationResult::classification_error(), DebugInfo::default())
            }
        }
    }

    /// The exposed contract: plain results, or results with debug information
    pub async fn classify_ticket(
        &self,
        subject: &str,
        description: &str,
        debug: bool,
    ) -> ClassifyResponse {
        if debug {
            let (results, debug) = self.classify_debug(subject, description).await;
            ClassifyResponse::Debug { results, debug }
        } else {
            ClassifyResponse::Results(self.classify(subject, description).await)
        }
    }

    async fn run(&self, ticket: &Ticket) -> ticket_intent_core::Result<(ClassificationResult, DebugInfo)> {
        let classifier_text = classifier_input(ticket);

        let (outcome, (context, rules)) = tokio::join!(self.call_classifier(&classifier_text), async {
            let context = self.analyzer.analyze(ticket);
            let rules = self.scorer.score(&context);
            (context, rules)
        });

        let mut debug = DebugInfo {
            entities: context.entities.clone(),
            urgency: context.urgency,
            sentiment: context.sentiment,
            quality: context.quality.score,
            consistency: context.consistency,
            ..Default::default()
        };
        record_rules(&mut debug, &rules);

        let predictions = match outcome {
            Ok(predictions) => Some(predictions),
            Err(ClassifierError::Unavailable(reason)) => {
                tracing::debug!(reason = %reason, "Classifier unavailable, using rule-only fallback");
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "Classifier failed, using rule-only fallback");
                None
            }
        };

        let scores = match predictions {
            Some(predictions) => self.primary(&context, &rules, &predictions, &mut debug),
            None => {
                debug.used_fallback = true;
                self.fallback(&context)
            }
        };

        Ok((finalize(scores)?, debug))
    }

    /// Fuse, threshold, consolidate, normalize; falls back when nothing survives
    fn primary(
        &self,
        context: &TicketContext,
        rules: &RuleScores,
        predictions: &[LabelScore],
        debug: &mut DebugInfo,
    ) -> Vec<EnsembleScore> {
        let ml = self.mapper.scores(predictions);
        for (intent, score) in &ml {
            debug.scores.entry(intent.clone()).or_default().ml = Some(*score);
        }

        let fused = self.ensemble.combine(rules, &ml, context);
        for score in &fused {
            debug.scores.entry(score.intent.clone()).or_default().ensemble = Some(score.probability);
        }

        let threshold = self.thresholds.for_quality(context.quality.score);
        let candidates: Vec<EnsembleScore> = fused
            .into_iter()
            .filter(|s| s.probability >= threshold)
            .collect();

        if candidates.is_empty() {
            tracing::debug!(threshold, "No candidate passed the threshold, using fallback");
            debug.used_fallback = true;
            return self.fallback(context);
        }

        self.normalizer
            .normalize(self.consolidator.consolidate(candidates))
    }

    /// Keyword-only scoring with a fixed threshold and a default intent
    fn fallback(&self, context: &TicketContext) -> Vec<EnsembleScore> {
        let candidates: Vec<EnsembleScore> = self
            .scorer
            .keyword_scores(&context.text)
            .into_iter()
            .filter(|(_, score)| *score >= self.thresholds.fallback)
            .map(|(intent, score)| EnsembleScore::new(intent, score))
            .collect();

        if candidates.is_empty() {
            return vec![EnsembleScore::new(
                IntentLabel::GeneralInquiry,
                self.thresholds.fallback_default_confidence,
            )];
        }

        self.normalizer
            .normalize(self.consolidator.consolidate(candidates))
    }

    async fn call_classifier(&self, text: &str) -> std::result::Result<Vec<LabelScore>, ClassifierError> {
        let Some(classifier) = &self.classifier else {
            return Err(ClassifierError::unavailable("no classifier configured"));
        };
        if !classifier.is_available() {
            return Err(ClassifierError::unavailable(format!(
                "{} is not ready",
                classifier.name()
            )));
        }

        let call = AssertUnwindSafe(classifier.classify(text)).catch_unwind();
        match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(result)) => result,
            Ok(Err(panic)) => Err(ClassifierError::invocation(format!(
                "{} panicked: {}",
                classifier.name(),
                panic_message(panic.as_ref())
            ))),
            Err(_elapsed) => Err(ClassifierError::Timeout(self.timeout.as_millis() as u64)),
        }
    }
}

/// Text sent to the external classifier: `"{subject}. {description}"`
fn classifier_input(ticket: &Ticket) -> String {
    format!("{}. {}", ticket.subject(), ticket.description())
        .trim()
        .to_string()
}

fn record_rules(debug: &mut DebugInfo, rules: &RuleScores) {
    for (intent, score) in &rules.intents {
        let entry = debug.scores.entry(intent.clone()).or_default();
        entry.keyword = score.keyword;
        entry.phrase = score.phrase;
        entry.semantic = score.semantic;
        entry.enhanced = score.enhanced;

        if !score.matched_patterns.is_empty() {
            debug
                .pattern_matches
                .insert(intent.clone(), score.matched_patterns.clone());
        }
    }
    for (intent, score) in &rules.multi_intent {
        debug.scores.entry(intent.clone()).or_default().multi_intent = Some(*score);
    }
}

fn finalize(scores: Vec<EnsembleScore>) -> ticket_intent_core::Result<ClassificationResult> {
    if let Some(bad) = scores.iter().find(|s| !s.probability.is_finite()) {
        return Err(Error::Scoring(format!(
            "non-finite probability for {}",
            bad.intent
        )));
    }
    ClassificationResult::from_scores(scores)
        .ok_or_else(|| Error::Scoring("no candidate intents".to_string()))
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classifier_input() {
        assert_eq!(
            classifier_input(&Ticket::new("Refund", "Item broken")),
            "Refund. Item broken"
        );
        assert_eq!(classifier_input(&Ticket::new("", "Item broken")), ". Item broken");
    }

    #[test]
    fn test_finalize_rejects_empty_and_non_finite() {
        assert!(finalize(vec![]).is_err());
        assert!(finalize(vec![EnsembleScore::new(IntentLabel::Feedback, f32::NAN)]).is_err());

        let result = finalize(vec![
            EnsembleScore::new(IntentLabel::Feedback, 0.2),
            EnsembleScore::new(IntentLabel::ComplaintIssue, 0.8),
        ])
        .unwrap();
        assert_eq!(result.top().intent, IntentLabel::ComplaintIssue);
    }

    #[test]
    fn test_panic_message() {
        let boxed: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(boxed.as_ref()), "boom");
        let boxed: Box<dyn Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(boxed.as_ref()), "bang");
        let boxed: Box<dyn Any + Send> = Box::new(42u8);
        assert_eq!(panic_message(boxed.as_ref()), "unknown panic");
    }

    #[tokio::test]
    async fn test_default_is_rule_only() {
        let orchestrator = Orchestrator::default();
        assert!(!orchestrator.has_classifier());
        let (_, debug) = orchestrator.classify_debug("", "my app keeps crashing").await;
        assert!(debug.used_fallback);
    }
}
