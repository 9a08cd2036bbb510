//! External text classifier interface

use crate::error::ClassifierError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One label/score pair reported by a classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelScore {
    pub label: String,
    pub score: f32,
}

impl LabelScore {
    pub fn new(label: impl Into<String>, score: f32) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

/// Raw classifier output as it arrives on the wire
///
/// Text-classification pipelines return either a flat list or a list
/// nested one level (one inner list per input string).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawPredictions {
    Flat(Vec<LabelScore>),
    Nested(Vec<Vec<LabelScore>>),
}

impl RawPredictions {
    pub fn flatten(self) -> Vec<LabelScore> {
        match self {
            Self::Flat(scores) => scores,
            Self::Nested(groups) => groups.into_iter().flatten().collect(),
        }
    }
}

/// Statistical text classifier
///
/// Implementations:
/// - `HttpTextClassifier` - remote text-classification service
///
/// The orchestrator treats any error, and any call exceeding its deadline,
/// as a signal to fall back to rule-only classification.
///
/// # Example
///
/// ```ignore
/// let classifier: Arc<dyn TextClassifier> = Arc::new(HttpTextClassifier::new(config)?);
/// let scores = classifier.classify("my order never arrived").await?;
/// ```
#[async_trait]
pub trait TextClassifier: Send + Sync + 'static {
    /// Score `text` against every label the model knows
    async fn classify(&self, text: &str) -> Result<Vec<LabelScore>, ClassifierError>;

    /// Model identifier for logging
    fn name(&self) -> &str;

    /// Whether the classifier finished initialization
    fn is_available(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_predictions() {
        let raw: RawPredictions =
            serde_json::from_str(r#"[{"label": "get_refund", "score": 0.8}]"#).unwrap();
        let flat = raw.flatten();
        assert_eq!(flat, vec![LabelScore::new("get_refund", 0.8)]);
    }

    #[test]
    fn test_nested_predictions_are_flattened() {
        let raw: RawPredictions = serde_json::from_str(
            r#"[[{"label": "POSITIVE", "score": 0.1}, {"label": "NEGATIVE", "score": 0.9}]]"#,
        )
        .unwrap();
        let flat = raw.flatten();
        assert_eq!(flat.len(), 2);
        assert_eq!(flat[1].label, "NEGATIVE");
    }

    struct FixedClassifier;

    #[async_trait]
    impl TextClassifier for FixedClassifier {
        async fn classify(&self, _text: &str) -> Result<Vec<LabelScore>, ClassifierError> {
            Ok(vec![LabelScore::new("complaint", 0.6)])
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    #[tokio::test]
    async fn test_trait_object_dispatch() {
        let classifier: Box<dyn TextClassifier> = Box::new(FixedClassifier);
        let scores = classifier.classify("anything").await.unwrap();
        assert_eq!(scores[0].label, "complaint");
        assert!(classifier.is_available());
    }
}
