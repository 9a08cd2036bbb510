//! Remote text-classification service
//!
//! POSTs `{"text": ...}` to the configured endpoint and expects the raw
//! pipeline output: `[{label, score}]` or `[[{label, score}]]`.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use ticket_intent_config::ClassifierSettings;
use ticket_intent_core::{ClassifierError, LabelScore, RawPredictions, TextClassifier};

/// Request body of the classification endpoint
#[derive(Debug, Serialize)]
struct ClassifyRequest<'a> {
    text: &'a str,
}

/// HTTP text classifier
pub struct HttpTextClassifier {
    client: Client,
    endpoint: String,
    model: String,
}

impl HttpTextClassifier {
    /// Build a client for the configured endpoint
    ///
    /// The request timeout mirrors the orchestrator deadline.
    pub fn new(settings: &ClassifierSettings) -> Result<Self, ClassifierError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(settings.timeout_ms))
            .build()
            .map_err(|e| ClassifierError::unavailable(format!("HTTP client init failed: {}", e)))?;

        Ok(Self {
            client,
            endpoint: settings.endpoint.clone(),
            model: settings.model.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl TextClassifier for HttpTextClassifier {
    async fn classify(&self, text: &str) -> Result<Vec<LabelScore>, ClassifierError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&ClassifyRequest { text })
            .send()
            .await
            .map_err(|e| ClassifierError::invocation(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ClassifierError::invocation(format!(
                "Classifier returned {} - {}",
                status, body
            )));
        }

        let raw: RawPredictions = response
            .json()
            .await
            .map_err(|e| ClassifierError::MalformedResponse(e.to_string()))?;

        Ok(raw.flatten())
    }

    fn name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body() {
        let body = serde_json::to_value(ClassifyRequest { text: "hello" }).unwrap();
        assert_eq!(body, serde_json::json!({"text": "hello"}));
    }

    #[test]
    fn test_client_from_settings() {
        let settings = ClassifierSettings::default();
        let classifier = HttpTextClassifier::new(&settings).unwrap();
        assert_eq!(classifier.endpoint(), settings.endpoint);
        assert_eq!(classifier.name(), "customer-support-intent");
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_invocation_error() {
        let settings = ClassifierSettings {
            endpoint: "http://127.0.0.1:9/classify".to_string(),
            timeout_ms: 200,
            ..Default::default()
        };
        let classifier = HttpTextClassifier::new(&settings).unwrap();
        let err = classifier.classify("anything").await.unwrap_err();
        assert!(matches!(err, ClassifierError::Invocation(_)));
    }
}
