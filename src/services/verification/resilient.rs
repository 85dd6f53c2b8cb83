// Resilient Verification
// Backend-first verification with transparent local fallback.
// - Primary: the authoritative backend classifier, bounded by a timeout
// - Fallback: the local heuristic classifier, total over all inputs

use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

use crate::models::{ClassificationResult, DocumentInput, InputError};
use crate::services::backend::BackendClassifier;
use crate::services::config_store::AppConfig;
use super::heuristic::HeuristicClassifier;
use super::{Classifier, ClassifierError};

pub struct DocumentVerifier {
    primary: Option<Arc<dyn Classifier>>,
    fallback: HeuristicClassifier,
    timeout: Duration,
}

impl DocumentVerifier {
    pub fn new(primary: Arc<dyn Classifier>, fallback: HeuristicClassifier, timeout: Duration) -> Self {
        Self {
            primary: Some(primary),
            fallback,
            timeout,
        }
    }

    /// Verifier that never contacts a backend.
    pub fn offline(fallback: HeuristicClassifier) -> Self {
        Self {
            primary: None,
            fallback,
            timeout: Duration::ZERO,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        let fallback = HeuristicClassifier::new(config.scoring.clone());
        if !config.backend.enabled {
            info!("[VERIFIER] Backend disabled, using local heuristic analysis only");
            return Self::offline(fallback);
        }
        let backend = BackendClassifier::from_config(&config.backend);
        info!(endpoint = backend.endpoint(), "[VERIFIER] Backend classifier configured");
        Self::new(Arc::new(backend), fallback, config.backend.timeout())
    }

    pub fn is_offline(&self) -> bool {
        self.primary.is_none()
    }

    /// Verify a document. Never fails: backend errors fall back to local scoring.
    pub async fn verify(&self, text: &str, document_type: &str) -> ClassificationResult {
        self.verify_input(&DocumentInput::new(text, document_type)).await
    }

    /// Verify a loosely typed JSON request body, rejecting malformed input.
    pub async fn verify_request(&self, body: &serde_json::Value) -> Result<ClassificationResult, InputError> {
        let input = DocumentInput::from_json(body)?;
        Ok(self.verify_input(&input).await)
    }

    pub async fn verify_input(&self, input: &DocumentInput) -> ClassificationResult {
        let start = Instant::now();

        if let Some(primary) = &self.primary {
            match self.call_primary(primary.as_ref(), input).await {
                Ok(result) => {
                    info!(
                        id = %result.verification_id,
                        verdict = u8::from(result.verification_result),
                        confidence = result.confidence_score,
                        elapsed_ms = start.elapsed().as_millis() as u64,
                        "[VERIFIER] Backend classification completed"
                    );
                    return result;
                }
                Err(e) => {
                    warn!(
                        classifier = primary.name(),
                        "[VERIFIER] Backend verification failed, using fallback: {}",
                        e
                    );
                }
            }
        }

        let result = self.fallback.score(input);
        info!(
            id = %result.verification_id,
            verdict = u8::from(result.verification_result),
            confidence = result.confidence_score,
            chars = input.text.chars().count(),
            "[VERIFIER] Fallback classification completed"
        );
        result
    }

    async fn call_primary(
        &self,
        primary: &dyn Classifier,
        input: &DocumentInput,
    ) -> Result<ClassificationResult, ClassifierError> {
        match tokio::time::timeout(self.timeout, primary.classify(input)).await {
            Ok(result) => result,
            Err(_) => Err(ClassifierError::Timeout(self.timeout)),
        }
    }
}
