// Verification Module
// Binary document-authenticity classification organized into submodules:
// - signals: pattern detections over raw text
// - features: heuristic feature scoring with injectable noise
// - aggregation: weighted sum, logistic transform, threshold decision
// - indicators: explanatory strings, explanation and report text
// - heuristic: local fallback classifier
// - resilient: backend-first verifier with transparent fallback

pub mod aggregation;
pub mod features;
pub mod heuristic;
pub mod indicators;
pub mod noise;
pub mod resilient;
pub mod signals;

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

use crate::models::{ClassificationResult, DocumentInput};

#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },
    #[error("Service reported failure: {0}")]
    ServiceFailure(String),
    #[error("Malformed response payload: {0}")]
    MalformedPayload(String),
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
}

/// A source of authenticity verdicts.
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, input: &DocumentInput) -> Result<ClassificationResult, ClassifierError>;

    fn name(&self) -> &str;
}

pub use aggregation::{decide, logistic_input, score_features, sigmoid, weighted_sum, ScoreOutcome};
pub use features::{apply_suspicious_penalty, extract_features, FeatureAnalysis};
pub use heuristic::HeuristicClassifier;
pub use indicators::{build_indicators, render_report, Indicators};
pub use noise::{FixedNoise, NoiseMode, NoiseSource, RandomNoise};
pub use resilient::DocumentVerifier;
pub use signals::TextSignals;
