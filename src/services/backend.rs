// Verification Backend Client
// Calls the authoritative binary classification endpoint and normalizes
// its response into a ClassificationResult.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Map, Value};
use std::time::{Duration, Instant};
use tracing::debug;
use uuid::Uuid;

use crate::models::{
    BinaryVerificationRequest, ClassificationResult, ClassificationSource, DecisionFactors,
    DocumentInput, Feature, FeatureVector, Verdict, NEUTRAL_FEATURE_VALUE,
};
use crate::services::config_store::BackendConfig;
use crate::services::verification::{Classifier, ClassifierError};

pub const VERIFY_BINARY_PATH: &str = "/documents/verify-binary";
pub const BACKEND_MODEL_VERSION: &str = "Backend Binary Classification v1.0";
const BACKEND_DEFAULT_EXPLANATION: &str = "Binary classification completed via backend API";

pub struct BackendClassifier {
    client: Client,
    endpoint: String,
}

impl BackendClassifier {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();

        Self {
            client,
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), VERIFY_BINARY_PATH),
        }
    }

    pub fn from_config(config: &BackendConfig) -> Self {
        Self::new(&config.base_url, config.timeout())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Classifier for BackendClassifier {
    async fn classify(&self, input: &DocumentInput) -> Result<ClassificationResult, ClassifierError> {
        let request = BinaryVerificationRequest {
            text: &input.text,
            document_type: input.document_type.as_str(),
            classification_type: "binary",
        };

        let start = Instant::now();

        let response = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        let latency = start.elapsed();
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClassifierError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let data: Value = response
            .json()
            .await
            .map_err(|e| ClassifierError::MalformedPayload(e.to_string()))?;

        debug!(latency_ms = latency.as_millis() as u64, "backend.response_received");
        normalize_response(&data, latency)
    }

    fn name(&self) -> &str {
        "backend"
    }
}

/// Map a backend payload onto the result shape, accepting both the
/// `verification_result`/`confidence_score`/`decision_factors` and the
/// `is_authentic`/`confidence`/`features` naming.
pub fn normalize_response(data: &Value, latency: Duration) -> Result<ClassificationResult, ClassifierError> {
    let obj = data
        .as_object()
        .ok_or_else(|| ClassifierError::MalformedPayload("response is not a JSON object".to_string()))?;

    if obj.get("success").and_then(Value::as_bool) == Some(false) {
        let message = obj
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or("backend reported an unsuccessful classification");
        return Err(ClassifierError::ServiceFailure(message.to_string()));
    }

    let verdict = parse_verdict(obj)?;
    let confidence = parse_confidence(obj)?;

    let factors = obj
        .get("decision_factors")
        .or_else(|| obj.get("features"))
        .and_then(Value::as_object)
        .map(parse_decision_factors)
        .unwrap_or_default();

    Ok(ClassificationResult {
        verification_result: verdict,
        is_authentic: verdict.is_authentic(),
        confidence_score: confidence,
        decision_factors: factors,
        explanation: string_field(obj, "explanation")
            .unwrap_or_else(|| BACKEND_DEFAULT_EXPLANATION.to_string()),
        processing_time: string_field(obj, "processing_time")
            .unwrap_or_else(|| format!("{:.3}s", latency.as_secs_f64())),
        model_version: string_field(obj, "model_version")
            .unwrap_or_else(|| BACKEND_MODEL_VERSION.to_string()),
        source: ClassificationSource::Backend,
        verification_id: Uuid::new_v4(),
        timestamp: string_field(obj, "timestamp").unwrap_or_else(|| chrono::Utc::now().to_rfc3339()),
    })
}

fn parse_verdict(obj: &Map<String, Value>) -> Result<Verdict, ClassifierError> {
    if let Some(v) = obj.get("verification_result").filter(|v| !v.is_null()) {
        return match v {
            Value::Bool(b) => Ok(if *b { Verdict::Authentic } else { Verdict::Fake }),
            Value::Number(n) => match n.as_f64() {
                Some(v) if v == 0.0 => Ok(Verdict::Fake),
                Some(v) if v == 1.0 => Ok(Verdict::Authentic),
                _ => Err(ClassifierError::MalformedPayload(format!(
                    "verification_result must be 0 or 1, got {}",
                    n
                ))),
            },
            other => Err(ClassifierError::MalformedPayload(format!(
                "verification_result has unexpected value {}",
                other
            ))),
        };
    }

    match obj.get("is_authentic") {
        Some(Value::Bool(true)) => Ok(Verdict::Authentic),
        Some(Value::Bool(false)) => Ok(Verdict::Fake),
        Some(other) => Err(ClassifierError::MalformedPayload(format!(
            "is_authentic has unexpected value {}",
            other
        ))),
        None => Err(ClassifierError::MalformedPayload(
            "missing verification_result / is_authentic".to_string(),
        )),
    }
}

fn parse_confidence(obj: &Map<String, Value>) -> Result<f64, ClassifierError> {
    let raw = obj
        .get("confidence_score")
        .filter(|v| !v.is_null())
        .or_else(|| obj.get("confidence").filter(|v| !v.is_null()));

    let Some(raw) = raw else {
        return Ok(NEUTRAL_FEATURE_VALUE);
    };

    match raw.as_f64() {
        Some(c) if c.is_finite() && (0.0..=1.0).contains(&c) => Ok(c),
        _ => Err(ClassifierError::MalformedPayload(format!(
            "confidence must be a number in [0, 1], got {}",
            raw
        ))),
    }
}

fn parse_decision_factors(map: &Map<String, Value>) -> DecisionFactors {
    let mut features = FeatureVector::new();
    for feature in Feature::ALL {
        if let Some(value) = map.get(feature.name()).and_then(Value::as_f64) {
            features.set(feature, value);
        }
    }

    DecisionFactors {
        features,
        authentic_indicators: string_list(map, &["authentic_indicators", "authenticIndicators"]),
        suspicious_indicators: string_list(map, &["suspicious_indicators", "suspiciousIndicators"]),
    }
}

fn string_list(map: &Map<String, Value>, keys: &[&str]) -> Vec<String> {
    keys.iter()
        .find_map(|k| map.get(*k).and_then(Value::as_array))
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn string_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
