// Heuristic Classifier
// Local scorer used when the verification backend is unavailable.

use async_trait::async_trait;
use std::time::Instant;
use tracing::debug;
use uuid::Uuid;

use crate::models::{
    ClassificationResult, ClassificationSource, DecisionFactors, DocumentInput,
};
use crate::services::config_store::ScoringConfig;
use super::aggregation::score_features;
use super::features::extract_features;
use super::indicators::{build_indicators, fallback_explanation};
use super::noise::NoiseSource;
use super::{Classifier, ClassifierError};

pub const FALLBACK_MODEL_VERSION: &str = "Local Heuristic Fallback v1.0";

#[derive(Debug, Clone, Default)]
pub struct HeuristicClassifier {
    config: ScoringConfig,
}

impl HeuristicClassifier {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// Score with a fresh noise source built from the configured mode.
    pub fn score(&self, input: &DocumentInput) -> ClassificationResult {
        let mut noise = self.config.noise.source();
        self.score_with(input, noise.as_mut())
    }

    pub fn score_with(&self, input: &DocumentInput, noise: &mut dyn NoiseSource) -> ClassificationResult {
        let start = Instant::now();

        let analysis = extract_features(&input.text, noise);
        let outcome = score_features(&analysis.features, &self.config);
        let indicators = build_indicators(&analysis.signals, &input.document_type);

        debug!(
            weighted_sum = outcome.weighted_sum,
            probability = outcome.probability,
            "verification.heuristic_scored"
        );

        ClassificationResult {
            verification_result: outcome.verdict,
            is_authentic: outcome.verdict.is_authentic(),
            confidence_score: outcome.probability,
            decision_factors: DecisionFactors {
                features: analysis.features,
                authentic_indicators: indicators.authentic,
                suspicious_indicators: indicators.suspicious,
            },
            explanation: fallback_explanation(outcome.verdict, outcome.probability),
            processing_time: format!("{:.3}s", start.elapsed().as_secs_f64()),
            model_version: FALLBACK_MODEL_VERSION.to_string(),
            source: ClassificationSource::Fallback,
            verification_id: Uuid::new_v4(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[async_trait]
impl Classifier for HeuristicClassifier {
    async fn classify(&self, input: &DocumentInput) -> Result<ClassificationResult, ClassifierError> {
        Ok(self.score(input))
    }

    fn name(&self) -> &str {
        "heuristic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Feature, Verdict};
    use crate::services::verification::indicators::{
        MISSING_NUMBERS, OFFICIAL_TERMINOLOGY, SUSPICIOUS_LANGUAGE, TOO_BRIEF,
    };
    use crate::services::verification::noise::{FixedNoise, NoiseMode};

    const MINISTRY_NOTICE: &str = "GOVERNMENT OF INDIA\nMINISTRY OF FINANCE\nDepartment of Economic Affairs\nBudget Division\nOffice Memorandum No. F.2(14)-B(D)/2024 dated 15/01/2024.\nSubject: Preparation of the Union Budget 2024-2025.\nReference: This Ministry's circular of 2 January 2024.\nSection 1. All Ministries and Departments are requested to submit their revised estimates by 2024-02-10.\nSection 2. The estimates shall follow the prescribed formats in the annexure.\nYours sincerely,\nDeputy Secretary (Budget)";

    const INFORMAL_MESSAGE: &str = "hey everyone! free money lol 😂 ... whatsapp: 9876543210";

    /// Draws spanning the full noise range, including both extremes.
    const DRAWS: [f64; 5] = [0.0, 0.25, 0.5, 0.75, 1.0];

    fn classifier() -> HeuristicClassifier {
        HeuristicClassifier::default()
    }

    #[test]
    fn test_official_notice_is_authentic() {
        let input = DocumentInput::new(MINISTRY_NOTICE, "budget_document");
        for draw in DRAWS {
            let result = classifier().score_with(&input, &mut FixedNoise(draw));
            assert_eq!(result.verification_result, Verdict::Authentic, "draw {}", draw);
            assert!(result.confidence_score >= 0.8, "draw {} -> {}", draw, result.confidence_score);
            assert!(result.is_authentic);
        }

        let result = classifier().score_with(&input, &mut FixedNoise(0.5));
        let factors = &result.decision_factors;
        assert_eq!(factors.authentic_indicators.len(), 4);
        assert!(factors.authentic_indicators.iter().any(|i| i == OFFICIAL_TERMINOLOGY));
        assert!(factors.suspicious_indicators.is_empty());
    }

    #[test]
    fn test_informal_message_is_fake() {
        let input = DocumentInput::new(INFORMAL_MESSAGE, "government_announcement");
        for draw in DRAWS {
            let result = classifier().score_with(&input, &mut FixedNoise(draw));
            assert_eq!(result.verification_result, Verdict::Fake, "draw {}", draw);
            assert!(result.confidence_score <= 0.25, "draw {} -> {}", draw, result.confidence_score);
        }

        let result = classifier().score_with(&input, &mut FixedNoise(0.5));
        assert!(result.decision_factors.authentic_indicators.is_empty());
        assert_eq!(result.decision_factors.suspicious_indicators, vec![SUSPICIOUS_LANGUAGE]);
    }

    #[test]
    fn test_empty_text_is_fake_with_low_confidence() {
        let input = DocumentInput::new("", "government_document");
        let result = classifier().score(&input);
        assert_eq!(result.verification_result, Verdict::Fake);
        assert!(result.confidence_score < 0.3);
        assert!(result.confidence_score.is_finite());
        assert_eq!(
            result.decision_factors.suspicious_indicators,
            vec![TOO_BRIEF, MISSING_NUMBERS]
        );
    }

    #[test]
    fn test_fallback_tagging() {
        let result = classifier().score(&DocumentInput::new("Some text", "policy_statement"));
        assert!(result.is_fallback());
        assert_eq!(result.model_version, FALLBACK_MODEL_VERSION);
        assert!(result.explanation.contains("Backend API unavailable"));
    }

    #[test]
    fn test_seeded_mode_is_reproducible() {
        let config = ScoringConfig {
            noise: NoiseMode::Seeded { seed: 11 },
            ..ScoringConfig::default()
        };
        let c = HeuristicClassifier::new(config);
        let input = DocumentInput::new(MINISTRY_NOTICE, "budget_document");
        let a = c.score(&input);
        let b = c.score(&input);
        assert_eq!(a.confidence_score, b.confidence_score);
        assert_eq!(a.decision_factors.features, b.decision_factors.features);
        assert_ne!(a.verification_id, b.verification_id);
    }

    #[test]
    fn test_large_input_is_handled() {
        let big = "Department circular section 12/03/2024. ".repeat(50_000);
        let result = classifier().score(&DocumentInput::new(big, "government_document"));
        assert!(result.confidence_score.is_finite());
        assert_eq!(result.decision_factors.features.len(), Feature::ALL.len());
    }

    #[tokio::test]
    async fn test_classifier_trait_never_fails() {
        let c = classifier();
        let result = c.classify(&DocumentInput::new("\u{0}\u{FFFD}", "x")).await.unwrap();
        assert!(result.is_fallback());
        assert_eq!(c.name(), "heuristic");
    }
}
