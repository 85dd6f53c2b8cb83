// Aggregation Logic
// Weighted feature sum, logistic calibration and the binary decision

use crate::models::{Feature, FeatureVector, Verdict};
use crate::services::config_store::{FeatureWeights, ScoringConfig};

/// Weighted sum that maps to probability 0.5.
const LOGISTIC_CENTER: f64 = 0.5;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ScoreOutcome {
    pub weighted_sum: f64,
    pub logistic_input: f64,
    pub probability: f64,
    pub verdict: Verdict,
}

/// Σ feature × weight. Missing features count as 0.5.
pub fn weighted_sum(features: &FeatureVector, weights: &FeatureWeights) -> f64 {
    Feature::ALL
        .iter()
        .map(|&f| features.value_or_neutral(f) * weights.weight(f))
        .sum()
}

pub fn logistic_input(weighted_sum: f64, scale: f64) -> f64 {
    (weighted_sum - LOGISTIC_CENTER) * scale
}

pub fn sigmoid(x: f64) -> f64 {
    if x.is_nan() {
        return 0.5;
    }
    1.0 / (1.0 + (-x).exp())
}

/// Probabilities at or above the threshold are authentic.
pub fn decide(probability: f64, threshold: f64) -> Verdict {
    if probability >= threshold {
        Verdict::Authentic
    } else {
        Verdict::Fake
    }
}

pub fn score_features(features: &FeatureVector, config: &ScoringConfig) -> ScoreOutcome {
    let weighted_sum = weighted_sum(features, &config.weights);
    let logistic_input = logistic_input(weighted_sum, config.logistic_scale);
    let probability = sigmoid(logistic_input);
    ScoreOutcome {
        weighted_sum,
        logistic_input,
        probability,
        verdict: decide(probability, config.threshold),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform(value: f64) -> FeatureVector {
        let mut v = FeatureVector::new();
        for f in Feature::ALL {
            v.set(f, value);
        }
        v
    }

    fn vector(values: [f64; 5]) -> FeatureVector {
        let mut v = FeatureVector::new();
        for (f, val) in Feature::ALL.iter().zip(values) {
            v.set(*f, val);
        }
        v
    }

    #[test]
    fn test_center_maps_to_half() {
        assert_eq!(logistic_input(0.5, 6.0), 0.0);
        assert_eq!(sigmoid(logistic_input(0.5, 6.0)), 0.5);
        assert_eq!(decide(0.5, 0.5), Verdict::Authentic);
        assert_eq!(decide(0.4999999, 0.5), Verdict::Fake);
    }

    #[test]
    fn test_sigmoid_calibration() {
        let p = |s: f64| sigmoid(logistic_input(s, 6.0));
        assert!((0.18..=0.22).contains(&p(0.25)));
        assert!((0.78..=0.82).contains(&p(0.75)));
        assert!((0.90..=0.94).contains(&p(0.90)));
        assert!(p(0.1) < 0.1);
        assert!(p(0.95) > 0.93);
    }

    #[test]
    fn test_all_half_features_are_authentic() {
        let outcome = score_features(&uniform(0.5), &ScoringConfig::default());
        assert_eq!(outcome.weighted_sum, 0.5);
        assert_eq!(outcome.probability, 0.5);
        assert_eq!(outcome.verdict, Verdict::Authentic);
    }

    #[test]
    fn test_missing_features_default_to_neutral() {
        let empty = FeatureVector::new();
        assert_eq!(weighted_sum(&empty, &FeatureWeights::default()), 0.5);

        let mut partial = FeatureVector::new();
        partial.set(Feature::OfficialTerminology, f64::NAN);
        partial.set(Feature::LanguagePatterns, 1.0);
        let sum = weighted_sum(&partial, &FeatureWeights::default());
        assert!((sum - 0.625).abs() < 1e-12);
        assert!(sigmoid(logistic_input(sum, 6.0)).is_finite());
    }

    #[test]
    fn test_weighted_sum_stays_in_unit_range() {
        let weights = FeatureWeights::default();
        let steps = [0.0, 0.1, 0.35, 0.5, 0.8, 1.0];
        for a in steps {
            for b in steps {
                let v = vector([a, b, 1.0 - a, b, a]);
                let s = weighted_sum(&v, &weights);
                assert!((0.0..=1.0 + 1e-12).contains(&s), "sum {}", s);
            }
        }
        assert_eq!(weighted_sum(&uniform(0.0), &weights), 0.0);
        assert!((weighted_sum(&uniform(1.0), &weights) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_reference_vectors() {
        let config = ScoringConfig::default();

        let strong = score_features(&vector([0.95, 0.90, 0.95, 0.88, 0.92]), &config);
        assert_eq!(strong.verdict, Verdict::Authentic);
        assert!((0.85..=0.98).contains(&strong.probability));

        let weak_fake = score_features(&vector([0.15, 0.25, 0.10, 0.20, 0.30]), &config);
        assert_eq!(weak_fake.verdict, Verdict::Fake);
        assert!((0.05..=0.25).contains(&weak_fake.probability));

        let borderline = score_features(&vector([0.65, 0.60, 0.70, 0.55, 0.62]), &config);
        assert_eq!(borderline.verdict, Verdict::Authentic);
        assert!((0.50..=0.70).contains(&borderline.probability));

        let below = score_features(&vector([0.45, 0.50, 0.40, 0.48, 0.52]), &config);
        assert_eq!(below.verdict, Verdict::Fake);
        assert!((0.30..=0.50).contains(&below.probability));

        // A single dominant feature is not enough.
        let lopsided = score_features(&vector([0.95, 0.30, 0.30, 0.30, 0.30]), &config);
        assert_eq!(lopsided.verdict, Verdict::Fake);
    }

    #[test]
    fn test_deterministic_for_identical_vectors() {
        let config = ScoringConfig::default();
        let v = vector([0.61, 0.42, 0.77, 0.3, 0.58]);
        assert_eq!(score_features(&v, &config), score_features(&v.clone(), &config));
    }

    #[test]
    fn test_alternative_weights() {
        let config = ScoringConfig {
            weights: FeatureWeights {
                language_patterns: 0.0,
                formatting_consistency: 0.0,
                official_terminology: 1.0,
                metadata_analysis: 0.0,
                structure_validation: 0.0,
            },
            ..ScoringConfig::default()
        };
        let v = vector([0.1, 0.1, 0.9, 0.1, 0.1]);
        let outcome = score_features(&v, &config);
        assert!((outcome.weighted_sum - 0.9).abs() < 1e-12);
        assert_eq!(outcome.verdict, Verdict::Authentic);
    }
}
