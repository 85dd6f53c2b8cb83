// Feature Extraction
// Derives the five heuristic feature scores from raw document text.

use crate::models::{Feature, FeatureVector};
use super::noise::NoiseSource;
use super::signals::TextSignals;
use tracing::debug;

/// Lowest value any feature can be pushed to by the suspicious-pattern penalty.
pub const FEATURE_FLOOR: f64 = 0.1;
pub const SUSPICIOUS_PENALTY: f64 = 0.3;

/// Feature scores together with the signals they were derived from.
#[derive(Debug, Clone)]
pub struct FeatureAnalysis {
    pub signals: TextSignals,
    pub features: FeatureVector,
}

/// Score a document. Total over all inputs.
pub fn extract_features(text: &str, noise: &mut dyn NoiseSource) -> FeatureAnalysis {
    let signals = TextSignals::detect(text);
    let features = score_signals(&signals, noise);
    debug!(
        chars = signals.char_len,
        suspicious = signals.has_suspicious_patterns,
        features = ?features,
        "verification.features"
    );
    FeatureAnalysis { signals, features }
}

/// Score from precomputed signals. Draw order: language, formatting,
/// terminology, metadata, structure.
pub fn score_signals(signals: &TextSignals, noise: &mut dyn NoiseSource) -> FeatureVector {
    let mut features = FeatureVector::new();

    if signals.is_blank {
        for feature in Feature::ALL {
            features.set(feature, FEATURE_FLOOR);
        }
        return features;
    }

    features.set(Feature::LanguagePatterns, language_score(signals, noise));
    features.set(Feature::FormattingConsistency, formatting_score(signals, noise));
    features.set(Feature::OfficialTerminology, terminology_score(signals, noise));
    features.set(Feature::MetadataAnalysis, metadata_score(signals, noise));
    features.set(Feature::StructureValidation, structure_score(signals, noise));

    if signals.has_suspicious_patterns {
        apply_suspicious_penalty(&mut features);
    }

    features
}

/// Lower every present feature by the suspicious penalty, never below the floor.
pub fn apply_suspicious_penalty(features: &mut FeatureVector) {
    for feature in Feature::ALL {
        if let Some(value) = features.get(feature) {
            features.set(feature, (value - SUSPICIOUS_PENALTY).max(FEATURE_FLOOR));
        }
    }
}

fn language_score(signals: &TextSignals, noise: &mut dyn NoiseSource) -> f64 {
    let mut score = 0.5;
    if signals.has_proper_capitalization {
        score += 0.2;
    }
    if signals.char_len > 100 {
        score += 0.1;
    }
    if !signals.has_excessive_whitespace {
        score += 0.1;
    }
    if signals.has_multiple_sentences() {
        score += 0.1;
    }
    (score + noise.jitter(0.05)).min(0.95)
}

fn formatting_score(signals: &TextSignals, noise: &mut dyn NoiseSource) -> f64 {
    let mut score = 0.4;
    if signals.has_structural_elements {
        score += 0.3;
    }
    if signals.char_len > 150 {
        score += 0.2;
    }
    (score + noise.jitter(0.075)).min(0.9)
}

fn terminology_score(signals: &TextSignals, noise: &mut dyn NoiseSource) -> f64 {
    let u = noise.next_unit();
    if signals.has_official_terms {
        0.70 + u * 0.25
    } else {
        0.20 + u * 0.30
    }
}

fn metadata_score(signals: &TextSignals, noise: &mut dyn NoiseSource) -> f64 {
    let mut score = 0.3;
    if signals.has_date {
        score += 0.3;
    }
    if signals.has_numbers {
        score += 0.2;
    }
    (score + noise.jitter(0.1)).min(0.85)
}

fn structure_score(signals: &TextSignals, noise: &mut dyn NoiseSource) -> f64 {
    let mut score = 0.4;
    if signals.has_structural_elements {
        score += 0.25;
    }
    if signals.char_len > 200 {
        score += 0.15;
    }
    if signals.char_len < 50 {
        score -= 0.2;
    }
    (score + noise.jitter(0.05)).clamp(0.1, 0.9)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::verification::noise::{FixedNoise, RandomNoise};

    const NOTICE: &str = "Government of Kerala, Department of Revenue.\nSubject: Revision of land tax rates.\nReference: Circular No. 14/2024 dated 12/03/2024.\nAll district offices shall apply the revised rates from 1 April 2024. Queries may be addressed to the office of the Secretary.";

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_neutral_noise_scores() {
        let analysis = extract_features(NOTICE, &mut FixedNoise(0.5));
        let f = &analysis.features;
        assert!(approx(f.get(Feature::LanguagePatterns).unwrap(), 0.95));
        assert!(approx(f.get(Feature::FormattingConsistency).unwrap(), 0.9));
        assert!(approx(f.get(Feature::OfficialTerminology).unwrap(), 0.825));
        assert!(approx(f.get(Feature::MetadataAnalysis).unwrap(), 0.8));
        assert!(approx(f.get(Feature::StructureValidation).unwrap(), 0.8));
    }

    #[test]
    fn test_caps_hold_under_max_noise() {
        let f = extract_features(NOTICE, &mut FixedNoise(1.0)).features;
        assert!(approx(f.get(Feature::LanguagePatterns).unwrap(), 0.95));
        assert!(approx(f.get(Feature::FormattingConsistency).unwrap(), 0.9));
        assert!(approx(f.get(Feature::MetadataAnalysis).unwrap(), 0.85));
        assert!(approx(f.get(Feature::StructureValidation).unwrap(), 0.85));
    }

    #[test]
    fn test_blank_text_floors_every_feature() {
        for text in ["", "   \n\t "] {
            let f = extract_features(text, &mut FixedNoise(1.0)).features;
            for feature in Feature::ALL {
                assert_eq!(f.get(feature), Some(FEATURE_FLOOR));
            }
        }
    }

    #[test]
    fn test_short_text_structure_penalty() {
        let f = extract_features("a note", &mut FixedNoise(0.0)).features;
        // 0.4 - 0.2 - 0.05
        assert!(approx(f.get(Feature::StructureValidation).unwrap(), 0.15));
        let f = extract_features("a note", &mut FixedNoise(0.5)).features;
        assert!(approx(f.get(Feature::StructureValidation).unwrap(), 0.2));
        assert!(approx(f.get(Feature::OfficialTerminology).unwrap(), 0.35));
    }

    #[test]
    fn test_suspicious_penalty_applied_to_every_feature() {
        let clean = "Government of Kerala, Department of Revenue.\nSubject: Revision of land tax rates.\nReference: Circular No. 14/2024 dated 12/03/2024.\nAll district offices shall apply the revised rates from 1 April 2024. Queries go to the office of the Secretary.";
        let flagged = "Government of Kerala, Department of Revenue.\nSubject: Revision of land tax rates.\nReference: Circular No. 14/2024 dated 12/03/2024.\nAll district offices shall apply the revised rates from 1 April 2024. Urgent queries go to the office of the Secretary.";

        for draw in [0.0, 0.3, 0.5, 0.9] {
            let base = extract_features(clean, &mut FixedNoise(draw)).features;
            let penalized = extract_features(flagged, &mut FixedNoise(draw)).features;
            for feature in Feature::ALL {
                let expected = (base.get(feature).unwrap() - SUSPICIOUS_PENALTY).max(FEATURE_FLOOR);
                assert!(
                    approx(penalized.get(feature).unwrap(), expected),
                    "{} at draw {}",
                    feature.name(),
                    draw
                );
            }
        }
    }

    #[test]
    fn test_penalty_floors_low_values() {
        let mut v = FeatureVector::new();
        v.set(Feature::LanguagePatterns, 0.9);
        v.set(Feature::MetadataAnalysis, 0.25);
        apply_suspicious_penalty(&mut v);
        assert!(approx(v.get(Feature::LanguagePatterns).unwrap(), 0.6));
        assert_eq!(v.get(Feature::MetadataAnalysis), Some(FEATURE_FLOOR));
        assert_eq!(v.get(Feature::OfficialTerminology), None);
    }

    #[test]
    fn test_features_stay_in_unit_range() {
        let samples = [
            "",
            "x",
            "URGENT!!! click here     now",
            NOTICE,
            "hey everyone! free money lol 😂 ... whatsapp: 9876543210",
        ];
        let mut noise = RandomNoise::seeded(3);
        for text in samples {
            for _ in 0..50 {
                let f = extract_features(text, &mut noise).features;
                assert_eq!(f.len(), 5);
                for (_, v) in f.iter() {
                    assert!((0.0..=1.0).contains(&v));
                }
            }
        }
    }
}
