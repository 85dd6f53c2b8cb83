// Indicator and explanation generation
// Human-readable evidence derived from the same signals used for scoring.

use crate::models::{ClassificationResult, ClassificationSource, DocumentType, Feature, Verdict};
use super::signals::TextSignals;

pub const OFFICIAL_TERMINOLOGY: &str = "Contains official government terminology";
pub const DATE_FORMATTING: &str = "Includes proper date formatting";
pub const DOCUMENT_STRUCTURE: &str = "Follows official document structure";
pub const ADEQUATE_LENGTH: &str = "Adequate document length and detail";

pub const SUSPICIOUS_LANGUAGE: &str = "Contains suspicious language patterns";
pub const TOO_BRIEF: &str = "Document appears too brief for official content";
pub const MISSING_NUMBERS: &str = "Missing expected numerical references";

/// Score above which a feature counts as a strength in the report.
const FINDING_THRESHOLD: f64 = 0.6;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Indicators {
    pub authentic: Vec<String>,
    pub suspicious: Vec<String>,
}

pub fn build_indicators(signals: &TextSignals, document_type: &DocumentType) -> Indicators {
    let mut authentic = Vec::new();
    let mut suspicious = Vec::new();

    if signals.has_official_terms {
        authentic.push(OFFICIAL_TERMINOLOGY.to_string());
    }
    if signals.has_date {
        authentic.push(DATE_FORMATTING.to_string());
    }
    if signals.has_structural_elements {
        authentic.push(DOCUMENT_STRUCTURE.to_string());
    }
    if signals.char_len > 200 {
        authentic.push(ADEQUATE_LENGTH.to_string());
    }

    if signals.has_suspicious_patterns {
        suspicious.push(SUSPICIOUS_LANGUAGE.to_string());
    }
    if signals.char_len < 50 {
        suspicious.push(TOO_BRIEF.to_string());
    }
    if !signals.has_numbers && document_type.expects_numbers() {
        suspicious.push(MISSING_NUMBERS.to_string());
    }

    Indicators { authentic, suspicious }
}

/// One-paragraph summary for a locally computed verdict.
pub fn fallback_explanation(verdict: Verdict, probability: f64) -> String {
    format!(
        "Fallback classification: {} (confidence: {:.1}%). Backend API unavailable - using local fallback analysis.",
        verdict.label(),
        probability * 100.0
    )
}

fn finding(feature: Feature, strong: bool) -> (&'static str, &'static str) {
    match (feature, strong) {
        (Feature::LanguagePatterns, true) => ("Language Quality", "Professional language patterns detected"),
        (Feature::LanguagePatterns, false) => ("Language Quality", "Language quality concerns identified"),
        (Feature::StructureValidation, true) => ("Document Structure", "Proper official document structure"),
        (Feature::StructureValidation, false) => ("Document Structure", "Structural inconsistencies found"),
        (Feature::OfficialTerminology, true) => ("Official Terminology", "Appropriate government terminology used"),
        (Feature::OfficialTerminology, false) => ("Official Terminology", "Limited official terminology detected"),
        (Feature::FormattingConsistency, true) => ("Content Formatting", "Consistent professional formatting"),
        (Feature::FormattingConsistency, false) => ("Content Formatting", "Formatting irregularities noted"),
        (Feature::MetadataAnalysis, true) => ("Metadata Validation", "Proper dates and references included"),
        (Feature::MetadataAnalysis, false) => ("Metadata Validation", "Missing or irregular metadata elements"),
    }
}

pub fn recommendation(verdict: Verdict) -> &'static str {
    match verdict {
        Verdict::Authentic => "This document appears authentic and can be considered reliable for its stated purpose. However, always verify through official channels for critical decisions.",
        Verdict::Fake => "Exercise caution with this document. Additional verification through official government channels is strongly recommended before taking any action based on its contents.",
    }
}

/// Plain-text report of a result, one section per block.
pub fn render_report(result: &ClassificationResult, document_type: &DocumentType) -> String {
    let verdict = result.verification_result;
    let mut out = String::new();

    out.push_str("DOCUMENT AUTHENTICITY REPORT\n\n");
    out.push_str(&format!(
        "Classification: {} ({})\n",
        verdict.label(),
        u8::from(verdict)
    ));
    out.push_str(&format!("Confidence: {:.1}%\n", result.confidence_score * 100.0));
    out.push_str(&format!("Document type: {}\n", document_type.title()));
    out.push_str(&format!(
        "Source: {} ({})\n",
        match result.source {
            ClassificationSource::Backend => "backend",
            ClassificationSource::Fallback => "local fallback",
        },
        result.model_version
    ));

    let features = &result.decision_factors.features;
    if !features.is_empty() {
        out.push_str("\nKey findings:\n");
        for feature in [
            Feature::LanguagePatterns,
            Feature::StructureValidation,
            Feature::OfficialTerminology,
            Feature::FormattingConsistency,
            Feature::MetadataAnalysis,
        ] {
            if let Some(score) = features.get(feature) {
                let (label, note) = finding(feature, score > FINDING_THRESHOLD);
                out.push_str(&format!("  - {}: {:.0}% - {}\n", label, score * 100.0, note));
            }
        }
    }

    let factors = &result.decision_factors;
    if !factors.authentic_indicators.is_empty() {
        out.push_str("\nAuthentic indicators:\n");
        for item in &factors.authentic_indicators {
            out.push_str(&format!("  + {}\n", item));
        }
    }
    if !factors.suspicious_indicators.is_empty() {
        out.push_str("\nSuspicious indicators:\n");
        for item in &factors.suspicious_indicators {
            out.push_str(&format!("  ! {}\n", item));
        }
    }

    out.push_str("\nRecommendation:\n");
    out.push_str(recommendation(verdict));
    out.push_str("\n\n");
    out.push_str(&result.explanation);
    out.push('\n');
    out
}
