// DocVerify Data Models
// Request, feature and result types shared by the classifiers

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

pub const DEFAULT_DOCUMENT_TYPE: &str = "government_document";

/// Value used for a feature that is missing or not a finite number.
pub const NEUTRAL_FEATURE_VALUE: f64 = 0.5;

// ============ Document Input ============

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentType {
    GovernmentDocument,
    GovernmentAnnouncement,
    BudgetDocument,
    PolicyStatement,
    ProcurementNotice,
    Other(String),
}

impl DocumentType {
    pub fn parse(val: &str) -> Self {
        match val.trim().to_lowercase().as_str() {
            "" | "government_document" => Self::GovernmentDocument,
            "government_announcement" => Self::GovernmentAnnouncement,
            "budget_document" => Self::BudgetDocument,
            "policy_statement" => Self::PolicyStatement,
            "procurement_notice" => Self::ProcurementNotice,
            _ => Self::Other(val.trim().to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::GovernmentDocument => "government_document",
            Self::GovernmentAnnouncement => "government_announcement",
            Self::BudgetDocument => "budget_document",
            Self::PolicyStatement => "policy_statement",
            Self::ProcurementNotice => "procurement_notice",
            Self::Other(label) => label,
        }
    }

    /// Policy statements are prose; digits are not expected in them.
    pub fn expects_numbers(&self) -> bool {
        !matches!(self, Self::PolicyStatement)
    }

    /// "budget_document" -> "Budget Document"
    pub fn title(&self) -> String {
        self.as_str()
            .split('_')
            .filter(|w| !w.is_empty())
            .map(|w| {
                let mut chars = w.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars.flat_map(|c| c.to_lowercase())).collect(),
                    None => String::new(),
                }
            })
            .collect::<Vec<String>>()
            .join(" ")
    }
}

impl Default for DocumentType {
    fn default() -> Self {
        Self::GovernmentDocument
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct DocumentInput {
    pub text: String,
    pub document_type: DocumentType,
}

impl DocumentInput {
    pub fn new(text: impl Into<String>, document_type: &str) -> Self {
        Self {
            text: text.into(),
            document_type: DocumentType::parse(document_type),
        }
    }

    /// Build an input from a loosely typed JSON request body.
    ///
    /// `text` must be present and a string. `document_type` (or
    /// `documentType`) is optional but must be a string when given.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, InputError> {
        let obj = value.as_object().ok_or_else(|| InputError::NotAnObject {
            found: json_kind(value),
        })?;

        let text = match obj.get("text") {
            None | Some(serde_json::Value::Null) => return Err(InputError::MissingText),
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(other) => {
                return Err(InputError::InvalidTextType {
                    found: json_kind(other),
                })
            }
        };

        let document_type = match obj.get("document_type").or_else(|| obj.get("documentType")) {
            None | Some(serde_json::Value::Null) => DEFAULT_DOCUMENT_TYPE.to_string(),
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(other) => {
                return Err(InputError::InvalidDocumentType {
                    found: json_kind(other),
                })
            }
        };

        Ok(Self::new(text, &document_type))
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("request body must be a JSON object, got {found}")]
    NotAnObject { found: &'static str },
    #[error("document text is missing")]
    MissingText,
    #[error("document text must be a string, got {found}")]
    InvalidTextType { found: &'static str },
    #[error("document type must be a string, got {found}")]
    InvalidDocumentType { found: &'static str },
}

/// Wire body sent to the verification backend.
#[derive(Debug, Clone, Serialize)]
pub struct BinaryVerificationRequest<'a> {
    pub text: &'a str,
    pub document_type: &'a str,
    pub classification_type: &'a str,
}

// ============ Features ============

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    LanguagePatterns,
    FormattingConsistency,
    OfficialTerminology,
    MetadataAnalysis,
    StructureValidation,
}

impl Feature {
    pub const ALL: [Feature; 5] = [
        Feature::LanguagePatterns,
        Feature::FormattingConsistency,
        Feature::OfficialTerminology,
        Feature::MetadataAnalysis,
        Feature::StructureValidation,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::LanguagePatterns => "language_patterns",
            Self::FormattingConsistency => "formatting_consistency",
            Self::OfficialTerminology => "official_terminology",
            Self::MetadataAnalysis => "metadata_analysis",
            Self::StructureValidation => "structure_validation",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.name() == name)
    }
}

/// Feature scores keyed by feature. Stored values are always finite and in [0,1].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureVector(BTreeMap<Feature, f64>);

impl FeatureVector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a score, clamped to [0,1]. Non-finite scores are dropped.
    pub fn set(&mut self, feature: Feature, value: f64) {
        if value.is_finite() {
            self.0.insert(feature, value.clamp(0.0, 1.0));
        } else {
            self.0.remove(&feature);
        }
    }

    pub fn get(&self, feature: Feature) -> Option<f64> {
        self.0.get(&feature).copied()
    }

    /// Score used for weighting; absent features count as neutral.
    pub fn value_or_neutral(&self, feature: Feature) -> f64 {
        self.get(feature).unwrap_or(NEUTRAL_FEATURE_VALUE)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Feature, f64)> + '_ {
        self.0.iter().map(|(f, v)| (*f, *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// ============ Classification Result ============

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Verdict {
    Fake,
    Authentic,
}

impl Verdict {
    pub fn is_authentic(&self) -> bool {
        matches!(self, Self::Authentic)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Authentic => "Authentic",
            Self::Fake => "Potentially fake",
        }
    }
}

impl From<Verdict> for u8 {
    fn from(v: Verdict) -> u8 {
        match v {
            Verdict::Fake => 0,
            Verdict::Authentic => 1,
        }
    }
}

impl TryFrom<u8> for Verdict {
    type Error = String;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        match v {
            0 => Ok(Verdict::Fake),
            1 => Ok(Verdict::Authentic),
            other => Err(format!("verification result must be 0 or 1, got {}", other)),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationSource {
    Backend,
    Fallback,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionFactors {
    #[serde(flatten)]
    pub features: FeatureVector,
    #[serde(default)]
    pub authentic_indicators: Vec<String>,
    #[serde(default)]
    pub suspicious_indicators: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    pub verification_result: Verdict,
    pub is_authentic: bool,
    pub confidence_score: f64,
    pub decision_factors: DecisionFactors,
    pub explanation: String,
    pub processing_time: String,
    pub model_version: String,
    pub source: ClassificationSource,
    pub verification_id: Uuid,
    pub timestamp: String,
}

impl ClassificationResult {
    pub fn is_fallback(&self) -> bool {
        self.source == ClassificationSource::Fallback
    }
}
