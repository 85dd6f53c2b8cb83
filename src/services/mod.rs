// DocVerify Core Services

pub mod backend;
pub mod config_store;
pub mod verification;

pub use backend::{normalize_response, BackendClassifier};
pub use config_store::*;

// Re-export verification entry points
pub use verification::{
    build_indicators,
    extract_features,
    render_report,
    score_features,
    Classifier,
    ClassifierError,
    DocumentVerifier,
    HeuristicClassifier,
    NoiseMode,
    NoiseSource,
};
