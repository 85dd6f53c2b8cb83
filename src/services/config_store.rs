// Configuration Storage Service
// Handles config file read/write, env overrides and version backup

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::models::Feature;
use crate::services::verification::noise::NoiseMode;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: DEFAULT_BACKEND_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl BackendConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

/// Importance of each feature in the weighted sum. Must sum to 1.0.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct FeatureWeights {
    pub language_patterns: f64,
    pub formatting_consistency: f64,
    pub official_terminology: f64,
    pub metadata_analysis: f64,
    pub structure_validation: f64,
}

impl Default for FeatureWeights {
    fn default() -> Self {
        Self {
            language_patterns: 0.25,
            formatting_consistency: 0.20,
            official_terminology: 0.25,
            metadata_analysis: 0.15,
            structure_validation: 0.15,
        }
    }
}

impl FeatureWeights {
    pub fn weight(&self, feature: Feature) -> f64 {
        match feature {
            Feature::LanguagePatterns => self.language_patterns,
            Feature::FormattingConsistency => self.formatting_consistency,
            Feature::OfficialTerminology => self.official_terminology,
            Feature::MetadataAnalysis => self.metadata_analysis,
            Feature::StructureValidation => self.structure_validation,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        let mut total = 0.0;
        for feature in Feature::ALL {
            let w = self.weight(feature);
            if !w.is_finite() || w < 0.0 {
                return Err(format!("Invalid weight for {}: {}", feature.name(), w));
            }
            total += w;
        }
        if (total - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(format!("Feature weights must sum to 1.0, got {:.6}", total));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringConfig {
    #[serde(default)]
    pub weights: FeatureWeights,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    #[serde(default = "default_logistic_scale")]
    pub logistic_scale: f64,
    #[serde(default)]
    pub noise: NoiseMode,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: FeatureWeights::default(),
            threshold: 0.5,
            logistic_scale: 6.0,
            noise: NoiseMode::default(),
        }
    }
}

impl ScoringConfig {
    pub fn validate(&self) -> Result<(), String> {
        self.weights.validate()?;
        if !(self.threshold.is_finite() && (0.0..=1.0).contains(&self.threshold)) {
            return Err(format!("Threshold must be within [0, 1], got {}", self.threshold));
        }
        if !(self.logistic_scale.is_finite() && self.logistic_scale > 0.0) {
            return Err(format!("Logistic scale must be positive, got {}", self.logistic_scale));
        }
        Ok(())
    }
}

fn default_true() -> bool { true }
fn default_base_url() -> String { DEFAULT_BACKEND_URL.to_string() }
fn default_timeout_secs() -> u64 { DEFAULT_TIMEOUT_SECS }
fn default_threshold() -> f64 { 0.5 }
fn default_logistic_scale() -> f64 { 6.0 }

impl AppConfig {
    /// Apply `DOCVERIFY_*` environment overrides on top of the file config.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = env::var("DOCVERIFY_API_BASE_URL") {
            let url = url.trim();
            if !url.is_empty() {
                self.backend.base_url = url.to_string();
            }
        }
        if let Some(secs) = env::var("DOCVERIFY_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
        {
            self.backend.timeout_secs = secs;
        }
        if matches!(
            env::var("DOCVERIFY_OFFLINE").as_deref(),
            Ok("1") | Ok("true") | Ok("TRUE")
        ) {
            self.backend.enabled = false;
        }
    }
}

pub struct ConfigStore {
    config_dir: PathBuf,
    config_file: PathBuf,
}

impl ConfigStore {
    pub fn new(config_dir: PathBuf) -> Self {
        let config_file = config_dir.join("config.json");
        Self { config_dir, config_file }
    }

    /// Get default config directory
    pub fn default_config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("docverify"))
    }

    pub fn config_file(&self) -> &Path {
        &self.config_file
    }

    pub fn ensure_dir(&self) -> Result<(), String> {
        fs::create_dir_all(&self.config_dir)
            .map_err(|e| format!("Failed to create config dir: {}", e))
    }

    /// Load configuration from file; a missing file yields defaults.
    pub fn load(&self) -> Result<AppConfig, String> {
        if !self.config_file.exists() {
            return Ok(AppConfig::default());
        }

        let content = fs::read_to_string(&self.config_file)
            .map_err(|e| format!("Failed to read config: {}", e))?;

        let config: AppConfig = serde_json::from_str(&content)
            .map_err(|e| format!("Failed to parse config: {}", e))?;
        config.scoring.validate()?;
        Ok(config)
    }

    pub fn save(&self, config: &AppConfig) -> Result<(), String> {
        config.scoring.validate()?;
        self.ensure_dir()?;

        if self.config_file.exists() {
            self.create_backup()?;
        }

        let content = serde_json::to_string_pretty(config)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        fs::write(&self.config_file, content)
            .map_err(|e| format!("Failed to write config: {}", e))
    }

    fn create_backup(&self) -> Result<(), String> {
        let backup_dir = self.config_dir.join("backups");
        fs::create_dir_all(&backup_dir)
            .map_err(|e| format!("Failed to create backup dir: {}", e))?;

        let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S%.3f");
        let backup_file = backup_dir.join(format!("config_{}.json", timestamp));

        fs::copy(&self.config_file, &backup_file)
            .map_err(|e| format!("Failed to create backup: {}", e))?;

        // Keep only last 10 backups
        self.cleanup_old_backups(&backup_dir, 10)?;

        Ok(())
    }

    fn cleanup_old_backups(&self, backup_dir: &Path, keep: usize) -> Result<(), String> {
        let mut entries: Vec<_> = fs::read_dir(backup_dir)
            .map_err(|e| format!("Failed to read backup dir: {}", e))?
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().map_or(false, |ext| ext == "json"))
            .collect();

        if entries.len() <= keep {
            return Ok(());
        }

        // Oldest first; names embed the timestamp so they sort chronologically.
        entries.sort_by_key(|e| e.file_name());

        for entry in entries.iter().take(entries.len() - keep) {
            let _ = fs::remove_file(entry.path());
        }

        Ok(())
    }

    pub fn set_backend_url(&self, url: &str) -> Result<(), String> {
        let mut config = self.load()?;
        config.backend.base_url = url.to_string();
        self.save(&config)
    }

    pub fn set_offline(&self, offline: bool) -> Result<(), String> {
        let mut config = self.load()?;
        config.backend.enabled = !offline;
        self.save(&config)
    }
}
