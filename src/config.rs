//! Pipeline configuration: reference data location, heuristic thresholds, logging.

use crate::error::{FeatureError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming the JSON config file.
pub const CONFIG_PATH_ENV: &str = "FRAUD_FEATURES_CONFIG_PATH";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// JSON file with the disposable email domain list
    pub disposable_domains_path: PathBuf,
    /// Entropy thresholds for dummy name/email detection
    pub heuristics: HeuristicsConfig,
    pub temporal: TemporalConfig,
    pub batch: BatchConfig,
    /// Logging
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HeuristicsConfig {
    /// Entropy above this marks a name or email local part as dummy
    pub dummy_entropy_threshold: f64,
    /// Entropy above this marks a disposable address as dummy
    pub disposable_entropy_threshold: f64,
    /// Emit the local-part entropy as `emailEntropy` instead of the trained constant
    pub email_entropy_from_local_part: bool,
}

/// Instant that `accountIsNew` measures the account age against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeReference {
    #[default]
    WallClock,
    TransactionTime,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TemporalConfig {
    pub account_new_reference: AgeReference,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Extract batch records on the rayon pool
    pub parallel: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub json: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            disposable_domains_path: PathBuf::from("dataset/disposable-email-domains.json"),
            heuristics: HeuristicsConfig::default(),
            temporal: TemporalConfig::default(),
            batch: BatchConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl Default for HeuristicsConfig {
    fn default() -> Self {
        Self {
            dummy_entropy_threshold: 3.1,
            disposable_entropy_threshold: 2.5,
            email_entropy_from_local_part: false,
        }
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self { parallel: true }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: true,
        }
    }
}

impl PipelineConfig {
    /// Load from JSON file if present; otherwise return default
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(c) => c,
            Err(e) => {
                if path.exists() {
                    tracing::warn!(path = %path.display(), error = %e, "config unreadable; using defaults");
                }
                Self::default()
            }
        }
    }

    /// Load from JSON file, surfacing read and decode failures.
    pub fn try_load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        serde_json::from_str(&data)
            .map_err(|e| FeatureError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Load from the path in `FRAUD_FEATURES_CONFIG_PATH`, or `config.json`.
    pub fn load_from_env() -> Self {
        let path = std::env::var(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config.json"));
        Self::load(&path)
    }
}
