//! AnalysisConfig rule kind: window sizes, minimum reference points and the
//! sigma threshold used for trend and anomaly annotation.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub const ANALYSIS_CONFIG_KIND: &str = "AnalysisConfig";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("expected kind 'AnalysisConfig', found '{0}'")]
    WrongKind(String),

    #[error("invalid parameter {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Where the anomaly reference window sits relative to the scored point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BaselineMode {
    /// Window of up to `anomaly_window` points strictly before the scored point.
    #[default]
    Trailing,
    /// Window of up to `anomaly_window` points ending at the scored point.
    Inclusive,
}

// ── YAML-level types ────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RuleMetadata {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Top-level AnalysisConfig rule document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct AnalysisConfigRule {
    #[serde(rename = "apiVersion")]
    pub api_version: String,
    pub kind: String,
    pub metadata: RuleMetadata,
    #[serde(default)]
    pub spec: AnalysisConfig,
}

/// Parameters of the trend/anomaly computation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct AnalysisConfig {
    /// Trailing window of the gap moving average.
    pub trend_window: usize,
    /// Maximum size of the anomaly reference window.
    pub anomaly_window: usize,
    /// Reference points required before a point can be flagged.
    pub min_periods: usize,
    /// Band half-width in sample standard deviations.
    pub threshold_sigma: f64,
    pub baseline: BaselineMode,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            trend_window: 3,
            anomaly_window: 5,
            min_periods: 3,
            threshold_sigma: 2.0,
            baseline: BaselineMode::Trailing,
        }
    }
}

impl AnalysisConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.trend_window == 0 {
            return Err(ConfigError::Invalid {
                field: "trend_window",
                reason: "must be at least 1".into(),
            });
        }
        if self.anomaly_window == 0 {
            return Err(ConfigError::Invalid {
                field: "anomaly_window",
                reason: "must be at least 1".into(),
            });
        }
        // A sample standard deviation needs two points.
        if self.min_periods < 2 {
            return Err(ConfigError::Invalid {
                field: "min_periods",
                reason: "must be at least 2".into(),
            });
        }
        if self.min_periods > self.anomaly_window {
            return Err(ConfigError::Invalid {
                field: "min_periods",
                reason: format!(
                    "{} exceeds anomaly_window {}",
                    self.min_periods, self.anomaly_window
                ),
            });
        }
        if !self.threshold_sigma.is_finite() || self.threshold_sigma <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "threshold_sigma",
                reason: format!("{} is not a positive number", self.threshold_sigma),
            });
        }
        Ok(())
    }

    /// Parse and validate an AnalysisConfig YAML document.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let rule: AnalysisConfigRule = serde_yaml::from_str(yaml)?;
        rule.compile()
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        debug!(path = %path.display(), "loading analysis config");
        Self::from_yaml(&yaml)
    }
}

impl AnalysisConfigRule {
    /// Check the kind and parameters, yielding the typed config.
    pub fn compile(&self) -> Result<AnalysisConfig, ConfigError> {
        if self.kind != ANALYSIS_CONFIG_KIND {
            return Err(ConfigError::WrongKind(self.kind.clone()));
        }
        self.spec.validate()?;
        Ok(self.spec.clone())
    }
}
