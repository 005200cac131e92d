use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::CivdashError;

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_or(profile: &str, key: &str, default: &str) -> String {
    profiled_env_opt(profile, key).unwrap_or_else(|| default.to_string())
}

fn profiled_env_usize(profile: &str, key: &str, default: usize) -> usize {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn profiled_env_u64_opt(profile: &str, key: &str) -> Option<u64> {
    profiled_env_opt(profile, key).and_then(|v| v.parse().ok())
}

pub const DEFAULT_DB_PATH: &str = "civ_dash.db";
pub const DEFAULT_TABLE: &str = "labour_gender_gap";
pub const DEFAULT_CHART_WIDTH: usize = 50;
pub const DEFAULT_CACHE_CAPACITY: usize = 16;

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub data: DataConfig,
    pub analysis: AnalysisPaths,
    pub display: DisplayConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `CIVDASH_PROFILE`. When set (e.g. `PROD`), every
    /// key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_or("CIVDASH_PROFILE", "").to_uppercase();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Self {
            profile: p.to_string(),
            data: DataConfig::from_env_profiled(p),
            analysis: AnalysisPaths::from_env_profiled(p),
            display: DisplayConfig::from_env_profiled(p),
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Reject settings the dashboard cannot run with.
    pub fn validate(&self) -> Result<(), CivdashError> {
        if self.data.table.trim().is_empty() {
            return Err(CivdashError::Config("table name is empty".into()));
        }
        if self.display.chart_width < 10 {
            return Err(CivdashError::Config(format!(
                "chart width {} is too narrow (minimum 10)",
                self.display.chart_width
            )));
        }
        if self.data.cache_capacity == 0 {
            return Err(CivdashError::Config("cache capacity must be at least 1".into()));
        }
        if self.data.cache_ttl_secs == Some(0) {
            return Err(CivdashError::Config("cache TTL must be at least 1 second".into()));
        }
        if self.display.watch_secs == Some(0) {
            return Err(CivdashError::Config("watch interval must be at least 1 second".into()));
        }
        Ok(())
    }

    /// Print a summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!(
            "  data:      db={}, table={}, json_file={}, cache_ttl={:?}",
            self.data.db_path.display(),
            self.data.table,
            self.data
                .json_file
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(none)".into()),
            self.data.cache_ttl_secs
        );
        tracing::info!(
            "  analysis:  config={}",
            self.analysis
                .config_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(defaults)".into())
        );
        tracing::info!(
            "  display:   chart_width={}, watch={:?}",
            self.display.chart_width,
            self.display.watch_secs
        );
    }
}

// ── Data source ───────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    pub db_path: PathBuf,
    pub table: String,
    /// When set, points are read from this JSON file instead of SQLite.
    pub json_file: Option<PathBuf>,
    pub cache_capacity: usize,
    /// Cached series older than this are reloaded; `None` keeps them until
    /// invalidated.
    pub cache_ttl_secs: Option<u64>,
}

impl DataConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            db_path: PathBuf::from(profiled_env_or(p, "CIVDASH_DB_PATH", DEFAULT_DB_PATH)),
            table: profiled_env_or(p, "CIVDASH_TABLE", DEFAULT_TABLE),
            json_file: profiled_env_opt(p, "CIVDASH_JSON_FILE").map(PathBuf::from),
            cache_capacity: profiled_env_usize(p, "CIVDASH_CACHE_CAPACITY", DEFAULT_CACHE_CAPACITY),
            cache_ttl_secs: profiled_env_u64_opt(p, "CIVDASH_CACHE_TTL_SECS"),
        }
    }
}

// ── Analysis ──────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisPaths {
    /// YAML `AnalysisConfig` document; built-in defaults when absent.
    pub config_path: Option<PathBuf>,
}

impl AnalysisPaths {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            config_path: profiled_env_opt(p, "CIVDASH_ANALYSIS_CONFIG").map(PathBuf::from),
        }
    }
}

// ── Display ───────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub chart_width: usize,
    /// Re-render interval in seconds; `None` renders once.
    pub watch_secs: Option<u64>,
}

impl DisplayConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            chart_width: profiled_env_usize(p, "CIVDASH_CHART_WIDTH", DEFAULT_CHART_WIDTH),
            watch_secs: profiled_env_u64_opt(p, "CIVDASH_WATCH_SECS"),
        }
    }
}
