use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use civdash_core::Config;

/// Labour-force participation gender gap dashboard.
///
/// Loads the female/male participation series, derives the gap, smooths it
/// with a rolling trend and flags years that break from recent history.
/// Unset flags fall back to `CIVDASH_*` environment variables (and `.env`).
#[derive(Parser, Debug)]
#[command(name = "civdash", about = "Labour-force participation gender gap dashboard")]
pub struct CliArgs {
    /// SQLite database file
    #[arg(long)]
    pub db: Option<PathBuf>,

    /// Read the series from a JSON array instead of SQLite
    #[arg(long)]
    pub json_file: Option<PathBuf>,

    /// Table holding the year/female/male columns
    #[arg(long)]
    pub table: Option<String>,

    /// YAML AnalysisConfig with window and threshold overrides
    #[arg(long)]
    pub analysis_config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Terminal)]
    pub format: OutputFormat,

    /// Reload and redraw every SECS seconds until interrupted
    #[arg(long, value_name = "SECS")]
    pub watch: Option<u64>,

    /// Chart width in columns
    #[arg(long, value_name = "COLS")]
    pub chart_width: Option<usize>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Terminal,
    Json,
}

impl CliArgs {
    /// Overlay explicit flags onto the environment-derived config.
    pub fn apply(&self, config: &mut Config) {
        if let Some(db) = &self.db {
            config.data.db_path = db.clone();
        }
        if let Some(path) = &self.json_file {
            config.data.json_file = Some(path.clone());
        }
        if let Some(table) = &self.table {
            config.data.table = table.clone();
        }
        if let Some(path) = &self.analysis_config {
            config.analysis.config_path = Some(path.clone());
        }
        if let Some(secs) = self.watch {
            config.display.watch_secs = Some(secs);
        }
        if let Some(width) = self.chart_width {
            config.display.chart_width = width;
        }
    }
}
