mod app;
mod chart;
mod cli;
mod terminal;

use std::io::{self, Write};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use civdash_compute::{AnalysisConfig, Dashboard};
use civdash_core::config::{load_dotenv, Config};
use civdash_storage::{source_from_config, SeriesCache};

use crate::app::App;
use crate::cli::{CliArgs, OutputFormat};
use crate::terminal::Terminal;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    load_dotenv();
    let args = CliArgs::parse();

    let mut config = Config::from_env();
    args.apply(&mut config);
    config.validate().context("invalid configuration")?;
    config.log_summary();

    let analysis = match &config.analysis.config_path {
        Some(path) => AnalysisConfig::from_file(path)
            .with_context(|| format!("failed to load analysis config {}", path.display()))?,
        None => AnalysisConfig::default(),
    };
    info!(
        trend_window = analysis.trend_window,
        anomaly_window = analysis.anomaly_window,
        min_periods = analysis.min_periods,
        threshold_sigma = analysis.threshold_sigma,
        baseline = ?analysis.baseline,
        "analysis parameters"
    );

    let source = source_from_config(&config.data).context("failed to configure data source")?;
    let cache = SeriesCache::from_config(&config.data);
    let mut app = App::new(source, cache, analysis);
    let terminal = Terminal::new(config.display.chart_width);

    match config.display.watch_secs {
        None => {
            let dashboard = app.refresh().await?;
            emit(&terminal, args.format, &dashboard)?;
        }
        Some(secs) => watch(&mut app, &terminal, args.format, secs).await?,
    }

    Ok(())
}

fn emit(terminal: &Terminal, format: OutputFormat, dashboard: &Dashboard) -> Result<()> {
    match format {
        OutputFormat::Terminal => terminal.render(dashboard),
        OutputFormat::Json => {
            let mut stdout = io::stdout();
            serde_json::to_writer_pretty(&mut stdout, dashboard)?;
            writeln!(stdout)?;
            Ok(())
        }
    }
}

/// Reload and redraw on every tick until Ctrl-C.
///
/// A failed refresh is reported and retried on the next tick.
async fn watch(app: &mut App, terminal: &Terminal, format: OutputFormat, secs: u64) -> Result<()> {
    let mut interval = tokio::time::interval(Duration::from_secs(secs));
    info!(interval_secs = secs, "watch mode started");

    loop {
        tokio::select! {
            _ = interval.tick() => {
                app.invalidate();
                match app.refresh().await {
                    Ok(dashboard) => {
                        if format == OutputFormat::Terminal {
                            terminal.clear()?;
                        }
                        emit(terminal, format, &dashboard)?;
                        if format == OutputFormat::Terminal {
                            let m = app.metrics();
                            let loaded = app
                                .loaded_at()
                                .map(|t| t.format("%H:%M:%S UTC").to_string())
                                .unwrap_or_else(|| "-".into());
                            terminal.print_info(&format!(
                                "\nRefresh #{} ({}us), loaded {}. Next in {}s, Ctrl-C to stop.",
                                m.runs, m.last_duration_us, loaded, secs
                            ))?;
                        }
                    }
                    Err(e) => {
                        warn!(error = %e, "refresh failed");
                        terminal.print_error(&format!("{:#}", e))?;
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted, stopping watch");
                break;
            }
        }
    }
    Ok(())
}
