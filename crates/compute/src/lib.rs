pub mod config;
pub mod dashboard;
pub mod pipeline;

pub use config::{AnalysisConfig, AnalysisConfigRule, BaselineMode, ConfigError};
pub use dashboard::{Dashboard, Headline};
pub use pipeline::anomaly::{flag_anomalies, AnomalyBand};
pub use pipeline::metrics::PipelineMetrics;
pub use pipeline::stream::StreamingAnnotator;
pub use pipeline::trend::trailing_mean;
pub use pipeline::{annotate, Pipeline, TrendAnomalyComputer};
