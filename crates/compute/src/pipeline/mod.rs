//! Gap annotation pipeline.
//!
//! Derives two columns from an ordered `(year, female, male)` series:
//!
//! - **trend**: trailing moving average of the gap (`male − female`).
//! - **is_anomaly**: whether the gap leaves the sigma band of its reference
//!   window.
//!
//! Both are computed in a single pass of [`StreamingAnnotator`], so the batch
//! result equals feeding the points one at a time.

pub mod anomaly;
pub mod metrics;
pub mod stream;
pub mod trend;
pub mod window;

use std::time::Instant;

use tracing::debug;

use civdash_core::{AnnotatedPoint, TimeSeriesPoint};

use crate::config::AnalysisConfig;

use self::metrics::PipelineMetrics;
use self::stream::StreamingAnnotator;

/// Annotate a series sorted ascending by year.
///
/// Pure and total: any input (including empty) yields an output of the same
/// length. Ordering and finiteness are the caller's responsibility
/// (see [`civdash_core::validate_series`]).
pub fn annotate(points: &[TimeSeriesPoint], config: &AnalysisConfig) -> Vec<AnnotatedPoint> {
    let mut annotator = StreamingAnnotator::new(config);
    points.iter().map(|p| annotator.push(p)).collect()
}

/// Stateless trend/anomaly computer bound to one configuration.
#[derive(Debug, Clone, Default)]
pub struct TrendAnomalyComputer {
    config: AnalysisConfig,
}

impl TrendAnomalyComputer {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn annotate(&self, points: &[TimeSeriesPoint]) -> Vec<AnnotatedPoint> {
        annotate(points, &self.config)
    }
}

/// Computer plus the metrics of each refresh it served.
pub struct Pipeline {
    computer: TrendAnomalyComputer,
    pub metrics: PipelineMetrics,
}

impl Pipeline {
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            computer: TrendAnomalyComputer::new(config),
            metrics: PipelineMetrics::default(),
        }
    }

    pub fn computer(&self) -> &TrendAnomalyComputer {
        &self.computer
    }

    /// Annotate one refresh worth of data and record its metrics.
    pub fn run(&mut self, points: &[TimeSeriesPoint]) -> Vec<AnnotatedPoint> {
        let start = Instant::now();
        let annotated = self.computer.annotate(points);
        let anomalies = annotated.iter().filter(|p| p.is_anomaly).count();

        let elapsed = start.elapsed();
        self.metrics.record_run(annotated.len(), anomalies, elapsed);

        debug!(
            points = annotated.len(),
            anomalies,
            elapsed_us = elapsed.as_micros(),
            "annotation complete"
        );

        annotated
    }
}
