use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Refresh-cycle metrics, updated after each annotation run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PipelineMetrics {
    /// Completed annotation runs.
    pub runs: u64,
    /// Points annotated in the last run.
    pub last_points: usize,
    /// Points flagged anomalous in the last run.
    pub last_anomalies: usize,
    /// When the last run completed.
    pub last_run: Option<DateTime<Utc>>,
    /// Duration of the last run in microseconds.
    pub last_duration_us: u64,
    /// Average run duration in microseconds.
    pub avg_duration_us: f64,

    #[serde(skip)]
    total_duration_us: f64,
}

impl PipelineMetrics {
    pub fn record_run(&mut self, points: usize, anomalies: usize, elapsed: Duration) {
        let elapsed_us = elapsed.as_micros() as u64;

        self.runs += 1;
        self.last_points = points;
        self.last_anomalies = anomalies;
        self.last_run = Some(Utc::now());
        self.last_duration_us = elapsed_us;
        self.total_duration_us += elapsed_us as f64;
        self.avg_duration_us = self.total_duration_us / self.runs as f64;
    }
}
