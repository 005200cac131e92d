use serde::Serialize;

use crate::config::{AnalysisConfig, BaselineMode};

use super::window::RollingWindow;

/// Relative slack around the band edges. Gaps are differences of rounded
/// percentages, so equal reported gaps can differ in the last bits.
pub const BAND_TOLERANCE: f64 = 1e-9;

/// Acceptance band derived from a reference window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AnomalyBand {
    pub mean: f64,
    pub stddev: f64,
    pub lower: f64,
    pub upper: f64,
}

impl AnomalyBand {
    /// Strictly outside the band, beyond float noise. A zero-width band only
    /// flags values that genuinely differ from the window mean.
    pub fn excludes(&self, value: f64) -> bool {
        let slack = BAND_TOLERANCE * self.mean.abs().max(1.0);
        value > self.upper + slack || value < self.lower - slack
    }
}

/// Band over `window`, or `None` while it holds fewer than `min_periods` values.
pub fn reference_band(
    window: &RollingWindow,
    min_periods: usize,
    sigma: f64,
) -> Option<AnomalyBand> {
    if window.len() < min_periods {
        return None;
    }
    let mean = window.mean();
    let stddev = window.sample_stddev();
    Some(AnomalyBand {
        mean,
        stddev,
        lower: mean - sigma * stddev,
        upper: mean + sigma * stddev,
    })
}

/// Flags values that leave the sigma band of their reference window.
#[derive(Debug, Clone)]
pub struct AnomalyTracker {
    reference: RollingWindow,
    min_periods: usize,
    sigma: f64,
    baseline: BaselineMode,
}

impl AnomalyTracker {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            reference: RollingWindow::new(config.anomaly_window.max(1)),
            min_periods: config.min_periods,
            sigma: config.threshold_sigma,
            baseline: config.baseline,
        }
    }

    /// Score the next value and fold it into the reference window.
    pub fn update(&mut self, value: f64) -> bool {
        match self.baseline {
            BaselineMode::Trailing => {
                let flagged = self.check(value);
                self.reference.push(value);
                flagged
            }
            BaselineMode::Inclusive => {
                self.reference.push(value);
                self.check(value)
            }
        }
    }

    fn check(&self, value: f64) -> bool {
        reference_band(&self.reference, self.min_periods, self.sigma)
            .map(|band| band.excludes(value))
            .unwrap_or(false)
    }

    pub fn reset(&mut self) {
        self.reference.clear();
    }
}

/// Anomaly column for a whole series.
pub fn flag_anomalies(values: &[f64], config: &AnalysisConfig) -> Vec<bool> {
    let mut tracker = AnomalyTracker::new(config);
    values.iter().map(|&v| tracker.update(v)).collect()
}
