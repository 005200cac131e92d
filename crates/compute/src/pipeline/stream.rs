use civdash_core::{AnnotatedPoint, TimeSeriesPoint};

use crate::config::AnalysisConfig;

use super::anomaly::AnomalyTracker;
use super::trend::TrendTracker;

/// Annotates points one at a time, in year order.
///
/// Holds only the bounded trend and reference windows, so appending a new
/// year costs the same regardless of how long the series already is.
#[derive(Debug, Clone)]
pub struct StreamingAnnotator {
    trend: TrendTracker,
    anomaly: AnomalyTracker,
}

impl StreamingAnnotator {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            trend: TrendTracker::new(config.trend_window),
            anomaly: AnomalyTracker::new(config),
        }
    }

    pub fn push(&mut self, point: &TimeSeriesPoint) -> AnnotatedPoint {
        let gap = point.gap();
        let trend = self.trend.update(gap);
        let is_anomaly = self.anomaly.update(gap);
        AnnotatedPoint::from_point(point, trend, is_anomaly)
    }

    pub fn reset(&mut self) {
        self.trend.reset();
        self.anomaly.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_carries_point_fields() {
        let mut annotator = StreamingAnnotator::new(&AnalysisConfig::default());
        let out = annotator.push(&TimeSeriesPoint::new(2001, 45.0, 70.0));
        assert_eq!(out.year, 2001);
        assert_eq!(out.female, 45.0);
        assert_eq!(out.male, 70.0);
        assert_eq!(out.gap, 25.0);
        assert_eq!(out.trend, 25.0);
        assert!(!out.is_anomaly);
    }

    #[test]
    fn reset_starts_a_new_series() {
        let config = AnalysisConfig::default();
        let mut annotator = StreamingAnnotator::new(&config);
        for year in 2000..2006 {
            annotator.push(&TimeSeriesPoint::new(year, 40.0, 60.0));
        }
        annotator.reset();
        let out = annotator.push(&TimeSeriesPoint::new(2010, 40.0, 90.0));
        assert_eq!(out.trend, 50.0);
        assert!(!out.is_anomaly);
    }
}
