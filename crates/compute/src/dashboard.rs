use serde::Serialize;

use civdash_core::AnnotatedPoint;

/// Headline metrics shown above the charts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Headline {
    pub latest_year: i32,
    pub latest_gap: f64,
    pub latest_is_anomaly: bool,
}

impl Headline {
    pub fn gap_label(&self) -> String {
        format!("{:.1} pp", self.latest_gap)
    }

    pub fn anomaly_label(&self) -> &'static str {
        if self.latest_is_anomaly { "Yes" } else { "No" }
    }
}

/// Everything the presentation layer renders for one refresh.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub headline: Headline,
    pub points: Vec<AnnotatedPoint>,
    /// Subset of `points` flagged anomalous, for the gap chart markers.
    pub anomalies: Vec<AnnotatedPoint>,
}

impl Dashboard {
    /// Build the view model; `None` when there is nothing to show.
    pub fn build(points: Vec<AnnotatedPoint>) -> Option<Self> {
        let latest = points.iter().max_by_key(|p| p.year)?;
        let headline = Headline {
            latest_year: latest.year,
            latest_gap: latest.gap,
            latest_is_anomaly: latest.is_anomaly,
        };
        let anomalies = points.iter().filter(|p| p.is_anomaly).copied().collect();
        Some(Self {
            headline,
            points,
            anomalies,
        })
    }

    /// Smallest and largest year on display.
    pub fn year_span(&self) -> (i32, i32) {
        let first = self.points.iter().map(|p| p.year).min().unwrap_or(self.headline.latest_year);
        (first, self.headline.latest_year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use civdash_core::TimeSeriesPoint;

    fn point(year: i32, gap: f64, is_anomaly: bool) -> AnnotatedPoint {
        AnnotatedPoint::from_point(&TimeSeriesPoint::new(year, 40.0, 40.0 + gap), gap, is_anomaly)
    }

    #[test]
    fn headline_uses_latest_year() {
        let dash = Dashboard::build(vec![
            point(2020, 20.0, false),
            point(2022, 18.24, true),
            point(2021, 19.0, false),
        ])
        .unwrap();
        assert_eq!(dash.headline.latest_year, 2022);
        assert_eq!(dash.headline.gap_label(), "18.2 pp");
        assert_eq!(dash.headline.anomaly_label(), "Yes");
        assert_eq!(dash.year_span(), (2020, 2022));
    }

    #[test]
    fn anomalies_are_filtered() {
        let dash = Dashboard::build(vec![
            point(2019, 20.0, true),
            point(2020, 20.0, false),
            point(2021, 26.0, true),
        ])
        .unwrap();
        let years: Vec<i32> = dash.anomalies.iter().map(|p| p.year).collect();
        assert_eq!(years, vec![2019, 2021]);
        assert_eq!(dash.headline.anomaly_label(), "Yes");
    }

    #[test]
    fn empty_table_has_no_dashboard() {
        assert!(Dashboard::build(Vec::new()).is_none());
    }

    #[test]
    fn serializes_headline_and_rows() {
        let dash = Dashboard::build(vec![point(2020, 21.0, false)]).unwrap();
        let json = serde_json::to_value(&dash).unwrap();
        assert_eq!(json["headline"]["latest_year"], 2020);
        assert_eq!(json["points"].as_array().unwrap().len(), 1);
        assert!(json["anomalies"].as_array().unwrap().is_empty());
    }
}
