use serde::{Deserialize, Serialize};

use crate::error::SeriesError;

/// One year of labour force participation, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    pub year: i32,
    pub female: f64,
    pub male: f64,
}

impl TimeSeriesPoint {
    pub fn new(year: i32, female: f64, male: f64) -> Self {
        Self { year, female, male }
    }

    /// Gender gap in percentage points (male minus female).
    pub fn gap(&self) -> f64 {
        self.male - self.female
    }
}

/// A point with its derived trend and anomaly flag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedPoint {
    pub year: i32,
    pub female: f64,
    pub male: f64,
    pub gap: f64,
    /// Trailing moving average of the gap.
    pub trend: f64,
    #[serde(rename = "anomaly")]
    pub is_anomaly: bool,
}

impl AnnotatedPoint {
    pub fn from_point(point: &TimeSeriesPoint, trend: f64, is_anomaly: bool) -> Self {
        Self {
            year: point.year,
            female: point.female,
            male: point.male,
            gap: point.gap(),
            trend,
            is_anomaly,
        }
    }
}

/// Which rate a validation error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RateField {
    Female,
    Male,
}

impl std::fmt::Display for RateField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RateField::Female => write!(f, "female"),
            RateField::Male => write!(f, "male"),
        }
    }
}

/// Check the preconditions the trend/anomaly computation relies on.
///
/// Rejects empty input, non-finite or out-of-range rates, and years that are
/// not strictly ascending.
pub fn validate_series(points: &[TimeSeriesPoint]) -> Result<(), SeriesError> {
    if points.is_empty() {
        return Err(SeriesError::Empty);
    }

    let mut previous: Option<i32> = None;
    for p in points {
        for (field, value) in [(RateField::Female, p.female), (RateField::Male, p.male)] {
            if !value.is_finite() {
                return Err(SeriesError::NonFinite {
                    year: p.year,
                    field,
                });
            }
            if !(0.0..=100.0).contains(&value) {
                return Err(SeriesError::OutOfRange {
                    year: p.year,
                    field,
                    value,
                });
            }
        }

        if let Some(prev) = previous {
            if p.year <= prev {
                return Err(SeriesError::NotAscending {
                    previous: prev,
                    year: p.year,
                });
            }
        }
        previous = Some(p.year);
    }

    Ok(())
}
