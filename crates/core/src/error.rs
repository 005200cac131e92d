use thiserror::Error;

use crate::series::RateField;

/// Precondition violations on an input series.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SeriesError {
    #[error("series is empty")]
    Empty,

    #[error("non-finite {field} rate in year {year}")]
    NonFinite { year: i32, field: RateField },

    #[error("{field} rate {value} in year {year} is outside 0..=100")]
    OutOfRange {
        year: i32,
        field: RateField,
        value: f64,
    },

    #[error("year {year} does not follow {previous} (years must be strictly ascending)")]
    NotAscending { previous: i32, year: i32 },
}

#[derive(Error, Debug)]
pub enum CivdashError {
    #[error("Series error: {0}")]
    Series(#[from] SeriesError),

    #[error("Config error: {0}")]
    Config(String),
}
