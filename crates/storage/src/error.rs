use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("sqlite error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("data source not found: {0}")]
    NotFound(String),

    #[error("invalid table name '{0}'")]
    InvalidTable(String),

    #[error("missing {column} value for year {year}")]
    MissingValue { year: i64, column: &'static str },

    #[error("year {0} is out of range")]
    InvalidYear(i64),
}
