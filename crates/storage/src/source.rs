use std::path::{Path, PathBuf};

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::{debug, info};

use civdash_core::TimeSeriesPoint;

use crate::error::StorageError;

/// Something that can produce the `(year, female, male)` series.
#[async_trait]
pub trait SeriesSource: Send + Sync {
    /// Stable identifier, used as the cache key.
    fn id(&self) -> String;

    /// Load the full series, ordered ascending by year.
    async fn load(&self) -> Result<Vec<TimeSeriesPoint>, StorageError>;
}

/// Plain SQL identifier: `[A-Za-z_][A-Za-z0-9_]*`.
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

// ── SQLite ────────────────────────────────────────────────────

/// Reads a participation table from a local SQLite file (read-only).
#[derive(Debug, Clone)]
pub struct SqliteSource {
    path: PathBuf,
    table: String,
}

impl SqliteSource {
    pub fn new(path: impl Into<PathBuf>, table: impl Into<String>) -> Result<Self, StorageError> {
        let table = table.into();
        if !is_valid_identifier(&table) {
            return Err(StorageError::InvalidTable(table));
        }
        Ok(Self {
            path: path.into(),
            table,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    fn select_sql(&self) -> String {
        format!(
            "SELECT CAST(year AS INTEGER) AS year, CAST(female AS REAL) AS female, \
             CAST(male AS REAL) AS male FROM {} ORDER BY year",
            self.table
        )
    }
}

#[async_trait]
impl SeriesSource for SqliteSource {
    fn id(&self) -> String {
        format!("sqlite:{}#{}", self.path.display(), self.table)
    }

    async fn load(&self) -> Result<Vec<TimeSeriesPoint>, StorageError> {
        if !self.path.exists() {
            return Err(StorageError::NotFound(self.path.display().to_string()));
        }

        let options = SqliteConnectOptions::new()
            .filename(&self.path)
            .read_only(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        let sql = self.select_sql();
        debug!(sql = %sql, "querying series");
        let rows = sqlx::query_as::<_, (i64, Option<f64>, Option<f64>)>(&sql)
            .fetch_all(&pool)
            .await;
        pool.close().await;
        let rows = rows?;

        let points = rows
            .into_iter()
            .map(|(year, female, male)| {
                let female = female.ok_or(StorageError::MissingValue {
                    year,
                    column: "female",
                })?;
                let male = male.ok_or(StorageError::MissingValue {
                    year,
                    column: "male",
                })?;
                let year = i32::try_from(year).map_err(|_| StorageError::InvalidYear(year))?;
                Ok(TimeSeriesPoint::new(year, female, male))
            })
            .collect::<Result<Vec<_>, StorageError>>()?;

        info!(
            path = %self.path.display(),
            table = %self.table,
            rows = points.len(),
            "loaded series from sqlite"
        );
        Ok(points)
    }
}

// ── JSON file ─────────────────────────────────────────────────

/// Reads a JSON array of `{ "year", "female", "male" }` objects.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SeriesSource for JsonFileSource {
    fn id(&self) -> String {
        format!("json:{}", self.path.display())
    }

    async fn load(&self) -> Result<Vec<TimeSeriesPoint>, StorageError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::NotFound(self.path.display().to_string()));
            }
            Err(e) => return Err(StorageError::Io(e)),
        };
        let mut points: Vec<TimeSeriesPoint> = serde_json::from_str(&content)?;
        points.sort_by_key(|p| p.year);

        info!(
            path = %self.path.display(),
            rows = points.len(),
            "loaded series from json"
        );
        Ok(points)
    }
}
