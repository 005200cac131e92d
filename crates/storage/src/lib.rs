pub mod cache;
pub mod error;
pub mod source;

use std::sync::Arc;

use civdash_core::config::DataConfig;

pub use cache::SeriesCache;
pub use error::StorageError;
pub use source::{is_valid_identifier, JsonFileSource, SeriesSource, SqliteSource};

/// Pick the configured source: a JSON file when one is set, SQLite otherwise.
pub fn source_from_config(config: &DataConfig) -> Result<Arc<dyn SeriesSource>, StorageError> {
    match &config.json_file {
        Some(path) => Ok(Arc::new(JsonFileSource::new(path.clone()))),
        None => Ok(Arc::new(SqliteSource::new(
            config.db_path.clone(),
            config.table.clone(),
        )?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn data_config(json_file: Option<&str>, table: &str) -> DataConfig {
        DataConfig {
            db_path: PathBuf::from("civ_dash.db"),
            table: table.to_string(),
            json_file: json_file.map(PathBuf::from),
            cache_capacity: 4,
            cache_ttl_secs: None,
        }
    }

    #[test]
    fn json_file_takes_precedence() {
        let source =
            source_from_config(&data_config(Some("gap.json"), "labour_gender_gap")).unwrap();
        assert_eq!(source.id(), "json:gap.json");
    }

    #[test]
    fn sqlite_by_default() {
        let source = source_from_config(&data_config(None, "labour_gender_gap")).unwrap();
        assert_eq!(source.id(), "sqlite:civ_dash.db#labour_gender_gap");
    }

    #[test]
    fn bad_table_surfaces_at_selection() {
        assert!(matches!(
            source_from_config(&data_config(None, "bad name")),
            Err(StorageError::InvalidTable(_))
        ));
    }
}
