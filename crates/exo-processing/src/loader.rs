//! Catalog loading with synthetic fallback.
//!
//! The loader reads the delimited catalog file when it exists and otherwise
//! substitutes the seeded synthetic catalog. A missing file is a recoverable
//! condition, never a fatal error; the returned [`DataSource`] tells the
//! caller which path was taken so presentation layers can surface it.

use crate::config::PipelineConfig;
use crate::error::{CatalogError, Result};
use crate::schema::{self, SemanticType};
use crate::synthetic;
use crate::types::DataSource;
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use tracing::{debug, info, warn};

/// The raw catalog table before any pipeline stage has touched it.
#[derive(Debug)]
pub struct LoadedCatalog {
    pub df: DataFrame,
    pub source: DataSource,
}

/// Loads the catalog from disk or synthesizes it.
pub struct CatalogLoader;

impl CatalogLoader {
    /// Load the catalog table for `config`.
    ///
    /// Returns the parsed file when `config.source_path` exists, otherwise a
    /// synthetic table of `config.synthetic_rows` rows. Either way the
    /// result carries every column the downstream stages require; a file
    /// that lacks a required column is a [`CatalogError::ColumnNotFound`].
    pub fn load(config: &PipelineConfig) -> Result<LoadedCatalog> {
        let path = &config.source_path;

        if path.exists() {
            info!("Loading catalog from: {}", path.display());
            let df = Self::read_csv(config)?;
            if df.height() == 0 {
                return Err(CatalogError::EmptyTable);
            }
            let df = Self::coerce_numeric_columns(df)?;
            schema::validate(&df)?;
            debug!("Catalog loaded: {} rows x {} columns", df.height(), df.width());
            Ok(LoadedCatalog {
                df,
                source: DataSource::File(path.clone()),
            })
        } else {
            warn!(
                "No catalog file found at {}; using synthetic data",
                path.display()
            );
            let df = synthetic::generate(config.synthetic_rows, config.synthetic_seed)?;
            schema::validate(&df)?;
            Ok(LoadedCatalog {
                df,
                source: DataSource::Synthetic,
            })
        }
    }

    /// Parse the catalog CSV. Schema inference runs over the whole file and
    /// unparseable entries become nulls, flowing into the imputation stage
    /// instead of aborting the load.
    fn read_csv(config: &PipelineConfig) -> Result<DataFrame> {
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(None)
            .with_ignore_errors(true)
            .try_into_reader_with_file_path(Some(config.source_path.clone()))?
            .finish()?;
        Ok(df)
    }

    /// Cast required numeric columns that inferred as strings (e.g. a column
    /// polluted with text markers) to floats; entries that fail to parse
    /// become nulls.
    fn coerce_numeric_columns(mut df: DataFrame) -> Result<DataFrame> {
        for spec in &schema::CATALOG_SCHEMA {
            if !matches!(
                spec.semantic,
                SemanticType::Continuous | SemanticType::Count
            ) {
                continue;
            }
            let Ok(column) = df.column(spec.code) else {
                continue; // schema::validate reports the absence
            };
            if !matches!(column.dtype(), DataType::String) {
                continue;
            }

            let casted = column
                .as_materialized_series()
                .cast(&DataType::Float64)
                .map_err(|e| CatalogError::TypeConversionFailed {
                    column: spec.code.to_string(),
                    target_type: "Float64".to_string(),
                    reason: e.to_string(),
                })?;
            debug!("Coerced string column '{}' to numeric", spec.code);
            df.replace(spec.code, casted)?;
        }
        Ok(df)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    fn temp_csv(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("exo_loader_{name}.csv"));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    fn full_header() -> String {
        schema::CATALOG_SCHEMA
            .iter()
            .map(|spec| spec.code)
            .collect::<Vec<_>>()
            .join(",")
    }

    fn full_row(planet: &str, host: &str) -> String {
        format!(
            "{planet},{host},2015,Transit,1,1,0,1.0,1.0,365.25,1.0,288.0,1.0,5.51,0.02,1.0,G,5778.0,1.0,1.0,4.6,290.0,44.3,120.0"
        )
    }

    #[test]
    fn test_load_missing_file_falls_back_to_synthetic() {
        let config = PipelineConfig::builder()
            .source_path("/nonexistent/catalog.csv")
            .synthetic_rows(30)
            .build()
            .unwrap();

        let loaded = CatalogLoader::load(&config).unwrap();
        assert_eq!(loaded.source, DataSource::Synthetic);
        assert_eq!(loaded.df.height(), 30);
    }

    #[test]
    fn test_load_existing_file() {
        let content = format!(
            "{}\n{}\n{}\n",
            full_header(),
            full_row("Kepler-22 b", "Kepler-22"),
            full_row("Kepler-452 b", "Kepler-452"),
        );
        let path = temp_csv("basic", &content);

        let config = PipelineConfig::builder()
            .source_path(&path)
            .build()
            .unwrap();
        let loaded = CatalogLoader::load(&config).unwrap();

        assert_eq!(loaded.source, DataSource::File(path));
        assert_eq!(loaded.df.height(), 2);
        assert!(loaded.df.column("pl_rade").is_ok());
    }

    #[test]
    fn test_load_missing_required_column_errors() {
        let path = temp_csv("missing_col", "pl_name,hostname\nKepler-22 b,Kepler-22\n");
        let config = PipelineConfig::builder()
            .source_path(&path)
            .build()
            .unwrap();

        let err = CatalogLoader::load(&config).unwrap_err();
        assert_eq!(err.error_code(), "COLUMN_NOT_FOUND");
    }

    #[test]
    fn test_malformed_numeric_becomes_null() {
        // st_teff carries a text marker in the second row; the column
        // inference falls back to String and the loader coerces it, turning
        // the marker into a null for the imputer.
        let header = full_header();
        let row_a = full_row("Kepler-22 b", "Kepler-22");
        let row_b = full_row("Kepler-452 b", "Kepler-452").replace("5778.0", "not_measured");
        let path = temp_csv("malformed", &format!("{header}\n{row_a}\n{row_b}\n"));

        let config = PipelineConfig::builder()
            .source_path(&path)
            .build()
            .unwrap();
        let loaded = CatalogLoader::load(&config).unwrap();

        let teff = loaded.df.column("st_teff").unwrap();
        assert_eq!(teff.null_count(), 1);
    }
}
