//! Schema normalization stage.
//!
//! Mirrors every short archive code into its descriptive name. The rename is
//! additive: the original column stays queryable, the descriptive twin is a
//! copy. No row is added, removed, or reordered, and re-running the stage is
//! a no-op beyond refreshing the copies (renaming is not cumulative).

use crate::error::Result;
use crate::schema::CATALOG_SCHEMA;
use polars::prelude::*;
use tracing::debug;

/// Applies the fixed code-to-descriptive-name mapping.
pub struct SchemaNormalizer;

impl SchemaNormalizer {
    /// Copy every schema column under its descriptive name.
    pub fn normalize(df: &mut DataFrame, processing_steps: &mut Vec<String>) -> Result<()> {
        let mut copied = 0;
        for spec in &CATALOG_SCHEMA {
            let Ok(column) = df.column(spec.code) else {
                continue;
            };
            let series = column
                .as_materialized_series()
                .clone()
                .with_name(spec.name.into());
            df.with_column(series)?;
            debug!("Mirrored '{}' as '{}'", spec.code, spec.name);
            copied += 1;
        }

        processing_steps.push(format!(
            "Normalized {copied} catalog codes to descriptive names"
        ));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_df() -> DataFrame {
        df![
            "pl_name" => ["Kepler-22 b", "Kepler-452 b"],
            "st_teff" => [5518.0, 5757.0],
        ]
        .unwrap()
    }

    #[test]
    fn test_normalize_is_additive() {
        let mut df = sample_df();
        let mut steps = Vec::new();

        SchemaNormalizer::normalize(&mut df, &mut steps).unwrap();

        // Both names queryable, values identical
        assert!(df.column("st_teff").is_ok());
        let mirrored = df.column("star_temperature_kelvin").unwrap();
        assert_eq!(mirrored.get(0).unwrap().try_extract::<f64>().unwrap(), 5518.0);
        assert!(steps[0].contains("Normalized"));
    }

    #[test]
    fn test_normalize_preserves_rows_and_order() {
        let mut df = sample_df();
        let mut steps = Vec::new();

        SchemaNormalizer::normalize(&mut df, &mut steps).unwrap();

        assert_eq!(df.height(), 2);
        let names = df.column("planet_name").unwrap();
        assert!(names.get(0).unwrap().to_string().contains("Kepler-22 b"));
        assert!(names.get(1).unwrap().to_string().contains("Kepler-452 b"));
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let mut once = sample_df();
        let mut steps = Vec::new();
        SchemaNormalizer::normalize(&mut once, &mut steps).unwrap();

        let mut twice = once.clone();
        SchemaNormalizer::normalize(&mut twice, &mut steps).unwrap();

        assert!(once.equals(&twice));
        assert_eq!(once.width(), twice.width());
    }

    #[test]
    fn test_normalize_skips_absent_codes() {
        let mut df = df!["unrelated" => [1.0]].unwrap();
        let mut steps = Vec::new();

        SchemaNormalizer::normalize(&mut df, &mut steps).unwrap();

        assert_eq!(df.width(), 1);
        assert!(steps[0].contains("Normalized 0"));
    }
}
