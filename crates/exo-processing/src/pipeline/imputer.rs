//! Missing-value resolution stage.
//!
//! Policy per numeric column: non-finite entries are first normalized to
//! nulls, then the missing ratio decides the fill. At or below the threshold
//! (10% by default) the column's median over present values is used; above
//! it, a column-specific default applies. High-missingness catalog columns
//! are assumed not missing-at-random, so a fixed default is preferred over
//! median-imputation bias there. Categorical columns always fill with
//! "Unknown".
//!
//! After imputation every float column is rounded to two decimals,
//! table-wide, to normalize downstream display.

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::schema::{default_fill_for, DefaultFill};
use crate::utils::{
    fill_numeric_nulls, fill_string_nulls, is_float_dtype, is_numeric_dtype, missing_ratio,
    normalize_non_finite, round_series,
};
use polars::prelude::*;
use tracing::{debug, warn};

/// Resolves every missing entry in the catalog table.
pub struct MissingValueResolver;

impl MissingValueResolver {
    /// Impute all numeric and categorical columns, then apply the table-wide
    /// float rounding. After this stage no column holds a null or a
    /// non-finite value.
    pub fn resolve(
        df: &mut DataFrame,
        config: &PipelineConfig,
        processing_steps: &mut Vec<String>,
    ) -> Result<()> {
        let column_names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();

        for col_name in &column_names {
            let dtype = df.column(col_name)?.dtype().clone();
            if is_numeric_dtype(&dtype) {
                Self::resolve_numeric(df, col_name, config, processing_steps)?;
            } else if matches!(dtype, DataType::String) {
                Self::resolve_categorical(df, col_name, processing_steps)?;
            }
        }

        Self::round_float_columns(df, config.float_decimals, processing_steps)?;
        Ok(())
    }

    /// Impute one numeric column per the ratio policy.
    fn resolve_numeric(
        df: &mut DataFrame,
        col_name: &str,
        config: &PipelineConfig,
        processing_steps: &mut Vec<String>,
    ) -> Result<()> {
        let series = df.column(col_name)?.as_materialized_series();
        let normalized = normalize_non_finite(series)?;

        let ratio = missing_ratio(&normalized);
        if ratio == 0.0 {
            // Write back anyway, the normalization widens Float32 to Float64
            df.replace(col_name, normalized)?;
            return Ok(());
        }

        let median = normalized.cast(&DataType::Float64)?.f64()?.median();

        let (fill_value, method) = if ratio <= config.missing_ratio_threshold {
            match median {
                Some(m) => (m, "median"),
                None => (0.0, "default (no values present)"),
            }
        } else {
            match default_fill_for(col_name) {
                DefaultFill::OwnMedian => match median {
                    Some(m) => (m, "own median (default)"),
                    None => (0.0, "default (no values present)"),
                },
                DefaultFill::Zero => (0.0, "default"),
            }
        };

        if median.is_none() {
            warn!("Column '{}' is entirely missing; filling with 0", col_name);
        }

        let filled = Self::fill_preserving_dtype(&normalized, fill_value)?;
        df.replace(col_name, filled)?;

        processing_steps.push(format!(
            "Filled '{}' with {}: {:.2} ({:.1}% missing)",
            col_name,
            method,
            fill_value,
            ratio * 100.0
        ));
        debug!(
            "Imputed '{}' via {} ({:.1}% missing)",
            col_name,
            method,
            ratio * 100.0
        );
        Ok(())
    }

    /// Fill nulls without widening integer columns to floats. A fractional
    /// fill value in an integer column is rounded to the nearest integer.
    fn fill_preserving_dtype(series: &Series, fill_value: f64) -> Result<Series> {
        if is_float_dtype(series.dtype()) {
            return Ok(fill_numeric_nulls(series, fill_value)?);
        }
        let filled = fill_numeric_nulls(series, fill_value.round())?;
        Ok(filled.cast(series.dtype())?)
    }

    /// Fill one categorical column with the literal "Unknown".
    fn resolve_categorical(
        df: &mut DataFrame,
        col_name: &str,
        processing_steps: &mut Vec<String>,
    ) -> Result<()> {
        let series = df.column(col_name)?.as_materialized_series();
        let null_count = series.null_count();
        if null_count == 0 {
            return Ok(());
        }

        let filled = fill_string_nulls(series, "Unknown")?;
        df.replace(col_name, filled)?;

        processing_steps.push(format!(
            "Filled '{}' with constant value: 'Unknown' ({} entries)",
            col_name, null_count
        ));
        debug!("Filled '{}' nulls with 'Unknown'", col_name);
        Ok(())
    }

    /// Round every float column to `decimals` places. Applied table-wide,
    /// not per-column: a deliberate precision-reduction step.
    fn round_float_columns(
        df: &mut DataFrame,
        decimals: u32,
        processing_steps: &mut Vec<String>,
    ) -> Result<()> {
        let column_names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();

        let mut rounded_cols = 0;
        for col_name in &column_names {
            let series = df.column(col_name)?.as_materialized_series();
            if !is_float_dtype(series.dtype()) {
                continue;
            }
            let rounded = round_series(series, decimals)?;
            df.replace(col_name, rounded)?;
            rounded_cols += 1;
        }

        processing_steps.push(format!(
            "Rounded {rounded_cols} float columns to {decimals} decimal places"
        ));
        Ok(())
    }
}
