//! IQR-based outlier removal.
//!
//! Rows whose value in a monitored column falls outside
//! `[Q1 - k*IQR, Q3 + k*IQR]` are dropped. Two modes exist:
//!
//! * **Sequential** (default): columns are processed in schema order, and
//!   each column's quartiles are computed over the rows that survived the
//!   previous columns. This is order-dependent and matches the historical
//!   behavior consumers were tuned against.
//! * **Simultaneous**: all bounds are computed once over the full input, then
//!   a single combined mask drops every row out of bounds in any column.
//!
//! Rows with a null in a monitored column are never dropped by that column;
//! imputation runs first in the standard pipeline, so nulls here only occur
//! when the stage is used standalone.

use crate::config::{OutlierMode, PipelineConfig};
use crate::error::Result;
use crate::schema::OUTLIER_COLUMNS;
use crate::utils::{quantile_linear, sorted_finite_values};
use polars::prelude::*;
use tracing::{debug, info};

/// Inclusive keep-range for one column.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Bounds {
    lower: f64,
    upper: f64,
}

/// Removes statistical outliers from the monitored catalog columns.
pub struct OutlierFilter;

impl OutlierFilter {
    /// Filter `df` in place per `config.outlier_mode`.
    ///
    /// Monitored columns absent from the table are skipped. Returns the
    /// number of rows removed.
    pub fn filter(
        df: &mut DataFrame,
        config: &PipelineConfig,
        processing_steps: &mut Vec<String>,
    ) -> Result<usize> {
        let rows_before = df.height();

        match config.outlier_mode {
            OutlierMode::Sequential => Self::filter_sequential(df, config, processing_steps)?,
            OutlierMode::Simultaneous => Self::filter_simultaneous(df, config, processing_steps)?,
        }

        let removed = rows_before - df.height();
        info!(
            "Outlier removal dropped {} of {} rows ({:?})",
            removed, rows_before, config.outlier_mode
        );
        processing_steps.push(format!(
            "Removed {removed} outlier rows across {} columns",
            OUTLIER_COLUMNS.len()
        ));
        Ok(removed)
    }

    fn filter_sequential(
        df: &mut DataFrame,
        config: &PipelineConfig,
        processing_steps: &mut Vec<String>,
    ) -> Result<()> {
        for col_name in OUTLIER_COLUMNS {
            if df.column(col_name).is_err() {
                debug!("Outlier column '{}' absent, skipping", col_name);
                continue;
            }

            let series = df.column(col_name)?.as_materialized_series().clone();
            let Some(bounds) = Self::iqr_bounds(&series, config.iqr_factor)? else {
                continue;
            };

            let before = df.height();
            let mask = Self::keep_mask(&series, bounds)?;
            *df = df.filter(&mask)?;

            let dropped = before - df.height();
            if dropped > 0 {
                debug!(
                    "Column '{}': dropped {} rows outside [{:.4}, {:.4}]",
                    col_name, dropped, bounds.lower, bounds.upper
                );
                processing_steps.push(format!(
                    "Removed {dropped} outliers from '{col_name}'"
                ));
            }
        }
        Ok(())
    }

    fn filter_simultaneous(
        df: &mut DataFrame,
        config: &PipelineConfig,
        processing_steps: &mut Vec<String>,
    ) -> Result<()> {
        // All bounds come from the untouched input
        let mut combined: Option<BooleanChunked> = None;
        for col_name in OUTLIER_COLUMNS {
            if df.column(col_name).is_err() {
                debug!("Outlier column '{}' absent, skipping", col_name);
                continue;
            }

            let series = df.column(col_name)?.as_materialized_series().clone();
            let Some(bounds) = Self::iqr_bounds(&series, config.iqr_factor)? else {
                continue;
            };
            debug!(
                "Column '{}': keep range [{:.4}, {:.4}]",
                col_name, bounds.lower, bounds.upper
            );

            let mask = Self::keep_mask(&series, bounds)?;
            combined = Some(match combined {
                Some(acc) => &acc & &mask,
                None => mask,
            });
        }

        if let Some(mask) = combined {
            let before = df.height();
            *df = df.filter(&mask)?;
            let dropped = before - df.height();
            if dropped > 0 {
                processing_steps.push(format!(
                    "Removed {dropped} outliers via combined bounds"
                ));
            }
        }
        Ok(())
    }

    /// IQR bounds over the present values of `series`.
    ///
    /// Returns `None` when the column is empty of finite values. A
    /// zero-variance column yields `lower == upper`, which the keep mask
    /// turns into an equality filter.
    fn iqr_bounds(series: &Series, factor: f64) -> Result<Option<Bounds>> {
        let values = sorted_finite_values(series)?;
        let (Some(q1), Some(q3)) = (
            quantile_linear(&values, 0.25),
            quantile_linear(&values, 0.75),
        ) else {
            return Ok(None);
        };

        let iqr = q3 - q1;
        Ok(Some(Bounds {
            lower: q1 - factor * iqr,
            upper: q3 + factor * iqr,
        }))
    }

    /// True for rows to keep: in bounds, or null (nulls are not evidence of
    /// being an outlier).
    fn keep_mask(series: &Series, bounds: Bounds) -> Result<BooleanChunked> {
        let float_series = series.cast(&DataType::Float64)?;
        let keep: Vec<bool> = float_series
            .f64()?
            .into_iter()
            .map(|v| match v {
                Some(val) if val.is_finite() => val >= bounds.lower && val <= bounds.upper,
                _ => true,
            })
            .collect();
        Ok(BooleanChunked::from_slice("mask".into(), &keep))
    }
}
