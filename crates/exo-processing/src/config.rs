//! Configuration types for the catalog preprocessing pipeline.
//!
//! All thresholds and column policies are fixed by default — the one-call
//! entry point [`crate::load_data`] never requires a config. The builder
//! exists for the CLI and for tests that need to point the pipeline at a
//! different source file or tweak the synthetic generator.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Well-known relative path checked for the catalog file.
pub const DEFAULT_SOURCE_PATH: &str = "data/exoplanets_full_features.csv";

/// How per-column IQR bounds are combined across the outlier column list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OutlierMode {
    /// Filter column-by-column in the declared order; each column's bounds
    /// are computed on the table *after* the previous column's removals.
    /// This is the reference behavior and the results are order-dependent.
    #[default]
    Sequential,
    /// Compute every column's bounds against the original table, then apply
    /// all of them at once.
    Simultaneous,
}

/// Configuration for the preprocessing pipeline.
///
/// Use [`PipelineConfig::builder()`] for fluent construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Path to the catalog CSV file. Absence is not an error — the pipeline
    /// falls back to a seeded synthetic catalog.
    pub source_path: PathBuf,

    /// Number of rows in the synthetic fallback catalog.
    /// Default: 500
    pub synthetic_rows: usize,

    /// RNG seed for the synthetic fallback catalog, fixed for
    /// reproducibility.
    /// Default: 42
    pub synthetic_seed: u64,

    /// Missing-value ratio at or below which a numeric column is imputed
    /// with its median; above it, the column-specific default applies.
    /// Default: 0.10
    pub missing_ratio_threshold: f64,

    /// Multiplier on the IQR when computing outlier bounds.
    /// Default: 1.5
    pub iqr_factor: f64,

    /// Decimal places every float column is rounded to after imputation.
    /// Default: 2
    pub float_decimals: u32,

    /// How outlier bounds are combined across columns.
    /// Default: Sequential
    pub outlier_mode: OutlierMode,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            source_path: PathBuf::from(DEFAULT_SOURCE_PATH),
            synthetic_rows: 500,
            synthetic_seed: 42,
            missing_ratio_threshold: 0.10,
            iqr_factor: 1.5,
            float_decimals: 2,
            outlier_mode: OutlierMode::default(),
        }
    }
}

impl PipelineConfig {
    /// Create a new configuration builder.
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if !(0.0..=1.0).contains(&self.missing_ratio_threshold) {
            return Err(ConfigValidationError::InvalidThreshold {
                field: "missing_ratio_threshold".to_string(),
                value: self.missing_ratio_threshold,
            });
        }

        if !self.iqr_factor.is_finite() || self.iqr_factor <= 0.0 {
            return Err(ConfigValidationError::InvalidIqrFactor(self.iqr_factor));
        }

        if self.synthetic_rows == 0 {
            return Err(ConfigValidationError::InvalidSyntheticRows(
                self.synthetic_rows,
            ));
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid threshold for '{field}': {value} (must be between 0.0 and 1.0)")]
    InvalidThreshold { field: String, value: f64 },

    #[error("Invalid IQR factor: {0} (must be finite and positive)")]
    InvalidIqrFactor(f64),

    #[error("Invalid synthetic row count: {0} (must be at least 1)")]
    InvalidSyntheticRows(usize),
}

/// Builder for [`PipelineConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct PipelineConfigBuilder {
    source_path: Option<PathBuf>,
    synthetic_rows: Option<usize>,
    synthetic_seed: Option<u64>,
    missing_ratio_threshold: Option<f64>,
    iqr_factor: Option<f64>,
    float_decimals: Option<u32>,
    outlier_mode: Option<OutlierMode>,
}

impl PipelineConfigBuilder {
    /// Set the catalog source file path.
    pub fn source_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.source_path = Some(path.into());
        self
    }

    /// Set the number of rows generated when the source file is absent.
    pub fn synthetic_rows(mut self, rows: usize) -> Self {
        self.synthetic_rows = Some(rows);
        self
    }

    /// Set the RNG seed for the synthetic fallback catalog.
    pub fn synthetic_seed(mut self, seed: u64) -> Self {
        self.synthetic_seed = Some(seed);
        self
    }

    /// Set the missing-ratio threshold for the median-vs-default imputation
    /// split.
    ///
    /// # Arguments
    /// * `threshold` - Value between 0.0 and 1.0 (e.g., 0.10 = 10%)
    pub fn missing_ratio_threshold(mut self, threshold: f64) -> Self {
        self.missing_ratio_threshold = Some(threshold);
        self
    }

    /// Set the IQR multiplier for outlier bounds.
    pub fn iqr_factor(mut self, factor: f64) -> Self {
        self.iqr_factor = Some(factor);
        self
    }

    /// Set the table-wide float rounding precision.
    pub fn float_decimals(mut self, decimals: u32) -> Self {
        self.float_decimals = Some(decimals);
        self
    }

    /// Set the outlier bound combination mode.
    pub fn outlier_mode(mut self, mode: OutlierMode) -> Self {
        self.outlier_mode = Some(mode);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `PipelineConfig` or an error if validation fails.
    pub fn build(self) -> Result<PipelineConfig, ConfigValidationError> {
        let defaults = PipelineConfig::default();
        let config = PipelineConfig {
            source_path: self.source_path.unwrap_or(defaults.source_path),
            synthetic_rows: self.synthetic_rows.unwrap_or(defaults.synthetic_rows),
            synthetic_seed: self.synthetic_seed.unwrap_or(defaults.synthetic_seed),
            missing_ratio_threshold: self
                .missing_ratio_threshold
                .unwrap_or(defaults.missing_ratio_threshold),
            iqr_factor: self.iqr_factor.unwrap_or(defaults.iqr_factor),
            float_decimals: self.float_decimals.unwrap_or(defaults.float_decimals),
            outlier_mode: self.outlier_mode.unwrap_or_default(),
        };

        config.validate()?;
        Ok(config)
    }
}
