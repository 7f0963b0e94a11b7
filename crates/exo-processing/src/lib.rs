//! Exoplanet Catalog Preprocessing Library
//!
//! A deterministic preprocessing and feature-engineering pipeline for
//! exoplanet catalog tables, built with Rust and Polars.
//!
//! # Overview
//!
//! The pipeline runs five stages over one table, strictly in order:
//!
//! - **Loading**: parse the catalog CSV, or synthesize a seeded placeholder
//!   catalog when no file is present
//! - **Schema Normalization**: mirror short archive codes (`pl_rade`,
//!   `st_teff`, ...) into descriptive column names, additively
//! - **Missing-Value Resolution**: median or column-default imputation based
//!   on the missingness ratio, plus table-wide float rounding
//! - **Outlier Removal**: IQR-based row exclusion over a fixed, ordered
//!   column list
//! - **Feature Derivation**: habitability score, spectral classification,
//!   mass ratio, energy proxy, and safe log transforms as appended columns
//!
//! Outputs are memoized per source, so repeated requests in one process
//! reuse a single computed table.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use exo_processing::load_data;
//!
//! // Runs the pipeline once per process; later calls hit the cache.
//! let output = load_data()?;
//! println!("{} rows, source: {:?}", output.df.height(), output.source);
//!
//! let habitability = output.df.column("planet_habitability_score")?;
//! ```
//!
//! # Configuration
//!
//! The defaults match the published catalog layout; use
//! [`PipelineConfig::builder()`] to point the pipeline elsewhere or tune the
//! thresholds:
//!
//! ```rust,ignore
//! use exo_processing::{Pipeline, PipelineConfig, OutlierMode};
//!
//! let config = PipelineConfig::builder()
//!     .source_path("catalogs/candidates.csv")
//!     .missing_ratio_threshold(0.15)
//!     .outlier_mode(OutlierMode::Simultaneous)
//!     .build()?;
//!
//! let output = Pipeline::new(config).run()?;
//! for step in &output.summary.steps {
//!     println!("- {step}");
//! }
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod loader;
pub mod pipeline;
pub mod schema;
pub mod synthetic;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use cache::{load_data, PipelineCache};
pub use config::{
    ConfigValidationError, OutlierMode, PipelineConfig, PipelineConfigBuilder, DEFAULT_SOURCE_PATH,
};
pub use error::{CatalogError, Result, ResultExt};
pub use loader::{CatalogLoader, LoadedCatalog};
pub use pipeline::{
    FeatureEngine, MissingValueResolver, OutlierFilter, Pipeline, SchemaNormalizer,
};
pub use schema::{ColumnSpec, SemanticType, CATALOG_SCHEMA, LOG_TRANSFORMS, OUTLIER_COLUMNS};
pub use types::{DataSource, PipelineOutput, RunSummary};
