//! The typed catalog schema.
//!
//! The pipeline operates on one fixed catalog layout: short archive codes
//! (`pl_rade`, `st_teff`, ...) that the normalizer mirrors into descriptive
//! names. Declaring the full column set here, with its semantic types, turns
//! "column missing" into a load-time error instead of a runtime surprise in
//! downstream consumers.

use crate::error::{CatalogError, Result};
use crate::utils::is_numeric_dtype;
use polars::prelude::*;

/// Semantic type of a catalog column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SemanticType {
    /// Unique or grouping string key (planet name, host star name).
    Identifier,
    /// Low-cardinality string (discovery method, spectral type).
    Categorical,
    /// Floating point measurement; may be missing or non-finite in source.
    Continuous,
    /// Non-negative integer (system member counts, discovery year).
    Count,
}

/// One column of the catalog: archive code, descriptive name, semantic type.
#[derive(Debug, Clone, Copy)]
pub struct ColumnSpec {
    /// Short code as it appears in the source file.
    pub code: &'static str,
    /// Descriptive name the normalizer copies the column to.
    pub name: &'static str,
    /// Semantic type used for validation and imputation policy.
    pub semantic: SemanticType,
}

const fn col(code: &'static str, name: &'static str, semantic: SemanticType) -> ColumnSpec {
    ColumnSpec {
        code,
        name,
        semantic,
    }
}

/// The full catalog schema: every source column the pipeline requires, in
/// the order the synthetic generator emits them.
pub const CATALOG_SCHEMA: [ColumnSpec; 24] = [
    // Basic planet information
    col("pl_name", "planet_name", SemanticType::Identifier),
    col("hostname", "host_star_name", SemanticType::Identifier),
    col("disc_year", "discovery_year", SemanticType::Count),
    col("discoverymethod", "discovery_method", SemanticType::Categorical),
    // Planetary system information
    col("sy_snum", "number_of_stars_in_system", SemanticType::Count),
    col("sy_pnum", "number_of_planets_in_system", SemanticType::Count),
    col("sy_mnum", "number_of_moons_in_system", SemanticType::Count),
    // Habitability and Earth comparison factors
    col("pl_rade", "planet_radius_earth_radii", SemanticType::Continuous),
    col("pl_masse", "planet_mass_earth_masses", SemanticType::Continuous),
    col("pl_orbper", "orbital_period_days", SemanticType::Continuous),
    col("pl_orbsmax", "orbit_semi_major_axis_au", SemanticType::Continuous),
    col("pl_eqt", "equilibrium_temperature", SemanticType::Continuous),
    col(
        "pl_insol",
        "insolation_flux_compared_to_earth",
        SemanticType::Continuous,
    ),
    // Physical characteristics
    col("pl_dens", "planet_density", SemanticType::Continuous),
    col("pl_orbeccen", "orbital_eccentricity", SemanticType::Continuous),
    col(
        "pl_bmasse",
        "planet_mass_best_measurement",
        SemanticType::Continuous,
    ),
    // Star information
    col("st_spectype", "star_spectral_type", SemanticType::Categorical),
    col("st_teff", "star_temperature_kelvin", SemanticType::Continuous),
    col("st_rad", "star_radius_solar_radii", SemanticType::Continuous),
    col("st_mass", "star_mass_solar_masses", SemanticType::Continuous),
    col("st_age", "star_age_billion_years", SemanticType::Continuous),
    // Location information
    col("ra", "right_ascension", SemanticType::Continuous),
    col("dec", "declination", SemanticType::Continuous),
    col("sy_dist", "distance_from_earth_parsecs", SemanticType::Continuous),
];

/// Numeric columns filtered for outliers, in the order the sequential filter
/// applies them. The order is part of the algorithm: each column's bounds
/// are computed after the previous column's removals.
pub const OUTLIER_COLUMNS: [&str; 6] = [
    "planet_radius_earth_radii",
    "planet_mass_earth_masses",
    "orbital_period_days",
    "star_temperature_kelvin",
    "star_mass_solar_masses",
    "distance_from_earth_parsecs",
];

/// (source column, derived column) pairs for the safe log transforms.
pub const LOG_TRANSFORMS: [(&str, &str); 4] = [
    ("planet_radius_earth_radii", "log_planet_radius"),
    ("planet_mass_earth_masses", "log_planet_mass"),
    ("star_mass_solar_masses", "log_star_mass"),
    ("star_temperature_kelvin", "log_star_temperature"),
];

/// Fill value used when a numeric column exceeds the missing-ratio threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultFill {
    /// Fill with zero (the general fallback).
    Zero,
    /// Fill with the column's own median. Used for star temperature, where a
    /// zero would be physically meaningless and poison the classification.
    OwnMedian,
}

/// Column-specific defaults for high-missingness numeric columns.
/// Columns not listed here fall back to zero.
pub const IMPUTATION_DEFAULTS: [(&str, DefaultFill); 4] = [
    ("star_age_billion_years", DefaultFill::Zero),
    ("orbital_eccentricity", DefaultFill::Zero),
    ("planet_density", DefaultFill::Zero),
    ("star_temperature_kelvin", DefaultFill::OwnMedian),
];

/// Look up the default fill policy for a column.
pub fn default_fill_for(column: &str) -> DefaultFill {
    IMPUTATION_DEFAULTS
        .iter()
        .find(|(name, _)| *name == column)
        .map(|(_, fill)| *fill)
        .unwrap_or(DefaultFill::Zero)
}

/// Look up the descriptive name for a source code, if it is part of the
/// schema.
pub fn descriptive_name(code: &str) -> Option<&'static str> {
    CATALOG_SCHEMA
        .iter()
        .find(|spec| spec.code == code)
        .map(|spec| spec.name)
}

/// Validate that a freshly loaded table carries every required source column
/// with a usable dtype.
///
/// Identifier and categorical columns must be strings; continuous and count
/// columns must be numeric (the loader casts string-typed numeric columns
/// before calling this, turning unparseable entries into nulls).
pub fn validate(df: &DataFrame) -> Result<()> {
    for spec in &CATALOG_SCHEMA {
        let column = df
            .column(spec.code)
            .map_err(|_| CatalogError::ColumnNotFound(spec.code.to_string()))?;
        let dtype = column.dtype();

        let ok = match spec.semantic {
            SemanticType::Identifier | SemanticType::Categorical => {
                matches!(dtype, DataType::String)
            }
            SemanticType::Continuous | SemanticType::Count => is_numeric_dtype(dtype),
        };

        if !ok {
            return Err(CatalogError::TypeConversionFailed {
                column: spec.code.to_string(),
                target_type: format!("{:?}", spec.semantic),
                reason: format!("unexpected dtype {dtype}"),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_covers_all_codes() {
        assert_eq!(CATALOG_SCHEMA.len(), 24);
        // Codes and descriptive names are unique
        for (i, a) in CATALOG_SCHEMA.iter().enumerate() {
            for b in &CATALOG_SCHEMA[i + 1..] {
                assert_ne!(a.code, b.code);
                assert_ne!(a.name, b.name);
            }
        }
    }

    #[test]
    fn test_descriptive_name_lookup() {
        assert_eq!(descriptive_name("st_teff"), Some("star_temperature_kelvin"));
        assert_eq!(descriptive_name("pl_rade"), Some("planet_radius_earth_radii"));
        assert_eq!(descriptive_name("nonexistent"), None);
    }

    #[test]
    fn test_default_fill_lookup() {
        assert_eq!(
            default_fill_for("star_temperature_kelvin"),
            DefaultFill::OwnMedian
        );
        assert_eq!(default_fill_for("orbital_eccentricity"), DefaultFill::Zero);
        // Unlisted columns use the zero fallback
        assert_eq!(default_fill_for("orbital_period_days"), DefaultFill::Zero);
    }

    #[test]
    fn test_outlier_columns_are_schema_names() {
        for name in OUTLIER_COLUMNS {
            assert!(
                CATALOG_SCHEMA.iter().any(|spec| spec.name == name),
                "{name} not in schema"
            );
        }
    }

    #[test]
    fn test_validate_missing_column() {
        let df = df!["pl_name" => ["Kepler-22 b"]].unwrap();
        let err = validate(&df).unwrap_err();
        assert_eq!(err.error_code(), "COLUMN_NOT_FOUND");
    }

    #[test]
    fn test_validate_wrong_dtype() {
        // Build a frame with every column present but st_teff as strings
        let mut df = df!["pl_name" => ["a"], "hostname" => ["b"]].unwrap();
        for spec in &CATALOG_SCHEMA[2..] {
            let series: Series = match spec.semantic {
                SemanticType::Identifier | SemanticType::Categorical => {
                    Series::new(spec.code.into(), &["x"])
                }
                SemanticType::Count => Series::new(spec.code.into(), &[1i64]),
                SemanticType::Continuous => {
                    if spec.code == "st_teff" {
                        Series::new(spec.code.into(), &["not a number"])
                    } else {
                        Series::new(spec.code.into(), &[1.0f64])
                    }
                }
            };
            df.with_column(series).unwrap();
        }

        let err = validate(&df).unwrap_err();
        assert_eq!(err.error_code(), "TYPE_CONVERSION_FAILED");
    }
}
