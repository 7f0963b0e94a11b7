//! Derived-column computation.
//!
//! Runs over the cleaned table and appends the analysis columns: the
//! habitability score, the spectral classification, the planet-to-star mass
//! ratio, the stellar energy proxy, and the safe log transforms. Existing
//! columns are never altered; every output is a new column.

use crate::error::Result;
use crate::schema::LOG_TRANSFORMS;
use crate::utils::round_to_decimals;
use polars::prelude::*;
use tracing::debug;

const EPSILON: f64 = 1e-10;

/// Earth's mean surface temperature in kelvin, the habitability anchor.
const EARTH_TEMPERATURE_K: f64 = 288.0;

/// Sun-to-Earth mass ratio, converting solar star masses to Earth units.
const SOLAR_TO_EARTH_MASS: f64 = 333_000.0;

/// Spectral classes by effective temperature, hottest first. Comparisons are
/// strict: a star at exactly 30000 K is B-type, not O-type.
const SPECTRAL_CLASSES: [(f64, &str); 6] = [
    (30_000.0, "O-type (Blue)"),
    (10_000.0, "B-type (Blue-White)"),
    (7_500.0, "A-type (White)"),
    (6_000.0, "F-type (Yellow-White)"),
    (5_200.0, "G-type (Yellow)"),
    (3_700.0, "K-type (Orange)"),
];

const SPECTRAL_FALLBACK: &str = "M-type (Red)";

/// Appends all derived columns to the cleaned catalog.
pub struct FeatureEngine;

impl FeatureEngine {
    /// Compute every derived column and append it to `df`.
    pub fn derive(df: &mut DataFrame, processing_steps: &mut Vec<String>) -> Result<()> {
        Self::habitability_score(df)?;
        Self::spectral_classification(df)?;
        Self::mass_ratio(df)?;
        Self::energy_output(df)?;
        Self::log_transforms(df)?;

        processing_steps.push(format!(
            "Derived {} feature columns",
            4 + LOG_TRANSFORMS.len()
        ));
        Ok(())
    }

    /// Score of Earth-similarity in `(0, 1]`, combining radius, mass, and
    /// equilibrium temperature. Exactly 1 only for a perfect Earth analog.
    fn habitability_score(df: &mut DataFrame) -> Result<()> {
        let radius = Self::float_column(df, "planet_radius_earth_radii")?;
        let mass = Self::float_column(df, "planet_mass_earth_masses")?;
        let temp = Self::float_column(df, "equilibrium_temperature")?;

        let scores: Vec<Option<f64>> = radius
            .into_iter()
            .zip(mass.into_iter())
            .zip(temp.into_iter())
            .map(|((r, m), t)| {
                let (r, m, t) = (r?, m?, t?);
                let radius_term = (r + EPSILON).log10().abs();
                let mass_term = (m + EPSILON).log10().abs();
                let temp_term = (t - EARTH_TEMPERATURE_K).abs() / EARTH_TEMPERATURE_K;
                let score = 1.0 / (1.0 + radius_term + mass_term + temp_term);
                Some(round_to_decimals(score, 4))
            })
            .collect();

        df.with_column(Series::new("planet_habitability_score".into(), scores))?;
        debug!("Computed habitability scores");
        Ok(())
    }

    /// Classify stars by effective temperature into the named spectral
    /// classes.
    fn spectral_classification(df: &mut DataFrame) -> Result<()> {
        let temp = Self::float_column(df, "star_temperature_kelvin")?;

        let classes: Vec<Option<&str>> = temp
            .into_iter()
            .map(|t| t.map(Self::classify_temperature))
            .collect();

        df.with_column(Series::new("star_type_classification".into(), classes))?;
        debug!("Classified star spectral types");
        Ok(())
    }

    fn classify_temperature(kelvin: f64) -> &'static str {
        for (threshold, label) in SPECTRAL_CLASSES {
            if kelvin > threshold {
                return label;
            }
        }
        SPECTRAL_FALLBACK
    }

    /// Planet mass over star mass, both in Earth units. Undefined (null) when
    /// the star mass is zero.
    fn mass_ratio(df: &mut DataFrame) -> Result<()> {
        let planet_mass = Self::float_column(df, "planet_mass_best_measurement")?;
        let star_mass = Self::float_column(df, "star_mass_solar_masses")?;

        let ratios: Vec<Option<f64>> = planet_mass
            .into_iter()
            .zip(star_mass.into_iter())
            .map(|(p, s)| {
                let (p, s) = (p?, s?);
                let ratio = p / (s * SOLAR_TO_EARTH_MASS);
                ratio.is_finite().then(|| round_to_decimals(ratio, 6))
            })
            .collect();

        df.with_column(Series::new("planet_to_star_mass_ratio".into(), ratios))?;
        debug!("Computed planet-to-star mass ratios");
        Ok(())
    }

    /// Luminosity proxy: star mass times temperature to the fourth power.
    fn energy_output(df: &mut DataFrame) -> Result<()> {
        let star_mass = Self::float_column(df, "star_mass_solar_masses")?;
        let temp = Self::float_column(df, "star_temperature_kelvin")?;

        let energy: Vec<Option<f64>> = star_mass
            .into_iter()
            .zip(temp.into_iter())
            .map(|(m, t)| {
                let (m, t) = (m?, t?);
                Some(round_to_decimals(m * t.powi(4), 2))
            })
            .collect();

        df.with_column(Series::new("star_energy_output".into(), energy))?;
        debug!("Computed star energy outputs");
        Ok(())
    }

    /// Natural log of each source column after a per-column positive shift
    /// by `|min| + epsilon`, so zero and negative inputs stay defined.
    fn log_transforms(df: &mut DataFrame) -> Result<()> {
        for (source, target) in LOG_TRANSFORMS {
            let values = Self::float_column(df, source)?;
            let shift = values
                .into_iter()
                .flatten()
                .fold(f64::INFINITY, f64::min)
                .abs();
            let shift = if shift.is_finite() { shift } else { 0.0 };

            let logged: Vec<Option<f64>> = values
                .into_iter()
                .map(|v| v.map(|val| (val + shift + EPSILON).ln()))
                .collect();

            df.with_column(Series::new(target.into(), logged))?;
            debug!("Log-transformed '{}' into '{}'", source, target);
        }
        Ok(())
    }

    fn float_column(df: &DataFrame, name: &str) -> Result<Float64Chunked> {
        let casted = df
            .column(name)?
            .as_materialized_series()
            .cast(&DataType::Float64)?;
        Ok(casted.f64()?.clone())
    }
}
