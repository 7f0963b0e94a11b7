//! Shared numeric and series utilities for the catalog pipeline.

use polars::prelude::*;

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Check if a DataType is floating point.
#[inline]
pub fn is_float_dtype(dtype: &DataType) -> bool {
    matches!(dtype, DataType::Float32 | DataType::Float64)
}

/// Round a value to `decimals` decimal places, half away from zero.
#[inline]
pub fn round_to_decimals(value: f64, decimals: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Quantile of sorted values with linear interpolation between closest ranks.
///
/// Matches the reference implementation's quantile semantics. `sorted` must
/// be ascending and free of NaN; returns `None` on empty input.
pub fn quantile_linear(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    if sorted.len() == 1 {
        return Some(sorted[0]);
    }

    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if lo == hi {
        return Some(sorted[lo]);
    }
    let frac = pos - lo as f64;
    Some(sorted[lo] + frac * (sorted[hi] - sorted[lo]))
}

/// Collect the present (non-null, finite) values of a numeric series in
/// ascending order.
pub fn sorted_finite_values(series: &Series) -> PolarsResult<Vec<f64>> {
    let float_series = series.cast(&DataType::Float64)?;
    let mut values: Vec<f64> = float_series
        .f64()?
        .into_iter()
        .flatten()
        .filter(|v| v.is_finite())
        .collect();
    values.sort_by(|a, b| a.total_cmp(b));
    Ok(values)
}

/// Replace non-finite entries (NaN, ±inf) of a float series with nulls.
///
/// Integer series pass through unchanged (they cannot hold non-finite
/// values).
pub fn normalize_non_finite(series: &Series) -> PolarsResult<Series> {
    if !is_float_dtype(series.dtype()) {
        return Ok(series.clone());
    }
    let float_series = series.cast(&DataType::Float64)?;
    let normalized = float_series
        .f64()?
        .apply(|v| v.filter(|val| val.is_finite()));
    Ok(normalized.into_series().with_name(series.name().clone()))
}

/// Fraction of null entries in a series, in `[0, 1]`.
pub fn missing_ratio(series: &Series) -> f64 {
    if series.is_empty() {
        return 0.0;
    }
    series.null_count() as f64 / series.len() as f64
}

/// Fill null values in a numeric Series with a specific value.
pub fn fill_numeric_nulls(series: &Series, fill_value: f64) -> PolarsResult<Series> {
    let float_series = series.cast(&DataType::Float64)?;
    let filled = float_series
        .f64()?
        .apply(|v| v.or(Some(fill_value)));
    Ok(filled.into_series().with_name(series.name().clone()))
}

/// Fill null values in a string Series with a specific value.
pub fn fill_string_nulls(series: &Series, fill_value: &str) -> PolarsResult<Series> {
    let mask = series.is_null();
    let len = series.len();
    let mut result_vec = Vec::with_capacity(len);

    let str_series = series.cast(&DataType::String)?;
    let str_chunked = str_series.str()?;
    for i in 0..len {
        if mask.get(i).unwrap_or(false) {
            result_vec.push(Some(fill_value.to_string()));
        } else {
            result_vec.push(str_chunked.get(i).map(|s| s.to_string()));
        }
    }

    Ok(Series::new(series.name().clone(), result_vec))
}

/// Round every value of a float series to `decimals` decimal places.
pub fn round_series(series: &Series, decimals: u32) -> PolarsResult<Series> {
    let float_series = series.cast(&DataType::Float64)?;
    let rounded = float_series
        .f64()?
        .apply(|v| v.map(|val| round_to_decimals(val, decimals)));
    Ok(rounded.into_series().with_name(series.name().clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_numeric_dtype() {
        assert!(is_numeric_dtype(&DataType::Int64));
        assert!(is_numeric_dtype(&DataType::Float64));
        assert!(!is_numeric_dtype(&DataType::String));
        assert!(!is_numeric_dtype(&DataType::Boolean));
    }

    #[test]
    fn test_round_to_decimals() {
        assert_eq!(round_to_decimals(3.14159, 2), 3.14);
        assert_eq!(round_to_decimals(3.145, 2), 3.15);
        assert_eq!(round_to_decimals(-1.005, 2), -1.01);
        assert_eq!(round_to_decimals(2.0, 2), 2.0);
        assert!(round_to_decimals(f64::INFINITY, 2).is_infinite());
    }

    #[test]
    fn test_quantile_linear_interpolates() {
        // Matches pandas .quantile with linear interpolation
        let values = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile_linear(&values, 0.25), Some(1.75));
        assert_eq!(quantile_linear(&values, 0.5), Some(2.5));
        assert_eq!(quantile_linear(&values, 0.75), Some(3.25));
    }

    #[test]
    fn test_quantile_linear_exact_positions() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(quantile_linear(&values, 0.0), Some(1.0));
        assert_eq!(quantile_linear(&values, 0.5), Some(3.0));
        assert_eq!(quantile_linear(&values, 1.0), Some(5.0));
    }

    #[test]
    fn test_quantile_linear_degenerate() {
        assert_eq!(quantile_linear(&[], 0.5), None);
        assert_eq!(quantile_linear(&[42.0], 0.25), Some(42.0));
    }

    #[test]
    fn test_normalize_non_finite() {
        let series = Series::new(
            "val".into(),
            &[Some(1.0), Some(f64::INFINITY), Some(f64::NEG_INFINITY), Some(f64::NAN), None],
        );
        let normalized = normalize_non_finite(&series).unwrap();
        assert_eq!(normalized.null_count(), 4);
        assert_eq!(
            normalized.get(0).unwrap().try_extract::<f64>().unwrap(),
            1.0
        );
    }

    #[test]
    fn test_normalize_non_finite_passes_integers() {
        let series = Series::new("val".into(), &[1i64, 2, 3]);
        let normalized = normalize_non_finite(&series).unwrap();
        assert_eq!(normalized.null_count(), 0);
        assert!(matches!(normalized.dtype(), DataType::Int64));
    }

    #[test]
    fn test_missing_ratio() {
        let series = Series::new("val".into(), &[Some(1.0), None, Some(3.0), None]);
        assert_eq!(missing_ratio(&series), 0.5);

        let full = Series::new("val".into(), &[1.0, 2.0]);
        assert_eq!(missing_ratio(&full), 0.0);
    }

    #[test]
    fn test_fill_numeric_nulls() {
        let series = Series::new("test".into(), &[Some(1.0), None, Some(3.0)]);
        let filled = fill_numeric_nulls(&series, 0.0).unwrap();

        assert_eq!(filled.get(0).unwrap().try_extract::<f64>().unwrap(), 1.0);
        assert_eq!(filled.get(1).unwrap().try_extract::<f64>().unwrap(), 0.0);
        assert_eq!(filled.get(2).unwrap().try_extract::<f64>().unwrap(), 3.0);
    }

    #[test]
    fn test_fill_string_nulls() {
        let series = Series::new("test".into(), &[Some("Transit"), None]);
        let filled = fill_string_nulls(&series, "Unknown").unwrap();

        assert_eq!(filled.null_count(), 0);
        assert!(filled.get(1).unwrap().to_string().contains("Unknown"));
    }

    #[test]
    fn test_round_series() {
        let series = Series::new("test".into(), &[1.234, 5.678]);
        let rounded = round_series(&series, 2).unwrap();

        assert_eq!(rounded.get(0).unwrap().try_extract::<f64>().unwrap(), 1.23);
        assert_eq!(rounded.get(1).unwrap().try_extract::<f64>().unwrap(), 5.68);
    }

    #[test]
    fn test_sorted_finite_values() {
        let series = Series::new(
            "val".into(),
            &[Some(3.0), Some(1.0), None, Some(f64::NAN), Some(2.0)],
        );
        let sorted = sorted_finite_values(&series).unwrap();
        assert_eq!(sorted, vec![1.0, 2.0, 3.0]);
    }
}
