//! Result types produced by the catalog pipeline.

use polars::prelude::*;
use serde::Serialize;
use std::path::PathBuf;

/// Where the catalog table came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum DataSource {
    /// Parsed from the catalog file at this path.
    File(PathBuf),
    /// Generated because no catalog file was found. Presentation layers may
    /// surface this to the end user as a non-fatal warning.
    Synthetic,
}

impl DataSource {
    /// True when the table was synthesized rather than loaded from disk.
    pub fn is_synthetic(&self) -> bool {
        matches!(self, DataSource::Synthetic)
    }
}

/// Accounting for one pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub rows_before: usize,
    pub rows_after: usize,
    pub columns_before: usize,
    pub columns_after: usize,
    /// Human-readable log of what each stage did, in execution order.
    pub steps: Vec<String>,
    pub duration_ms: u64,
    /// When the run finished (UTC, RFC 3339).
    pub processed_at: String,
}

/// The cleaned, enriched catalog plus run metadata.
///
/// The table is a logical snapshot: callers read it freely by column name
/// and must not assume row order carries meaning beyond being stable for
/// this output's lifetime.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// The processed table with all derived columns appended.
    pub df: DataFrame,
    /// Where the raw table came from (file or synthetic fallback).
    pub source: DataSource,
    /// Run accounting and step log.
    pub summary: RunSummary,
}

impl PipelineOutput {
    /// Convenience: check a derived or source column exists before reading.
    pub fn has_column(&self, name: &str) -> bool {
        self.df.column(name).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_source_is_synthetic() {
        assert!(DataSource::Synthetic.is_synthetic());
        assert!(!DataSource::File(PathBuf::from("data/catalog.csv")).is_synthetic());
    }

    #[test]
    fn test_data_source_serializes() {
        let json = serde_json::to_string(&DataSource::Synthetic).unwrap();
        assert!(json.contains("Synthetic"));
    }

    #[test]
    fn test_has_column() {
        let output = PipelineOutput {
            df: df!["planet_name" => ["Kepler-452 b"]].unwrap(),
            source: DataSource::Synthetic,
            summary: RunSummary {
                rows_before: 1,
                rows_after: 1,
                columns_before: 1,
                columns_after: 1,
                steps: vec![],
                duration_ms: 0,
                processed_at: String::new(),
            },
        };
        assert!(output.has_column("planet_name"));
        assert!(!output.has_column("habitability"));
    }
}
