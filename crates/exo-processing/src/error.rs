//! Custom error types for the catalog preprocessing pipeline.
//!
//! This module provides the error hierarchy using `thiserror`. Note that the
//! pipeline's designed failure modes (missing source file, all-null columns,
//! zero-variance filter columns) are *not* errors — they degrade to defined
//! substitute behavior. The variants here cover conditions that genuinely
//! cannot be recovered from inside the pipeline.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for the catalog pipeline.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// A required catalog column was not found in the loaded table.
    #[error("Column '{0}' not found in catalog")]
    ColumnNotFound(String),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The loaded table has no rows.
    #[error("Catalog table is empty")]
    EmptyTable,

    /// Type conversion failed for a catalog column.
    #[error("Failed to convert column '{column}' to {target_type}: {reason}")]
    TypeConversionFailed {
        column: String,
        target_type: String,
        reason: String,
    },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<CatalogError>,
    },
}

impl CatalogError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        CatalogError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Get a stable error code for consumers that dispatch on error kind.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::EmptyTable => "EMPTY_TABLE",
            Self::TypeConversionFailed { .. } => "TYPE_CONVERSION_FAILED",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if this error is recoverable (i.e., not a fundamental failure).
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::EmptyTable | Self::InvalidConfig(_))
    }
}

/// Serialize implementation for downstream consumers.
///
/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for CatalogError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("CatalogError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| CatalogError::Polars(e).with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        assert_eq!(CatalogError::EmptyTable.error_code(), "EMPTY_TABLE");
        assert_eq!(
            CatalogError::ColumnNotFound("pl_rade".to_string()).error_code(),
            "COLUMN_NOT_FOUND"
        );
    }

    #[test]
    fn test_is_recoverable() {
        assert!(CatalogError::EmptyTable.is_recoverable());
        assert!(CatalogError::InvalidConfig("bad threshold".to_string()).is_recoverable());
        assert!(!CatalogError::ColumnNotFound("st_teff".to_string()).is_recoverable());
    }

    #[test]
    fn test_error_serialization() {
        let error = CatalogError::ColumnNotFound("st_teff".to_string());
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("COLUMN_NOT_FOUND"));
        assert!(json.contains("st_teff"));
    }

    #[test]
    fn test_with_context() {
        let error =
            CatalogError::ColumnNotFound("pl_masse".to_string()).with_context("During load");
        assert!(error.to_string().contains("During load"));
        assert_eq!(error.error_code(), "COLUMN_NOT_FOUND"); // Preserves original code
    }
}
