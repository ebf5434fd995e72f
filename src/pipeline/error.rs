//! Error types for the analysis pipeline.

use thiserror::Error;

/// Errors raised by the matrix computations and the dataset boundary.
///
/// These are never recovered inside the library: a missing target or a
/// malformed schema is reported to the caller as-is.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AnalysisError {
    /// The input cannot be analyzed (missing target, too few usable columns,
    /// schema violations caught at load time).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A named column does not exist in the dataset or matrix.
    #[error("Column '{column}' not found")]
    ColumnNotFound { column: String },
}

impl AnalysisError {
    pub fn invalid(message: impl Into<String>) -> Self {
        AnalysisError::InvalidInput(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_display() {
        let err = AnalysisError::invalid("target column 'SalePrice' is absent");
        assert_eq!(
            err.to_string(),
            "Invalid input: target column 'SalePrice' is absent"
        );
    }

    #[test]
    fn test_column_not_found_display() {
        let err = AnalysisError::ColumnNotFound {
            column: "GrLivArea".to_string(),
        };
        assert_eq!(err.to_string(), "Column 'GrLivArea' not found");
    }
}
