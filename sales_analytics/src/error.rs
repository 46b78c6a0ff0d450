//! Error types for the sales_analytics crate

use polars::prelude::PolarsError;
use sales_math::MathError;
use thiserror::Error;

/// Custom error types for the sales_analytics crate
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// Error related to data validation or processing
    #[error("Data error: {0}")]
    DataError(String),

    /// A required dataset column is absent
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error from trend or dispersion math
    #[error("Math error: {0}")]
    MathError(#[from] MathError),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from Polars operations
    #[error("Polars error: {0}")]
    PolarsError(String),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, AnalyticsError>;

impl From<PolarsError> for AnalyticsError {
    fn from(err: PolarsError) -> Self {
        AnalyticsError::PolarsError(err.to_string())
    }
}
