//! # Sales Math
//!
//! Numeric building blocks for sales trend analysis.
//! This crate provides the least-squares trend fit and the dispersion
//! statistics used by the forecasting and metrics code in `sales_analytics`.

use thiserror::Error;

pub mod dispersion;
pub mod regression;

pub use dispersion::{coefficient_of_variation, mean, population_std_dev, trailing_std_dev};
pub use regression::LinearTrend;

/// Errors that can occur in sales calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for sales math operations
pub type Result<T> = std::result::Result<T, MathError>;

/// Round `value` to `decimals` places, half away from zero.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10_f64.powi(decimals as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_to_keeps_requested_precision() {
        assert_eq!(round_to(19.047_619, 1), 19.0);
        assert_eq!(round_to(1234.5678, 2), 1234.57);
        assert_eq!(round_to(-2.25, 1), -2.3);
        assert_eq!(round_to(7.0, 0), 7.0);
    }
}
