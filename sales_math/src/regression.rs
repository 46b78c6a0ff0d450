//! Least-squares trend fitting
//!
//! Fits a first-degree polynomial `y = slope * x + intercept` over the
//! index positions `0..n` of a series by ordinary least squares.

use crate::{MathError, Result};
use serde::{Deserialize, Serialize};

/// Linear trend fitted across a whole series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearTrend {
    slope: f64,
    intercept: f64,
    points: usize,
}

impl LinearTrend {
    /// Fit a linear trend to `values`, indexed `0, 1, ..., n - 1`
    pub fn fit(values: &[f64]) -> Result<Self> {
        if values.len() < 2 {
            return Err(MathError::InsufficientData(format!(
                "Need at least 2 points to fit a trend, have {}",
                values.len()
            )));
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(MathError::InvalidInput(
                "Trend input contains non-finite values".to_string(),
            ));
        }

        let n = values.len() as f64;
        let x_mean = (values.len() - 1) as f64 / 2.0;
        let y_mean = values.iter().sum::<f64>() / n;

        let mut numerator = 0.0;
        let mut denominator = 0.0;
        for (i, &y) in values.iter().enumerate() {
            let dx = i as f64 - x_mean;
            numerator += dx * (y - y_mean);
            denominator += dx * dx;
        }

        if denominator.abs() < 1e-10 {
            return Err(MathError::CalculationError(
                "Cannot calculate slope: x values are too similar".to_string(),
            ));
        }

        let slope = numerator / denominator;
        Ok(Self {
            slope,
            intercept: y_mean - slope * x_mean,
            points: values.len(),
        })
    }

    /// Fitted change per step
    pub fn slope(&self) -> f64 {
        self.slope
    }

    /// Fitted value at index zero
    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Number of points the trend was fitted on
    pub fn points(&self) -> usize {
        self.points
    }

    /// Value of the fitted line at index `x`
    pub fn value_at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn fits_exact_line() {
        let trend = LinearTrend::fit(&[3.0, 5.0, 7.0, 9.0]).unwrap();
        assert_abs_diff_eq!(trend.slope(), 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(trend.intercept(), 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(trend.value_at(4.0), 11.0, epsilon = 1e-12);
        assert_eq!(trend.points(), 4);
    }

    #[test]
    fn matches_least_squares_on_noisy_series() {
        // sum(dx * dy) = 100, sum(dx^2) = 17.5
        let trend = LinearTrend::fit(&[100.0, 110.0, 105.0, 120.0, 130.0, 125.0]).unwrap();
        assert_abs_diff_eq!(trend.slope(), 40.0 / 7.0, epsilon = 1e-9);
    }

    #[test]
    fn flat_series_has_zero_slope() {
        let trend = LinearTrend::fit(&[50.0; 5]).unwrap();
        assert_abs_diff_eq!(trend.slope(), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(trend.intercept(), 50.0, epsilon = 1e-12);
    }

    #[test]
    fn rejects_short_or_non_finite_input() {
        assert!(matches!(
            LinearTrend::fit(&[1.0]),
            Err(MathError::InsufficientData(_))
        ));
        assert!(matches!(
            LinearTrend::fit(&[1.0, f64::NAN, 3.0]),
            Err(MathError::InvalidInput(_))
        ));
    }
}
