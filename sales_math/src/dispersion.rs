//! Central tendency and dispersion statistics
//!
//! Population statistics over complete slices:
//! - Mean
//! - Population standard deviation (divides by `n`)
//! - Coefficient of variation, as a percentage

use crate::{MathError, Result};

/// Arithmetic mean of `values`
pub fn mean(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        return Err(MathError::InsufficientData(
            "Cannot take the mean of an empty series".to_string(),
        ));
    }

    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population standard deviation of `values`
pub fn population_std_dev(values: &[f64]) -> Result<f64> {
    let mean = mean(values)?;
    let variance = values
        .iter()
        .map(|&value| {
            let diff = value - mean;
            diff * diff
        })
        .sum::<f64>()
        / values.len() as f64;

    Ok(variance.sqrt())
}

/// Population standard deviation of the last `window` values, or of the
/// whole series when it is shorter than `window`
pub fn trailing_std_dev(values: &[f64], window: usize) -> Result<f64> {
    if window == 0 {
        return Err(MathError::InvalidInput(
            "Window must be greater than zero".to_string(),
        ));
    }

    let start = values.len().saturating_sub(window);
    population_std_dev(&values[start..])
}

/// Standard deviation divided by the mean, times 100.
///
/// A series with a zero mean has no meaningful relative spread and yields
/// `CalculationError`.
pub fn coefficient_of_variation(values: &[f64]) -> Result<f64> {
    let mean = mean(values)?;
    if mean == 0.0 {
        return Err(MathError::CalculationError(
            "Coefficient of variation is undefined for a zero mean".to_string(),
        ));
    }

    Ok(population_std_dev(values)? / mean * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn population_statistics() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_abs_diff_eq!(mean(&values).unwrap(), 5.0);
        assert_abs_diff_eq!(population_std_dev(&values).unwrap(), 2.0);
        assert_abs_diff_eq!(coefficient_of_variation(&values).unwrap(), 40.0);
    }

    #[test]
    fn trailing_window_uses_most_recent_values() {
        let values = [100.0, 1.0, 2.0, 3.0];
        let expected = population_std_dev(&[1.0, 2.0, 3.0]).unwrap();
        assert_abs_diff_eq!(trailing_std_dev(&values, 3).unwrap(), expected);
        assert_abs_diff_eq!(
            trailing_std_dev(&values, 10).unwrap(),
            population_std_dev(&values).unwrap()
        );
    }

    #[test]
    fn degenerate_inputs() {
        assert!(mean(&[]).is_err());
        assert!(trailing_std_dev(&[1.0], 0).is_err());
        assert!(matches!(
            coefficient_of_variation(&[0.0, 0.0]),
            Err(MathError::CalculationError(_))
        ));
        assert_abs_diff_eq!(population_std_dev(&[7.0; 4]).unwrap(), 0.0);
    }
}
