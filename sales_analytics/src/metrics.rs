//! Summary metrics for a monthly sales series
//!
//! All metrics are pure functions of the unit and revenue sequences and do
//! not care whether the series is real or synthetic. Degenerate inputs
//! (short, empty or all-zero series) produce zeros rather than errors.

use crate::series::SalesSeries;
use sales_math::{coefficient_of_variation, round_to};
use serde::Serialize;

/// Months compared on each side of the growth calculation
const GROWTH_PERIOD: usize = 3;

/// Key performance metrics of a series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metrics {
    /// Percent change of the last 3 months over the 3 before them
    pub growth_rate: f64,
    /// Month with the most units, first on ties; absent for an empty series
    pub peak_month: Option<String>,
    /// Units sold in the peak month
    pub peak_sales: u64,
    /// Revenue per unit over the whole series
    pub avg_price: f64,
    /// Coefficient of variation of monthly units, in percent
    pub volatility: f64,
}

/// Compute every metric for `series`
pub fn compute_metrics(series: &SalesSeries) -> Metrics {
    let units = series.units();
    let (peak_month, peak_sales) = match peak_index(&units) {
        Some(idx) => (Some(series.points()[idx].label()), units[idx]),
        None => (None, 0),
    };

    Metrics {
        growth_rate: growth_rate(&units),
        peak_month,
        peak_sales,
        avg_price: avg_price(series.total_units(), &series.revenues()),
        volatility: volatility(&series.unit_values()),
    }
}

/// Growth of the most recent three months over the three before, in
/// percent to one decimal.
///
/// Zero with fewer than six months or an empty previous period.
pub fn growth_rate(units: &[u64]) -> f64 {
    if units.len() < 2 * GROWTH_PERIOD {
        return 0.0;
    }

    let n = units.len();
    let recent: u64 = units[n - GROWTH_PERIOD..].iter().sum();
    let previous: u64 = units[n - 2 * GROWTH_PERIOD..n - GROWTH_PERIOD].iter().sum();
    if previous == 0 {
        return 0.0;
    }

    round_to((recent as f64 - previous as f64) / previous as f64 * 100.0, 1)
}

/// Index of the first maximum
fn peak_index(units: &[u64]) -> Option<usize> {
    let max = *units.iter().max()?;
    units.iter().position(|&u| u == max)
}

/// Total revenue per unit to the cent, zero without units
fn avg_price(total_units: u64, revenues: &[f64]) -> f64 {
    if total_units == 0 {
        return 0.0;
    }
    round_to(revenues.iter().sum::<f64>() / total_units as f64, 2)
}

/// Coefficient of variation to one decimal, zero for an empty or zero-mean series
fn volatility(units: &[f64]) -> f64 {
    coefficient_of_variation(units).map_or(0.0, |cv| round_to(cv, 1))
}
