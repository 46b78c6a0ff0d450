mod common;

use approx::assert_relative_eq;
use common::date;
use chrono::Months;
use pretty_assertions::assert_eq;
use rstest::rstest;
use sales_analytics::metrics::growth_rate;
use sales_analytics::{compute_metrics, MonthlyPoint, Origin, SalesSeries};

/// Series starting January 2024 with a flat unit price of 10
fn series_of(units: &[u64]) -> SalesSeries {
    let start = date(2024, 1, 1);
    let points = units
        .iter()
        .enumerate()
        .map(|(i, &u)| {
            let month = start + Months::new(i as u32);
            MonthlyPoint::new(month, u, u as f64 * 10.0)
        })
        .collect();
    SalesSeries::new(points, Origin::Real)
}

#[test]
fn test_metrics_of_growing_series() {
    let metrics = compute_metrics(&series_of(&[100, 110, 105, 120, 130, 125]));

    assert_relative_eq!(metrics.growth_rate, 19.0);
    assert_eq!(metrics.peak_month.as_deref(), Some("2024-05"));
    assert_eq!(metrics.peak_sales, 130);
    assert_relative_eq!(metrics.avg_price, 10.0);
    assert_relative_eq!(metrics.volatility, 9.4);
}

#[test]
fn test_flat_series_has_no_volatility() {
    let metrics = compute_metrics(&series_of(&[40; 8]));

    assert_relative_eq!(metrics.volatility, 0.0);
    assert_relative_eq!(metrics.growth_rate, 0.0);
    assert_eq!(metrics.peak_month.as_deref(), Some("2024-01"));
    assert_eq!(metrics.peak_sales, 40);
}

#[rstest]
#[case(&[], 0.0)]
#[case(&[10, 20, 30, 40, 50], 0.0)]
#[case(&[0, 0, 0, 5, 5, 5], 0.0)]
#[case(&[10, 10, 10, 5, 5, 5], -50.0)]
#[case(&[1, 1, 1, 1, 1, 1, 1, 2, 3], 100.0)]
fn test_growth_rate(#[case] units: &[u64], #[case] expected: f64) {
    assert_relative_eq!(growth_rate(units), expected);
}

#[test]
fn test_empty_series_metrics() {
    let metrics = compute_metrics(&series_of(&[]));

    assert_eq!(metrics.peak_month, None);
    assert_eq!(metrics.peak_sales, 0);
    assert_relative_eq!(metrics.avg_price, 0.0);
    assert_relative_eq!(metrics.volatility, 0.0);
    assert_relative_eq!(metrics.growth_rate, 0.0);
}

#[test]
fn test_all_zero_series_metrics() {
    let metrics = compute_metrics(&series_of(&[0, 0, 0, 0, 0, 0]));

    assert_relative_eq!(metrics.avg_price, 0.0);
    assert_relative_eq!(metrics.volatility, 0.0);
    assert_eq!(metrics.peak_sales, 0);
}

#[test]
fn test_average_price_weights_by_units() {
    let points = vec![
        MonthlyPoint::new(date(2024, 1, 1), 1, 100.0),
        MonthlyPoint::new(date(2024, 2, 1), 3, 30.0),
    ];
    let metrics = compute_metrics(&SalesSeries::new(points, Origin::Synthetic));

    assert_relative_eq!(metrics.avg_price, 32.5);
}

#[test]
fn test_metrics_json_shape() {
    let json = serde_json::to_value(compute_metrics(&series_of(&[1, 2, 3]))).unwrap();

    for key in ["growth_rate", "peak_month", "peak_sales", "avg_price", "volatility"] {
        assert!(json.get(key).is_some(), "missing {}", key);
    }
    assert_eq!(json["peak_month"], "2024-03");
}
