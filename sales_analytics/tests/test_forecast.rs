mod common;

use approx::assert_relative_eq;
use common::date;
use pretty_assertions::assert_eq;
use rstest::rstest;
use sales_analytics::config::ForecastConfig;
use sales_analytics::models::TrainedForecastModel;
use sales_analytics::{ForecastModel, ForecastResult, TrendDirection, TrendForecaster};

const HISTORY: [f64; 6] = [100.0, 110.0, 105.0, 120.0, 130.0, 125.0];

fn noiseless() -> TrendForecaster {
    let config = ForecastConfig { noise_ratio: 0.0, ..ForecastConfig::default() };
    TrendForecaster::from_config(&config).unwrap()
}

#[rstest]
#[case(&[])]
#[case(&[100.0])]
#[case(&[100.0, 120.0])]
fn test_short_history_gives_empty_forecast(#[case] history: &[f64]) {
    let result = TrendForecaster::new().forecast(history, 3);

    assert_eq!(result, ForecastResult::empty());
    assert!(result.is_empty());
    assert!(result.trend.is_none());
    assert_relative_eq!(result.trend_percentage, 0.0);
}

#[test]
fn test_upward_history_forecast() {
    let trained = TrendForecaster::new().train(&HISTORY).unwrap();
    assert_relative_eq!(trained.slope(), 40.0 / 7.0, epsilon = 1e-9);
    assert_relative_eq!(trained.trend_percentage(), 5.0);

    let result = trained.forecast(3, date(2024, 6, 15));

    assert_eq!(result.len(), 3);
    assert_eq!(result.trend, Some(TrendDirection::Increasing));
    assert_eq!(result.forecast_months, vec!["2024-07", "2024-08", "2024-09"]);
    assert_eq!(result.confidence_upper.len(), 3);
    assert_eq!(result.confidence_lower.len(), 3);
}

#[test]
fn test_noiseless_forecast_values() {
    let result = noiseless().forecast_as_of(&HISTORY, 3, date(2024, 6, 1));

    // last value 125 plus 40/7 per step; bounds at 1.96 * sqrt(700 / 6)
    assert_eq!(result.forecast, vec![130, 136, 142]);
    assert_eq!(result.confidence_upper, vec![151, 157, 163]);
    assert_eq!(result.confidence_lower, vec![109, 115, 120]);
}

#[test]
fn test_bounds_contain_forecast() {
    for seed in 0..50 {
        let result = TrendForecaster::new()
            .with_seed(seed)
            .forecast_as_of(&HISTORY, 6, date(2024, 1, 1));

        assert_eq!(result.len(), 6);
        for (lower, point, upper) in result.steps() {
            assert!(lower <= point && point <= upper);
        }
    }
}

#[test]
fn test_seeded_forecast_is_reproducible() {
    let forecaster = TrendForecaster::new().with_seed(11);
    let as_of = date(2024, 2, 1);

    assert_eq!(
        forecaster.forecast_as_of(&HISTORY, 3, as_of),
        forecaster.forecast_as_of(&HISTORY, 3, as_of)
    );
}

#[test]
fn test_collapsing_history_never_goes_negative() {
    let history = [60.0, 48.0, 36.0, 24.0, 12.0, 0.0];
    let result = noiseless().forecast_as_of(&history, 3, date(2024, 1, 1));

    assert_eq!(result.trend, Some(TrendDirection::Decreasing));
    assert_eq!(result.forecast, vec![0, 0, 0]);
    assert_eq!(result.confidence_lower, vec![0, 0, 0]);
    assert!(result.trend_percentage < 0.0);
}

#[test]
fn test_flat_history_is_not_increasing() {
    let result = noiseless().forecast_as_of(&[50.0; 8], 2, date(2024, 1, 1));

    assert_eq!(result.trend, Some(TrendDirection::Decreasing));
    assert_eq!(result.forecast, vec![50, 50]);
    assert_eq!(result.confidence_upper, vec![50, 50]);
    assert_eq!(result.confidence_lower, vec![50, 50]);
}

#[test]
fn test_zero_mean_history_has_zero_trend_percentage() {
    let trained = TrendForecaster::new().train(&[0.0, 0.0, 0.0]).unwrap();
    assert_relative_eq!(trained.trend_percentage(), 0.0);
}

#[test]
fn test_forecast_months_cross_year_boundary() {
    let result = noiseless().forecast_as_of(&HISTORY, 3, date(2023, 11, 30));
    assert_eq!(result.forecast_months, vec!["2023-12", "2024-01", "2024-02"]);
}

#[test]
fn test_invalid_forecast_config_is_rejected() {
    let too_few = ForecastConfig { min_points: 1, ..ForecastConfig::default() };
    let no_window = ForecastConfig { spread_window: 0, ..ForecastConfig::default() };
    let negative_noise = ForecastConfig { noise_ratio: -0.1, ..ForecastConfig::default() };

    assert!(TrendForecaster::from_config(&too_few).is_err());
    assert!(TrendForecaster::from_config(&no_window).is_err());
    assert!(TrendForecaster::from_config(&negative_noise).is_err());
}

#[test]
fn test_forecast_serializes_trend_lowercase() {
    let result = noiseless().forecast_as_of(&HISTORY, 1, date(2024, 6, 1));
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["trend"], "increasing");
    assert_eq!(json["forecast_months"][0], "2024-07");

    let empty = serde_json::to_value(ForecastResult::empty()).unwrap();
    assert!(empty.get("trend").is_none());
}
