//! Forecasting models for monthly unit series

use crate::error::Result;
use chrono::{NaiveDate, Utc};
use serde::Serialize;
use std::fmt::Debug;
use tracing::debug;

/// Direction of the fitted trend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
}

impl TrendDirection {
    /// `Increasing` for a strictly positive slope, `Decreasing` otherwise
    pub fn from_slope(slope: f64) -> Self {
        if slope > 0.0 {
            TrendDirection::Increasing
        } else {
            TrendDirection::Decreasing
        }
    }
}

/// Point forecasts with parallel 95% bounds and month labels
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastResult {
    /// Forecasted unit counts
    pub forecast: Vec<u64>,
    /// Upper confidence bound per step
    pub confidence_upper: Vec<u64>,
    /// Lower confidence bound per step, never below zero
    pub confidence_lower: Vec<u64>,
    /// `YYYY-MM` label per step
    pub forecast_months: Vec<String>,
    /// Trend direction, absent for an empty forecast
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trend: Option<TrendDirection>,
    /// Slope relative to the historical mean, in percent
    pub trend_percentage: f64,
}

impl ForecastResult {
    /// Forecast with no steps, returned for series too short to extrapolate
    pub fn empty() -> Self {
        Self {
            forecast: Vec::new(),
            confidence_upper: Vec::new(),
            confidence_lower: Vec::new(),
            forecast_months: Vec::new(),
            trend: None,
            trend_percentage: 0.0,
        }
    }

    /// Number of forecast steps
    pub fn len(&self) -> usize {
        self.forecast.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forecast.is_empty()
    }

    /// `(lower, forecast, upper)` per step
    pub fn steps(&self) -> impl Iterator<Item = (u64, u64, u64)> + '_ {
        self.confidence_lower
            .iter()
            .zip(&self.forecast)
            .zip(&self.confidence_upper)
            .map(|((&lower, &point), &upper)| (lower, point, upper))
    }
}

/// Trained forecast model
pub trait TrainedForecastModel: Debug {
    /// Forecast `periods` months following the month of `as_of`
    fn forecast(&self, periods: usize, as_of: NaiveDate) -> ForecastResult;

    /// Name of the model
    fn name(&self) -> &str;
}

/// Forecast model that can be trained on a unit series
pub trait ForecastModel: Debug + Clone {
    /// The type of trained model produced
    type Trained: TrainedForecastModel;

    /// Train the model on a chronologically ordered unit series
    fn train(&self, history: &[f64]) -> Result<Self::Trained>;

    /// Get the name of the model
    fn name(&self) -> &str;

    /// Train and forecast in one step; a series the model cannot train on
    /// yields an empty forecast rather than an error
    fn forecast_as_of(&self, history: &[f64], periods: usize, as_of: NaiveDate) -> ForecastResult {
        match self.train(history) {
            Ok(trained) => trained.forecast(periods, as_of),
            Err(e) => {
                debug!(model = self.name(), points = history.len(), error = %e, "forecast skipped");
                ForecastResult::empty()
            }
        }
    }

    /// Forecast `periods` months following the current month
    fn forecast(&self, history: &[f64], periods: usize) -> ForecastResult {
        self.forecast_as_of(history, periods, Utc::now().date_naive())
    }
}

pub mod trend;
