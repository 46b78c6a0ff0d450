//! Linear trend extrapolation with normal-approximation bounds

use crate::config::ForecastConfig;
use crate::error::{AnalyticsError, Result};
use crate::models::{ForecastModel, ForecastResult, TrainedForecastModel, TrendDirection};
use crate::series::month_label;
use chrono::{Months, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use sales_math::{mean, round_to, trailing_std_dev, LinearTrend};

/// Trend forecaster: last value plus fitted slope per step, a small
/// spread-proportional perturbation, and `z * spread` bounds
#[derive(Debug, Clone)]
pub struct TrendForecaster {
    /// Name of the model
    name: String,
    /// Fewest points the model will train on
    min_points: usize,
    /// Trailing window for the spread estimate
    spread_window: usize,
    /// Perturbation standard deviation as a share of the spread
    noise_ratio: f64,
    /// Bound multiplier applied to the spread
    confidence_z: f64,
    /// Fixed seed for the perturbation; entropy when absent
    seed: Option<u64>,
}

/// Trained trend forecaster
#[derive(Debug, Clone)]
pub struct TrainedTrend {
    name: String,
    trend: LinearTrend,
    last_value: f64,
    mean: f64,
    spread: f64,
    noise_ratio: f64,
    confidence_z: f64,
    seed: Option<u64>,
}

impl Default for TrendForecaster {
    fn default() -> Self {
        Self {
            name: "Linear Trend".to_string(),
            min_points: 3,
            spread_window: 6,
            noise_ratio: 0.1,
            confidence_z: 1.96,
            seed: None,
        }
    }
}

impl TrendForecaster {
    /// Create a forecaster with the standard parameters
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a forecaster from configuration
    pub fn from_config(config: &ForecastConfig) -> Result<Self> {
        if config.min_points < 2 {
            return Err(AnalyticsError::InvalidParameter(
                "Trend forecasting needs at least 2 points".to_string(),
            ));
        }
        if config.spread_window == 0 {
            return Err(AnalyticsError::InvalidParameter(
                "Spread window must be positive".to_string(),
            ));
        }
        if !(config.noise_ratio >= 0.0 && config.noise_ratio.is_finite()) {
            return Err(AnalyticsError::InvalidParameter(
                "Noise ratio must be a non-negative number".to_string(),
            ));
        }
        if !(config.confidence_z > 0.0 && config.confidence_z.is_finite()) {
            return Err(AnalyticsError::InvalidParameter(
                "Confidence multiplier must be positive".to_string(),
            ));
        }

        Ok(Self {
            min_points: config.min_points,
            spread_window: config.spread_window,
            noise_ratio: config.noise_ratio,
            confidence_z: config.confidence_z,
            ..Self::default()
        })
    }

    /// Fix the perturbation seed so forecasts are reproducible
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

impl ForecastModel for TrendForecaster {
    type Trained = TrainedTrend;

    fn train(&self, history: &[f64]) -> Result<Self::Trained> {
        if history.len() < self.min_points {
            return Err(AnalyticsError::DataError(format!(
                "Insufficient data for trend forecast. Need at least {} observations, have {}.",
                self.min_points,
                history.len()
            )));
        }

        let trend = LinearTrend::fit(history)?;
        let spread = trailing_std_dev(history, self.spread_window)?;
        let mean = mean(history)?;
        let last_value = history[history.len() - 1];

        Ok(TrainedTrend {
            name: self.name.clone(),
            trend,
            last_value,
            mean,
            spread,
            noise_ratio: self.noise_ratio,
            confidence_z: self.confidence_z,
            seed: self.seed,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedTrend {
    /// Fitted change in units per month
    pub fn slope(&self) -> f64 {
        self.trend.slope()
    }

    /// Spread used for the perturbation and the bounds
    pub fn spread(&self) -> f64 {
        self.spread
    }

    /// Slope as a percentage of the historical mean, zero for a zero mean
    pub fn trend_percentage(&self) -> f64 {
        if self.mean > 0.0 {
            round_to(self.slope() / self.mean * 100.0, 1)
        } else {
            0.0
        }
    }
}

impl TrainedForecastModel for TrainedTrend {
    fn forecast(&self, periods: usize, as_of: NaiveDate) -> ForecastResult {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let noise_sd = self.noise_ratio * self.spread;
        let margin = self.confidence_z * self.spread;

        let mut forecast = Vec::with_capacity(periods);
        let mut upper = Vec::with_capacity(periods);
        let mut lower = Vec::with_capacity(periods);
        for step in 1..=periods {
            let mut predicted = self.last_value + self.slope() * step as f64;
            if noise_sd > 0.0 {
                predicted += noise_sd * rng.sample::<f64, _>(StandardNormal);
            }
            let predicted = predicted.max(0.0);

            forecast.push(predicted as u64);
            upper.push((predicted + margin) as u64);
            lower.push((predicted - margin).max(0.0) as u64);
        }

        let forecast_months = (1..=periods)
            .filter_map(|step| as_of.checked_add_months(Months::new(step as u32)))
            .map(month_label)
            .collect();

        ForecastResult {
            forecast,
            confidence_upper: upper,
            confidence_lower: lower,
            forecast_months,
            trend: Some(TrendDirection::from_slope(self.slope())),
            trend_percentage: self.trend_percentage(),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}
