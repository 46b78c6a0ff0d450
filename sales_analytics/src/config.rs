//! Runtime configuration for the analytics pipeline
//!
//! Configuration starts from built-in defaults, is patched by an optional
//! TOML file and then by `ANALYTICS_*` environment variables, and is
//! validated last.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub history: HistoryConfig,
    pub forecast: ForecastConfig,
    pub cache: CacheConfig,
    pub data: DataConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Number of most recent months kept in a series
    pub window_months: usize,
    /// Distinct months of real sales required before real data is trusted
    pub min_coverage_months: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    pub periods: usize,
    pub min_points: usize,
    pub spread_window: usize,
    pub noise_ratio: f64,
    pub confidence_z: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of per-product transaction slices kept in memory
    pub capacity: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub transactions_path: Option<PathBuf>,
    pub products_path: Option<PathBuf>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("could not parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { window_months: 12, min_coverage_months: 6 }
    }
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self { periods: 3, min_points: 3, spread_window: 6, noise_ratio: 0.1, confidence_z: 1.96 }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { capacity: 4096 }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: LogFormat::Compact }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AnalyticsConfig {
    /// Load defaults, patch them from `path` when given, then from the
    /// process environment, and validate the result.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(env::vars())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)
            .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;
        toml::from_str(&raw)
            .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    /// Apply `ANALYTICS_*` overrides from `(key, value)` pairs; unrelated
    /// keys are ignored.
    pub fn apply_overrides<I, K, V>(&mut self, vars: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (key, value) in vars {
            let (key, value) = (key.as_ref(), value.as_ref());
            match key {
                "ANALYTICS_WINDOW_MONTHS" => {
                    self.history.window_months = parse_override(key, value)?;
                }
                "ANALYTICS_MIN_COVERAGE_MONTHS" => {
                    self.history.min_coverage_months = parse_override(key, value)?;
                }
                "ANALYTICS_FORECAST_PERIODS" => {
                    self.forecast.periods = parse_override(key, value)?;
                }
                "ANALYTICS_CACHE_CAPACITY" => {
                    self.cache.capacity = parse_override(key, value)?;
                }
                "ANALYTICS_TRANSACTIONS_PATH" => {
                    self.data.transactions_path = Some(PathBuf::from(value));
                }
                "ANALYTICS_PRODUCTS_PATH" => {
                    self.data.products_path = Some(PathBuf::from(value));
                }
                "ANALYTICS_LOG_LEVEL" => self.logging.level = value.trim().to_string(),
                "ANALYTICS_LOG_FORMAT" => self.logging.format = value.parse()?,
                _ => {}
            }
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history.window_months == 0 {
            return Err(ConfigError::Validation("history.window_months must be at least 1".into()));
        }
        if self.history.min_coverage_months == 0 {
            return Err(ConfigError::Validation(
                "history.min_coverage_months must be at least 1".into(),
            ));
        }
        if self.forecast.min_points < 2 {
            return Err(ConfigError::Validation("forecast.min_points must be at least 2".into()));
        }
        if self.forecast.spread_window == 0 {
            return Err(ConfigError::Validation("forecast.spread_window must be at least 1".into()));
        }
        if !(self.forecast.noise_ratio >= 0.0 && self.forecast.noise_ratio.is_finite()) {
            return Err(ConfigError::Validation(
                "forecast.noise_ratio must be a non-negative number".into(),
            ));
        }
        if !(self.forecast.confidence_z > 0.0 && self.forecast.confidence_z.is_finite()) {
            return Err(ConfigError::Validation("forecast.confidence_z must be positive".into()));
        }
        if self.cache.capacity == 0 {
            return Err(ConfigError::Validation("cache.capacity must be at least 1".into()));
        }
        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::Validation("logging.level must not be empty".into()));
        }
        Ok(())
    }
}

fn parse_override<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}
