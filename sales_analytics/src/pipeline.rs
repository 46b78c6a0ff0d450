//! End-to-end product analytics: history, forecast and metrics

use crate::cache::TransactionCache;
use crate::config::AnalyticsConfig;
use crate::data::{
    CsvTransactionSource, InMemorySource, ParquetTransactionSource, ProductCatalog, ProductId,
};
use crate::error::Result;
use crate::history::HistorySelector;
use crate::metrics::{compute_metrics, Metrics};
use crate::models::trend::TrendForecaster;
use crate::models::{ForecastModel, ForecastResult};
use crate::series::SalesSeries;
use chrono::{NaiveDate, Utc};
use polars::prelude::DataFrame;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Everything the dashboard shows for one product
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsReport {
    pub sales: SalesSeries,
    pub forecast: ForecastResult,
    pub metrics: Metrics,
}

/// Analytics service shared across requests
#[derive(Debug, Clone)]
pub struct ProductAnalytics {
    catalog: Option<Arc<ProductCatalog>>,
    history: HistorySelector,
    forecaster: TrendForecaster,
    window_months: usize,
    forecast_periods: usize,
}

impl ProductAnalytics {
    /// Build the service around an existing transaction cache
    pub fn new(cache: Arc<TransactionCache>, config: &AnalyticsConfig) -> Result<Self> {
        Ok(Self {
            catalog: None,
            history: HistorySelector::new(cache)
                .with_min_coverage(config.history.min_coverage_months),
            forecaster: TrendForecaster::from_config(&config.forecast)?,
            window_months: config.history.window_months,
            forecast_periods: config.forecast.periods,
        })
    }

    /// Build the service and its data sources from the configured paths.
    ///
    /// Without a transactions path every history is synthetic; without a
    /// products path only [`report_for`](Self::report_for) is useful.
    pub fn from_config(config: &AnalyticsConfig) -> Result<Self> {
        let capacity = config.cache.capacity;
        let cache = match config.data.transactions_path.as_deref() {
            Some(path) if is_csv(path) => TransactionCache::new(CsvTransactionSource::new(path), capacity)?,
            Some(path) => TransactionCache::new(ParquetTransactionSource::new(path), capacity)?,
            None => {
                warn!("no transactions path configured; all histories will be synthetic");
                TransactionCache::new(InMemorySource::new(DataFrame::default()), capacity)?
            }
        };

        let mut analytics = Self::new(Arc::new(cache), config)?;
        if let Some(path) = config.data.products_path.as_deref() {
            let catalog = if is_csv(path) {
                ProductCatalog::from_csv(path)?
            } else {
                ProductCatalog::from_parquet(path)?
            };
            info!(products = catalog.len(), path = %path.display(), "product catalog loaded");
            analytics = analytics.with_catalog(catalog);
        }
        Ok(analytics)
    }

    pub fn with_catalog(mut self, catalog: ProductCatalog) -> Self {
        self.catalog = Some(Arc::new(catalog));
        self
    }

    pub fn with_forecaster(mut self, forecaster: TrendForecaster) -> Self {
        self.forecaster = forecaster;
        self
    }

    pub fn catalog(&self) -> Option<&ProductCatalog> {
        self.catalog.as_deref()
    }

    /// Monthly history of a product, real when coverage allows
    pub fn build_history(
        &self,
        product_id: ProductId,
        product_name: &str,
        product_type: &str,
        window_months: usize,
    ) -> SalesSeries {
        self.history.build_history(product_id, product_name, product_type, window_months)
    }

    /// Trend forecast of a unit series
    pub fn forecast(&self, units: &[f64], periods: usize) -> ForecastResult {
        self.forecaster.forecast(units, periods)
    }

    /// Summary metrics of a series
    pub fn compute_metrics(&self, series: &SalesSeries) -> Metrics {
        compute_metrics(series)
    }

    /// Report for a catalog product; `None` when the product is unknown or
    /// no catalog is attached
    pub fn report(&self, product_id: ProductId) -> Option<AnalyticsReport> {
        let catalog = self.catalog.as_ref()?;
        let product = match catalog.get_product(product_id) {
            Ok(product) => product?,
            Err(e) => {
                warn!(product_id, error = %e, "product lookup failed");
                return None;
            }
        };
        Some(self.report_for(product_id, &product.name, &product.product_type))
    }

    /// Report for a product described by the caller
    pub fn report_for(
        &self,
        product_id: ProductId,
        product_name: &str,
        product_type: &str,
    ) -> AnalyticsReport {
        self.report_for_as_of(product_id, product_name, product_type, Utc::now().date_naive())
    }

    /// As [`report_for`](Self::report_for) relative to the month of `as_of`
    pub fn report_for_as_of(
        &self,
        product_id: ProductId,
        product_name: &str,
        product_type: &str,
        as_of: NaiveDate,
    ) -> AnalyticsReport {
        let sales = self.history.build_history_as_of(
            product_id,
            product_name,
            product_type,
            self.window_months,
            as_of,
        );
        let forecast =
            self.forecaster.forecast_as_of(&sales.unit_values(), self.forecast_periods, as_of);
        let metrics = compute_metrics(&sales);

        info!(
            product_id,
            origin = %sales.origin(),
            months = sales.len(),
            "analytics report built"
        );
        AnalyticsReport { sales, forecast, metrics }
    }
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}
