//! # Sales Analytics
//!
//! A Rust library for product sales history, short-term demand forecasting
//! and sales metrics.
//!
//! ## Features
//!
//! - Lazily loaded transaction dataset with a bounded per-product cache
//! - Monthly sales history from real transactions, or a deterministic
//!   synthetic series when a product has too little real data
//! - Linear trend forecasting with 95% confidence bounds
//! - Growth, peak, average price and volatility metrics
//! - TOML/environment configuration and `tracing` based logging
//!
//! ## Data Source Selection
//!
//! Every series carries the [`Origin`] of its data:
//!
//! ```rust
//! pub enum Origin {
//!     Real,
//!     Synthetic,
//! }
//! ```
//!
//! A product's real transactions are used when they cover at least six
//! distinct calendar months. Otherwise the history is synthesized from the
//! product type, seeded by the product id so it is stable across calls.
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use sales_analytics::data::InMemorySource;
//! use sales_analytics::{AnalyticsConfig, ProductAnalytics, TransactionCache};
//! use std::sync::Arc;
//!
//! # fn main() -> sales_analytics::error::Result<()> {
//! let config = AnalyticsConfig::default();
//! let source = InMemorySource::new(polars::prelude::DataFrame::default());
//! let cache = Arc::new(TransactionCache::new(source, config.cache.capacity)?);
//! let analytics = ProductAnalytics::new(cache, &config)?;
//!
//! let as_of = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
//! let report = analytics.report_for_as_of(108775015, "Down Jacket", "Jacket", as_of);
//!
//! assert_eq!(report.sales.len(), 12);
//! assert_eq!(report.forecast.len(), 3);
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod category;
pub mod config;
pub mod data;
pub mod error;
pub mod history;
pub mod metrics;
pub mod models;
pub mod pipeline;
pub mod series;
pub mod synthetic;
pub mod telemetry;

// Re-export commonly used types
pub use crate::cache::{TransactionCache, TransactionLookup};
pub use crate::config::AnalyticsConfig;
pub use crate::data::{Product, ProductCatalog, ProductId, TransactionSource};
pub use crate::error::AnalyticsError;
pub use crate::history::HistorySelector;
pub use crate::metrics::{compute_metrics, Metrics};
pub use crate::models::trend::TrendForecaster;
pub use crate::models::{ForecastModel, ForecastResult, TrendDirection};
pub use crate::pipeline::{AnalyticsReport, ProductAnalytics};
pub use crate::series::{MonthlyPoint, Origin, SalesSeries};
pub use crate::synthetic::SyntheticGenerator;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
