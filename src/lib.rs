//! # Product Analytics
//!
//! Workspace facade re-exporting the product analytics crates:
//!
//! - [`sales_math`]: trend fitting and dispersion statistics
//! - [`sales_analytics`]: transaction cache, history selection, synthetic
//!   series, forecasting and metrics
//!
//! ## Example
//!
//! ```
//! use product_analytics_workspace::sales_analytics::{compute_metrics, SyntheticGenerator};
//! use chrono::NaiveDate;
//!
//! let as_of = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
//! let series = SyntheticGenerator::new().generate_as_of(42, "Trousers", 12, as_of);
//! let metrics = compute_metrics(&series);
//!
//! assert_eq!(series.len(), 12);
//! assert!(metrics.peak_sales >= 10);
//! ```

pub use sales_analytics;
pub use sales_math;
