//! Real-or-synthetic sales history selection

use crate::cache::TransactionCache;
use crate::data::{records_from_frame, ProductId, TransactionRecord};
use crate::series::{month_start, MonthlyPoint, Origin, SalesSeries};
use crate::synthetic::SyntheticGenerator;
use chrono::{NaiveDate, Utc};
use sales_math::round_to;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::debug;

/// Distinct months of real sales needed before real data is used
pub const DEFAULT_MIN_COVERAGE_MONTHS: usize = 6;

/// Builds a product's monthly history from real transactions when they
/// cover enough months, and from the synthetic generator otherwise
#[derive(Debug, Clone)]
pub struct HistorySelector {
    cache: Arc<TransactionCache>,
    generator: SyntheticGenerator,
    min_coverage_months: usize,
}

impl HistorySelector {
    pub fn new(cache: Arc<TransactionCache>) -> Self {
        Self {
            cache,
            generator: SyntheticGenerator::new(),
            min_coverage_months: DEFAULT_MIN_COVERAGE_MONTHS,
        }
    }

    /// Override the coverage gate; values below 1 are treated as 1
    pub fn with_min_coverage(mut self, months: usize) -> Self {
        self.min_coverage_months = months.max(1);
        self
    }

    pub fn min_coverage_months(&self) -> usize {
        self.min_coverage_months
    }

    /// Monthly history of a product over the last `window_months` months.
    ///
    /// Never fails: any shortfall or defect in the real data routes to the
    /// synthetic generator.
    pub fn build_history(
        &self,
        product_id: ProductId,
        product_name: &str,
        product_type: &str,
        window_months: usize,
    ) -> SalesSeries {
        self.build_history_as_of(
            product_id,
            product_name,
            product_type,
            window_months,
            Utc::now().date_naive(),
        )
    }

    /// As [`build_history`](Self::build_history) with synthetic months
    /// ending at the month of `as_of`
    pub fn build_history_as_of(
        &self,
        product_id: ProductId,
        product_name: &str,
        product_type: &str,
        window_months: usize,
        as_of: NaiveDate,
    ) -> SalesSeries {
        if let Some(series) = self.real_history(product_id, window_months) {
            debug!(product_id, product_name, months = series.len(), "using real sales history");
            return series;
        }

        debug!(product_id, product_name, product_type, "falling back to synthetic sales history");
        self.generator.generate_as_of(product_id, product_type, window_months, as_of)
    }

    /// Real history, or `None` when the product lacks transactions, covers
    /// fewer than the required months, or has malformed rows
    pub fn real_history(&self, product_id: ProductId, window_months: usize) -> Option<SalesSeries> {
        let frame = self.cache.get_transactions(product_id)?;

        let records = match records_from_frame(&frame) {
            Ok(records) => records,
            Err(e) => {
                debug!(product_id, error = %e, "discarding malformed transactions");
                return None;
            }
        };

        let coverage = coverage_months(&records);
        if coverage < self.min_coverage_months {
            debug!(
                product_id,
                coverage,
                required = self.min_coverage_months,
                "insufficient transaction coverage"
            );
            return None;
        }

        let mut series = SalesSeries::new(aggregate_monthly(&records), Origin::Real);
        series.truncate_to_recent(window_months);
        Some(series)
    }
}

/// Count of distinct calendar months with at least one transaction
pub fn coverage_months(records: &[TransactionRecord]) -> usize {
    records
        .iter()
        .map(|r| month_start(r.date))
        .collect::<BTreeSet<_>>()
        .len()
}

/// One point per calendar month, ascending: units are the number of rows
/// and revenue the sum of their prices, rounded to cents
pub fn aggregate_monthly(records: &[TransactionRecord]) -> Vec<MonthlyPoint> {
    let mut months: BTreeMap<NaiveDate, (u64, f64)> = BTreeMap::new();
    for record in records {
        let entry = months.entry(month_start(record.date)).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += record.unit_price;
    }

    months
        .into_iter()
        .map(|(month, (units, revenue))| MonthlyPoint::new(month, units, round_to(revenue, 2)))
        .collect()
}
