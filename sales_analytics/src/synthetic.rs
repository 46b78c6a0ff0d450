//! Deterministic synthetic sales history
//!
//! When a product has too little real history, a believable monthly series
//! is fabricated from the product type alone. Every random draw comes from a
//! single generator seeded from the product id, so a product always gets the
//! same series for the same window and reference month.

use crate::category::{MerchandiseClass, SeasonProfile};
use crate::data::ProductId;
use crate::series::{month_start, MonthlyPoint, Origin, SalesSeries};
use chrono::{Datelike, Months, NaiveDate, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use sales_math::round_to;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use tracing::debug;

/// Smallest unit count a synthetic month may report
pub const MIN_MONTHLY_UNITS: u64 = 10;

/// Slope range of the linear trend across the window, as a share of base volume
const TREND_SLOPE: std::ops::Range<f64> = -0.2..0.3;
const NOISE_STD_DEV: f64 = 0.15;
const REVENUE_JITTER: std::ops::Range<f64> = 0.9..1.1;

/// Seed for the generator of `product_id`
pub fn seed_for(product_id: ProductId) -> u64 {
    let mut hasher = DefaultHasher::new();
    product_id.hash(&mut hasher);
    hasher.finish()
}

/// Fabricates category-aware monthly sales series
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntheticGenerator;

impl SyntheticGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Series for the `window_months` months ending with the current month
    pub fn generate(
        &self,
        product_id: ProductId,
        product_type: &str,
        window_months: usize,
    ) -> SalesSeries {
        self.generate_as_of(product_id, product_type, window_months, Utc::now().date_naive())
    }

    /// Series for the `window_months` months ending with the month of `as_of`
    pub fn generate_as_of(
        &self,
        product_id: ProductId,
        product_type: &str,
        window_months: usize,
        as_of: NaiveDate,
    ) -> SalesSeries {
        let class = MerchandiseClass::classify(product_type);
        let season = SeasonProfile::classify(product_type);
        let mut rng = StdRng::seed_from_u64(seed_for(product_id));

        let base_units = rng.gen_range(class.base_volume_range()) as f64;
        let avg_price = rng.gen_range(class.price_range());
        let slope = rng.gen_range(TREND_SLOPE);

        debug!(
            product_id,
            ?class,
            ?season,
            base_units,
            avg_price,
            slope,
            "generating synthetic history"
        );

        let last_month = month_start(as_of);
        let mut points = Vec::with_capacity(window_months);
        for i in 0..window_months {
            let months_back = (window_months - 1 - i) as u32;
            let Some(month) = last_month.checked_sub_months(Months::new(months_back)) else {
                continue;
            };

            let trend = 1.0 + (i as f64 / window_months as f64) * slope;
            let seasonal = season.multiplier(month.month());
            let noise = 1.0 + NOISE_STD_DEV * rng.sample::<f64, _>(StandardNormal);

            let raw_units = (base_units * trend * seasonal * noise) as i64;
            let units = raw_units.max(MIN_MONTHLY_UNITS as i64) as u64;

            let revenue = units as f64 * avg_price * rng.gen_range(REVENUE_JITTER);
            points.push(MonthlyPoint::new(month, units, round_to(revenue, 2)));
        }

        SalesSeries::new(points, Origin::Synthetic)
    }
}
