#![allow(dead_code)]

use chrono::NaiveDate;
use polars::prelude::DataFrame;
use sales_analytics::data::{transactions_frame, InMemorySource, TransactionRecord};
use sales_analytics::error::{AnalyticsError, Result};
use sales_analytics::{ProductId, TransactionCache, TransactionSource};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// `count` sales of `product_id` on the 10th of the given month
pub fn month_sales(
    product_id: ProductId,
    year: i32,
    month: u32,
    count: usize,
    price: f64,
) -> Vec<TransactionRecord> {
    (0..count)
        .map(|i| TransactionRecord {
            product_id,
            customer_id: format!("customer-{}", i),
            date: date(year, month, 10),
            unit_price: price,
            sales_channel: 1 + (i % 2) as i64,
        })
        .collect()
}

/// Sales of `product_id` in consecutive months of 2023 starting in January,
/// one entry of `counts` per month
pub fn monthly_sales(product_id: ProductId, counts: &[usize], price: f64) -> Vec<TransactionRecord> {
    counts
        .iter()
        .enumerate()
        .flat_map(|(i, &count)| month_sales(product_id, 2023, i as u32 + 1, count, price))
        .collect()
}

pub fn frame(records: &[TransactionRecord]) -> DataFrame {
    transactions_frame(records).unwrap()
}

pub fn cache_for(records: &[TransactionRecord]) -> Arc<TransactionCache> {
    Arc::new(TransactionCache::new(InMemorySource::new(frame(records)), 64).unwrap())
}

/// Source that counts how often it is loaded
#[derive(Debug, Clone)]
pub struct CountingSource {
    pub loads: Arc<AtomicUsize>,
    df: Option<DataFrame>,
}

impl CountingSource {
    pub fn new(df: DataFrame) -> Self {
        Self { loads: Arc::new(AtomicUsize::new(0)), df: Some(df) }
    }

    /// A source whose every load fails
    pub fn failing() -> Self {
        Self { loads: Arc::new(AtomicUsize::new(0)), df: None }
    }

    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

impl TransactionSource for CountingSource {
    fn load(&self) -> Result<DataFrame> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        self.df
            .clone()
            .ok_or_else(|| AnalyticsError::DataError("dataset unreachable".to_string()))
    }

    fn describe(&self) -> String {
        "counting".to_string()
    }
}
