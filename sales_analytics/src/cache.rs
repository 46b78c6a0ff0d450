//! Lazily loaded transaction dataset with a bounded per-product cache
//!
//! The full dataset is loaded on the first lookup for any product and kept
//! for the lifetime of the cache. A failed or empty load is remembered and
//! never retried. Per-product slices are filtered from memory once and kept
//! in a least-recently-used cache.

use crate::data::{distinct_products, filter_by_product, ProductId, TransactionSource};
use crate::error::{AnalyticsError, Result};
use once_cell::sync::OnceCell;
use polars::prelude::DataFrame;
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;
use std::sync::{Mutex, PoisonError};
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Outcome of a per-product transaction lookup
#[derive(Debug, Clone)]
pub enum TransactionLookup {
    /// The dataset failed to load or holds no rows at all
    NoData,
    /// The dataset is available but has no rows for the product
    Empty,
    /// Transactions of the product
    Rows(DataFrame),
}

impl TransactionLookup {
    /// Collapse to rows-or-absent, merging `NoData` and `Empty`
    pub fn into_rows(self) -> Option<DataFrame> {
        match self {
            TransactionLookup::Rows(df) => Some(df),
            TransactionLookup::NoData | TransactionLookup::Empty => None,
        }
    }
}

#[derive(Debug)]
enum Dataset {
    Loaded(DataFrame),
    Unavailable,
}

/// Least-recently-used map with a fixed capacity
#[derive(Debug)]
pub struct LruCache<K, V> {
    capacity: usize,
    tick: u64,
    entries: HashMap<K, (V, u64)>,
    order: BTreeMap<u64, K>,
}

impl<K: Eq + Hash + Clone, V: Clone> LruCache<K, V> {
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(AnalyticsError::InvalidParameter(
                "Cache capacity must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            capacity,
            tick: 0,
            entries: HashMap::with_capacity(capacity.min(1024)),
            order: BTreeMap::new(),
        })
    }

    /// Clone of the value for `key`, marking it most recently used
    pub fn get(&mut self, key: &K) -> Option<V> {
        self.tick += 1;
        let tick = self.tick;
        let (value, used) = self.entries.get_mut(key)?;
        self.order.remove(&*used);
        *used = tick;
        self.order.insert(tick, key.clone());
        Some(value.clone())
    }

    /// Insert or replace `key`, evicting the least recently used entry when full
    pub fn insert(&mut self, key: K, value: V) {
        self.tick += 1;
        if let Some((_, used)) = self.entries.remove(&key) {
            self.order.remove(&used);
        } else if self.entries.len() >= self.capacity {
            if let Some((_, evicted)) = self.order.pop_first() {
                self.entries.remove(&evicted);
            }
        }
        self.order.insert(self.tick, key.clone());
        self.entries.insert(key, (value, self.tick));
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// On-demand transaction store shared by all analytics requests
pub struct TransactionCache {
    source: Box<dyn TransactionSource>,
    dataset: OnceCell<Dataset>,
    // `None` marks a product known to have no transactions
    slices: Mutex<LruCache<ProductId, Option<DataFrame>>>,
}

impl TransactionCache {
    pub fn new<S: TransactionSource + 'static>(source: S, capacity: usize) -> Result<Self> {
        Ok(Self {
            source: Box::new(source),
            dataset: OnceCell::new(),
            slices: Mutex::new(LruCache::new(capacity)?),
        })
    }

    /// Transactions of `product_id`, or `None` when there are none or the
    /// dataset is unavailable
    pub fn get_transactions(&self, product_id: ProductId) -> Option<DataFrame> {
        self.lookup(product_id).into_rows()
    }

    /// Transactions of `product_id`, distinguishing an unavailable dataset
    /// from a product without sales
    pub fn lookup(&self, product_id: ProductId) -> TransactionLookup {
        let dataset = match self.dataset() {
            Dataset::Loaded(df) => df,
            Dataset::Unavailable => return TransactionLookup::NoData,
        };

        if let Some(cached) = self.slices().get(&product_id) {
            debug!(product_id, "transaction cache hit");
            return match cached {
                Some(df) => TransactionLookup::Rows(df),
                None => TransactionLookup::Empty,
            };
        }

        let slice = match filter_by_product(dataset, product_id) {
            Ok(slice) => slice,
            Err(e) => {
                warn!(product_id, error = %e, "failed to filter transactions");
                return TransactionLookup::NoData;
            }
        };
        debug!(product_id, rows = slice.height(), "transaction cache miss");

        let cached = (slice.height() > 0).then_some(slice);
        self.slices().insert(product_id, cached.clone());
        match cached {
            Some(df) => TransactionLookup::Rows(df),
            None => TransactionLookup::Empty,
        }
    }

    /// Whether the bulk load has been attempted
    pub fn is_initialized(&self) -> bool {
        self.dataset.get().is_some()
    }

    /// Whether the bulk load produced a usable dataset
    pub fn is_available(&self) -> bool {
        matches!(self.dataset.get(), Some(Dataset::Loaded(_)))
    }

    /// Number of per-product slices currently cached
    pub fn cached_products(&self) -> usize {
        self.slices().len()
    }

    fn dataset(&self) -> &Dataset {
        self.dataset.get_or_init(|| {
            let start = Instant::now();
            let origin = self.source.describe();
            info!(source = %origin, "loading transaction dataset");

            match self.source.load() {
                Ok(df) if df.height() == 0 => {
                    warn!(source = %origin, "transaction dataset is empty");
                    Dataset::Unavailable
                }
                Ok(df) => {
                    info!(
                        source = %origin,
                        rows = df.height(),
                        products = distinct_products(&df).unwrap_or(0),
                        elapsed_ms = start.elapsed().as_millis() as u64,
                        "transaction dataset loaded"
                    );
                    Dataset::Loaded(df)
                }
                Err(e) => {
                    error!(source = %origin, error = %e, "failed to load transaction dataset");
                    Dataset::Unavailable
                }
            }
        })
    }

    fn slices(&self) -> std::sync::MutexGuard<'_, LruCache<ProductId, Option<DataFrame>>> {
        self.slices.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for TransactionCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionCache")
            .field("source", &self.source.describe())
            .field("initialized", &self.is_initialized())
            .field("available", &self.is_available())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lru_evicts_least_recently_used() {
        let mut cache = LruCache::new(2).unwrap();
        cache.insert(1, "a");
        cache.insert(2, "b");
        assert_eq!(cache.get(&1), Some("a"));
        cache.insert(3, "c");

        assert!(cache.contains(&1));
        assert!(!cache.contains(&2));
        assert!(cache.contains(&3));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn lru_replaces_existing_key_without_eviction() {
        let mut cache = LruCache::new(2).unwrap();
        cache.insert(1, 10);
        cache.insert(2, 20);
        cache.insert(1, 11);

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&1), Some(11));
        assert_eq!(cache.get(&2), Some(20));
    }

    #[test]
    fn lru_rejects_zero_capacity() {
        assert!(LruCache::<i64, i64>::new(0).is_err());
    }
}
