//! Transaction and product datasets
//!
//! Raw data arrives as columnar frames: one row per sold unit in the
//! transaction dataset, one row per article in the product dataset. This
//! module knows the column layout, loads frames from Parquet/CSV files and
//! converts frame slices into typed records.

use crate::error::{AnalyticsError, Result};
use chrono::NaiveDate;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::{Path, PathBuf};

/// Article identifier shared by the transaction and product datasets
pub type ProductId = i64;

/// Column names of the transaction and product datasets
pub mod columns {
    pub const ARTICLE_ID: &str = "article_id";
    pub const CUSTOMER_ID: &str = "customer_id";
    pub const DATE: &str = "t_dat";
    pub const PRICE: &str = "price";
    pub const SALES_CHANNEL: &str = "sales_channel_id";

    pub const PRODUCT_NAME: &str = "prod_name";
    pub const PRODUCT_TYPE: &str = "product_type_name";

    /// Projection used when reading the transaction dataset
    pub const TRANSACTION_COLUMNS: [&str; 5] =
        [ARTICLE_ID, CUSTOMER_ID, DATE, PRICE, SALES_CHANNEL];
}

use columns::*;

/// A single sold unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub product_id: ProductId,
    pub customer_id: String,
    pub date: NaiveDate,
    pub unit_price: f64,
    pub sales_channel: i64,
}

/// Product metadata needed by the analytics pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub product_id: ProductId,
    pub name: String,
    pub product_type: String,
}

/// Supplier of the full transaction dataset.
///
/// `load` is expensive; the transaction cache calls it at most once per
/// process.
pub trait TransactionSource: Send + Sync {
    /// Load every transaction row
    fn load(&self) -> Result<DataFrame>;

    /// Human readable origin, used in log lines
    fn describe(&self) -> String;
}

/// Transaction dataset stored as a Parquet file
#[derive(Debug, Clone)]
pub struct ParquetTransactionSource {
    path: PathBuf,
}

impl ParquetTransactionSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }
}

impl TransactionSource for ParquetTransactionSource {
    fn load(&self) -> Result<DataFrame> {
        let file = File::open(&self.path)?;
        let projection = TRANSACTION_COLUMNS.iter().map(|c| c.to_string()).collect();
        let df = ParquetReader::new(file).with_columns(Some(projection)).finish()?;
        Ok(df)
    }

    fn describe(&self) -> String {
        format!("parquet:{}", self.path.display())
    }
}

/// Transaction dataset stored as a CSV file with a header row
#[derive(Debug, Clone)]
pub struct CsvTransactionSource {
    path: PathBuf,
}

impl CsvTransactionSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }
}

impl TransactionSource for CsvTransactionSource {
    fn load(&self) -> Result<DataFrame> {
        read_csv(&self.path)
    }

    fn describe(&self) -> String {
        format!("csv:{}", self.path.display())
    }
}

/// Transaction dataset already held in memory
#[derive(Debug, Clone)]
pub struct InMemorySource {
    df: DataFrame,
}

impl InMemorySource {
    pub fn new(df: DataFrame) -> Self {
        Self { df }
    }
}

impl TransactionSource for InMemorySource {
    fn load(&self) -> Result<DataFrame> {
        Ok(self.df.clone())
    }

    fn describe(&self) -> String {
        format!("memory:{} rows", self.df.height())
    }
}

fn read_csv(path: &Path) -> Result<DataFrame> {
    let file = File::open(path)?;
    let df = CsvReader::new(file)
        .infer_schema(None)
        .has_header(true)
        .finish()?;
    Ok(df)
}

/// Product metadata frame with lookups by article id
#[derive(Debug, Clone)]
pub struct ProductCatalog {
    df: DataFrame,
}

impl ProductCatalog {
    /// Load the catalog from a Parquet file
    pub fn from_parquet<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let df = ParquetReader::new(file).finish()?;
        Self::from_dataframe(df)
    }

    /// Load the catalog from a CSV file
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_dataframe(read_csv(path.as_ref())?)
    }

    /// Wrap an existing frame; the id, name and type columns must exist
    pub fn from_dataframe(df: DataFrame) -> Result<Self> {
        for name in [ARTICLE_ID, PRODUCT_NAME, PRODUCT_TYPE] {
            column(&df, name)?;
        }
        Ok(Self { df })
    }

    /// Build a catalog from typed products
    pub fn from_products(products: &[Product]) -> Result<Self> {
        Self::from_dataframe(products_frame(products)?)
    }

    /// Find a product by id
    pub fn get_product(&self, product_id: ProductId) -> Result<Option<Product>> {
        let ids = i64_column(&self.df, ARTICLE_ID)?;
        let Some(idx) = ids.into_iter().position(|id| id == Some(product_id)) else {
            return Ok(None);
        };

        let names = utf8_column(&self.df, PRODUCT_NAME)?;
        let types = utf8_column(&self.df, PRODUCT_TYPE)?;
        let name = names.into_iter().nth(idx).flatten().unwrap_or_default();
        let product_type = types.into_iter().nth(idx).flatten().unwrap_or_default();

        Ok(Some(Product {
            product_id,
            name: name.to_string(),
            product_type: product_type.to_string(),
        }))
    }

    /// Distinct, sorted product type names
    pub fn product_types(&self) -> Result<Vec<String>> {
        let types = utf8_column(&self.df, PRODUCT_TYPE)?;
        let mut distinct: Vec<String> = types.into_iter().flatten().map(str::to_string).collect();
        distinct.sort();
        distinct.dedup();
        Ok(distinct)
    }

    /// Number of products
    pub fn len(&self) -> usize {
        self.df.height()
    }

    /// Check if the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }
}

/// Convert a transaction frame into typed records.
///
/// Fails on a missing column, a null cell, or a date that is not
/// `YYYY-MM-DD` (an optional time part after the date is ignored).
pub fn records_from_frame(df: &DataFrame) -> Result<Vec<TransactionRecord>> {
    let ids = i64_column(df, ARTICLE_ID)?;
    let customers = utf8_column(df, CUSTOMER_ID)?;
    let dates = utf8_column(df, DATE)?;
    let prices = f64_column(df, PRICE)?;
    let channels = i64_column(df, SALES_CHANNEL)?;

    let mut records = Vec::with_capacity(df.height());
    let rows = ids
        .into_iter()
        .zip(customers.into_iter())
        .zip(dates.into_iter())
        .zip(prices.into_iter())
        .zip(channels.into_iter());

    for (row, ((((id, customer), date), price), channel)) in rows.enumerate() {
        let (Some(product_id), Some(customer), Some(date), Some(unit_price), Some(sales_channel)) =
            (id, customer, date, price, channel)
        else {
            return Err(AnalyticsError::DataError(format!(
                "Transaction row {} has a null field",
                row
            )));
        };

        records.push(TransactionRecord {
            product_id,
            customer_id: customer.to_string(),
            date: parse_date(date)?,
            unit_price,
            sales_channel,
        });
    }

    Ok(records)
}

/// Build a transaction frame from typed records, dates stored as text
pub fn transactions_frame(records: &[TransactionRecord]) -> Result<DataFrame> {
    let df = DataFrame::new(vec![
        Series::new(ARTICLE_ID, records.iter().map(|r| r.product_id).collect::<Vec<i64>>()),
        Series::new(
            CUSTOMER_ID,
            records.iter().map(|r| r.customer_id.clone()).collect::<Vec<String>>(),
        ),
        Series::new(
            DATE,
            records
                .iter()
                .map(|r| r.date.format("%Y-%m-%d").to_string())
                .collect::<Vec<String>>(),
        ),
        Series::new(PRICE, records.iter().map(|r| r.unit_price).collect::<Vec<f64>>()),
        Series::new(
            SALES_CHANNEL,
            records.iter().map(|r| r.sales_channel).collect::<Vec<i64>>(),
        ),
    ])?;
    Ok(df)
}

/// Build a product frame from typed products
pub fn products_frame(products: &[Product]) -> Result<DataFrame> {
    let df = DataFrame::new(vec![
        Series::new(ARTICLE_ID, products.iter().map(|p| p.product_id).collect::<Vec<i64>>()),
        Series::new(
            PRODUCT_NAME,
            products.iter().map(|p| p.name.clone()).collect::<Vec<String>>(),
        ),
        Series::new(
            PRODUCT_TYPE,
            products.iter().map(|p| p.product_type.clone()).collect::<Vec<String>>(),
        ),
    ])?;
    Ok(df)
}

/// Rows of `df` whose article id equals `product_id`
pub(crate) fn filter_by_product(df: &DataFrame, product_id: ProductId) -> Result<DataFrame> {
    let ids = i64_column(df, ARTICLE_ID)?;
    let mask: BooleanChunked = ids.into_iter().map(|id| id == Some(product_id)).collect();
    Ok(df.filter(&mask)?)
}

/// Number of distinct article ids in a transaction frame
pub(crate) fn distinct_products(df: &DataFrame) -> Result<usize> {
    let ids = i64_column(df, ARTICLE_ID)?;
    let mut distinct: Vec<i64> = ids.into_iter().flatten().collect();
    distinct.sort_unstable();
    distinct.dedup();
    Ok(distinct.len())
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    let trimmed = raw.trim();
    let date_part = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .map_err(|e| AnalyticsError::DataError(format!("Invalid transaction date '{}': {}", raw, e)))
}

fn column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Series> {
    df.column(name)
        .map_err(|_| AnalyticsError::MissingColumn(name.to_string()))
}

fn i64_column(df: &DataFrame, name: &str) -> Result<Int64Chunked> {
    let series = column(df, name)?.cast(&DataType::Int64)?;
    Ok(series.i64()?.clone())
}

fn f64_column(df: &DataFrame, name: &str) -> Result<Float64Chunked> {
    let series = column(df, name)?.cast(&DataType::Float64)?;
    Ok(series.f64()?.clone())
}

fn utf8_column(df: &DataFrame, name: &str) -> Result<Utf8Chunked> {
    let series = column(df, name)?.cast(&DataType::Utf8)?;
    Ok(series.utf8()?.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_timestamped_dates() {
        let expected = NaiveDate::from_ymd_opt(2020, 9, 22).unwrap();
        assert_eq!(parse_date("2020-09-22").unwrap(), expected);
        assert_eq!(parse_date("2020-09-22 00:00:00").unwrap(), expected);
        assert!(parse_date("22/09/2020").is_err());
        assert!(parse_date("").is_err());
    }
}
