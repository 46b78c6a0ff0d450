//! Monthly sales series shared by the real and synthetic history paths

use chrono::{Datelike, NaiveDate};
use sales_math::round_to;
use serde::{Serialize, Serializer};

/// Where a series came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    /// Aggregated from recorded transactions
    Real,
    /// Fabricated from product metadata
    Synthetic,
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Origin::Real => write!(f, "real"),
            Origin::Synthetic => write!(f, "synthetic"),
        }
    }
}

/// Units sold and revenue for one calendar month
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyPoint {
    month: NaiveDate,
    pub units: u64,
    pub revenue: f64,
}

impl MonthlyPoint {
    /// Create a point for the calendar month containing `date`
    pub fn new(date: NaiveDate, units: u64, revenue: f64) -> Self {
        Self { month: month_start(date), units, revenue }
    }

    /// First day of the month this point covers
    pub fn month(&self) -> NaiveDate {
        self.month
    }

    /// `YYYY-MM` label of the month
    pub fn label(&self) -> String {
        month_label(self.month)
    }
}

/// Chronologically ascending monthly series tagged with its origin.
///
/// Points are sorted on construction and a month appears at most once;
/// later duplicates of a month are merged into the first.
#[derive(Debug, Clone, PartialEq)]
pub struct SalesSeries {
    points: Vec<MonthlyPoint>,
    origin: Origin,
}

impl SalesSeries {
    pub fn new(mut points: Vec<MonthlyPoint>, origin: Origin) -> Self {
        points.sort_by_key(|p| p.month);
        let mut merged: Vec<MonthlyPoint> = Vec::with_capacity(points.len());
        for point in points {
            match merged.last_mut() {
                Some(last) if last.month == point.month => {
                    last.units += point.units;
                    last.revenue += point.revenue;
                }
                _ => merged.push(point),
            }
        }
        Self { points: merged, origin }
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    pub fn points(&self) -> &[MonthlyPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Month labels in order
    pub fn labels(&self) -> Vec<String> {
        self.points.iter().map(MonthlyPoint::label).collect()
    }

    /// Unit counts in order
    pub fn units(&self) -> Vec<u64> {
        self.points.iter().map(|p| p.units).collect()
    }

    /// Unit counts as floats, the form the forecaster consumes
    pub fn unit_values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.units as f64).collect()
    }

    /// Revenue per month in order
    pub fn revenues(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.revenue).collect()
    }

    pub fn total_units(&self) -> u64 {
        self.points.iter().map(|p| p.units).sum()
    }

    /// Total revenue, rounded to cents
    pub fn total_revenue(&self) -> f64 {
        round_to(self.points.iter().map(|p| p.revenue).sum(), 2)
    }

    /// Mean units per month to one decimal, zero for an empty series
    pub fn avg_monthly_units(&self) -> f64 {
        if self.points.is_empty() {
            return 0.0;
        }
        round_to(self.total_units() as f64 / self.points.len() as f64, 1)
    }

    /// Keep only the most recent `months` points
    pub fn truncate_to_recent(&mut self, months: usize) {
        if self.points.len() > months {
            let excess = self.points.len() - months;
            self.points.drain(..excess);
        }
    }
}

#[derive(Serialize)]
struct SeriesView<'a> {
    dates: Vec<String>,
    sales: Vec<u64>,
    revenue: Vec<f64>,
    total_sales: u64,
    total_revenue: f64,
    avg_monthly_sales: f64,
    data_source: &'a Origin,
}

impl Serialize for SalesSeries {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        SeriesView {
            dates: self.labels(),
            sales: self.units(),
            revenue: self.revenues(),
            total_sales: self.total_units(),
            total_revenue: self.total_revenue(),
            avg_monthly_sales: self.avg_monthly_units(),
            data_source: &self.origin,
        }
        .serialize(serializer)
    }
}

/// First day of the month containing `date`
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// `YYYY-MM` label of the month containing `date`
pub fn month_label(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}
