//! Filter-and-aggregate query layer.
//!
//! Every function here is pure: it borrows the dataset, never mutates it,
//! and returns freshly built views. Identical inputs give identical outputs.
//!
//! Grouping goes through ordered maps and a stable descending sort, so
//! rankings with equal totals come out in ascending key order.

use crate::{
    config::{DashboardConfig, TimeBucket},
    dataset::Dataset,
    record::TransactionRecord,
    types::Country,
};
use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

pub const DEFAULT_TOP_N: usize = 10;

/// Hard ceiling on the product ranking, whatever the caller asks for.
pub const MAX_TOP_PRODUCTS: usize = 10;

// ── Inputs ───────────────────────────────────────────────────────────────────

/// The user-controlled filter: one country and an inclusive day range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewFilter {
    pub country: Country,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl ViewFilter {
    pub fn new(country: impl Into<Country>, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            country: country.into(),
            start_date,
            end_date,
        }
    }

    /// Exact, case-sensitive country match and `start <= day <= end`.
    /// A reversed range matches nothing.
    pub fn matches(&self, record: &TransactionRecord) -> bool {
        let day = record.day();
        record.country == self.country && self.start_date <= day && day <= self.end_date
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewOptions {
    pub bucket: TimeBucket,
    pub top_n: usize,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            bucket: TimeBucket::Day,
            top_n: DEFAULT_TOP_N,
        }
    }
}

impl From<&DashboardConfig> for ViewOptions {
    fn from(config: &DashboardConfig) -> Self {
        Self {
            bucket: config.series_bucket,
            top_n: config.top_products.min(MAX_TOP_PRODUCTS),
        }
    }
}

// ── Views ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenuePoint {
    /// The day, or the Monday closing the week.
    pub period: NaiveDate,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRevenue {
    pub description: String,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryRevenue {
    pub country: Country,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterPoint {
    pub quantity: i64,
    pub price: f64,
    /// Marker weight: the line total.
    pub size: f64,
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryMetrics {
    pub total_revenue: f64,
    pub total_quantity: i64,
    pub distinct_products: usize,
    pub distinct_invoices: usize,
}

/// Everything the filtered dashboard draws.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardViews {
    pub revenue_series: Vec<RevenuePoint>,
    pub top_products: Vec<ProductRevenue>,
    pub scatter_points: Vec<ScatterPoint>,
    pub summary: SummaryMetrics,
}

impl DashboardViews {
    pub fn is_empty(&self) -> bool {
        self.revenue_series.is_empty()
            && self.top_products.is_empty()
            && self.scatter_points.is_empty()
            && self.summary == SummaryMetrics::default()
    }
}

/// The unfiltered, whole-dataset dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Overview {
    pub total_revenue: f64,
    pub top_countries: Vec<CountryRevenue>,
    pub top_products: Vec<ProductRevenue>,
    pub revenue_series: Vec<RevenuePoint>,
}

// ── Operations ───────────────────────────────────────────────────────────────

/// Compute all filtered views for one interaction.
pub fn compute_views(dataset: &Dataset, filter: &ViewFilter, options: &ViewOptions) -> DashboardViews {
    let rows = filter_records(dataset, filter);
    log::debug!(
        "query: country={} range={}..={} matched {} of {} rows",
        filter.country,
        filter.start_date,
        filter.end_date,
        rows.len(),
        dataset.len()
    );

    DashboardViews {
        revenue_series: revenue_series(&rows, options.bucket),
        top_products: top_products(&rows, options.top_n.min(MAX_TOP_PRODUCTS)),
        scatter_points: scatter_points(&rows),
        summary: summary_metrics(&rows),
    }
}

/// Whole-dataset views: total revenue, country ranking, top products and
/// the revenue series at the overview granularity.
pub fn overview(dataset: &Dataset, config: &DashboardConfig) -> Overview {
    let rows: Vec<&TransactionRecord> = dataset.records().iter().collect();
    let mut top_countries = revenue_by_country(&rows);
    top_countries.truncate(config.top_countries);

    Overview {
        total_revenue: rows.iter().map(|r| r.line_total()).sum(),
        top_countries,
        top_products: top_products(&rows, config.top_products.min(MAX_TOP_PRODUCTS)),
        revenue_series: revenue_series(&rows, config.overview_bucket),
    }
}

pub fn filter_records<'a>(dataset: &'a Dataset, filter: &ViewFilter) -> Vec<&'a TransactionRecord> {
    dataset.records().iter().filter(|r| filter.matches(r)).collect()
}

/// The bucket a day falls into.
pub fn bucket_period(day: NaiveDate, bucket: TimeBucket) -> NaiveDate {
    match bucket {
        TimeBucket::Day => day,
        TimeBucket::Week => {
            let from_monday = i64::from(day.weekday().num_days_from_monday());
            day + Duration::days((7 - from_monday) % 7)
        }
    }
}

/// Revenue per bucket, ascending by period. Buckets with no rows are absent.
pub fn revenue_series(rows: &[&TransactionRecord], bucket: TimeBucket) -> Vec<RevenuePoint> {
    sum_by(rows, |r| bucket_period(r.day(), bucket))
        .into_iter()
        .map(|(period, revenue)| RevenuePoint { period, revenue })
        .collect()
}

/// The `n` best-selling descriptions by summed line total.
pub fn top_products(rows: &[&TransactionRecord], n: usize) -> Vec<ProductRevenue> {
    rank_descending(sum_by(rows, |r| r.description.clone()))
        .into_iter()
        .take(n)
        .map(|(description, revenue)| ProductRevenue { description, revenue })
        .collect()
}

/// Full country ranking by summed line total, highest first.
pub fn revenue_by_country(rows: &[&TransactionRecord]) -> Vec<CountryRevenue> {
    rank_descending(sum_by(rows, |r| r.country.clone()))
        .into_iter()
        .map(|(country, revenue)| CountryRevenue { country, revenue })
        .collect()
}

/// Rows with strictly positive quantity and price, one point each.
pub fn scatter_points(rows: &[&TransactionRecord]) -> Vec<ScatterPoint> {
    rows.iter()
        .filter(|r| r.quantity > 0 && r.price > 0.0)
        .map(|r| ScatterPoint {
            quantity: r.quantity,
            price: r.price,
            size: r.line_total(),
            label: r.description.clone(),
        })
        .collect()
}

pub fn summary_metrics(rows: &[&TransactionRecord]) -> SummaryMetrics {
    let mut products = HashSet::new();
    let mut invoices = HashSet::new();
    let mut metrics = SummaryMetrics::default();

    for r in rows {
        metrics.total_revenue += r.line_total();
        metrics.total_quantity += r.quantity;
        products.insert(r.description.as_str());
        invoices.insert(r.invoice.as_str());
    }
    metrics.distinct_products = products.len();
    metrics.distinct_invoices = invoices.len();
    metrics
}

// ── Helpers ──────────────────────────────────────────────────────────────────

fn sum_by<K, F>(rows: &[&TransactionRecord], key: F) -> BTreeMap<K, f64>
where
    K: Ord,
    F: Fn(&TransactionRecord) -> K,
{
    let mut totals = BTreeMap::new();
    for r in rows {
        *totals.entry(key(r)).or_insert(0.0) += r.line_total();
    }
    totals
}

fn rank_descending<K>(totals: BTreeMap<K, f64>) -> Vec<(K, f64)> {
    let mut ranked: Vec<(K, f64)> = totals.into_iter().collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked
}
