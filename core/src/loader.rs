//! CSV loader for invoice line-item exports.
//!
//! RULE: malformed rows are rejected here, counted, and logged.
//! Nothing downstream re-validates a record.

use crate::{
    error::{DashError, DashResult},
    record::TransactionRecord,
    types::CustomerId,
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Timestamp layouts seen in the retail exports, tried in order.
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%m/%d/%Y %H:%M"];

/// Rejected rows logged one by one before switching to a summary line.
const MAX_LOGGED_REJECTS: usize = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadReport {
    pub loaded: usize,
    pub skipped: usize,
}

/// One CSV row. Headers follow the current export; the older export's
/// column names are accepted as aliases. `StockCode` is not read.
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Invoice", alias = "InvoiceNo")]
    invoice: String,
    #[serde(rename = "Description", default)]
    description: Option<String>,
    #[serde(rename = "Quantity")]
    quantity: i64,
    #[serde(rename = "InvoiceDate")]
    invoice_date: String,
    #[serde(rename = "Price", alias = "UnitPrice")]
    price: f64,
    #[serde(rename = "Customer ID", alias = "CustomerID", default)]
    customer_id: Option<String>,
    #[serde(rename = "Country")]
    country: String,
}

impl CsvRow {
    fn into_record(self) -> DashResult<TransactionRecord> {
        let invoice_date = parse_timestamp(&self.invoice_date)?;
        Ok(TransactionRecord::new(
            self.invoice,
            self.description.unwrap_or_default(),
            self.quantity,
            self.price,
            self.customer_id.as_deref().and_then(normalize_customer_id),
            self.country,
            invoice_date,
        ))
    }
}

/// Read a CSV export from disk.
pub fn load_csv_path(path: &str) -> DashResult<(Vec<TransactionRecord>, LoadReport)> {
    let text = std::fs::read_to_string(path)?;
    let (records, report) = parse_csv_str(&text)?;
    log::info!(
        "loader: {path}: loaded {} rows, skipped {}",
        report.loaded,
        report.skipped
    );
    Ok((records, report))
}

/// A data row the loader refused, with the CSV line it starts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedRow {
    pub line: Option<u64>,
    pub reason: String,
}

/// Parse CSV text. A missing or unreadable header row is an error; bad data
/// rows are skipped.
pub fn parse_csv_str(text: &str) -> DashResult<(Vec<TransactionRecord>, LoadReport)> {
    let (records, rejected) = parse_csv_rows(text)?;

    for row in rejected.iter().take(MAX_LOGGED_REJECTS) {
        match row.line {
            Some(line) => log::warn!("loader: skipping line {line}: {}", row.reason),
            None => log::warn!("loader: skipping row: {}", row.reason),
        }
    }
    if rejected.len() > MAX_LOGGED_REJECTS {
        log::warn!("loader: {} malformed rows skipped in total", rejected.len());
    }

    let report = LoadReport {
        loaded: records.len(),
        skipped: rejected.len(),
    };
    Ok((records, report))
}

/// Parse CSV text, returning the accepted records and every rejected row.
/// Line numbers come from the reader, so quoted fields spanning several
/// lines do not shift them.
pub fn parse_csv_rows(text: &str) -> DashResult<(Vec<TransactionRecord>, Vec<RejectedRow>)> {
    // Strip UTF-8 BOM if present
    let text = text.trim_start_matches('\u{FEFF}');

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());
    let headers = reader.headers()?.clone();

    let mut records = Vec::new();
    let mut rejected = Vec::new();

    for result in reader.records() {
        let (line, parsed) = match result {
            Ok(raw) => (
                raw.position().map(csv::Position::line),
                parse_row(&raw, &headers),
            ),
            Err(e) => (e.position().map(csv::Position::line), Err(DashError::from(e))),
        };
        match parsed {
            Ok(record) => records.push(record),
            Err(e) => rejected.push(RejectedRow {
                line,
                reason: e.to_string(),
            }),
        }
    }
    Ok((records, rejected))
}

fn parse_row(raw: &csv::StringRecord, headers: &csv::StringRecord) -> DashResult<TransactionRecord> {
    raw.deserialize::<CsvRow>(Some(headers))?.into_record()
}

pub fn parse_timestamp(value: &str) -> DashResult<NaiveDateTime> {
    let value = value.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .ok_or_else(|| DashError::InvalidDate {
            value: value.to_string(),
            expected: "YYYY-MM-DD HH:MM[:SS] or MM/DD/YYYY HH:MM",
        })
}

/// Largest magnitude at which every integer is exactly representable as f64.
const MAX_EXACT_ID: f64 = 9_007_199_254_740_992.0;

/// Spreadsheet exports store customer ids as floats (`13085.0`).
/// Blank means no customer. Values too large to be exact keep their text.
pub fn normalize_customer_id(raw: &str) -> Option<CustomerId> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match raw.parse::<f64>() {
        Ok(v) if v.fract() == 0.0 && v.abs() <= MAX_EXACT_ID => Some(format!("{}", v as i64)),
        _ => Some(raw.to_string()),
    }
}
