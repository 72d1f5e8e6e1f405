//! The immutable in-memory dataset.
//!
//! Built once from loaded records. The missing-customer policy is applied
//! here, so every view computed afterwards sees the same row set.

use crate::{
    config::{CustomerIdPolicy, DashboardConfig},
    record::TransactionRecord,
    types::{Country, UNSPECIFIED_COUNTRY},
};
use chrono::NaiveDate;
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    records: Vec<TransactionRecord>,
    dropped_without_customer: usize,
}

impl Dataset {
    pub fn from_records(records: Vec<TransactionRecord>, policy: CustomerIdPolicy) -> Self {
        let before = records.len();
        let records: Vec<TransactionRecord> = match policy {
            CustomerIdPolicy::Retain => records,
            CustomerIdPolicy::Drop => records
                .into_iter()
                .filter(|r| r.customer_id.is_some())
                .collect(),
        };
        let dropped = before - records.len();
        if dropped > 0 {
            log::info!("dataset: dropped {dropped} of {before} rows without a customer id");
        }
        Self {
            records,
            dropped_without_customer: dropped,
        }
    }

    pub fn with_config(records: Vec<TransactionRecord>, config: &DashboardConfig) -> Self {
        Self::from_records(records, config.customer_id_policy)
    }

    pub fn records(&self) -> &[TransactionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rows removed at construction by the missing-customer policy.
    pub fn dropped_without_customer(&self) -> usize {
        self.dropped_without_customer
    }

    /// Every distinct country present, sorted.
    pub fn countries(&self) -> Vec<Country> {
        self.records
            .iter()
            .map(|r| r.country.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Countries offered as filter options. `"Unspecified"` is left out when
    /// `exclude_unspecified` is set.
    pub fn filterable_countries(&self, exclude_unspecified: bool) -> Vec<Country> {
        let mut countries = self.countries();
        if exclude_unspecified {
            countries.retain(|c| c != UNSPECIFIED_COUNTRY);
        }
        countries
    }

    /// Earliest and latest invoice day, or `None` for an empty dataset.
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let min = self.records.iter().map(TransactionRecord::day).min()?;
        let max = self.records.iter().map(TransactionRecord::day).max()?;
        Some((min, max))
    }
}
