//! Synthetic retail dataset, deterministic per seed.
//!
//! Shapes the data like a gift-ware wholesaler's invoice export: mostly
//! domestic orders, a handful of export countries, cancellation invoices
//! with negative quantities, the odd free line, and some guest checkouts
//! with no customer id.

use crate::{
    record::TransactionRecord,
    rng::{SampleRng, SampleStream},
    types::UNSPECIFIED_COUNTRY,
};
use chrono::{Duration, NaiveDate, NaiveDateTime};

const COUNTRIES: [(&str, f64); 8] = [
    ("United Kingdom", 0.70),
    ("Germany", 0.07),
    ("France", 0.06),
    ("EIRE", 0.05),
    ("Netherlands", 0.04),
    ("Spain", 0.03),
    ("Australia", 0.03),
    (UNSPECIFIED_COUNTRY, 0.02),
];

const CATALOG: [(&str, f64); 16] = [
    ("WHITE HANGING HEART T-LIGHT HOLDER", 2.55),
    ("REGENCY CAKESTAND 3 TIER", 12.75),
    ("JUMBO BAG RED RETROSPOT", 1.95),
    ("PARTY BUNTING", 4.65),
    ("ASSORTED COLOUR BIRD ORNAMENT", 1.69),
    ("LUNCH BAG RED RETROSPOT", 1.65),
    ("SET OF 3 CAKE TINS PANTRY DESIGN", 4.95),
    ("PACK OF 72 RETROSPOT CAKE CASES", 0.55),
    ("WOODEN FRAME ANTIQUE WHITE", 2.95),
    ("HEART OF WICKER SMALL", 1.65),
    ("NATURAL SLATE HEART CHALKBOARD", 2.95),
    ("CREAM CUPID HEARTS COAT HANGER", 4.15),
    ("RED WOOLLY HOTTIE WHITE HEART", 3.75),
    ("SET 7 BABUSHKA NESTING BOXES", 8.50),
    ("GLASS STAR FROSTED T-LIGHT HOLDER", 4.25),
    ("POSTAGE", 18.00),
];

#[derive(Debug, Clone, PartialEq)]
pub struct SampleConfig {
    pub seed: u64,
    pub invoices: usize,
    pub start: NaiveDate,
    pub days: i64,
    pub cancellation_rate: f64,
    pub guest_rate: f64,
    pub free_line_rate: f64,
}

impl SampleConfig {
    pub fn new(seed: u64, invoices: usize) -> Self {
        Self {
            seed,
            invoices,
            start: NaiveDate::from_ymd_opt(2010, 12, 1).unwrap_or_default(),
            days: 365,
            cancellation_rate: 0.05,
            guest_rate: 0.15,
            free_line_rate: 0.01,
        }
    }
}

pub struct SampleGenerator {
    config: SampleConfig,
}

impl SampleGenerator {
    pub fn new(config: SampleConfig) -> Self {
        Self { config }
    }

    pub fn generate(&self) -> Vec<TransactionRecord> {
        let cfg = &self.config;
        let mut inv_rng = SampleRng::new(cfg.seed, SampleStream::Invoices);
        let mut line_rng = SampleRng::new(cfg.seed, SampleStream::Lines);
        let country_weights: Vec<f64> = COUNTRIES.iter().map(|(_, w)| *w).collect();
        let start = cfg.start.and_hms_opt(0, 0, 0).unwrap_or_default();

        let mut records = Vec::new();
        for n in 0..cfg.invoices {
            let cancelled = inv_rng.chance(cfg.cancellation_rate);
            let invoice = if cancelled {
                format!("C{}", 536_365 + n)
            } else {
                format!("{}", 536_365 + n)
            };
            let country = COUNTRIES[inv_rng.weighted_index(&country_weights)].0;
            let customer_id = if inv_rng.chance(cfg.guest_rate) {
                None
            } else {
                Some(format!("{}", 12_346 + inv_rng.next_u64_below(6_000)))
            };
            let invoice_date = invoice_timestamp(start, cfg.days, &mut inv_rng);

            let lines = 1 + inv_rng.next_u64_below(8);
            for _ in 0..lines {
                let (description, list_price) =
                    CATALOG[line_rng.next_u64_below(CATALOG.len() as u64) as usize];
                let mut quantity = line_rng.pareto(1.0, 1.3).min(480.0) as i64;
                if cancelled {
                    quantity = -quantity;
                }
                let price = if line_rng.chance(cfg.free_line_rate) {
                    0.0
                } else {
                    list_price
                };
                records.push(TransactionRecord::new(
                    invoice.clone(),
                    description,
                    quantity,
                    price,
                    customer_id.clone(),
                    country,
                    invoice_date,
                ));
            }
        }
        records
    }
}

/// Trading hours only: 08:00 to 17:59.
fn invoice_timestamp(start: NaiveDateTime, days: i64, rng: &mut SampleRng) -> NaiveDateTime {
    let day = rng.next_u64_below(days.max(1) as u64) as i64;
    let minute = 8 * 60 + rng.next_u64_below(10 * 60) as i64;
    start + Duration::days(day) + Duration::minutes(minute)
}
