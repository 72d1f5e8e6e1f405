//! Hand-built fixture shared by the integration tests.
//!
//! 2010-12-01 is a Wednesday; 2010-12-06 a Monday.
//!
//! France:
//!   1001  MUG      4 × 2.50 =  10.00   Wed 12-01
//!   1001  PLATE    2 × 5.00 =  10.00   Wed 12-01
//!   1002  MUG     10 × 2.50 =  25.00   Fri 12-03
//!   C1003 MUG     -2 × 2.50 =  -5.00   Mon 12-06
//!   1004  POSTAGE  1 × 0.00 =   0.00   Tue 12-07
//!   1005  BOWL     3 × 4.00 =  12.00   Tue 12-07 23:59
//! Germany:        2001 MUG 100 × 2.00 = 200.00  Thu 12-02
//! United Kingdom: 3001 LAMP  1 × 30.0 =  30.00  Thu 12-02  (no customer)
//! Unspecified:    4001 VASE  1 × 8.00 =   8.00  Sat 12-04

#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use retail_dash_core::record::TransactionRecord;

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    day(y, m, d).and_hms_opt(h, min, 0).unwrap()
}

pub fn rec(
    invoice: &str,
    description: &str,
    quantity: i64,
    price: f64,
    customer: Option<&str>,
    country: &str,
    when: NaiveDateTime,
) -> TransactionRecord {
    TransactionRecord::new(
        invoice,
        description,
        quantity,
        price,
        customer.map(str::to_string),
        country,
        when,
    )
}

pub fn fixture_records() -> Vec<TransactionRecord> {
    vec![
        rec("1001", "MUG", 4, 2.5, Some("1"), "France", at(2010, 12, 1, 9, 0)),
        rec("1001", "PLATE", 2, 5.0, Some("1"), "France", at(2010, 12, 1, 9, 0)),
        rec("2001", "MUG", 100, 2.0, Some("9"), "Germany", at(2010, 12, 2, 11, 30)),
        rec("3001", "LAMP", 1, 30.0, None, "United Kingdom", at(2010, 12, 2, 14, 0)),
        rec("1002", "MUG", 10, 2.5, Some("2"), "France", at(2010, 12, 3, 10, 0)),
        rec("4001", "VASE", 1, 8.0, Some("7"), "Unspecified", at(2010, 12, 4, 12, 0)),
        rec("C1003", "MUG", -2, 2.5, Some("2"), "France", at(2010, 12, 6, 8, 15)),
        rec("1004", "POSTAGE", 1, 0.0, Some("3"), "France", at(2010, 12, 7, 9, 0)),
        rec("1005", "BOWL", 3, 4.0, Some("3"), "France", at(2010, 12, 7, 23, 59)),
    ]
}

pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-6 * a.abs().max(b.abs()).max(1.0)
}
