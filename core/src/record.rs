//! The transaction record: one invoice line item.

use crate::types::{Country, CustomerId, InvoiceId};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// One invoice line item.
///
/// `line_total` is derived from quantity and unit price when the record is
/// built and cannot be set independently. Deserialization goes through
/// [`RecordFields`] so a stored total can never disagree with its inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RecordFields")]
pub struct TransactionRecord {
    pub invoice: InvoiceId,
    pub description: String,
    /// Negative for returns.
    pub quantity: i64,
    pub price: f64,
    pub customer_id: Option<CustomerId>,
    pub country: Country,
    pub invoice_date: NaiveDateTime,
    line_total: f64,
}

/// The source columns of a record, without the derived total.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordFields {
    pub invoice: InvoiceId,
    pub description: String,
    pub quantity: i64,
    pub price: f64,
    pub customer_id: Option<CustomerId>,
    pub country: Country,
    pub invoice_date: NaiveDateTime,
}

impl From<RecordFields> for TransactionRecord {
    fn from(f: RecordFields) -> Self {
        Self {
            line_total: f.quantity as f64 * f.price,
            invoice: f.invoice,
            description: f.description,
            quantity: f.quantity,
            price: f.price,
            customer_id: f.customer_id,
            country: f.country,
            invoice_date: f.invoice_date,
        }
    }
}

impl TransactionRecord {
    pub fn new(
        invoice: impl Into<InvoiceId>,
        description: impl Into<String>,
        quantity: i64,
        price: f64,
        customer_id: Option<CustomerId>,
        country: impl Into<Country>,
        invoice_date: NaiveDateTime,
    ) -> Self {
        RecordFields {
            invoice: invoice.into(),
            description: description.into(),
            quantity,
            price,
            customer_id,
            country: country.into(),
            invoice_date,
        }
        .into()
    }

    /// quantity × unit price.
    pub fn line_total(&self) -> f64 {
        self.line_total
    }

    /// Calendar day of the invoice.
    pub fn day(&self) -> NaiveDate {
        self.invoice_date.date()
    }

    /// A return or refund line.
    pub fn is_return(&self) -> bool {
        self.quantity < 0
    }
}
