//! Shared primitive types used across the dashboard.

/// An invoice identifier. Cancellation invoices keep their `C` prefix.
pub type InvoiceId = String;

/// A customer identifier, normalised to its integer text form.
pub type CustomerId = String;

/// A country name exactly as it appears in the source data.
pub type Country = String;

/// Country value the source data uses when the buyer's country is unknown.
pub const UNSPECIFIED_COUNTRY: &str = "Unspecified";
