//! SQLite persistence for loaded transaction records.
//!
//! RULE: Only the store talks to the database.
//! The query layer never reads from here; the runner loads once into a
//! `Dataset` and queries that.

use crate::{
    error::DashResult,
    loader::{parse_timestamp, LoadReport},
    record::TransactionRecord,
};
use rusqlite::{params, Connection, OptionalExtension};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub struct DashStore {
    conn: Connection,
}

/// A stored row before its timestamp is parsed.
struct StoredRow {
    invoice: String,
    description: String,
    quantity: i64,
    price: f64,
    customer_id: Option<String>,
    country: String,
    invoice_date: String,
}

impl DashStore {
    pub fn open(path: &str) -> DashResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI,
        )?;
        // WAL mode only for real files (:memory: ignores it).
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> DashResult<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> DashResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_transactions.sql"))?;
        Ok(())
    }

    // ── Transactions ───────────────────────────────────────────

    /// Append records in one transaction. Returns the number written.
    pub fn insert_records(&mut self, records: &[TransactionRecord]) -> DashResult<usize> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO transaction_line (
                    invoice, description, quantity, price, customer_id, country, invoice_date
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for r in records {
                stmt.execute(params![
                    &r.invoice,
                    &r.description,
                    r.quantity,
                    r.price,
                    &r.customer_id,
                    &r.country,
                    r.invoice_date.format(TIMESTAMP_FORMAT).to_string(),
                ])?;
            }
        }
        tx.commit()?;
        log::debug!("store: inserted {} records", records.len());
        Ok(records.len())
    }

    /// Every stored record, in insertion order.
    pub fn load_records(&self) -> DashResult<Vec<TransactionRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT invoice, description, quantity, price, customer_id, country, invoice_date
             FROM transaction_line ORDER BY id ASC",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(StoredRow {
                    invoice: row.get(0)?,
                    description: row.get(1)?,
                    quantity: row.get(2)?,
                    price: row.get(3)?,
                    customer_id: row.get(4)?,
                    country: row.get(5)?,
                    invoice_date: row.get(6)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|row| -> DashResult<TransactionRecord> {
                Ok(TransactionRecord::new(
                    row.invoice,
                    row.description,
                    row.quantity,
                    row.price,
                    row.customer_id,
                    row.country,
                    parse_timestamp(&row.invoice_date)?,
                ))
            })
            .collect()
    }

    pub fn record_count(&self) -> DashResult<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM transaction_line", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Remove every stored record, e.g. before a fresh import.
    pub fn clear(&self) -> DashResult<()> {
        self.conn.execute("DELETE FROM transaction_line", [])?;
        Ok(())
    }

    // ── Import log ─────────────────────────────────────────────

    pub fn record_import(&self, source: &str, report: &LoadReport, imported_at: &str) -> DashResult<()> {
        self.conn.execute(
            "INSERT INTO import_log (source, loaded, skipped, imported_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![source, report.loaded as i64, report.skipped as i64, imported_at],
        )?;
        Ok(())
    }

    /// The most recent import: `(source, report)`.
    pub fn last_import(&self) -> DashResult<Option<(String, LoadReport)>> {
        let mut stmt = self.conn.prepare(
            "SELECT source, loaded, skipped FROM import_log
             ORDER BY id DESC LIMIT 1",
        )?;
        let result = stmt
            .query_row([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    LoadReport {
                        loaded: row.get::<_, i64>(1)? as usize,
                        skipped: row.get::<_, i64>(2)? as usize,
                    },
                ))
            })
            .optional()?;
        Ok(result)
    }
}
