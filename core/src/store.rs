//! In-memory SQLite holding the cleaned sheets for one session.
//!
//! RULE: Only store.rs talks to the database.
//! The loader hands it sheet rows; the join happens here in SQL.

use rusqlite::{Connection, params};
use crate::{
    error::RiskResult,
    record::{CustomerRow, Record, TransactionRow, UsageRow},
};

pub struct SheetStore {
    conn: Connection,
}

impl SheetStore {
    /// Open an empty in-memory database. Nothing outlives the process.
    pub fn in_memory() -> RiskResult<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> RiskResult<()> {
        self.conn.execute_batch(include_str!("../../migrations/001_sheets.sql"))?;
        Ok(())
    }

    // ── Sheets ─────────────────────────────────────────────────

    pub fn insert_customers(&self, rows: &[CustomerRow]) -> RiskResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO customer (customer_id, total_debt) VALUES (?1, ?2)",
            )?;
            for row in rows {
                stmt.execute(params![row.customer_id, row.total_debt])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    pub fn insert_transactions(&self, rows: &[TransactionRow]) -> RiskResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO financial_transaction (transaction_id, customer_id, amount)
                 VALUES (?1, ?2, ?3)",
            )?;
            for row in rows {
                stmt.execute(params![row.transaction_id, row.customer_id, row.amount])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    pub fn insert_usage(&self, rows: &[UsageRow]) -> RiskResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO resource_usage (customer_id, resource_type, usage_volume)
                 VALUES (?1, ?2, ?3)",
            )?;
            for row in rows {
                stmt.execute(params![row.customer_id, row.resource_type, row.usage_volume])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    pub fn customer_count(&self) -> RiskResult<i64> {
        Ok(self.conn.query_row("SELECT COUNT(*) FROM customer", [], |r| r.get(0))?)
    }

    pub fn transaction_count(&self) -> RiskResult<i64> {
        Ok(self.conn.query_row("SELECT COUNT(*) FROM financial_transaction", [], |r| r.get(0))?)
    }

    pub fn usage_count(&self) -> RiskResult<i64> {
        Ok(self.conn.query_row("SELECT COUNT(*) FROM resource_usage", [], |r| r.get(0))?)
    }

    // ── Merge ──────────────────────────────────────────────────

    /// transactions ⋈ customers ⋈ usage, inner joins on customer_id.
    /// Ordered by transaction row, then customer row, then usage row.
    pub fn merged_records(&self) -> RiskResult<Vec<Record>> {
        let mut stmt = self.conn.prepare(
            "SELECT t.customer_id, t.transaction_id, u.resource_type,
                    c.total_debt, t.amount, u.usage_volume
             FROM financial_transaction t
             JOIN customer       c ON c.customer_id = t.customer_id
             JOIN resource_usage u ON u.customer_id = t.customer_id
             ORDER BY t.row_no ASC, c.row_no ASC, u.row_no ASC"
        )?;
        let records = stmt.query_map([], |row| {
            Ok(Record {
                customer_id:        row.get(0)?,
                transaction_id:     row.get(1)?,
                resource_type:      row.get(2)?,
                total_debt:         row.get(3)?,
                transaction_amount: row.get(4)?,
                usage_volume:       row.get(5)?,
            })
        })?.collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }
}
