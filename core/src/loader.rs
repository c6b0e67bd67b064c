//! Data loader — reads the three sheet exports, drops incomplete rows,
//! and merges them through the sheet store.
//!
//! This loader:
//!   1. Reads customers, transactions and usage sheets (CSV with headers)
//!   2. Drops any row with a missing cell, in any column
//!   3. Rejects non-finite numbers instead of carrying them into the join
//!   4. Inner-joins the cleaned sheets on customer_id

use crate::{
    config::DashboardConfig,
    error::{RiskError, RiskResult},
    record::{CustomerRow, Record, TransactionRow, UsageRow},
    store::SheetStore,
};
use serde::{de::DeserializeOwned, Serialize};
use std::{fs::File, io::Read, path::Path};

/// Cell values treated as missing, besides the empty string.
const MISSING_MARKERS: [&str; 5] = ["nan", "na", "n/a", "null", "none"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SheetSummary {
    pub sheet:   String,
    pub kept:    usize,
    pub dropped: usize,
}

/// Rows of one sheet after cleaning.
#[derive(Debug, Clone)]
pub struct CleanSheet<T> {
    pub rows:    Vec<T>,
    pub summary: SheetSummary,
}

/// The unified table handed to the visualizer and the scorer.
#[derive(Debug, Clone)]
pub struct MergedTable {
    pub records: Vec<Record>,
    pub sheets:  Vec<SheetSummary>,
}

/// Load and merge the sheets named in `config`.
pub fn load_merged(config: &DashboardConfig) -> RiskResult<MergedTable> {
    let customers: CleanSheet<CustomerRow> =
        read_sheet_file(&config.customers_path(), "customers")?;
    let transactions: CleanSheet<TransactionRow> =
        read_sheet_file(&config.transactions_path(), "transactions")?;
    let usage: CleanSheet<UsageRow> = read_sheet_file(&config.usage_path(), "usage")?;

    merge(customers, transactions, usage)
}

/// Merge already-cleaned sheets via an in-memory store.
pub fn merge(
    customers: CleanSheet<CustomerRow>,
    transactions: CleanSheet<TransactionRow>,
    usage: CleanSheet<UsageRow>,
) -> RiskResult<MergedTable> {
    validate_customers(&customers.rows)?;
    validate_transactions(&transactions.rows)?;
    validate_usage(&usage.rows)?;

    let store = SheetStore::in_memory()?;
    store.migrate()?;
    store.insert_customers(&customers.rows)?;
    store.insert_transactions(&transactions.rows)?;
    store.insert_usage(&usage.rows)?;

    let records = store.merged_records()?;
    log::info!(
        "Merged {} transactions x {} customers x {} usage rows into {} records",
        store.transaction_count()?,
        store.customer_count()?,
        store.usage_count()?,
        records.len()
    );
    if records.is_empty() {
        return Err(RiskError::EmptyDataset { stage: "joining on customer_id".into() });
    }

    Ok(MergedTable {
        records,
        sheets: vec![customers.summary, transactions.summary, usage.summary],
    })
}

pub fn read_sheet_file<T: DeserializeOwned>(path: &Path, sheet: &str) -> RiskResult<CleanSheet<T>> {
    let file = File::open(path).map_err(|source| RiskError::Io {
        path: path.display().to_string(),
        source,
    })?;
    read_sheet(file, sheet)
}

/// Read one sheet, dropping rows that have any missing cell.
pub fn read_sheet<T: DeserializeOwned, R: Read>(input: R, sheet: &str) -> RiskResult<CleanSheet<T>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(input);
    let headers = reader.headers()?.clone();

    let mut rows = Vec::new();
    let mut dropped = 0usize;
    for result in reader.records() {
        let record = result?;
        if record.len() < headers.len() || record.iter().any(is_missing) {
            dropped += 1;
            continue;
        }
        rows.push(record.deserialize(Some(&headers))?);
    }

    log::info!("Sheet '{sheet}': kept {} rows, dropped {dropped} incomplete", rows.len());
    if rows.is_empty() {
        return Err(RiskError::EmptyDataset { stage: format!("cleaning sheet '{sheet}'") });
    }

    Ok(CleanSheet {
        summary: SheetSummary { sheet: sheet.to_string(), kept: rows.len(), dropped },
        rows,
    })
}

fn is_missing(cell: &str) -> bool {
    cell.is_empty() || MISSING_MARKERS.iter().any(|m| cell.eq_ignore_ascii_case(m))
}

fn ensure_finite(sheet: &str, row: usize, column: &str, value: f64) -> RiskResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(RiskError::invalid(format!(
            "sheet '{sheet}' row {row}: {column} is not a finite number ({value})"
        )))
    }
}

fn validate_customers(rows: &[CustomerRow]) -> RiskResult<()> {
    for (i, row) in rows.iter().enumerate() {
        ensure_finite("customers", i, "total_debt", row.total_debt)?;
    }
    Ok(())
}

fn validate_transactions(rows: &[TransactionRow]) -> RiskResult<()> {
    for (i, row) in rows.iter().enumerate() {
        ensure_finite("transactions", i, "amount", row.amount)?;
    }
    Ok(())
}

fn validate_usage(rows: &[UsageRow]) -> RiskResult<()> {
    for (i, row) in rows.iter().enumerate() {
        ensure_finite("usage", i, "usage_volume", row.usage_volume)?;
    }
    Ok(())
}
