#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! `DuckDB` storage for PCAF loans and calculation results.
//!
//! A single database file (`results.duckdb` in the data directory) holds
//! two tables:
//!
//! - `loans`: the latest input record per loan ID ([`loans_db`]).
//! - `calculation_results`: an append-only log of every calculation
//!   ([`results_db`]). Recalculating a loan adds a row; rows are never
//!   updated or deleted.
//!
//! [`save_calculations`] writes both tables in one transaction, so a
//! failed batch leaves neither table changed.

pub mod loans_db;
pub mod paths;
pub mod results_db;

use std::path::Path;

use duckdb::Connection;
use pcaf_loan_models::{CalculationResult, LoanRecord};

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// `DuckDB` error.
    #[error("DuckDB error: {0}")]
    DuckDb(#[from] duckdb::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored value could not be converted back to its model type.
    #[error("Data conversion error: {message}")]
    Conversion {
        /// Description of what went wrong.
        message: String,
    },
}

/// Opens (or creates) the results database and ensures the schema exists.
///
/// # Errors
///
/// Returns [`StoreError`] if the directory, connection, or schema creation
/// fails.
pub fn open(path: &Path) -> Result<Connection, StoreError> {
    if let Some(parent) = path.parent() {
        paths::ensure_dir(parent)?;
    }

    log::debug!("Opening results database at {}", path.display());
    let conn = Connection::open(path)?;
    create_schema(&conn)?;
    Ok(conn)
}

/// Opens the results database in `data_dir`.
///
/// # Errors
///
/// Returns [`StoreError`] if the connection or schema creation fails.
pub fn open_in(data_dir: &Path) -> Result<Connection, StoreError> {
    open(&paths::results_db_path(data_dir))
}

/// Creates every table this crate uses, if absent.
///
/// # Errors
///
/// Returns [`StoreError`] if a DDL statement fails.
pub fn create_schema(conn: &Connection) -> Result<(), StoreError> {
    loans_db::create_schema(conn)?;
    results_db::create_schema(conn)?;
    Ok(())
}

/// Row counts written by [`save_calculations`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SavedCounts {
    pub loans: u64,
    pub results: u64,
}

/// Saves a batch's loan inputs and calculation results atomically.
///
/// # Errors
///
/// Returns [`StoreError`] if any write fails. The transaction is rolled
/// back first, so nothing from the batch is stored.
pub fn save_calculations(
    conn: &Connection,
    loans: &[LoanRecord],
    results: &[CalculationResult],
) -> Result<SavedCounts, StoreError> {
    conn.execute_batch("BEGIN TRANSACTION")?;

    let written = loans_db::upsert_loans(conn, loans).and_then(|loans| {
        let results = results_db::append(conn, results)?;
        Ok(SavedCounts { loans, results })
    });

    match written {
        Ok(counts) => {
            conn.execute_batch("COMMIT")?;
            Ok(counts)
        }
        Err(e) => {
            log::warn!("Rolling back batch save: {e}");
            if let Err(rollback) = conn.execute_batch("ROLLBACK") {
                log::error!("Rollback failed: {rollback}");
            }
            Err(e)
        }
    }
}

#[cfg(test)]
pub(crate) fn open_in_memory() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    create_schema(&conn).unwrap();
    conn
}
