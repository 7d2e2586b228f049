// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for fiscal year rollover.
//!
//! `SQLite` via Diesel, with migrations embedded at compile time. The store
//! holds companies, their fiscal years, and the per-year ledger a rollover
//! carries forward: settings, item stock, account balances, and voucher
//! counters. It also keeps a ledger of rollover runs keyed by request id.
//!
//! ## Transactions
//!
//! [`Persistence::execute_rollover`] runs the whole pipeline in a single
//! transaction. [`Persistence::switch_current`] flips current flags in a
//! transaction of its own. A partial unique index guarantees a company never
//! has two current fiscal years.
//!
//! ## Testing
//!
//! [`Persistence::new_in_memory`] gives each caller an isolated shared-cache
//! in-memory database.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use diesel::SqliteConnection;
use fiscal_rollover_domain::FiscalYear;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

pub use data_models::{
    AccountBalanceRecord, CompanyRecord, FailedRun, ItemStockRecord, NewCompany, RolloverOutcome,
    RolloverPlan, RolloverRunRecord, RunStatus, StepReport, VoucherCounterRecord,
};
pub use error::PersistenceError;
pub use mutations::rollover::StepObserver;

/// Atomic counter for generating unique in-memory database names.
///
/// Each call to `new_in_memory()` receives a unique sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Persistence adapter over a single `SQLite` connection.
pub struct Persistence {
    conn: SqliteConnection,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url: String = format!("file:memdb_rollover_{db_id}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;
        backend::sqlite::configure_file_database(&mut conn)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    // ========================================================================
    // Companies
    // ========================================================================

    /// Creates a company with its first fiscal year, marked current.
    ///
    /// # Errors
    ///
    /// Returns an error if a company already exists, the bounds are invalid,
    /// or the database operation fails.
    pub fn bootstrap_company(
        &mut self,
        company: &NewCompany,
    ) -> Result<CompanyRecord, PersistenceError> {
        mutations::bootstrap::bootstrap_company(&mut self.conn, company)
    }

    /// Returns the company the server operates on, if one exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn primary_company(&mut self) -> Result<Option<CompanyRecord>, PersistenceError> {
        queries::companies::get_primary_company(&mut self.conn)
    }

    /// Retrieves a company by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_company(&mut self, company_id: i64) -> Result<Option<CompanyRecord>, PersistenceError> {
        queries::companies::get_company(&mut self.conn, company_id)
    }

    // ========================================================================
    // Fiscal Year Directory
    // ========================================================================

    /// Lists a company's fiscal years, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_fiscal_years(&mut self, company_id: i64) -> Result<Vec<FiscalYear>, PersistenceError> {
        queries::fiscal_years::list_fiscal_years(&mut self.conn, company_id)
    }

    /// Retrieves one of a company's fiscal years.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_fiscal_year(
        &mut self,
        company_id: i64,
        fiscal_year_id: i64,
    ) -> Result<Option<FiscalYear>, PersistenceError> {
        queries::fiscal_years::get_fiscal_year(&mut self.conn, company_id, fiscal_year_id)
    }

    /// Makes `fiscal_year_id` the company's current fiscal year.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::FiscalYearNotFound` if the year is unknown
    /// or belongs to another company.
    pub fn switch_current(
        &mut self,
        company_id: i64,
        fiscal_year_id: i64,
    ) -> Result<FiscalYear, PersistenceError> {
        mutations::fiscal_years::switch_current(&mut self.conn, company_id, fiscal_year_id)
    }

    // ========================================================================
    // Rollover
    // ========================================================================

    /// Executes a rollover in one transaction, reporting each finished step.
    ///
    /// # Arguments
    ///
    /// * `plan` - The validated rollover
    /// * `observer` - Called after each step; returning an error aborts the run
    ///
    /// # Errors
    ///
    /// Returns an error if any step fails; nothing is written in that case.
    pub fn execute_rollover(
        &mut self,
        plan: &RolloverPlan,
        observer: &mut StepObserver<'_>,
    ) -> Result<RolloverOutcome, PersistenceError> {
        mutations::rollover::execute_rollover(&mut self.conn, plan, observer)
    }

    /// Finds the completed run recorded for `request_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_completed_run(
        &mut self,
        company_id: i64,
        request_id: &str,
    ) -> Result<Option<RolloverRunRecord>, PersistenceError> {
        queries::runs::find_completed_run(&mut self.conn, company_id, request_id)
    }

    /// Records a failed run.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn record_failed_run(&mut self, run: &FailedRun) -> Result<i64, PersistenceError> {
        mutations::runs::record_failed_run(&mut self.conn, run)
    }

    /// Lists a company's rollover runs, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_rollover_runs(
        &mut self,
        company_id: i64,
    ) -> Result<Vec<RolloverRunRecord>, PersistenceError> {
        queries::runs::list_rollover_runs(&mut self.conn, company_id)
    }

    // ========================================================================
    // Ledger
    // ========================================================================

    /// Adds an item to a company and returns its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the code is taken or the insert fails.
    pub fn add_item(&mut self, company_id: i64, code: &str, name: &str) -> Result<i64, PersistenceError> {
        mutations::ledger::insert_item(&mut self.conn, company_id, code, name)
    }

    /// Records an item's stock movement for a fiscal year.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn set_item_stock(&mut self, stock: &ItemStockRecord) -> Result<(), PersistenceError> {
        mutations::ledger::upsert_item_stock(&mut self.conn, stock)
    }

    /// Retrieves an item's stock movement for a fiscal year.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_item_stock(
        &mut self,
        item_id: i64,
        fiscal_year_id: i64,
    ) -> Result<Option<ItemStockRecord>, PersistenceError> {
        queries::ledger::get_item_stock(&mut self.conn, item_id, fiscal_year_id)
    }

    /// Adds an account to a company and returns its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the code is taken or the insert fails.
    pub fn add_account(&mut self, company_id: i64, code: &str, name: &str) -> Result<i64, PersistenceError> {
        mutations::ledger::insert_account(&mut self.conn, company_id, code, name)
    }

    /// Records an account's balance movement for a fiscal year.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn set_account_balance(&mut self, balance: &AccountBalanceRecord) -> Result<(), PersistenceError> {
        mutations::ledger::upsert_account_balance(&mut self.conn, balance)
    }

    /// Retrieves an account's balance movement for a fiscal year.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_account_balance(
        &mut self,
        account_id: i64,
        fiscal_year_id: i64,
    ) -> Result<Option<AccountBalanceRecord>, PersistenceError> {
        queries::ledger::get_account_balance(&mut self.conn, account_id, fiscal_year_id)
    }

    /// Sets a per-year setting.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn set_setting(&mut self, fiscal_year_id: i64, key: &str, value: &str) -> Result<(), PersistenceError> {
        mutations::ledger::upsert_setting(&mut self.conn, fiscal_year_id, key, value)
    }

    /// Lists a fiscal year's settings as `(key, value)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_settings(&mut self, fiscal_year_id: i64) -> Result<Vec<(String, String)>, PersistenceError> {
        queries::ledger::list_settings(&mut self.conn, fiscal_year_id)
    }

    /// Sets a voucher counter for a fiscal year.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn set_voucher_counter(
        &mut self,
        fiscal_year_id: i64,
        counter: &VoucherCounterRecord,
    ) -> Result<(), PersistenceError> {
        mutations::ledger::upsert_voucher_counter(&mut self.conn, fiscal_year_id, counter)
    }

    /// Lists a fiscal year's voucher counters.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_voucher_counters(
        &mut self,
        fiscal_year_id: i64,
    ) -> Result<Vec<VoucherCounterRecord>, PersistenceError> {
        queries::ledger::list_voucher_counters(&mut self.conn, fiscal_year_id)
    }
}
