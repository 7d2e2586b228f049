// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The rollover pipeline.
//!
//! All five steps run inside one transaction. The observer hears about each
//! step as it finishes. An error from a step or from the observer rolls the
//! whole transaction back: no new fiscal year exists afterwards and the
//! previous year is still current.

use diesel::prelude::*;
use diesel::{Connection, SqliteConnection};
use fiscal_rollover_domain::{FiscalYear, RolloverStep, fiscal_year_name};
use std::collections::HashMap;
use tracing::{debug, info};

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::{
    AccountBalanceRecord, ItemStockRecord, NewAccountBalanceRow, NewFiscalYearRow,
    NewItemStockRow, NewRolloverRunRow, NewSettingRow, NewVoucherCounterRow, RolloverOutcome,
    RolloverPlan, RunStatus, StepReport,
};
use crate::diesel_schema::{
    account_balances, company_settings, fiscal_years, item_stocks, voucher_counters,
};
use crate::error::PersistenceError;
use crate::mutations::fiscal_years::clear_current;
use crate::mutations::runs::insert_run;
use crate::queries::fiscal_years::{current_fiscal_year_id, get_fiscal_year};
use crate::queries::ledger::{
    list_account_balances, list_account_ids, list_item_ids, list_item_stocks, list_settings,
    list_voucher_counters,
};

/// Callback invoked after each step commits to the open transaction.
pub type StepObserver<'a> = dyn FnMut(StepReport) -> Result<(), PersistenceError> + 'a;

/// Executes a planned rollover.
///
/// On success the run is recorded in the run ledger as part of the same
/// transaction.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `plan` - The validated rollover
/// * `observer` - Called after each step; returning an error aborts the run
///
/// # Errors
///
/// Returns an error if:
/// - The planned previous fiscal year is no longer current
/// - A carried-forward value overflows
/// - The observer aborts
/// - The database operation fails
pub fn execute_rollover(
    conn: &mut SqliteConnection,
    plan: &RolloverPlan,
    observer: &mut StepObserver<'_>,
) -> Result<RolloverOutcome, PersistenceError> {
    let start_date: String = plan.start_date.to_string();
    let end_date: String = plan.end_date.to_string();
    let name: String = fiscal_year_name(&plan.start_date, &plan.end_date);
    let company_id: i64 = plan.company_id;
    let previous: i64 = plan.previous_fiscal_year_id;

    conn.transaction(|conn| {
        if current_fiscal_year_id(conn, company_id)? != Some(previous) {
            return Err(PersistenceError::StaleFiscalYear {
                expected_fiscal_year_id: previous,
            });
        }

        let fiscal_year_id: i64 =
            create_fiscal_year(conn, company_id, &name, &start_date, &end_date)?;
        report(observer, RolloverStep::CreateFiscalYear, 1)?;

        let settings_copied: usize = clone_settings(conn, previous, fiscal_year_id)?;
        report(observer, RolloverStep::CloneSettings, settings_copied)?;

        let items_migrated: usize = migrate_items(conn, company_id, previous, fiscal_year_id)?;
        report(observer, RolloverStep::MigrateItems, items_migrated)?;

        let accounts_updated: usize =
            update_accounts(conn, company_id, previous, fiscal_year_id)?;
        report(observer, RolloverStep::UpdateAccounts, accounts_updated)?;

        let counters_reset: usize = reset_voucher_counters(conn, previous, fiscal_year_id)?;
        report(observer, RolloverStep::ResetVoucherCounters, counters_reset)?;

        let run_id: i64 = insert_run(
            conn,
            &NewRolloverRunRow {
                company_id,
                request_id: plan.request_id.as_deref(),
                status: RunStatus::Completed.as_str(),
                start_date: &start_date,
                end_date: &end_date,
                fiscal_year_id: Some(fiscal_year_id),
                error_message: None,
            },
        )?;

        let fiscal_year: FiscalYear = get_fiscal_year(conn, company_id, fiscal_year_id)?
            .ok_or(PersistenceError::FiscalYearNotFound { fiscal_year_id })?;

        info!(
            company_id,
            run_id,
            fiscal_year_id,
            fiscal_year = %fiscal_year.name,
            settings_copied,
            items_migrated,
            accounts_updated,
            counters_reset,
            "Rollover committed"
        );

        Ok(RolloverOutcome {
            run_id,
            fiscal_year,
            settings_copied,
            items_migrated,
            accounts_updated,
            counters_reset,
        })
    })
}

fn report(
    observer: &mut StepObserver<'_>,
    step: RolloverStep,
    rows: usize,
) -> Result<(), PersistenceError> {
    debug!(step = %step, rows, "Rollover step finished");
    observer(StepReport { step, rows })
}

/// Step (a): inserts the new year and moves the current flag onto it.
fn create_fiscal_year(
    conn: &mut SqliteConnection,
    company_id: i64,
    name: &str,
    start_date: &str,
    end_date: &str,
) -> Result<i64, PersistenceError> {
    clear_current(conn, company_id)?;
    diesel::insert_into(fiscal_years::table)
        .values(NewFiscalYearRow {
            company_id,
            name,
            start_date,
            end_date,
            is_current: 1,
        })
        .execute(conn)?;
    get_last_insert_rowid(conn)
}

/// Step (b): copies every setting of the previous year.
fn clone_settings(
    conn: &mut SqliteConnection,
    previous: i64,
    fiscal_year_id: i64,
) -> Result<usize, PersistenceError> {
    let rows: Vec<NewSettingRow> = list_settings(conn, previous)?
        .into_iter()
        .map(|(setting_key, setting_value)| NewSettingRow {
            fiscal_year_id,
            setting_key,
            setting_value,
        })
        .collect();
    if rows.is_empty() {
        return Ok(0);
    }
    Ok(diesel::insert_into(company_settings::table)
        .values(&rows)
        .execute(conn)?)
}

/// Step (c): opening stock = opening + in − out of the previous year.
///
/// Items with no movement in the previous year open at zero.
fn migrate_items(
    conn: &mut SqliteConnection,
    company_id: i64,
    previous: i64,
    fiscal_year_id: i64,
) -> Result<usize, PersistenceError> {
    let previous_stock: HashMap<i64, ItemStockRecord> = list_item_stocks(conn, previous)?
        .into_iter()
        .map(|stock| (stock.item_id, stock))
        .collect();

    let rows: Vec<NewItemStockRow> = list_item_ids(conn, company_id)?
        .into_iter()
        .map(|item_id| {
            let opening_quantity: i64 = match previous_stock.get(&item_id) {
                Some(stock) => stock.closing_quantity().ok_or_else(|| {
                    PersistenceError::ArithmeticOverflow {
                        context: format!("carrying forward stock of item {item_id}"),
                    }
                })?,
                None => 0,
            };
            Ok(NewItemStockRow {
                item_id,
                fiscal_year_id,
                opening_quantity,
                quantity_in: 0,
                quantity_out: 0,
            })
        })
        .collect::<Result<Vec<NewItemStockRow>, PersistenceError>>()?;
    if rows.is_empty() {
        return Ok(0);
    }
    Ok(diesel::insert_into(item_stocks::table)
        .values(&rows)
        .execute(conn)?)
}

/// Step (d): opening balance = opening + debit − credit of the previous year.
///
/// Accounts with no activity in the previous year open at zero.
fn update_accounts(
    conn: &mut SqliteConnection,
    company_id: i64,
    previous: i64,
    fiscal_year_id: i64,
) -> Result<usize, PersistenceError> {
    let previous_balances: HashMap<i64, AccountBalanceRecord> =
        list_account_balances(conn, previous)?
            .into_iter()
            .map(|balance| (balance.account_id, balance))
            .collect();

    let rows: Vec<NewAccountBalanceRow> = list_account_ids(conn, company_id)?
        .into_iter()
        .map(|account_id| {
            let opening_balance: i64 = match previous_balances.get(&account_id) {
                Some(balance) => balance.closing_balance().ok_or_else(|| {
                    PersistenceError::ArithmeticOverflow {
                        context: format!("carrying forward balance of account {account_id}"),
                    }
                })?,
                None => 0,
            };
            Ok(NewAccountBalanceRow {
                account_id,
                fiscal_year_id,
                opening_balance,
                debit_total: 0,
                credit_total: 0,
            })
        })
        .collect::<Result<Vec<NewAccountBalanceRow>, PersistenceError>>()?;
    if rows.is_empty() {
        return Ok(0);
    }
    Ok(diesel::insert_into(account_balances::table)
        .values(&rows)
        .execute(conn)?)
}

/// Step (e): one counter per voucher type, numbering from 1, same prefix.
fn reset_voucher_counters(
    conn: &mut SqliteConnection,
    previous: i64,
    fiscal_year_id: i64,
) -> Result<usize, PersistenceError> {
    let rows: Vec<NewVoucherCounterRow> = list_voucher_counters(conn, previous)?
        .into_iter()
        .map(|counter| NewVoucherCounterRow {
            fiscal_year_id,
            voucher_type: counter.voucher_type,
            prefix: counter.prefix,
            next_number: 1,
        })
        .collect();
    if rows.is_empty() {
        return Ok(0);
    }
    Ok(diesel::insert_into(voucher_counters::table)
        .values(&rows)
        .execute(conn)?)
}
