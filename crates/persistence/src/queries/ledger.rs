// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Per-fiscal-year ledger reads: settings, stock, balances, voucher counters.

use diesel::SqliteConnection;
use diesel::prelude::*;

use crate::data_models::{
    AccountBalanceRecord, AccountBalanceRow, ItemStockRecord, ItemStockRow, SettingRow,
    VoucherCounterRecord, VoucherCounterRow,
};
use crate::diesel_schema::{
    account_balances, accounts, company_settings, item_stocks, items, voucher_counters,
};
use crate::error::PersistenceError;

/// Lists a fiscal year's settings as `(key, value)`, ordered by key.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_settings(
    conn: &mut SqliteConnection,
    fiscal_year_id: i64,
) -> Result<Vec<(String, String)>, PersistenceError> {
    let rows: Vec<SettingRow> = company_settings::table
        .filter(company_settings::fiscal_year_id.eq(fiscal_year_id))
        .order(company_settings::setting_key.asc())
        .select(SettingRow::as_select())
        .load(conn)?;
    Ok(rows
        .into_iter()
        .map(|row| (row.setting_key, row.setting_value))
        .collect())
}

/// Lists the ids of a company's items.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_item_ids(
    conn: &mut SqliteConnection,
    company_id: i64,
) -> Result<Vec<i64>, PersistenceError> {
    Ok(items::table
        .filter(items::company_id.eq(company_id))
        .order(items::item_id.asc())
        .select(items::item_id)
        .load(conn)?)
}

/// Lists every stock row of a fiscal year.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_item_stocks(
    conn: &mut SqliteConnection,
    fiscal_year_id: i64,
) -> Result<Vec<ItemStockRecord>, PersistenceError> {
    let rows: Vec<ItemStockRow> = item_stocks::table
        .filter(item_stocks::fiscal_year_id.eq(fiscal_year_id))
        .select(ItemStockRow::as_select())
        .load(conn)?;
    Ok(rows.into_iter().map(ItemStockRecord::from).collect())
}

/// Retrieves one item's stock row for a fiscal year.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_item_stock(
    conn: &mut SqliteConnection,
    item_id: i64,
    fiscal_year_id: i64,
) -> Result<Option<ItemStockRecord>, PersistenceError> {
    let row: Option<ItemStockRow> = item_stocks::table
        .filter(item_stocks::item_id.eq(item_id))
        .filter(item_stocks::fiscal_year_id.eq(fiscal_year_id))
        .select(ItemStockRow::as_select())
        .first(conn)
        .optional()?;
    Ok(row.map(ItemStockRecord::from))
}

/// Lists the ids of a company's accounts.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_account_ids(
    conn: &mut SqliteConnection,
    company_id: i64,
) -> Result<Vec<i64>, PersistenceError> {
    Ok(accounts::table
        .filter(accounts::company_id.eq(company_id))
        .order(accounts::account_id.asc())
        .select(accounts::account_id)
        .load(conn)?)
}

/// Lists every balance row of a fiscal year.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_account_balances(
    conn: &mut SqliteConnection,
    fiscal_year_id: i64,
) -> Result<Vec<AccountBalanceRecord>, PersistenceError> {
    let rows: Vec<AccountBalanceRow> = account_balances::table
        .filter(account_balances::fiscal_year_id.eq(fiscal_year_id))
        .select(AccountBalanceRow::as_select())
        .load(conn)?;
    Ok(rows.into_iter().map(AccountBalanceRecord::from).collect())
}

/// Retrieves one account's balance row for a fiscal year.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_account_balance(
    conn: &mut SqliteConnection,
    account_id: i64,
    fiscal_year_id: i64,
) -> Result<Option<AccountBalanceRecord>, PersistenceError> {
    let row: Option<AccountBalanceRow> = account_balances::table
        .filter(account_balances::account_id.eq(account_id))
        .filter(account_balances::fiscal_year_id.eq(fiscal_year_id))
        .select(AccountBalanceRow::as_select())
        .first(conn)
        .optional()?;
    Ok(row.map(AccountBalanceRecord::from))
}

/// Lists a fiscal year's voucher counters, ordered by voucher type.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_voucher_counters(
    conn: &mut SqliteConnection,
    fiscal_year_id: i64,
) -> Result<Vec<VoucherCounterRecord>, PersistenceError> {
    let rows: Vec<VoucherCounterRow> = voucher_counters::table
        .filter(voucher_counters::fiscal_year_id.eq(fiscal_year_id))
        .order(voucher_counters::voucher_type.asc())
        .select(VoucherCounterRow::as_select())
        .load(conn)?;
    Ok(rows.into_iter().map(VoucherCounterRecord::from).collect())
}
