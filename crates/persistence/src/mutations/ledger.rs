// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Ledger writes used to record the activity a rollover carries forward.

use diesel::SqliteConnection;
use diesel::prelude::*;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::{
    AccountBalanceRecord, ItemStockRecord, NewAccountBalanceRow, NewAccountRow, NewItemRow,
    NewItemStockRow, NewSettingRow, NewVoucherCounterRow, VoucherCounterRecord,
};
use crate::diesel_schema::{
    account_balances, accounts, company_settings, item_stocks, items, voucher_counters,
};
use crate::error::PersistenceError;

/// Inserts an item and returns its id.
///
/// # Errors
///
/// Returns an error if the code is taken or the insert fails.
pub fn insert_item(
    conn: &mut SqliteConnection,
    company_id: i64,
    code: &str,
    name: &str,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(items::table)
        .values(NewItemRow {
            company_id,
            item_code: code,
            item_name: name,
        })
        .execute(conn)?;
    get_last_insert_rowid(conn)
}

/// Inserts or replaces an item's stock row for a fiscal year.
///
/// # Errors
///
/// Returns an error if the write fails.
pub fn upsert_item_stock(
    conn: &mut SqliteConnection,
    stock: &ItemStockRecord,
) -> Result<(), PersistenceError> {
    diesel::replace_into(item_stocks::table)
        .values(NewItemStockRow {
            item_id: stock.item_id,
            fiscal_year_id: stock.fiscal_year_id,
            opening_quantity: stock.opening_quantity,
            quantity_in: stock.quantity_in,
            quantity_out: stock.quantity_out,
        })
        .execute(conn)?;
    Ok(())
}

/// Inserts an account and returns its id.
///
/// # Errors
///
/// Returns an error if the code is taken or the insert fails.
pub fn insert_account(
    conn: &mut SqliteConnection,
    company_id: i64,
    code: &str,
    name: &str,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(accounts::table)
        .values(NewAccountRow {
            company_id,
            account_code: code,
            account_name: name,
        })
        .execute(conn)?;
    get_last_insert_rowid(conn)
}

/// Inserts or replaces an account's balance row for a fiscal year.
///
/// # Errors
///
/// Returns an error if the write fails.
pub fn upsert_account_balance(
    conn: &mut SqliteConnection,
    balance: &AccountBalanceRecord,
) -> Result<(), PersistenceError> {
    diesel::replace_into(account_balances::table)
        .values(NewAccountBalanceRow {
            account_id: balance.account_id,
            fiscal_year_id: balance.fiscal_year_id,
            opening_balance: balance.opening_balance,
            debit_total: balance.debit_total,
            credit_total: balance.credit_total,
        })
        .execute(conn)?;
    Ok(())
}

/// Inserts or replaces a setting.
///
/// # Errors
///
/// Returns an error if the write fails.
pub fn upsert_setting(
    conn: &mut SqliteConnection,
    fiscal_year_id: i64,
    key: &str,
    value: &str,
) -> Result<(), PersistenceError> {
    diesel::replace_into(company_settings::table)
        .values(NewSettingRow {
            fiscal_year_id,
            setting_key: key.to_string(),
            setting_value: value.to_string(),
        })
        .execute(conn)?;
    Ok(())
}

/// Inserts or replaces a voucher counter.
///
/// # Errors
///
/// Returns an error if the write fails.
pub fn upsert_voucher_counter(
    conn: &mut SqliteConnection,
    fiscal_year_id: i64,
    counter: &VoucherCounterRecord,
) -> Result<(), PersistenceError> {
    diesel::replace_into(voucher_counters::table)
        .values(NewVoucherCounterRow {
            fiscal_year_id,
            voucher_type: counter.voucher_type.clone(),
            prefix: counter.prefix.clone(),
            next_number: counter.next_number,
        })
        .execute(conn)?;
    Ok(())
}
