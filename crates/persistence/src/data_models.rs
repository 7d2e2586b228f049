// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use fiscal_rollover_domain::{CalendarDate, DateFormat, FiscalYear, RolloverStep};
use serde::Serialize;

use crate::diesel_schema::{
    account_balances, accounts, company_settings, fiscal_years, item_stocks, items,
    rollover_runs, voucher_counters,
};

// ============================================================================
// Public records
// ============================================================================

/// A company and the calendar it keeps its books in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyRecord {
    pub company_id: i64,
    pub name: String,
    pub date_format: DateFormat,
}

/// Input for creating a company together with its first fiscal year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCompany {
    pub name: String,
    pub first_fiscal_year_start: CalendarDate,
    pub first_fiscal_year_end: CalendarDate,
}

/// A validated rollover, ready to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RolloverPlan {
    pub company_id: i64,
    /// The fiscal year being closed; must still be current at execution.
    pub previous_fiscal_year_id: i64,
    pub start_date: CalendarDate,
    pub end_date: CalendarDate,
    pub request_id: Option<String>,
}

/// Reported to the step observer after each step finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepReport {
    pub step: RolloverStep,
    /// Rows written by the step.
    pub rows: usize,
}

/// What a committed rollover wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RolloverOutcome {
    pub run_id: i64,
    pub fiscal_year: FiscalYear,
    pub settings_copied: usize,
    pub items_migrated: usize,
    pub accounts_updated: usize,
    pub counters_reset: usize,
}

/// Outcome of a recorded rollover run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Completed,
    Failed,
}

impl RunStatus {
    /// Converts this status to its stored representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    pub(crate) fn parse(value: &str) -> Result<Self, crate::PersistenceError> {
        match value {
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            other => Err(crate::PersistenceError::SerializationError(format!(
                "unknown rollover run status '{other}'"
            ))),
        }
    }
}

/// One entry of the rollover run ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RolloverRunRecord {
    pub run_id: i64,
    pub request_id: Option<String>,
    pub status: RunStatus,
    pub start_date: String,
    pub end_date: String,
    /// The fiscal year created, for completed runs.
    pub fiscal_year_id: Option<i64>,
    pub error_message: Option<String>,
    pub created_at: String,
}

/// A rollover attempt that failed inside the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedRun {
    pub company_id: i64,
    pub request_id: Option<String>,
    pub start_date: String,
    pub end_date: String,
    pub error_message: String,
}

/// Stock movement of one item in one fiscal year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemStockRecord {
    pub item_id: i64,
    pub fiscal_year_id: i64,
    pub opening_quantity: i64,
    pub quantity_in: i64,
    pub quantity_out: i64,
}

impl ItemStockRecord {
    /// Running stock at year end, or `None` on overflow.
    #[must_use]
    pub const fn closing_quantity(&self) -> Option<i64> {
        match self.opening_quantity.checked_add(self.quantity_in) {
            Some(total) => total.checked_sub(self.quantity_out),
            None => None,
        }
    }
}

/// Balance movement of one account in one fiscal year, in minor units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountBalanceRecord {
    pub account_id: i64,
    pub fiscal_year_id: i64,
    pub opening_balance: i64,
    pub debit_total: i64,
    pub credit_total: i64,
}

impl AccountBalanceRecord {
    /// Closing balance (debit positive), or `None` on overflow.
    #[must_use]
    pub const fn closing_balance(&self) -> Option<i64> {
        match self.opening_balance.checked_add(self.debit_total) {
            Some(total) => total.checked_sub(self.credit_total),
            None => None,
        }
    }
}

/// Numbering state for one voucher type in one fiscal year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoucherCounterRecord {
    pub voucher_type: String,
    pub prefix: String,
    pub next_number: i64,
}

// ============================================================================
// Diesel rows
// ============================================================================

#[derive(Queryable, Selectable)]
#[diesel(table_name = fiscal_years)]
pub struct FiscalYearRow {
    pub fiscal_year_id: i64,
    pub name: String,
    pub start_date: String,
    pub end_date: String,
    pub is_current: i32,
}

#[derive(Insertable)]
#[diesel(table_name = fiscal_years)]
pub struct NewFiscalYearRow<'a> {
    pub company_id: i64,
    pub name: &'a str,
    pub start_date: &'a str,
    pub end_date: &'a str,
    pub is_current: i32,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = company_settings)]
pub struct SettingRow {
    pub setting_key: String,
    pub setting_value: String,
}

#[derive(Insertable)]
#[diesel(table_name = company_settings)]
pub struct NewSettingRow {
    pub fiscal_year_id: i64,
    pub setting_key: String,
    pub setting_value: String,
}

#[derive(Insertable)]
#[diesel(table_name = items)]
pub struct NewItemRow<'a> {
    pub company_id: i64,
    pub item_code: &'a str,
    pub item_name: &'a str,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = item_stocks)]
pub struct ItemStockRow {
    pub item_id: i64,
    pub fiscal_year_id: i64,
    pub opening_quantity: i64,
    pub quantity_in: i64,
    pub quantity_out: i64,
}

#[derive(Insertable)]
#[diesel(table_name = item_stocks)]
pub struct NewItemStockRow {
    pub item_id: i64,
    pub fiscal_year_id: i64,
    pub opening_quantity: i64,
    pub quantity_in: i64,
    pub quantity_out: i64,
}

#[derive(Insertable)]
#[diesel(table_name = accounts)]
pub struct NewAccountRow<'a> {
    pub company_id: i64,
    pub account_code: &'a str,
    pub account_name: &'a str,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = account_balances)]
pub struct AccountBalanceRow {
    pub account_id: i64,
    pub fiscal_year_id: i64,
    pub opening_balance: i64,
    pub debit_total: i64,
    pub credit_total: i64,
}

#[derive(Insertable)]
#[diesel(table_name = account_balances)]
pub struct NewAccountBalanceRow {
    pub account_id: i64,
    pub fiscal_year_id: i64,
    pub opening_balance: i64,
    pub debit_total: i64,
    pub credit_total: i64,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = voucher_counters)]
pub struct VoucherCounterRow {
    pub voucher_type: String,
    pub prefix: String,
    pub next_number: i64,
}

#[derive(Insertable)]
#[diesel(table_name = voucher_counters)]
pub struct NewVoucherCounterRow {
    pub fiscal_year_id: i64,
    pub voucher_type: String,
    pub prefix: String,
    pub next_number: i64,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = rollover_runs)]
pub struct RolloverRunRow {
    pub run_id: i64,
    pub request_id: Option<String>,
    pub status: String,
    pub start_date: String,
    pub end_date: String,
    pub fiscal_year_id: Option<i64>,
    pub error_message: Option<String>,
    pub created_at: String,
}

#[derive(Insertable)]
#[diesel(table_name = rollover_runs)]
pub struct NewRolloverRunRow<'a> {
    pub company_id: i64,
    pub request_id: Option<&'a str>,
    pub status: &'a str,
    pub start_date: &'a str,
    pub end_date: &'a str,
    pub fiscal_year_id: Option<i64>,
    pub error_message: Option<&'a str>,
}

impl From<ItemStockRow> for ItemStockRecord {
    fn from(row: ItemStockRow) -> Self {
        Self {
            item_id: row.item_id,
            fiscal_year_id: row.fiscal_year_id,
            opening_quantity: row.opening_quantity,
            quantity_in: row.quantity_in,
            quantity_out: row.quantity_out,
        }
    }
}

impl From<AccountBalanceRow> for AccountBalanceRecord {
    fn from(row: AccountBalanceRow) -> Self {
        Self {
            account_id: row.account_id,
            fiscal_year_id: row.fiscal_year_id,
            opening_balance: row.opening_balance,
            debit_total: row.debit_total,
            credit_total: row.credit_total,
        }
    }
}

impl From<VoucherCounterRow> for VoucherCounterRecord {
    fn from(row: VoucherCounterRow) -> Self {
        Self {
            voucher_type: row.voucher_type,
            prefix: row.prefix,
            next_number: row.next_number,
        }
    }
}

impl FiscalYearRow {
    /// Converts a stored row into the directory projection.
    pub fn into_fiscal_year(self, date_format: DateFormat) -> FiscalYear {
        FiscalYear {
            id: self.fiscal_year_id,
            name: self.name,
            date_format,
            start_date: self.start_date,
            end_date: self.end_date,
            is_current: self.is_current != 0,
        }
    }
}

impl RolloverRunRow {
    pub fn into_record(self) -> Result<RolloverRunRecord, crate::PersistenceError> {
        Ok(RolloverRunRecord {
            run_id: self.run_id,
            request_id: self.request_id,
            status: RunStatus::parse(&self.status)?,
            start_date: self.start_date,
            end_date: self.end_date,
            fiscal_year_id: self.fiscal_year_id,
            error_message: self.error_message,
            created_at: self.created_at,
        })
    }
}
