// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]


use fiscal_rollover_domain::{CalendarDate, DateFormat};

use crate::{
    AccountBalanceRecord, CompanyRecord, ItemStockRecord, NewCompany, Persistence,
    PersistenceError, RolloverPlan, StepReport, VoucherCounterRecord,
};

pub fn english(value: &str) -> CalendarDate {
    CalendarDate::parse(DateFormat::English, value).unwrap()
}

pub fn nepali(value: &str) -> CalendarDate {
    CalendarDate::parse(DateFormat::Nepali, value).unwrap()
}

/// A store with one English-calendar company whose current year is 2025.
pub fn english_company() -> (Persistence, CompanyRecord, i64) {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let company: CompanyRecord = persistence
        .bootstrap_company(&NewCompany {
            name: String::from("Himalayan Traders"),
            first_fiscal_year_start: english("2025-01-01"),
            first_fiscal_year_end: english("2025-12-31"),
        })
        .unwrap();
    let fiscal_year_id: i64 = persistence
        .list_fiscal_years(company.company_id)
        .unwrap()[0]
        .id;
    (persistence, company, fiscal_year_id)
}

/// A company with a year of ledger activity to carry forward.
pub struct Seeded {
    pub persistence: Persistence,
    pub company_id: i64,
    pub fiscal_year_id: i64,
    /// `ITM-1` closes at 12, `ITM-2` at 0, `ITM-3` has no movement.
    pub item_ids: [i64; 3],
    /// `CASH` closes at 1300, `SALES` at -1000, `MISC` has no activity.
    pub account_ids: [i64; 3],
}

pub fn seeded() -> Seeded {
    let (mut persistence, company, fiscal_year_id) = english_company();
    let company_id: i64 = company.company_id;

    persistence.set_setting(fiscal_year_id, "currency", "NPR").unwrap();
    persistence.set_setting(fiscal_year_id, "vat_rate", "13").unwrap();

    let item_ids: [i64; 3] = [
        persistence.add_item(company_id, "ITM-1", "Rice 25kg").unwrap(),
        persistence.add_item(company_id, "ITM-2", "Lentils 1kg").unwrap(),
        persistence.add_item(company_id, "ITM-3", "Ghee 1l").unwrap(),
    ];
    persistence
        .set_item_stock(&stock(item_ids[0], fiscal_year_id, 10, 5, 3))
        .unwrap();
    persistence
        .set_item_stock(&stock(item_ids[1], fiscal_year_id, 0, 4, 4))
        .unwrap();

    let account_ids: [i64; 3] = [
        persistence.add_account(company_id, "CASH", "Cash in hand").unwrap(),
        persistence.add_account(company_id, "SALES", "Sales").unwrap(),
        persistence.add_account(company_id, "MISC", "Sundry").unwrap(),
    ];
    persistence
        .set_account_balance(&balance(account_ids[0], fiscal_year_id, 1000, 500, 200))
        .unwrap();
    persistence
        .set_account_balance(&balance(account_ids[1], fiscal_year_id, -300, 0, 700))
        .unwrap();

    persistence
        .set_voucher_counter(fiscal_year_id, &counter("purchase", "PI-", 12))
        .unwrap();
    persistence
        .set_voucher_counter(fiscal_year_id, &counter("sales", "SI-", 57))
        .unwrap();

    Seeded {
        persistence,
        company_id,
        fiscal_year_id,
        item_ids,
        account_ids,
    }
}

pub const fn stock(
    item_id: i64,
    fiscal_year_id: i64,
    opening_quantity: i64,
    quantity_in: i64,
    quantity_out: i64,
) -> ItemStockRecord {
    ItemStockRecord {
        item_id,
        fiscal_year_id,
        opening_quantity,
        quantity_in,
        quantity_out,
    }
}

pub const fn balance(
    account_id: i64,
    fiscal_year_id: i64,
    opening_balance: i64,
    debit_total: i64,
    credit_total: i64,
) -> AccountBalanceRecord {
    AccountBalanceRecord {
        account_id,
        fiscal_year_id,
        opening_balance,
        debit_total,
        credit_total,
    }
}

pub fn counter(voucher_type: &str, prefix: &str, next_number: i64) -> VoucherCounterRecord {
    VoucherCounterRecord {
        voucher_type: voucher_type.to_string(),
        prefix: prefix.to_string(),
        next_number,
    }
}

/// The 2026 rollover for a seeded company.
pub fn plan_2026(seeded: &Seeded, request_id: Option<&str>) -> RolloverPlan {
    RolloverPlan {
        company_id: seeded.company_id,
        previous_fiscal_year_id: seeded.fiscal_year_id,
        start_date: english("2026-01-01"),
        end_date: english("2026-12-31"),
        request_id: request_id.map(String::from),
    }
}

/// Executes a plan, collecting step reports.
pub fn run(
    persistence: &mut Persistence,
    plan: &RolloverPlan,
) -> (Result<crate::RolloverOutcome, PersistenceError>, Vec<StepReport>) {
    let mut reports: Vec<StepReport> = Vec::new();
    let result = persistence.execute_rollover(plan, &mut |report: StepReport| {
        reports.push(report);
        Ok(())
    });
    (result, reports)
}
