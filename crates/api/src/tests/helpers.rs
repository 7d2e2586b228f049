// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use fiscal_rollover_domain::{CalendarDate, DateFormat, ProgressEvent, RolloverQuery};
use fiscal_rollover_persistence::{
    AccountBalanceRecord, CompanyRecord, ItemStockRecord, NewCompany, Persistence,
};

pub fn english(value: &str) -> CalendarDate {
    CalendarDate::parse(DateFormat::English, value).unwrap()
}

pub fn nepali(value: &str) -> CalendarDate {
    CalendarDate::parse(DateFormat::Nepali, value).unwrap()
}

/// An English-calendar company whose current year is 2025, with one item
/// and one account carrying activity.
pub fn create_english_company() -> (Persistence, CompanyRecord) {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let company: CompanyRecord = persistence
        .bootstrap_company(&NewCompany {
            name: String::from("Himalayan Traders"),
            first_fiscal_year_start: english("2025-01-01"),
            first_fiscal_year_end: english("2025-12-31"),
        })
        .unwrap();
    let fiscal_year_id: i64 = persistence.list_fiscal_years(company.company_id).unwrap()[0].id;

    let item_id: i64 = persistence
        .add_item(company.company_id, "ITM-1", "Rice 25kg")
        .unwrap();
    persistence
        .set_item_stock(&ItemStockRecord {
            item_id,
            fiscal_year_id,
            opening_quantity: 10,
            quantity_in: 5,
            quantity_out: 3,
        })
        .unwrap();
    let account_id: i64 = persistence
        .add_account(company.company_id, "CASH", "Cash in hand")
        .unwrap();
    persistence
        .set_account_balance(&AccountBalanceRecord {
            account_id,
            fiscal_year_id,
            opening_balance: 1000,
            debit_total: 500,
            credit_total: 200,
        })
        .unwrap();

    (persistence, company)
}

/// A Nepali-calendar company whose current year is 2081/82.
pub fn create_nepali_company() -> (Persistence, CompanyRecord) {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let company: CompanyRecord = persistence
        .bootstrap_company(&NewCompany {
            name: String::from("Kathmandu Wholesale"),
            first_fiscal_year_start: nepali("2081-04-01"),
            first_fiscal_year_end: nepali("2082-03-31"),
        })
        .unwrap();
    (persistence, company)
}

pub fn english_query(start: &str, end: Option<&str>, request_id: Option<&str>) -> RolloverQuery {
    RolloverQuery {
        date_format: String::from("english"),
        start_date_english: Some(start.to_string()),
        end_date_english: end.map(String::from),
        request_id: request_id.map(String::from),
        ..RolloverQuery::default()
    }
}

/// The valid 2026 rollover for the English company.
pub fn query_2026(request_id: Option<&str>) -> RolloverQuery {
    english_query("2026-01-01", Some("2026-12-31"), request_id)
}

pub fn kinds(events: &[ProgressEvent]) -> Vec<&'static str> {
    events.iter().map(ProgressEvent::kind).collect()
}

pub fn progress_values(events: &[ProgressEvent]) -> Vec<u8> {
    events
        .iter()
        .filter_map(|event| match event {
            ProgressEvent::Progress { value } => Some(*value),
            _ => None,
        })
        .collect()
}
