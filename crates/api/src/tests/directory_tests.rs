// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use fiscal_rollover_domain::{DateFormat, DirectoryListing, ProgressEvent, TransitionInfo};
use fiscal_rollover_persistence::Persistence;

use super::helpers::{create_english_company, create_nepali_company, query_2026};
use crate::{
    ApiError, RolloverCoordinator, RolloverRunsResponse, SwitchCurrentRequest,
    SwitchCurrentResponse, current_transition_info, list_fiscal_years, list_rollover_runs,
    switch_current,
};

#[test]
fn test_list_reports_current_year_and_company() {
    let (mut persistence, company) = create_english_company();
    let listing: DirectoryListing = list_fiscal_years(&mut persistence).unwrap();

    assert_eq!(listing.current_company_name, company.name);
    assert_eq!(listing.fiscal_years.len(), 1);
    assert_eq!(listing.current_fiscal_year_id, Some(listing.fiscal_years[0].id));
}

#[test]
fn test_list_without_company_is_not_found() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    assert!(matches!(
        list_fiscal_years(&mut persistence),
        Err(ApiError::ResourceNotFound { ref resource_type, .. }) if resource_type == "Company"
    ));
}

#[test]
fn test_transition_info_suggests_day_after_current_end() {
    let (mut persistence, _) = create_english_company();
    let info: TransitionInfo = current_transition_info(&mut persistence).unwrap();

    assert_eq!(info.next_fiscal_year_start_date, "2026-01-01");
    assert_eq!(info.company_date_format, DateFormat::English);
    assert_eq!(info.current_fiscal_year.name, "2025");
    assert_eq!(info.current_company_name, "Himalayan Traders");
}

#[test]
fn test_transition_info_for_nepali_month_end() {
    let (mut persistence, _) = create_nepali_company();
    let info: TransitionInfo = current_transition_info(&mut persistence).unwrap();

    assert_eq!(info.next_fiscal_year_start_date, "2082-04-01");
    assert_eq!(info.company_date_format, DateFormat::Nepali);
    assert_eq!(info.current_fiscal_year.name, "2081/82");
}

#[test]
fn test_transition_info_serializes_camel_case() {
    let (mut persistence, _) = create_english_company();
    let info: TransitionInfo = current_transition_info(&mut persistence).unwrap();
    let json: serde_json::Value = serde_json::to_value(&info).unwrap();

    assert_eq!(json["nextFiscalYearStartDate"], "2026-01-01");
    assert_eq!(json["companyDateFormat"], "english");
    assert_eq!(json["currentFiscalYear"]["isCurrent"], true);
}

#[test]
fn test_switch_current_round_trip() {
    let (mut persistence, _) = create_english_company();
    let coordinator: RolloverCoordinator = RolloverCoordinator::new();
    let prepared = coordinator.begin(&mut persistence, &query_2026(None)).unwrap();
    let mut events: Vec<ProgressEvent> = Vec::new();
    prepared.execute(&mut persistence, &mut events);

    let before: DirectoryListing = list_fiscal_years(&mut persistence).unwrap();
    let old_id: i64 = before.fiscal_years[0].id;

    let response: SwitchCurrentResponse = switch_current(
        &mut persistence,
        &SwitchCurrentRequest {
            fiscal_year_id: old_id,
        },
    )
    .unwrap();
    assert!(response.success);
    assert_eq!(response.fiscal_year.map(|fy| fy.id), Some(old_id));

    let after: DirectoryListing = list_fiscal_years(&mut persistence).unwrap();
    assert_eq!(after.current_fiscal_year_id, Some(old_id));
    assert_eq!(after.fiscal_years.iter().filter(|fy| fy.is_current).count(), 1);
}

#[test]
fn test_switch_to_unknown_year_is_not_found() {
    let (mut persistence, _) = create_english_company();
    let result: Result<SwitchCurrentResponse, ApiError> = switch_current(
        &mut persistence,
        &SwitchCurrentRequest {
            fiscal_year_id: 404,
        },
    );
    assert!(matches!(
        result,
        Err(ApiError::ResourceNotFound { ref resource_type, .. }) if resource_type == "Fiscal year"
    ));
}

#[test]
fn test_run_history_lists_completed_runs() {
    let (mut persistence, _) = create_english_company();
    let coordinator: RolloverCoordinator = RolloverCoordinator::new();
    let prepared = coordinator
        .begin(&mut persistence, &query_2026(Some("req-1")))
        .unwrap();
    let mut events: Vec<ProgressEvent> = Vec::new();
    prepared.execute(&mut persistence, &mut events);

    let response: RolloverRunsResponse = list_rollover_runs(&mut persistence).unwrap();
    assert_eq!(response.runs.len(), 1);
    assert_eq!(response.runs[0].request_id.as_deref(), Some("req-1"));
}
