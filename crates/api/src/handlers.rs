// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Fiscal year directory operations.

use fiscal_rollover_domain::{
    CalendarDate, DateFormat, DirectoryListing, FiscalYear, TransitionInfo,
};
use fiscal_rollover_persistence::{CompanyRecord, Persistence, RolloverRunRecord};
use tracing::{debug, info};

use crate::error::{ApiError, translate_domain_error};
use crate::request_response::{RolloverRunsResponse, SwitchCurrentRequest, SwitchCurrentResponse};

/// Returns the company the server operates on.
///
/// # Errors
///
/// Returns an error if no company has been bootstrapped.
pub fn require_company(persistence: &mut Persistence) -> Result<CompanyRecord, ApiError> {
    persistence
        .primary_company()?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Company"),
            message: String::from("No company has been set up"),
        })
}

/// Lists the company's fiscal years and identifies the current one.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
///
/// # Errors
///
/// Returns an error if no company exists or the store cannot be read.
pub fn list_fiscal_years(persistence: &mut Persistence) -> Result<DirectoryListing, ApiError> {
    let company: CompanyRecord = require_company(persistence)?;
    let fiscal_years: Vec<FiscalYear> = persistence.list_fiscal_years(company.company_id)?;
    let current_fiscal_year_id: Option<i64> =
        fiscal_years.iter().find(|fy| fy.is_current).map(|fy| fy.id);

    debug!(
        company_id = company.company_id,
        count = fiscal_years.len(),
        ?current_fiscal_year_id,
        "Listed fiscal years"
    );

    Ok(DirectoryListing {
        fiscal_years,
        current_fiscal_year_id,
        current_company_name: company.name,
    })
}

/// Builds the information used to pre-fill a rollover request.
///
/// The suggested start date is the day after the current fiscal year ends.
///
/// # Errors
///
/// Returns an error if:
/// - No company exists
/// - The company does not have exactly one current fiscal year
/// - The stored bounds of the current year are malformed
pub fn current_transition_info(persistence: &mut Persistence) -> Result<TransitionInfo, ApiError> {
    let listing: DirectoryListing = list_fiscal_years(persistence)?;
    let current: FiscalYear = listing
        .validate_single_current()
        .map_err(translate_domain_error)?
        .clone();
    let company_date_format: DateFormat = current.date_format;
    let (_, current_end) = current.bounds().map_err(translate_domain_error)?;
    let next_start: CalendarDate = current_end
        .next_fiscal_start()
        .map_err(translate_domain_error)?;

    Ok(TransitionInfo {
        next_fiscal_year_start_date: next_start.to_string(),
        company_date_format,
        current_fiscal_year: current,
        current_company_name: listing.current_company_name,
    })
}

/// Makes another fiscal year current.
///
/// Independent of the rollover pipeline; the flag flip is atomic.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `request` - The fiscal year to switch to
///
/// # Errors
///
/// Returns an error if no company exists or the fiscal year is unknown.
pub fn switch_current(
    persistence: &mut Persistence,
    request: &SwitchCurrentRequest,
) -> Result<SwitchCurrentResponse, ApiError> {
    let company: CompanyRecord = require_company(persistence)?;
    let fiscal_year: FiscalYear =
        persistence.switch_current(company.company_id, request.fiscal_year_id)?;

    info!(
        company_id = company.company_id,
        fiscal_year_id = fiscal_year.id,
        "Current fiscal year switched"
    );

    Ok(SwitchCurrentResponse {
        success: true,
        error: None,
        fiscal_year: Some(fiscal_year),
    })
}

/// Lists recorded rollover runs, newest first.
///
/// # Errors
///
/// Returns an error if no company exists or the store cannot be read.
pub fn list_rollover_runs(persistence: &mut Persistence) -> Result<RolloverRunsResponse, ApiError> {
    let company: CompanyRecord = require_company(persistence)?;
    let runs: Vec<RolloverRunRecord> = persistence.list_rollover_runs(company.company_id)?;
    Ok(RolloverRunsResponse {
        current_company_name: company.name,
        runs,
    })
}
