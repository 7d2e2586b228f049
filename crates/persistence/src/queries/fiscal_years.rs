// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Fiscal year directory queries.

use diesel::SqliteConnection;
use diesel::prelude::*;
use fiscal_rollover_domain::FiscalYear;
use tracing::debug;

use crate::data_models::FiscalYearRow;
use crate::diesel_schema::{companies, fiscal_years};
use crate::error::PersistenceError;
use crate::queries::companies::decode_date_format;

/// Lists a company's fiscal years, oldest first.
///
/// # Errors
///
/// Returns an error if the query fails or a stored calendar is unknown.
pub fn list_fiscal_years(
    conn: &mut SqliteConnection,
    company_id: i64,
) -> Result<Vec<FiscalYear>, PersistenceError> {
    let rows: Vec<(FiscalYearRow, String)> = fiscal_years::table
        .inner_join(companies::table)
        .filter(fiscal_years::company_id.eq(company_id))
        .order(fiscal_years::start_date.asc())
        .select((FiscalYearRow::as_select(), companies::date_format))
        .load(conn)?;

    debug!(company_id, count = rows.len(), "Loaded fiscal years");

    rows.into_iter()
        .map(|(row, date_format)| Ok(row.into_fiscal_year(decode_date_format(&date_format)?)))
        .collect()
}

/// Retrieves one fiscal year of a company.
///
/// # Errors
///
/// Returns an error if the query fails.
/// Returns `Ok(None)` if the id is unknown or belongs to another company.
pub fn get_fiscal_year(
    conn: &mut SqliteConnection,
    company_id: i64,
    fiscal_year_id: i64,
) -> Result<Option<FiscalYear>, PersistenceError> {
    let row: Option<(FiscalYearRow, String)> = fiscal_years::table
        .inner_join(companies::table)
        .filter(fiscal_years::company_id.eq(company_id))
        .filter(fiscal_years::fiscal_year_id.eq(fiscal_year_id))
        .select((FiscalYearRow::as_select(), companies::date_format))
        .first(conn)
        .optional()?;

    row.map(|(row, date_format)| Ok(row.into_fiscal_year(decode_date_format(&date_format)?)))
        .transpose()
}

/// Returns the id of the company's current fiscal year.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn current_fiscal_year_id(
    conn: &mut SqliteConnection,
    company_id: i64,
) -> Result<Option<i64>, PersistenceError> {
    Ok(fiscal_years::table
        .filter(fiscal_years::company_id.eq(company_id))
        .filter(fiscal_years::is_current.eq(1))
        .select(fiscal_years::fiscal_year_id)
        .first(conn)
        .optional()?)
}
