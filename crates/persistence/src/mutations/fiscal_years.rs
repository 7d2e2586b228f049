// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::{Connection, SqliteConnection};
use fiscal_rollover_domain::FiscalYear;
use tracing::info;

use crate::diesel_schema::fiscal_years;
use crate::error::PersistenceError;
use crate::queries::fiscal_years::get_fiscal_year;

/// Clears the company's current flag, whichever year holds it.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn clear_current(conn: &mut SqliteConnection, company_id: i64) -> Result<usize, PersistenceError> {
    Ok(diesel::update(
        fiscal_years::table
            .filter(fiscal_years::company_id.eq(company_id))
            .filter(fiscal_years::is_current.eq(1)),
    )
    .set(fiscal_years::is_current.eq(0))
    .execute(conn)?)
}

/// Makes `fiscal_year_id` the company's only current fiscal year.
///
/// Both flag updates commit together or not at all.
///
/// # Errors
///
/// Returns an error if the fiscal year does not exist, belongs to another
/// company, or the database operation fails.
pub fn switch_current(
    conn: &mut SqliteConnection,
    company_id: i64,
    fiscal_year_id: i64,
) -> Result<FiscalYear, PersistenceError> {
    conn.transaction(|conn| {
        if get_fiscal_year(conn, company_id, fiscal_year_id)?.is_none() {
            return Err(PersistenceError::FiscalYearNotFound { fiscal_year_id });
        }

        clear_current(conn, company_id)?;
        diesel::update(fiscal_years::table.find(fiscal_year_id))
            .set(fiscal_years::is_current.eq(1))
            .execute(conn)?;

        let switched: FiscalYear = get_fiscal_year(conn, company_id, fiscal_year_id)?
            .ok_or(PersistenceError::FiscalYearNotFound { fiscal_year_id })?;
        info!(company_id, fiscal_year_id, name = %switched.name, "Switched current fiscal year");
        Ok(switched)
    })
}
