// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Company bootstrap.

use diesel::prelude::*;
use diesel::{Connection, SqliteConnection};
use fiscal_rollover_domain::{DateFormat, DomainError, fiscal_year_name};
use tracing::info;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::{CompanyRecord, NewCompany, NewFiscalYearRow};
use crate::diesel_schema::{companies, fiscal_years};
use crate::error::PersistenceError;
use crate::queries::companies::count_companies;

/// Creates the company and its first fiscal year, marked current.
///
/// Only runs against an empty database.
///
/// # Errors
///
/// Returns an error if:
/// - A company already exists
/// - The fiscal year bounds are out of order or use two calendars
/// - The database operation fails
pub fn bootstrap_company(
    conn: &mut SqliteConnection,
    company: &NewCompany,
) -> Result<CompanyRecord, PersistenceError> {
    let start = &company.first_fiscal_year_start;
    let end = &company.first_fiscal_year_end;
    if !end.is_after(start)? {
        return Err(DomainError::EndDateNotAfterStart {
            start_date: start.to_string(),
            end_date: end.to_string(),
        }
        .into());
    }
    let date_format: DateFormat = start.date_format();
    let start_date: String = start.to_string();
    let end_date: String = end.to_string();
    let name: String = fiscal_year_name(start, end);

    conn.transaction(|conn| {
        if count_companies(conn)? > 0 {
            return Err(PersistenceError::CompanyAlreadyExists {
                name: company.name.clone(),
            });
        }

        diesel::insert_into(companies::table)
            .values((
                companies::name.eq(&company.name),
                companies::date_format.eq(date_format.as_str()),
            ))
            .execute(conn)?;
        let company_id: i64 = get_last_insert_rowid(conn)?;

        diesel::insert_into(fiscal_years::table)
            .values(NewFiscalYearRow {
                company_id,
                name: &name,
                start_date: &start_date,
                end_date: &end_date,
                is_current: 1,
            })
            .execute(conn)?;

        info!(
            company_id,
            company = %company.name,
            %date_format,
            fiscal_year = %name,
            "Bootstrapped company"
        );

        Ok(CompanyRecord {
            company_id,
            name: company.name.clone(),
            date_format,
        })
    })
}
