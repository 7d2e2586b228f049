// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use fiscal_rollover_domain::DateFormat;
use std::str::FromStr;

use crate::data_models::CompanyRecord;
use crate::diesel_schema::companies;
use crate::error::PersistenceError;

/// Decodes a stored calendar name.
///
/// # Errors
///
/// Returns an error if the value is not a known calendar.
pub fn decode_date_format(value: &str) -> Result<DateFormat, PersistenceError> {
    Ok(DateFormat::from_str(value)?)
}

/// Retrieves the first company, the one the server operates on.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_primary_company(
    conn: &mut SqliteConnection,
) -> Result<Option<CompanyRecord>, PersistenceError> {
    let row: Option<(i64, String, String)> = companies::table
        .order(companies::company_id.asc())
        .select((companies::company_id, companies::name, companies::date_format))
        .first(conn)
        .optional()?;

    row.map(|(company_id, name, date_format)| {
        Ok(CompanyRecord {
            company_id,
            name,
            date_format: decode_date_format(&date_format)?,
        })
    })
    .transpose()
}

/// Retrieves a company by id.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_company(
    conn: &mut SqliteConnection,
    company_id: i64,
) -> Result<Option<CompanyRecord>, PersistenceError> {
    let row: Option<(String, String)> = companies::table
        .find(company_id)
        .select((companies::name, companies::date_format))
        .first(conn)
        .optional()?;

    row.map(|(name, date_format)| {
        Ok(CompanyRecord {
            company_id,
            name,
            date_format: decode_date_format(&date_format)?,
        })
    })
    .transpose()
}

/// Counts companies.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count_companies(conn: &mut SqliteConnection) -> Result<i64, PersistenceError> {
    Ok(companies::table.count().get_result(conn)?)
}
