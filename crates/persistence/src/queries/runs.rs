// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Rollover run ledger queries.

use diesel::SqliteConnection;
use diesel::prelude::*;

use crate::data_models::{RolloverRunRecord, RolloverRunRow, RunStatus};
use crate::diesel_schema::rollover_runs;
use crate::error::PersistenceError;

/// Finds the completed run recorded for a request id.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn find_completed_run(
    conn: &mut SqliteConnection,
    company_id: i64,
    request_id: &str,
) -> Result<Option<RolloverRunRecord>, PersistenceError> {
    let row: Option<RolloverRunRow> = rollover_runs::table
        .filter(rollover_runs::company_id.eq(company_id))
        .filter(rollover_runs::request_id.eq(request_id))
        .filter(rollover_runs::status.eq(RunStatus::Completed.as_str()))
        .select(RolloverRunRow::as_select())
        .first(conn)
        .optional()?;
    row.map(RolloverRunRow::into_record).transpose()
}

/// Lists a company's rollover runs, newest first.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_rollover_runs(
    conn: &mut SqliteConnection,
    company_id: i64,
) -> Result<Vec<RolloverRunRecord>, PersistenceError> {
    let rows: Vec<RolloverRunRow> = rollover_runs::table
        .filter(rollover_runs::company_id.eq(company_id))
        .order(rollover_runs::run_id.desc())
        .select(RolloverRunRow::as_select())
        .load(conn)?;
    rows.into_iter().map(RolloverRunRow::into_record).collect()
}
