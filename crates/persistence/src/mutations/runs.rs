// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::warn;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::{FailedRun, NewRolloverRunRow, RunStatus};
use crate::diesel_schema::rollover_runs;
use crate::error::PersistenceError;

/// Inserts a run row and returns its id.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_run(
    conn: &mut SqliteConnection,
    row: &NewRolloverRunRow<'_>,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(rollover_runs::table)
        .values(row)
        .execute(conn)?;
    get_last_insert_rowid(conn)
}

/// Records a run whose pipeline failed.
///
/// Called after the rollover transaction has rolled back, so the record
/// survives the failure it describes.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn record_failed_run(
    conn: &mut SqliteConnection,
    run: &FailedRun,
) -> Result<i64, PersistenceError> {
    let run_id: i64 = insert_run(
        conn,
        &NewRolloverRunRow {
            company_id: run.company_id,
            request_id: run.request_id.as_deref(),
            status: RunStatus::Failed.as_str(),
            start_date: &run.start_date,
            end_date: &run.end_date,
            fiscal_year_id: None,
            error_message: Some(&run.error_message),
        },
    )?;
    warn!(
        run_id,
        company_id = run.company_id,
        request_id = run.request_id.as_deref().unwrap_or("-"),
        error = %run.error_message,
        "Recorded failed rollover run"
    );
    Ok(run_id)
}
