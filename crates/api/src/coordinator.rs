// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The rollover coordinator.
//!
//! A rollover happens in two phases. [`RolloverCoordinator::begin`] checks
//! every precondition and reserves the company; its errors are reported to
//! the caller before any event is emitted. [`PreparedRollover::execute`]
//! runs the pipeline and emits progress events into a [`ProgressSink`],
//! ending with exactly one `complete` or `error`.
//!
//! At most one rollover per company is in flight. The reservation is an
//! [`InFlightGuard`] that releases the company when dropped, however the
//! run ended.

use fiscal_rollover_domain::{
    CalendarDate, DirectoryListing, DomainError, FiscalYear, MAX_PERCENT, ProgressEvent,
    RolloverQuery, RolloverRequest,
};
use fiscal_rollover_persistence::{
    CompanyRecord, FailedRun, Persistence, PersistenceError, RolloverOutcome, RolloverPlan,
    RolloverRunRecord, StepReport,
};
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, error, info, warn};

use crate::error::{ApiError, translate_domain_error};
use crate::handlers::{list_fiscal_years, require_company};

/// Receives the events of one rollover, in emission order.
pub trait ProgressSink {
    /// Delivers one event. Delivery failures are the sink's concern; the
    /// rollover keeps going when nobody is listening.
    fn emit(&mut self, event: ProgressEvent);
}

impl ProgressSink for Vec<ProgressEvent> {
    fn emit(&mut self, event: ProgressEvent) {
        self.push(event);
    }
}

type InFlightSet = Arc<Mutex<HashSet<i64>>>;

fn lock(set: &InFlightSet) -> MutexGuard<'_, HashSet<i64>> {
    set.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Owns the per-company in-flight registry.
///
/// Cloning shares the registry.
#[derive(Debug, Clone, Default)]
pub struct RolloverCoordinator {
    in_flight: InFlightSet,
}

/// Reservation of a company for one rollover.
#[derive(Debug)]
pub struct InFlightGuard {
    company_id: i64,
    in_flight: InFlightSet,
}

impl InFlightGuard {
    /// The reserved company.
    #[must_use]
    pub const fn company_id(&self) -> i64 {
        self.company_id
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        lock(&self.in_flight).remove(&self.company_id);
        debug!(company_id = self.company_id, "Released rollover reservation");
    }
}

/// A rollover whose preconditions have been checked.
#[derive(Debug)]
pub struct PreparedRollover {
    company_name: String,
    kind: PreparedKind,
}

#[derive(Debug)]
enum PreparedKind {
    /// The request id already has a completed run; nothing to do.
    Replay(RolloverRunRecord),
    /// Run the pipeline while holding the company reservation.
    Run {
        plan: RolloverPlan,
        guard: InFlightGuard,
    },
}

/// How a prepared rollover ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RolloverReport {
    /// The pipeline committed.
    Completed {
        /// The new current fiscal year.
        fiscal_year: FiscalYear,
        /// The run ledger entry.
        run_id: i64,
    },
    /// The request id had already completed; the earlier run was replayed.
    Replayed {
        /// The earlier run.
        run_id: i64,
    },
    /// The pipeline failed and rolled back.
    Failed {
        /// The message sent in the `error` event.
        message: String,
    },
}

impl RolloverCoordinator {
    /// Creates a coordinator with no rollover in flight.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a rollover is in flight for the company.
    #[must_use]
    pub fn is_in_flight(&self, company_id: i64) -> bool {
        lock(&self.in_flight).contains(&company_id)
    }

    /// Reserves a company.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::RolloverInProgress` if the company is reserved.
    pub fn try_reserve(&self, company_id: i64) -> Result<InFlightGuard, ApiError> {
        if !lock(&self.in_flight).insert(company_id) {
            warn!(company_id, "Rejected concurrent rollover");
            return Err(ApiError::RolloverInProgress { company_id });
        }
        debug!(company_id, "Reserved company for rollover");
        Ok(InFlightGuard {
            company_id,
            in_flight: Arc::clone(&self.in_flight),
        })
    }

    /// Validates a rollover request and reserves the company.
    ///
    /// A request whose id already has a completed run is prepared as a
    /// replay and needs no reservation.
    ///
    /// # Arguments
    ///
    /// * `persistence` - The persistence layer
    /// * `query` - The request as received on the wire
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The request is malformed or its dates are out of order
    /// - No company exists
    /// - The request's calendar is not the company's
    /// - Another rollover for the company is in flight
    /// - The start date does not follow the current fiscal year
    /// - The new bounds overlap an existing fiscal year
    pub fn begin(
        &self,
        persistence: &mut Persistence,
        query: &RolloverQuery,
    ) -> Result<PreparedRollover, ApiError> {
        let request: RolloverRequest =
            RolloverRequest::from_query(query).map_err(translate_domain_error)?;
        let company: CompanyRecord = require_company(persistence)?;

        if request.date_format() != company.date_format {
            return Err(translate_domain_error(DomainError::CalendarMismatch {
                expected: company.date_format,
                found: request.date_format(),
            }));
        }

        if let Some(request_id) = request.request_id()
            && let Some(run) = persistence.find_completed_run(company.company_id, request_id)?
        {
            info!(
                company_id = company.company_id,
                request_id,
                run_id = run.run_id,
                "Request already completed; replaying"
            );
            return Ok(PreparedRollover {
                company_name: company.name,
                kind: PreparedKind::Replay(run),
            });
        }

        let guard: InFlightGuard = self.try_reserve(company.company_id)?;
        let plan: RolloverPlan = plan_rollover(persistence, &company, &request)?;

        info!(
            company_id = company.company_id,
            start_date = %plan.start_date,
            end_date = %plan.end_date,
            request_id = request.request_id().unwrap_or("-"),
            "Accepted rollover"
        );

        Ok(PreparedRollover {
            company_name: company.name,
            kind: PreparedKind::Run { plan, guard },
        })
    }
}

/// Checks the request against the directory and resolves the end date.
fn plan_rollover(
    persistence: &mut Persistence,
    company: &CompanyRecord,
    request: &RolloverRequest,
) -> Result<RolloverPlan, ApiError> {
    let start: CalendarDate = *request.start_date();
    let end: CalendarDate = request.resolved_end_date().map_err(translate_domain_error)?;

    let listing: DirectoryListing = list_fiscal_years(persistence)?;
    let current: &FiscalYear = listing
        .validate_single_current()
        .map_err(translate_domain_error)?;
    let (_, current_end) = current.bounds().map_err(translate_domain_error)?;

    if !start
        .immediately_follows(&current_end)
        .map_err(translate_domain_error)?
    {
        return Err(translate_domain_error(DomainError::StartDateNotContiguous {
            current_end_date: current_end.to_string(),
            start_date: start.to_string(),
        }));
    }

    for existing in &listing.fiscal_years {
        if existing
            .overlaps(&start, &end)
            .map_err(translate_domain_error)?
        {
            return Err(ApiError::DomainRuleViolation {
                rule: String::from("no_overlap"),
                message: format!(
                    "Fiscal year {start} to {end} overlaps existing fiscal year {} ({} to {})",
                    existing.name, existing.start_date, existing.end_date
                ),
            });
        }
    }

    Ok(RolloverPlan {
        company_id: company.company_id,
        previous_fiscal_year_id: current.id,
        start_date: start,
        end_date: end,
        request_id: request.request_id().map(String::from),
    })
}

impl PreparedRollover {
    /// The company this rollover belongs to.
    #[must_use]
    pub fn company_name(&self) -> &str {
        &self.company_name
    }

    /// Whether this is a replay of an already completed request.
    #[must_use]
    pub const fn is_replay(&self) -> bool {
        matches!(self.kind, PreparedKind::Replay(_))
    }

    /// Runs the rollover, emitting events into `sink`.
    ///
    /// Every step emits a `log` line followed by a `progress` event with the
    /// step's percentage. The run ends with exactly one `complete` or
    /// `error`. A failure is recorded in the run ledger after the pipeline
    /// transaction has rolled back. The company reservation is released
    /// when this returns.
    pub fn execute(self, persistence: &mut Persistence, sink: &mut dyn ProgressSink) -> RolloverReport {
        match self.kind {
            PreparedKind::Replay(run) => {
                sink.emit(ProgressEvent::log(format!(
                    "Rollover {} to {} already completed; nothing to do",
                    run.start_date, run.end_date
                )));
                sink.emit(ProgressEvent::progress(MAX_PERCENT));
                sink.emit(ProgressEvent::Complete);
                RolloverReport::Replayed { run_id: run.run_id }
            }
            PreparedKind::Run { plan, guard } => {
                let report: RolloverReport = run_pipeline(persistence, &plan, sink);
                drop(guard);
                report
            }
        }
    }
}

fn run_pipeline(
    persistence: &mut Persistence,
    plan: &RolloverPlan,
    sink: &mut dyn ProgressSink,
) -> RolloverReport {
    sink.emit(ProgressEvent::log(format!(
        "Rolling over to fiscal year {} to {}",
        plan.start_date, plan.end_date
    )));

    let result: Result<RolloverOutcome, PersistenceError> =
        persistence.execute_rollover(plan, &mut |report: StepReport| {
            sink.emit(ProgressEvent::log(format!(
                "{} ({} records)",
                report.step.label(),
                report.rows
            )));
            sink.emit(ProgressEvent::progress(report.step.completion_percent()));
            debug!(step = %report.step, rows = report.rows, "Rollover step reported");
            Ok(())
        });

    match result {
        Ok(outcome) => {
            sink.emit(ProgressEvent::log(format!(
                "Fiscal year {} is now current",
                outcome.fiscal_year.name
            )));
            sink.emit(ProgressEvent::Complete);
            RolloverReport::Completed {
                fiscal_year: outcome.fiscal_year,
                run_id: outcome.run_id,
            }
        }
        Err(err) => {
            let message: String = format!("Fiscal year rollover failed: {err}");
            error!(company_id = plan.company_id, error = %err, "Rollover rolled back");

            let failed: FailedRun = FailedRun {
                company_id: plan.company_id,
                request_id: plan.request_id.clone(),
                start_date: plan.start_date.to_string(),
                end_date: plan.end_date.to_string(),
                error_message: message.clone(),
            };
            if let Err(record_err) = persistence.record_failed_run(&failed) {
                error!(error = %record_err, "Could not record failed rollover run");
            }

            sink.emit(ProgressEvent::error(message.clone()));
            RolloverReport::Failed { message }
        }
    }
}
