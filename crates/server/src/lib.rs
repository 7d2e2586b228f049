// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! HTTP surface of the fiscal year rollover protocol.
//!
//! The router exposes the fiscal year directory as plain JSON endpoints and
//! the progress channel as a Server-Sent Events stream. Rollover
//! preconditions are checked before the stream opens, so a rejected request
//! is an ordinary HTTP error with a JSON `{error, message}` body.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod live;

#[cfg(test)]
mod tests;

use axum::{
    Json, Router,
    extract::{Query, State as AxumState, rejection::QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use fiscal_rollover_api::{
    ApiError, PreparedRollover, RolloverCoordinator, RolloverReport, RolloverRunsResponse,
    SwitchCurrentRequest, SwitchCurrentResponse, current_transition_info, list_fiscal_years,
    list_rollover_runs, switch_current,
};
use fiscal_rollover_domain::{DirectoryListing, RolloverQuery, TransitionInfo};
use fiscal_rollover_persistence::Persistence;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

pub use live::{ChannelSink, progress_stream};

/// Default interval between keep-alive comments on a progress stream.
pub const DEFAULT_KEEP_ALIVE: Duration = Duration::from_secs(15);

/// Application state shared across handlers.
///
/// The persistence layer sits behind an async mutex; a running rollover
/// holds it for the duration of the pipeline.
#[derive(Clone)]
pub struct AppState {
    /// The store holding companies, fiscal years and the run ledger.
    pub persistence: Arc<Mutex<Persistence>>,
    /// Registry of in-flight rollovers.
    pub coordinator: RolloverCoordinator,
    /// Interval between keep-alive comments on progress streams.
    pub keep_alive: Duration,
}

impl AppState {
    /// Wraps a persistence layer with a fresh coordinator.
    #[must_use]
    pub fn new(persistence: Persistence, keep_alive: Duration) -> Self {
        Self {
            persistence: Arc::new(Mutex::new(persistence)),
            coordinator: RolloverCoordinator::new(),
            keep_alive,
        }
    }
}

/// Error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error indicator.
    pub error: bool,
    /// Error message.
    pub message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
#[derive(Debug)]
pub struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

/// Maps an API error to its HTTP status.
const fn status_for(err: &ApiError) -> StatusCode {
    match err {
        ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
        ApiError::DomainRuleViolation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
        ApiError::RolloverInProgress { .. } => StatusCode::CONFLICT,
        ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = status_for(&err);
        if status.is_server_error() {
            error!(error = %err, "Request failed");
        } else {
            warn!(status = status.as_u16(), error = %err, "Request rejected");
        }
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<QueryRejection> for HttpError {
    fn from(rejection: QueryRejection) -> Self {
        warn!(error = %rejection.body_text(), "Malformed query string");
        Self {
            status: StatusCode::BAD_REQUEST,
            message: rejection.body_text(),
        }
    }
}

/// Handler for GET `/fiscal-year/current-transition-info`.
///
/// Returns the data used to pre-fill a rollover request.
async fn handle_current_transition_info(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<TransitionInfo>, HttpError> {
    info!("Handling current_transition_info request");

    let mut persistence = app_state.persistence.lock().await;
    let info: TransitionInfo = current_transition_info(&mut persistence)?;
    drop(persistence);

    Ok(Json(info))
}

/// Handler for GET `/fiscal-year/list`.
async fn handle_list_fiscal_years(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<DirectoryListing>, HttpError> {
    info!("Handling list_fiscal_years request");

    let mut persistence = app_state.persistence.lock().await;
    let listing: DirectoryListing = list_fiscal_years(&mut persistence)?;
    drop(persistence);

    Ok(Json(listing))
}

/// Handler for POST `/fiscal-year/switch-current`.
///
/// Failures keep the `{success, error}` shape of the success body.
async fn handle_switch_current(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<SwitchCurrentRequest>,
) -> (StatusCode, Json<SwitchCurrentResponse>) {
    info!(fiscal_year_id = req.fiscal_year_id, "Handling switch_current request");

    let mut persistence = app_state.persistence.lock().await;
    let result: Result<SwitchCurrentResponse, ApiError> = switch_current(&mut persistence, &req);
    drop(persistence);

    match result {
        Ok(response) => (StatusCode::OK, Json(response)),
        Err(err) => {
            let status: StatusCode = status_for(&err);
            warn!(fiscal_year_id = req.fiscal_year_id, error = %err, "Switch rejected");
            (status, Json(SwitchCurrentResponse::failed(err.to_string())))
        }
    }
}

/// Handler for GET `/fiscal-year/rollover-runs`.
async fn handle_list_rollover_runs(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<RolloverRunsResponse>, HttpError> {
    info!("Handling list_rollover_runs request");

    let mut persistence = app_state.persistence.lock().await;
    let response: RolloverRunsResponse = list_rollover_runs(&mut persistence)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/fiscal-year/rollover-stream`.
///
/// Checks the request and reserves the company, then runs the pipeline on
/// the blocking pool while its events stream back to the caller.
async fn handle_rollover_stream(
    AxumState(app_state): AxumState<AppState>,
    query: Result<Query<RolloverQuery>, QueryRejection>,
) -> Result<Response, HttpError> {
    let Query(query) = query?;
    info!(
        date_format = %query.date_format,
        request_id = query.request_id.as_deref().unwrap_or("-"),
        "Handling rollover_stream request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let prepared: PreparedRollover = app_state.coordinator.begin(&mut persistence, &query)?;
    drop(persistence);

    let (sink, events) = ChannelSink::channel();
    let store: Arc<Mutex<Persistence>> = Arc::clone(&app_state.persistence);
    tokio::task::spawn_blocking(move || {
        let mut sink: ChannelSink = sink;
        let mut persistence = store.blocking_lock();
        let company_name: String = prepared.company_name().to_string();
        let report: RolloverReport = prepared.execute(&mut persistence, &mut sink);
        info!(company = %company_name, report = ?report, "Rollover finished");
    });

    Ok(progress_stream(events, app_state.keep_alive).into_response())
}

/// Builds the application router with all endpoints.
pub fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/fiscal-year/current-transition-info",
            get(handle_current_transition_info),
        )
        .route("/fiscal-year/list", get(handle_list_fiscal_years))
        .route("/fiscal-year/switch-current", post(handle_switch_current))
        .route("/fiscal-year/rollover-stream", get(handle_rollover_stream))
        .route("/fiscal-year/rollover-runs", get(handle_list_rollover_runs))
        .with_state(app_state)
}
