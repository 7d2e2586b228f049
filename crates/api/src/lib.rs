// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary for fiscal year rollover.
//!
//! Synchronous operations over a [`Persistence`](fiscal_rollover_persistence::Persistence):
//! the fiscal year directory (list, switch current, transition info, run
//! history) and the [`RolloverCoordinator`]. Transport concerns belong to
//! the server.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod coordinator;
mod error;
mod handlers;
mod request_response;

#[cfg(test)]
mod tests;

pub use coordinator::{
    InFlightGuard, PreparedRollover, ProgressSink, RolloverCoordinator, RolloverReport,
};
pub use error::{
    ApiError, DUPLICATE_ROLLOVER_MESSAGE, translate_domain_error, translate_persistence_error,
};
pub use handlers::{
    current_transition_info, list_fiscal_years, list_rollover_runs, require_company,
    switch_current,
};
pub use request_response::{RolloverRunsResponse, SwitchCurrentRequest, SwitchCurrentResponse};
