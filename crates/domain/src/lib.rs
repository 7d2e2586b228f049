// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

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

mod bikram_sambat;
mod calendar;
mod error;
mod event;
mod fiscal_year;
mod request;
mod steps;

#[cfg(test)]
mod tests;

// Re-export public types
pub use calendar::{CalendarDate, DateFormat, NepaliDate};
pub use error::DomainError;
pub use event::{MAX_PERCENT, ProgressEvent};
pub use fiscal_year::{DirectoryListing, FiscalYear, TransitionInfo, fiscal_year_name};
pub use request::{RolloverQuery, RolloverRequest};
pub use steps::{DisplayStep, RolloverStep, StepIndicator};
