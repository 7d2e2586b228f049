// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Rollover client controller.
//!
//! The controller is a pure state machine:
//! `idle → confirming → running → {succeeded | failed}`, plus
//! `failed → running` (retry) and `succeeded | failed → idle` (dismiss).
//!
//! [`apply`] never performs I/O. It returns the next state together with the
//! [`Effect`]s a driver must carry out: opening and closing progress
//! channels and re-reading the fiscal year directory. Channels are tagged
//! with a generation number so that events from a channel that is no longer
//! the open one are ignored.

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

mod apply;
mod command;
mod error;
mod state;

#[cfg(test)]
mod tests;

// Re-export public types and functions
pub use apply::apply;
pub use command::Command;
pub use error::CoreError;
pub use state::{
    CHANNEL_DROPPED_MESSAGE, ControllerState, DETACHED_MESSAGE, DIRECTORY_REFRESH_DELAY, Effect,
    FailureKind, LogEntry, LogOrigin, Phase, TransitionResult, UiSignal,
};
