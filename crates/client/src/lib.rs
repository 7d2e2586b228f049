// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Client side of the fiscal year rollover protocol.
//!
//! - [`SseDecoder`] and [`decode_events`] turn the server's event stream
//!   into [`ProgressEvent`](fiscal_rollover_domain::ProgressEvent)s
//! - [`HttpProgressChannel`] opens progress channels over HTTP
//! - [`HttpDirectory`] reads and switches fiscal years
//! - [`RolloverSession`] drives the rollover controller against both

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

mod channel;
mod directory;
mod error;
mod session;
mod sse;

#[cfg(test)]
mod tests;

pub use channel::{HttpProgressChannel, ProgressChannel, decode_events};
pub use directory::{Directory, HttpDirectory};
pub use error::{ChannelError, ClientError};
pub use session::{
    EXIT_CLIENT_ERROR, EXIT_COMPLETED, EXIT_FAILED, EXIT_INVALID, EXIT_UNKNOWN, RolloverSession,
    SessionOutcome, StopHandle, new_request_id,
};
pub use sse::SseDecoder;
