// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use fiscal_rollover::CoreError;
use fiscal_rollover_domain::DomainError;
use thiserror::Error;

/// Failures opening or reading a progress channel.
///
/// These never reach the controller directly: a refused open becomes an
/// `error` event, while a connection that fails or breaks ends the channel.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// The server could not be reached or the connection broke.
    #[error("Could not reach the rollover server: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server refused to open the channel.
    #[error("{message}")]
    Rejected {
        /// The HTTP status of the refusal.
        status: u16,
        /// The server's explanation.
        message: String,
    },
}

/// Failures talking to the fiscal year directory or driving a session.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server could not be reached or answered with garbage.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with an error status.
    #[error("Server returned {status}: {message}")]
    Server {
        /// The HTTP status.
        status: u16,
        /// The server's explanation.
        message: String,
    },

    /// A date or request from the server or the user was invalid.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The controller rejected a command.
    #[error(transparent)]
    Controller(#[from] CoreError),
}
