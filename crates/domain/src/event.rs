// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Progress channel events.
//!
//! One rollover invocation produces zero or more `progress`/`log` events
//! followed by exactly one terminal event (`complete` or `error`). A channel
//! that ends without a terminal event closed abnormally; that outcome is not
//! an event and is detected by the consumer.

use serde::{Deserialize, Serialize};

/// Upper bound of a progress value.
pub const MAX_PERCENT: u8 = 100;

/// One unit on the progress channel.
///
/// Serialized as `{"type": "...", "value"?: n, "message"?: "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProgressEvent {
    /// Overall completion percentage.
    Progress {
        /// Percentage in 0..=100.
        value: u8,
    },
    /// A free-text status line.
    Log {
        /// The status text.
        message: String,
    },
    /// The rollover finished and every step is durable.
    Complete,
    /// The rollover failed; nothing from it remains applied.
    Error {
        /// Description of the failure.
        message: String,
    },
}

impl ProgressEvent {
    /// Creates a progress event, capping the value at 100.
    #[must_use]
    pub fn progress(value: u8) -> Self {
        Self::Progress {
            value: value.min(MAX_PERCENT),
        }
    }

    /// Creates a log event.
    #[must_use]
    pub fn log(message: impl Into<String>) -> Self {
        Self::Log {
            message: message.into(),
        }
    }

    /// Creates an error event.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    /// Returns whether this event ends the invocation.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete | Self::Error { .. })
    }

    /// Returns the event kind as it appears in the `type` tag.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Progress { .. } => "progress",
            Self::Log { .. } => "log",
            Self::Complete => "complete",
            Self::Error { .. } => "error",
        }
    }
}
