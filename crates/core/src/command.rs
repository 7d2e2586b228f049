// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use fiscal_rollover_domain::{CalendarDate, DateFormat, ProgressEvent};

/// A command represents user intent or a channel observation as data only.
///
/// Commands are the only way to change controller state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Load the company calendar and the next fiscal year's start date.
    Prepare {
        /// The company's calendar.
        date_format: DateFormat,
        /// The day after the current fiscal year ends.
        start_date: CalendarDate,
    },
    /// Submit the end date for confirmation.
    Submit {
        /// The last day of the new fiscal year.
        end_date: CalendarDate,
        /// Idempotency key for this rollover; reused by every retry.
        request_id: Option<String>,
    },
    /// Confirm the pre-flight summary and start the rollover.
    Confirm,
    /// Back out of the pre-flight summary.
    Cancel,
    /// An event arrived on a channel.
    ChannelEvent {
        /// The generation of the channel it arrived on.
        generation: u64,
        /// The event.
        event: ProgressEvent,
    },
    /// A channel ended. Harmless after a terminal event; abnormal otherwise.
    ChannelClosed {
        /// The generation of the channel that ended.
        generation: u64,
    },
    /// Stop listening without aborting the server-side rollover.
    StopWatching,
    /// Run the failed request again from the start.
    Retry,
    /// Clear a finished run and return to `idle`.
    Dismiss,
}

impl Command {
    /// Returns the command name for errors and logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Prepare { .. } => "prepare",
            Self::Submit { .. } => "submit",
            Self::Confirm => "confirm",
            Self::Cancel => "cancel",
            Self::ChannelEvent { .. } => "channel_event",
            Self::ChannelClosed { .. } => "channel_closed",
            Self::StopWatching => "stop_watching",
            Self::Retry => "retry",
            Self::Dismiss => "dismiss",
        }
    }
}
