// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use fiscal_rollover_domain::{CalendarDate, DateFormat, RolloverRequest, StepIndicator};
use std::time::Duration;
use time::OffsetDateTime;

/// Message shown when the channel closes without a terminal event.
pub const CHANNEL_DROPPED_MESSAGE: &str = "Connection to the server was lost before the rollover reported an outcome. \
     The rollover may or may not have completed; check the fiscal year list before retrying.";

/// Message shown when the user stops watching a running rollover.
pub const DETACHED_MESSAGE: &str = "Stopped watching the rollover. The server may still be running it; \
     check the fiscal year list before retrying.";

/// Delay before re-reading the fiscal year directory after success.
pub const DIRECTORY_REFRESH_DELAY: Duration = Duration::from_secs(1);

/// Lifecycle phase of the rollover controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    /// Waiting for the user to submit an end date.
    #[default]
    Idle,
    /// Pre-flight confirmation; nothing has been sent.
    Confirming,
    /// A progress channel is open.
    Running,
    /// The rollover reported `complete`.
    Succeeded,
    /// The rollover reported `error`, or the channel was lost.
    Failed,
}

impl Phase {
    /// Converts this phase to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Confirming => "confirming",
            Self::Running => "running",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        }
    }

    /// Returns whether this phase waits for the user to dismiss or retry.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Why the controller entered `failed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    /// The coordinator emitted `error`; the message is shown verbatim.
    Coordinator(String),
    /// The channel closed with no terminal event. Outcome unknown.
    ChannelDropped,
    /// The user stopped watching. Outcome unknown.
    Detached,
}

/// Signals the surrounding UI reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiSignal {
    /// Local validation rejected the submitted dates.
    SubmitValidation(String),
    /// The coordinator reported a failure.
    ChannelError(String),
    /// The outcome is unknown.
    ChannelDropped,
}

/// Where a log line came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogOrigin {
    /// Synthesized by the client when a run starts.
    Startup,
    /// A `log` message or terminal event received from the server.
    Server,
    /// Summary of a received `progress` event.
    Progress,
    /// Written by the client on connection loss or stop.
    Client,
}

/// One line of the rollover log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// When the line was appended.
    pub timestamp: OffsetDateTime,
    /// The text of the line.
    pub message: String,
    /// Where the line came from.
    pub origin: LogOrigin,
}

/// Client-side view model of a fiscal year rollover.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ControllerState {
    /// The current phase.
    pub phase: Phase,
    /// The last received progress value, or 0.
    pub percent: u8,
    /// Append-only log for the current run.
    pub log: Vec<LogEntry>,
    /// Set while `phase` is `failed`.
    pub failure: Option<FailureKind>,
    /// The company's calendar, loaded before submit.
    pub date_format: Option<DateFormat>,
    /// The start date of the next fiscal year, loaded before submit.
    pub start_date: Option<CalendarDate>,
    /// The request being confirmed or run. Retry reuses it unchanged.
    pub request: Option<RolloverRequest>,
    /// Generation of the open channel, if one is open.
    pub open_channel: Option<u64>,
    /// Generation the next channel will use.
    pub next_generation: u64,
}

impl ControllerState {
    /// Creates a controller in `idle`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the submit control is enabled.
    #[must_use]
    pub const fn can_submit(&self) -> bool {
        matches!(self.phase, Phase::Idle) && self.start_date.is_some()
    }

    /// Whether the retry control is enabled.
    #[must_use]
    pub const fn can_retry(&self) -> bool {
        matches!(self.phase, Phase::Failed) && self.request.is_some()
    }

    /// The message to display for the current failure.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.failure.as_ref().map(|failure| match failure {
            FailureKind::Coordinator(message) => message.as_str(),
            FailureKind::ChannelDropped => CHANNEL_DROPPED_MESSAGE,
            FailureKind::Detached => DETACHED_MESSAGE,
        })
    }

    /// The signal the surrounding UI should show, if any.
    #[must_use]
    pub fn signal(&self) -> Option<UiSignal> {
        self.failure.as_ref().map(|failure| match failure {
            FailureKind::Coordinator(message) => UiSignal::ChannelError(message.clone()),
            FailureKind::ChannelDropped | FailureKind::Detached => UiSignal::ChannelDropped,
        })
    }

    /// The coarse three-step indicator for the current percentage.
    #[must_use]
    pub fn step_indicator(&self) -> StepIndicator {
        StepIndicator::from_percent(self.percent)
    }
}

/// Side effects requested by a transition, executed by the caller in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Open a progress channel for `request`, tagging its events with `generation`.
    OpenChannel {
        /// The generation of the new channel.
        generation: u64,
        /// The request to encode in the channel address.
        request: RolloverRequest,
    },
    /// Stop listening to the channel with this generation.
    ///
    /// Detaches only; server-side work is not aborted.
    CloseChannel {
        /// The generation to close.
        generation: u64,
    },
    /// Re-read the fiscal year directory after `delay`.
    RefreshDirectory {
        /// How long to wait first.
        delay: Duration,
    },
}

/// The result of a successful controller transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    /// The new state after the transition.
    pub new_state: ControllerState,
    /// Effects to execute, in order.
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    /// A transition that changes nothing.
    #[must_use]
    pub fn unchanged(state: &ControllerState) -> Self {
        Self {
            new_state: state.clone(),
            effects: Vec::new(),
        }
    }
}
