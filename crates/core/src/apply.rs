// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::Command;
use crate::error::CoreError;
use crate::state::{
    ControllerState, DIRECTORY_REFRESH_DELAY, Effect, FailureKind, LogEntry, LogOrigin, Phase,
    TransitionResult,
};
use fiscal_rollover_domain::{MAX_PERCENT, ProgressEvent, RolloverRequest, RolloverStep};
use std::time::Duration;
use time::OffsetDateTime;

/// Applies a command to the controller state, producing the new state and
/// the effects the caller must execute.
///
/// This function performs no I/O. Channel events and closes that do not
/// belong to the open channel, or that arrive outside `running`, are ignored
/// and produce an unchanged state.
///
/// # Arguments
///
/// * `state` - The current controller state (immutable)
/// * `command` - The command to apply
/// * `now` - Timestamp for any log lines appended
///
/// # Errors
///
/// Returns an error if:
/// - A submitted end date fails validation
/// - A user command is not valid in the current phase
pub fn apply(
    state: &ControllerState,
    command: Command,
    now: OffsetDateTime,
) -> Result<TransitionResult, CoreError> {
    let name: &'static str = command.name();
    let invalid = || CoreError::InvalidTransition {
        phase: state.phase,
        command: name,
    };

    match command {
        Command::Prepare {
            date_format,
            start_date,
        } => {
            if state.phase != Phase::Idle {
                return Err(invalid());
            }
            let mut new_state: ControllerState = state.clone();
            new_state.date_format = Some(date_format);
            new_state.start_date = Some(start_date);
            Ok(TransitionResult {
                new_state,
                effects: Vec::new(),
            })
        }
        Command::Submit {
            end_date,
            request_id,
        } => {
            if state.phase != Phase::Idle {
                return Err(invalid());
            }
            let start_date = state.start_date.ok_or(CoreError::NotPrepared)?;
            let request: RolloverRequest =
                RolloverRequest::new(start_date, Some(end_date), request_id)?;

            let mut new_state: ControllerState = state.clone();
            new_state.phase = Phase::Confirming;
            new_state.request = Some(request);
            Ok(TransitionResult {
                new_state,
                effects: Vec::new(),
            })
        }
        Command::Confirm => {
            if state.phase != Phase::Confirming {
                return Err(invalid());
            }
            Ok(start_run(state, now))
        }
        Command::Cancel => {
            if state.phase != Phase::Confirming {
                return Err(invalid());
            }
            let mut new_state: ControllerState = state.clone();
            new_state.phase = Phase::Idle;
            new_state.request = None;
            Ok(TransitionResult {
                new_state,
                effects: Vec::new(),
            })
        }
        Command::ChannelEvent { generation, event } => {
            if !is_live_channel(state, generation) {
                return Ok(TransitionResult::unchanged(state));
            }
            Ok(apply_event(state, generation, event, now))
        }
        Command::ChannelClosed { generation } => {
            if !is_live_channel(state, generation) {
                return Ok(TransitionResult::unchanged(state));
            }
            let mut new_state: ControllerState = state.clone();
            new_state.phase = Phase::Failed;
            new_state.failure = Some(FailureKind::ChannelDropped);
            new_state.open_channel = None;
            append(
                &mut new_state,
                now,
                LogOrigin::Client,
                "Connection lost before the rollover reported an outcome",
            );
            Ok(TransitionResult {
                new_state,
                effects: vec![Effect::RefreshDirectory {
                    delay: Duration::ZERO,
                }],
            })
        }
        Command::StopWatching => {
            if state.phase != Phase::Running {
                return Err(invalid());
            }
            let mut new_state: ControllerState = state.clone();
            let mut effects: Vec<Effect> = Vec::new();
            if let Some(generation) = new_state.open_channel.take() {
                effects.push(Effect::CloseChannel { generation });
            }
            new_state.phase = Phase::Failed;
            new_state.failure = Some(FailureKind::Detached);
            append(
                &mut new_state,
                now,
                LogOrigin::Client,
                "Stopped watching; the server may still be running the rollover",
            );
            effects.push(Effect::RefreshDirectory {
                delay: Duration::ZERO,
            });
            Ok(TransitionResult { new_state, effects })
        }
        Command::Retry => {
            if !state.can_retry() {
                return Err(invalid());
            }
            Ok(start_run(state, now))
        }
        Command::Dismiss => {
            if !state.phase.is_terminal() {
                return Err(invalid());
            }
            // A success moves the next start date on; a failure leaves it valid.
            let keep_prefill: bool = state.phase == Phase::Failed;
            Ok(TransitionResult {
                new_state: ControllerState {
                    next_generation: state.next_generation,
                    date_format: state.date_format.filter(|_| keep_prefill),
                    start_date: state.start_date.filter(|_| keep_prefill),
                    ..ControllerState::default()
                },
                effects: Vec::new(),
            })
        }
    }
}

/// Checks that `generation` is the open channel of a running controller.
fn is_live_channel(state: &ControllerState, generation: u64) -> bool {
    state.phase == Phase::Running && state.open_channel == Some(generation)
}

/// Enters `running` with a fresh channel for the stored request.
///
/// Any channel still open is closed first.
fn start_run(state: &ControllerState, now: OffsetDateTime) -> TransitionResult {
    let mut new_state: ControllerState = state.clone();
    let mut effects: Vec<Effect> = Vec::new();

    if let Some(previous) = new_state.open_channel.take() {
        effects.push(Effect::CloseChannel {
            generation: previous,
        });
    }

    let generation: u64 = new_state.next_generation;
    new_state.next_generation = generation.wrapping_add(1);
    new_state.open_channel = Some(generation);
    new_state.phase = Phase::Running;
    new_state.percent = 0;
    new_state.failure = None;
    new_state.log.clear();

    if let Some(request) = new_state.request.clone() {
        for line in startup_lines(&request) {
            append(&mut new_state, now, LogOrigin::Startup, line);
        }
        effects.push(Effect::OpenChannel {
            generation,
            request,
        });
    }

    TransitionResult { new_state, effects }
}

/// Describes the run about to start. Client-side text, not server-sourced.
fn startup_lines(request: &RolloverRequest) -> Vec<String> {
    let end: String = request
        .end_date()
        .map_or_else(|| String::from("(default)"), ToString::to_string);
    let mut lines: Vec<String> = vec![format!(
        "Starting fiscal year rollover: {} to {} ({} calendar)",
        request.start_date(),
        end,
        request.date_format()
    )];
    lines.extend(
        RolloverStep::ALL
            .iter()
            .enumerate()
            .map(|(index, step)| format!("Step {}: {}", index + 1, step.label())),
    );
    lines
}

/// Applies one event from the open channel.
fn apply_event(
    state: &ControllerState,
    generation: u64,
    event: ProgressEvent,
    now: OffsetDateTime,
) -> TransitionResult {
    let mut new_state: ControllerState = state.clone();
    let mut effects: Vec<Effect> = Vec::new();

    match event {
        ProgressEvent::Progress { value } => {
            // Overwrite, even when the value goes backwards.
            new_state.percent = value.min(MAX_PERCENT);
            let line: String = format!("Progress: {}%", new_state.percent);
            append(&mut new_state, now, LogOrigin::Progress, line);
        }
        ProgressEvent::Log { message } => {
            append(&mut new_state, now, LogOrigin::Server, message);
        }
        ProgressEvent::Complete => {
            new_state.phase = Phase::Succeeded;
            new_state.open_channel = None;
            effects.push(Effect::CloseChannel { generation });
            effects.push(Effect::RefreshDirectory {
                delay: DIRECTORY_REFRESH_DELAY,
            });
        }
        ProgressEvent::Error { message } => {
            new_state.phase = Phase::Failed;
            new_state.open_channel = None;
            new_state.failure = Some(FailureKind::Coordinator(message));
            effects.push(Effect::CloseChannel { generation });
        }
    }

    TransitionResult { new_state, effects }
}

fn append(
    state: &mut ControllerState,
    now: OffsetDateTime,
    origin: LogOrigin,
    message: impl Into<String>,
) {
    state.log.push(LogEntry {
        timestamp: now,
        message: message.into(),
        origin,
    });
}
