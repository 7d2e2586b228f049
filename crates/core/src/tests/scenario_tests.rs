// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! End-to-end controller scenarios for a 2025 English-calendar rollover.

use crate::{
    CHANNEL_DROPPED_MESSAGE, Command, ControllerState, LogOrigin, Phase, TransitionResult,
    UiSignal,
};
use fiscal_rollover_domain::ProgressEvent;

use super::helpers::{count_origin, count_refresh_effects, feed, running, step};

#[test]
fn test_successful_rollover() {
    let (state, generation) = running();
    let startup_lines: Vec<String> = state.log.iter().map(|e| e.message.clone()).collect();

    let (state, effects) = feed(
        &state,
        generation,
        vec![
            ProgressEvent::Progress { value: 10 },
            ProgressEvent::log("creating year"),
            ProgressEvent::Progress { value: 50 },
            ProgressEvent::Progress { value: 100 },
            ProgressEvent::Complete,
        ],
    );

    assert_eq!(state.phase, Phase::Succeeded);
    assert_eq!(state.percent, 100);
    assert_eq!(count_origin(&state, LogOrigin::Startup), startup_lines.len());
    assert_eq!(count_origin(&state, LogOrigin::Server), 1);
    assert_eq!(count_origin(&state, LogOrigin::Progress), 3);

    // Startup lines, then exactly one line per received event, in order.
    let mut expected: Vec<String> = startup_lines;
    expected.extend(
        ["Progress: 10%", "creating year", "Progress: 50%", "Progress: 100%"].map(String::from),
    );
    let log: Vec<String> = state.log.iter().map(|e| e.message.clone()).collect();
    assert_eq!(log, expected);
    assert_eq!(count_refresh_effects(&effects), 1);
    assert_eq!(state.step_indicator().reached_count(), 3);
}

#[test]
fn test_connection_lost_mid_run() {
    let (state, generation) = running();
    let (state, _) = feed(&state, generation, vec![ProgressEvent::Progress { value: 20 }]);
    let result: TransitionResult = step(&state, Command::ChannelClosed { generation });
    let state: ControllerState = result.new_state;

    assert_eq!(state.phase, Phase::Failed);
    assert_eq!(state.percent, 20);
    assert_eq!(state.error_message(), Some(CHANNEL_DROPPED_MESSAGE));
    assert!(!CHANNEL_DROPPED_MESSAGE.contains("migration failed"));
    assert_eq!(state.signal(), Some(UiSignal::ChannelDropped));
}

#[test]
fn test_coordinator_rejects_duplicate_rollover() {
    let (state, generation) = running();
    let log_before: Vec<String> = state.log.iter().map(|e| e.message.clone()).collect();

    let (state, _) = feed(
        &state,
        generation,
        vec![ProgressEvent::error("duplicate rollover in progress")],
    );

    assert_eq!(state.phase, Phase::Failed);
    assert_eq!(state.error_message(), Some("duplicate rollover in progress"));
    assert_eq!(
        state.signal(),
        Some(UiSignal::ChannelError(String::from(
            "duplicate rollover in progress"
        )))
    );
    assert!(state.can_retry());
    let log_after: Vec<String> = state.log.iter().map(|e| e.message.clone()).collect();
    assert_eq!(log_after, log_before);
}
