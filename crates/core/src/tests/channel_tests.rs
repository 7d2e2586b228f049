// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for progress channel event handling.

use crate::{Command, ControllerState, Effect, LogOrigin, Phase, TransitionResult};
use fiscal_rollover_domain::ProgressEvent;

use super::helpers::{count_origin, feed, running, step};

#[test]
fn test_percent_tracks_last_progress_even_when_decreasing() {
    let (state, generation) = running();
    let (state, _) = feed(
        &state,
        generation,
        vec![
            ProgressEvent::Progress { value: 60 },
            ProgressEvent::Progress { value: 30 },
            ProgressEvent::Progress { value: 45 },
        ],
    );
    assert_eq!(state.percent, 45);
    assert_eq!(state.phase, Phase::Running);
}

#[test]
fn test_progress_above_100_is_clamped() {
    let (state, generation) = running();
    let (state, _) = feed(&state, generation, vec![ProgressEvent::Progress { value: 250 }]);
    assert_eq!(state.percent, 100);
}

#[test]
fn test_log_is_append_only_in_receipt_order() {
    let (state, generation) = running();
    let startup: Vec<String> = state.log.iter().map(|e| e.message.clone()).collect();

    let (state, _) = feed(
        &state,
        generation,
        vec![
            ProgressEvent::log("first"),
            ProgressEvent::Progress { value: 10 },
            ProgressEvent::log("second"),
        ],
    );

    let messages: Vec<&str> = state.log.iter().map(|e| e.message.as_str()).collect();
    let mut expected: Vec<&str> = startup.iter().map(String::as_str).collect();
    expected.extend(["first", "Progress: 10%", "second"]);
    assert_eq!(messages, expected);
}

#[test]
fn test_events_from_stale_generation_are_ignored() {
    let (state, generation) = running();
    let result: TransitionResult = step(
        &state,
        Command::ChannelEvent {
            generation: generation + 7,
            event: ProgressEvent::Complete,
        },
    );
    assert_eq!(result.new_state, state);
    assert!(result.effects.is_empty());
}

#[test]
fn test_events_after_terminal_are_ignored() {
    let (state, generation) = running();
    let (done, _) = feed(&state, generation, vec![ProgressEvent::Complete]);
    let (after, effects) = feed(
        &done,
        generation,
        vec![
            ProgressEvent::Progress { value: 5 },
            ProgressEvent::error("late"),
        ],
    );
    assert_eq!(after, done);
    assert!(effects.is_empty());
}

#[test]
fn test_close_after_terminal_is_not_a_drop() {
    let (state, generation) = running();
    let (done, _) = feed(&state, generation, vec![ProgressEvent::error("boom")]);
    let result: TransitionResult = step(&done, Command::ChannelClosed { generation });
    assert_eq!(result.new_state, done);
    assert!(result.effects.is_empty());
}

#[test]
fn test_complete_closes_channel_and_schedules_refresh() {
    let (state, generation) = running();
    let (done, effects) = feed(&state, generation, vec![ProgressEvent::Complete]);
    assert_eq!(done.phase, Phase::Succeeded);
    assert!(done.open_channel.is_none());
    assert_eq!(effects[0], Effect::CloseChannel { generation });
    assert!(matches!(effects[1], Effect::RefreshDirectory { delay } if !delay.is_zero()));
}

#[test]
fn test_error_keeps_progress_and_log_visible() {
    let (state, generation) = running();
    let (failed, effects) = feed(
        &state,
        generation,
        vec![
            ProgressEvent::Progress { value: 60 },
            ProgressEvent::log("migrated items"),
            ProgressEvent::error("account 42 is locked"),
        ],
    );
    assert_eq!(failed.phase, Phase::Failed);
    assert_eq!(failed.percent, 60);
    assert_eq!(failed.step_indicator().reached_count(), 2);
    assert_eq!(failed.error_message(), Some("account 42 is locked"));
    assert!(failed.log.iter().any(|e| e.message == "migrated items"));
    assert_eq!(effects, vec![Effect::CloseChannel { generation }]);
}

#[test]
fn test_abnormal_close_requests_directory_check() {
    let (state, generation) = running();
    let result: TransitionResult = step(&state, Command::ChannelClosed { generation });
    assert_eq!(result.new_state.phase, Phase::Failed);
    assert!(matches!(
        result.effects.as_slice(),
        [Effect::RefreshDirectory { delay }] if delay.is_zero()
    ));
    assert_eq!(count_origin(&result.new_state, LogOrigin::Client), 1);
}

#[test]
fn test_retry_closes_previous_channel_first() {
    let state: ControllerState = {
        let (mut state, generation) = running();
        // A failed state that still believes a channel is open.
        state.phase = Phase::Failed;
        state.failure = Some(crate::FailureKind::Detached);
        state.open_channel = Some(generation);
        state
    };
    let previous: u64 = state.open_channel.unwrap();
    let result: TransitionResult = step(&state, Command::Retry);
    assert_eq!(
        result.effects[0],
        Effect::CloseChannel {
            generation: previous
        }
    );
    assert!(matches!(result.effects[1], Effect::OpenChannel { .. }));
}
