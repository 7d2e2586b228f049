// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{Command, ControllerState, Effect, LogOrigin, TransitionResult, apply};
use fiscal_rollover_domain::{CalendarDate, DateFormat, ProgressEvent};
use time::OffsetDateTime;
use time::macros::{date, datetime};

pub fn test_now() -> OffsetDateTime {
    datetime!(2026-01-01 09:00 UTC)
}

pub fn english(year: i32, month: u8, day: u8) -> CalendarDate {
    let month: time::Month = time::Month::try_from(month).unwrap();
    CalendarDate::English(time::Date::from_calendar_date(year, month, day).unwrap())
}

pub fn start_date() -> CalendarDate {
    CalendarDate::English(date!(2025 - 01 - 01))
}

pub fn end_date() -> CalendarDate {
    CalendarDate::English(date!(2025 - 12 - 31))
}

/// Applies a command and returns the new state, panicking on error.
pub fn step(state: &ControllerState, command: Command) -> TransitionResult {
    apply(state, command, test_now()).unwrap()
}

/// A controller with the start date loaded.
pub fn prepared() -> ControllerState {
    step(
        &ControllerState::new(),
        Command::Prepare {
            date_format: DateFormat::English,
            start_date: start_date(),
        },
    )
    .new_state
}

/// A controller waiting on the confirmation dialog.
pub fn confirming() -> ControllerState {
    step(
        &prepared(),
        Command::Submit {
            end_date: end_date(),
            request_id: Some(String::from("req-1")),
        },
    )
    .new_state
}

/// A controller with a channel open, plus the generation of that channel.
pub fn running() -> (ControllerState, u64) {
    let result: TransitionResult = step(&confirming(), Command::Confirm);
    let generation: u64 = opened_generation(&result.effects).unwrap();
    (result.new_state, generation)
}

pub fn opened_generation(effects: &[Effect]) -> Option<u64> {
    effects.iter().find_map(|effect| match effect {
        Effect::OpenChannel { generation, .. } => Some(*generation),
        _ => None,
    })
}

pub fn count_open_effects(effects: &[Effect]) -> usize {
    effects
        .iter()
        .filter(|effect| matches!(effect, Effect::OpenChannel { .. }))
        .count()
}

pub fn count_refresh_effects(effects: &[Effect]) -> usize {
    effects
        .iter()
        .filter(|effect| matches!(effect, Effect::RefreshDirectory { .. }))
        .count()
}

/// Feeds a sequence of events from one channel and collects all effects.
pub fn feed(
    state: &ControllerState,
    generation: u64,
    events: Vec<ProgressEvent>,
) -> (ControllerState, Vec<Effect>) {
    let mut current: ControllerState = state.clone();
    let mut effects: Vec<Effect> = Vec::new();
    for event in events {
        let result: TransitionResult = step(&current, Command::ChannelEvent { generation, event });
        current = result.new_state;
        effects.extend(result.effects);
    }
    (current, effects)
}

pub fn count_origin(state: &ControllerState, origin: LogOrigin) -> usize {
    state.log.iter().filter(|entry| entry.origin == origin).count()
}
