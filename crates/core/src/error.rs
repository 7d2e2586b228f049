// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::state::{Phase, UiSignal};
use fiscal_rollover_domain::DomainError;

/// Errors that can occur during controller transitions.
///
/// A failed transition leaves the controller state unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// The submitted request failed local validation; nothing was sent.
    Validation(DomainError),
    /// The command is not valid in the current phase.
    InvalidTransition {
        /// The phase the controller was in.
        phase: Phase,
        /// The command that was rejected.
        command: &'static str,
    },
    /// A submit arrived before the start date was known.
    NotPrepared,
}

impl CoreError {
    /// Returns the signal the surrounding UI should show for this error, if any.
    #[must_use]
    pub fn signal(&self) -> Option<UiSignal> {
        match self {
            Self::Validation(err) => Some(UiSignal::SubmitValidation(err.to_string())),
            Self::InvalidTransition { .. } | Self::NotPrepared => None,
        }
    }
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "Validation failed: {err}"),
            Self::InvalidTransition { phase, command } => {
                write!(f, "Command '{command}' is not valid while {phase}")
            }
            Self::NotPrepared => write!(
                f,
                "The rollover start date has not been loaded yet"
            ),
        }
    }
}

impl std::error::Error for CoreError {}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        Self::Validation(err)
    }
}
