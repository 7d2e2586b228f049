// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};

/// The steps of a fiscal year rollover, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RolloverStep {
    /// Insert the new fiscal year and make it current.
    CreateFiscalYear,
    /// Copy the previous year's settings into the new year.
    CloneSettings,
    /// Carry every item's running stock forward as opening stock.
    MigrateItems,
    /// Carry every account's closing balance forward as opening balance.
    UpdateAccounts,
    /// Start voucher numbering over for the new year.
    ResetVoucherCounters,
}

impl RolloverStep {
    /// Every step, in execution order.
    pub const ALL: [Self; 5] = [
        Self::CreateFiscalYear,
        Self::CloneSettings,
        Self::MigrateItems,
        Self::UpdateAccounts,
        Self::ResetVoucherCounters,
    ];

    /// Overall percentage reported once this step has finished.
    #[must_use]
    pub const fn completion_percent(&self) -> u8 {
        match self {
            Self::CreateFiscalYear => 10,
            Self::CloneSettings => 25,
            Self::MigrateItems => 60,
            Self::UpdateAccounts => 90,
            Self::ResetVoucherCounters => 100,
        }
    }

    /// Human-readable description.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::CreateFiscalYear => "Creating new fiscal year",
            Self::CloneSettings => "Cloning company settings",
            Self::MigrateItems => "Migrating items and recalculating stock",
            Self::UpdateAccounts => "Updating account opening balances",
            Self::ResetVoucherCounters => "Re-initializing voucher counters",
        }
    }
}

impl std::fmt::Display for RolloverStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Percentage span per displayed step.
const DISPLAY_STEP_SPAN: u8 = 33;

/// One entry of the coarse three-step indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayStep {
    /// 1-based position.
    pub number: u8,
    /// Label shown next to the marker.
    pub label: &'static str,
    /// Whether the progress value has reached this step.
    pub reached: bool,
}

/// Coarse three-step progress indicator derived from a percentage.
///
/// Display only; the terminal event is always authoritative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepIndicator {
    /// The three steps in order.
    pub steps: [DisplayStep; 3],
}

impl StepIndicator {
    /// Labels of the displayed steps.
    const LABELS: [&'static str; 3] = ["Create fiscal year", "Migrate items", "Update accounts"];

    /// Computes the indicator: step `k` is reached once `percent >= (k - 1) * 33`.
    #[must_use]
    pub fn from_percent(percent: u8) -> Self {
        let step = |index: u8| DisplayStep {
            number: index + 1,
            label: Self::LABELS[usize::from(index)],
            reached: percent >= index * DISPLAY_STEP_SPAN,
        };
        Self {
            steps: [step(0), step(1), step(2)],
        }
    }

    /// Number of steps reached.
    #[must_use]
    pub fn reached_count(&self) -> usize {
        self.steps.iter().filter(|s| s.reached).count()
    }
}
