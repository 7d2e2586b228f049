// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! The directory listing and transition info are served as the domain
//! types `DirectoryListing` and `TransitionInfo`; the rollover request
//! arrives as a `RolloverQuery`.

use fiscal_rollover_domain::FiscalYear;
use fiscal_rollover_persistence::RolloverRunRecord;
use serde::{Deserialize, Serialize};

/// API request to make another fiscal year current.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwitchCurrentRequest {
    /// The fiscal year to make current.
    pub fiscal_year_id: i64,
}

/// API response for a switch-current request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwitchCurrentResponse {
    /// Whether the switch took effect.
    pub success: bool,
    /// Why the switch failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// The fiscal year that is now current.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fiscal_year: Option<FiscalYear>,
}

impl SwitchCurrentResponse {
    /// A failed switch.
    #[must_use]
    pub const fn failed(error: String) -> Self {
        Self {
            success: false,
            error: Some(error),
            fiscal_year: None,
        }
    }
}

/// API response listing recorded rollover runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RolloverRunsResponse {
    /// The company the runs belong to.
    pub current_company_name: String,
    /// Every recorded run, newest first.
    pub runs: Vec<RolloverRunRecord>,
}
