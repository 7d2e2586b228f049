// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::calendar::{CalendarDate, DateFormat};
use crate::error::DomainError;
use serde::{Deserialize, Serialize};

/// A fiscal year as listed by the fiscal year directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FiscalYear {
    /// The canonical numeric identifier assigned by the database.
    pub id: i64,
    /// Display name derived from the bounds, e.g. `2081/82`.
    pub name: String,
    /// The calendar the bounds are expressed in.
    pub date_format: DateFormat,
    /// First day, `YYYY-MM-DD`.
    pub start_date: String,
    /// Last day, `YYYY-MM-DD`.
    pub end_date: String,
    /// Whether this is the company's current fiscal year.
    pub is_current: bool,
}

impl FiscalYear {
    /// Parses the start and end dates in this year's calendar.
    ///
    /// # Errors
    ///
    /// Returns an error if either stored date is malformed.
    pub fn bounds(&self) -> Result<(CalendarDate, CalendarDate), DomainError> {
        Ok((
            CalendarDate::parse(self.date_format, &self.start_date)?,
            CalendarDate::parse(self.date_format, &self.end_date)?,
        ))
    }

    /// Checks whether this year shares any day with `[start, end]`.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored dates are malformed or use another calendar.
    pub fn overlaps(&self, start: &CalendarDate, end: &CalendarDate) -> Result<bool, DomainError> {
        let (own_start, own_end) = self.bounds()?;
        Ok(!own_start.is_after(end)? && !start.is_after(&own_end)?)
    }
}

/// Derives a fiscal year's display name from its bounds.
///
/// A year contained in one calendar year is named after it (`2025`); one that
/// spans two is named `start/yy` (`2081/82`).
#[must_use]
pub fn fiscal_year_name(start: &CalendarDate, end: &CalendarDate) -> String {
    let start_year: i32 = start.year();
    let end_year: i32 = end.year();
    if start_year == end_year {
        format!("{start_year}")
    } else {
        format!("{start_year}/{:02}", end_year.rem_euclid(100))
    }
}

/// The full list of a company's fiscal years.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryListing {
    /// All fiscal years, oldest first.
    pub fiscal_years: Vec<FiscalYear>,
    /// The id of the current fiscal year.
    pub current_fiscal_year_id: Option<i64>,
    /// The company the list belongs to.
    pub current_company_name: String,
}

impl DirectoryListing {
    /// Returns the fiscal year marked current, if any.
    #[must_use]
    pub fn current(&self) -> Option<&FiscalYear> {
        self.fiscal_years.iter().find(|fy| fy.is_current)
    }

    /// Verifies that exactly one fiscal year is marked current.
    ///
    /// # Errors
    ///
    /// Returns an error if none or several are marked current.
    pub fn validate_single_current(&self) -> Result<&FiscalYear, DomainError> {
        let current: Vec<&FiscalYear> = self.fiscal_years.iter().filter(|fy| fy.is_current).collect();
        match current.as_slice() {
            [only] => Ok(only),
            [] => Err(DomainError::NoCurrentFiscalYear),
            many => Err(DomainError::MultipleCurrentFiscalYears {
                fiscal_year_ids: many.iter().map(|fy| fy.id).collect(),
            }),
        }
    }
}

/// Read-only data used to pre-fill a rollover request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionInfo {
    /// The day after the current fiscal year ends, `YYYY-MM-DD`.
    pub next_fiscal_year_start_date: String,
    /// The calendar the company keeps its books in.
    pub company_date_format: DateFormat,
    /// The fiscal year being closed.
    pub current_fiscal_year: FiscalYear,
    /// The company's display name.
    pub current_company_name: String,
}

impl TransitionInfo {
    /// Parses the suggested start date in the company's calendar.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored date is malformed.
    pub fn next_start(&self) -> Result<CalendarDate, DomainError> {
        CalendarDate::parse(self.company_date_format, &self.next_fiscal_year_start_date)
    }
}
