// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::calendar::DateFormat;

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The date format string is not a known calendar.
    InvalidDateFormat(String),
    /// Failed to parse a date from a string.
    DateParseError {
        /// The invalid date string.
        date_string: String,
        /// The parsing error message.
        error: String,
    },
    /// Two dates from different calendars were compared or combined.
    CalendarMismatch {
        /// The calendar that was expected.
        expected: DateFormat,
        /// The calendar that was found.
        found: DateFormat,
    },
    /// A required date field was not supplied.
    MissingDate {
        /// The wire name of the missing field.
        field: &'static str,
    },
    /// A date field for the other calendar was supplied.
    UnexpectedDate {
        /// The wire name of the unexpected field.
        field: &'static str,
        /// The calendar the request declared.
        date_format: DateFormat,
    },
    /// The end date does not fall after the start date.
    EndDateNotAfterStart {
        /// The requested start date.
        start_date: String,
        /// The requested end date.
        end_date: String,
    },
    /// Date arithmetic overflow.
    DateArithmeticOverflow {
        /// Description of the operation that failed.
        operation: String,
    },
    /// The start date does not immediately follow the current fiscal year's end.
    StartDateNotContiguous {
        /// The end date of the current fiscal year.
        current_end_date: String,
        /// The requested start date.
        start_date: String,
    },
    /// No fiscal year is marked current.
    NoCurrentFiscalYear,
    /// More than one fiscal year is marked current.
    MultipleCurrentFiscalYears {
        /// The ids of every fiscal year marked current.
        fiscal_year_ids: Vec<i64>,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDateFormat(value) => write!(
                f,
                "Invalid date format '{value}': must be 'nepali' or 'english'"
            ),
            Self::DateParseError { date_string, error } => {
                write!(f, "Failed to parse date '{date_string}': {error}")
            }
            Self::CalendarMismatch { expected, found } => {
                write!(f, "Calendar mismatch: expected {expected} date, found {found}")
            }
            Self::MissingDate { field } => write!(f, "Missing required date field '{field}'"),
            Self::UnexpectedDate { field, date_format } => write!(
                f,
                "Field '{field}' must not be set when the date format is {date_format}"
            ),
            Self::EndDateNotAfterStart { .. } => write!(f, "end date must be after start date"),
            Self::DateArithmeticOverflow { operation } => {
                write!(f, "Date arithmetic overflow: {operation}")
            }
            Self::StartDateNotContiguous {
                current_end_date,
                start_date,
            } => write!(
                f,
                "Start date {start_date} must be the day after the current fiscal year ends ({current_end_date})"
            ),
            Self::NoCurrentFiscalYear => write!(f, "No fiscal year is marked current"),
            Self::MultipleCurrentFiscalYears { fiscal_year_ids } => write!(
                f,
                "Multiple fiscal years are marked current: {fiscal_year_ids:?}"
            ),
        }
    }
}

impl std::error::Error for DomainError {}
