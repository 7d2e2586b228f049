// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Calendar-aware dates.
//!
//! A company keeps its books in exactly one calendar: the Gregorian
//! ("english") calendar or the Bikram Sambat ("nepali") calendar. Both are
//! encoded on the wire as `YYYY-MM-DD`.
//!
//! Bikram Sambat month lengths vary from year to year (29 to 32 days); they
//! come from the table in [`crate::bikram_sambat`], which also bounds the
//! representable Nepali years.

use crate::bikram_sambat::{FIRST_NEPALI_YEAR, LAST_NEPALI_YEAR, month_length};
use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;
use time::{Date, Month, macros::format_description};

/// The calendar a company uses for its fiscal dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateFormat {
    /// Bikram Sambat.
    Nepali,
    /// Gregorian.
    English,
}

impl DateFormat {
    /// Converts this date format to its wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Nepali => "nepali",
            Self::English => "english",
        }
    }
}

impl FromStr for DateFormat {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "nepali" => Ok(Self::Nepali),
            "english" => Ok(Self::English),
            _ => Err(DomainError::InvalidDateFormat(s.to_string())),
        }
    }
}

impl std::fmt::Display for DateFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A Bikram Sambat calendar date.
///
/// Field order matters: the derived ordering is lexicographic on
/// `(year, month, day)`, which is chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NepaliDate {
    year: u16,
    month: u8,
    day: u8,
}

impl NepaliDate {
    /// Creates a Nepali date after range-checking its components.
    ///
    /// # Errors
    ///
    /// Returns an error if the year is outside the supported range, the
    /// month is not 1-12, or the day does not exist in that month.
    pub fn new(year: u16, month: u8, day: u8) -> Result<Self, DomainError> {
        let out_of_range = |error: String| DomainError::DateParseError {
            date_string: format!("{year:04}-{month:02}-{day:02}"),
            error,
        };
        if !(FIRST_NEPALI_YEAR..=LAST_NEPALI_YEAR).contains(&year) {
            return Err(out_of_range(format!(
                "year must be between {FIRST_NEPALI_YEAR} and {LAST_NEPALI_YEAR}"
            )));
        }
        let days: u8 = month_length(year, month)
            .ok_or_else(|| out_of_range(String::from("month must be between 1 and 12")))?;
        if !(1..=days).contains(&day) {
            return Err(out_of_range(format!(
                "day must be between 1 and {days} in {year:04}-{month:02}"
            )));
        }
        Ok(Self { year, month, day })
    }

    /// Parses a `YYYY-MM-DD` Nepali date.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is malformed or out of range.
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        let parse_error = |error: &str| DomainError::DateParseError {
            date_string: value.to_string(),
            error: error.to_string(),
        };

        let mut parts = value.trim().split('-');
        let (Some(year), Some(month), Some(day), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(parse_error("expected YYYY-MM-DD"));
        };

        let year: u16 = year.parse().map_err(|_| parse_error("invalid year"))?;
        let month: u8 = month.parse().map_err(|_| parse_error("invalid month"))?;
        let day: u8 = day.parse().map_err(|_| parse_error("invalid day"))?;

        Self::new(year, month, day)
    }

    /// Returns the year.
    #[must_use]
    pub const fn year(&self) -> u16 {
        self.year
    }

    /// Returns the month (1-12).
    #[must_use]
    pub const fn month(&self) -> u8 {
        self.month
    }

    /// Returns the day of month (1-32).
    #[must_use]
    pub const fn day(&self) -> u8 {
        self.day
    }

    /// Returns the number of days in this date's month.
    #[must_use]
    pub fn days_in_month(&self) -> u8 {
        // `new` only admits dates whose month is in the table.
        month_length(self.year, self.month).unwrap_or(self.day)
    }

    /// Returns the first day of the following month.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::DateArithmeticOverflow` past the last supported
    /// year.
    pub fn first_of_next_month(&self) -> Result<Self, DomainError> {
        let (year, month): (u16, u8) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        Self::new(year, month, 1).map_err(|_| DomainError::DateArithmeticOverflow {
            operation: format!("month after {self}"),
        })
    }

    /// Returns the following day.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::DateArithmeticOverflow` past the last supported
    /// year.
    pub fn next_day(&self) -> Result<Self, DomainError> {
        if self.day < self.days_in_month() {
            return Ok(Self {
                day: self.day + 1,
                ..*self
            });
        }
        self.first_of_next_month()
    }

    /// Returns the preceding day.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::DateArithmeticOverflow` before the first
    /// supported year.
    pub fn previous_day(&self) -> Result<Self, DomainError> {
        if self.day > 1 {
            return Ok(Self {
                day: self.day - 1,
                ..*self
            });
        }
        let (year, month): (u16, u8) = if self.month == 1 {
            (self.year - 1, 12)
        } else {
            (self.year, self.month - 1)
        };
        let overflow = || DomainError::DateArithmeticOverflow {
            operation: format!("day before {self}"),
        };
        let last_day: u8 = month_length(year, month).ok_or_else(overflow)?;
        Self::new(year, month, last_day).map_err(|_| overflow())
    }

    /// Checks whether `next` is the day immediately after `self`.
    #[must_use]
    pub fn is_followed_by(&self, next: &Self) -> bool {
        self.next_day().is_ok_and(|day| day == *next)
    }

    /// Returns the same month and day one year later, or the day after
    /// that month's last day when the later month is shorter.
    fn anniversary(&self) -> Result<Self, DomainError> {
        let overflow = || DomainError::DateArithmeticOverflow {
            operation: format!("one year after {self}"),
        };
        let year: u16 = self.year + 1;
        let days: u8 = month_length(year, self.month).ok_or_else(overflow)?;
        if self.day <= days {
            return Self::new(year, self.month, self.day).map_err(|_| overflow());
        }
        Self::new(year, self.month, days)
            .map_err(|_| overflow())?
            .next_day()
    }
}

impl std::fmt::Display for NepaliDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

/// A date in one of the supported calendars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CalendarDate {
    /// A Gregorian date.
    English(Date),
    /// A Bikram Sambat date.
    Nepali(NepaliDate),
}

impl CalendarDate {
    /// Parses a `YYYY-MM-DD` date in the given calendar.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid date in that calendar.
    pub fn parse(date_format: DateFormat, value: &str) -> Result<Self, DomainError> {
        match date_format {
            DateFormat::English => {
                let format = format_description!("[year]-[month]-[day]");
                Date::parse(value.trim(), &format)
                    .map(Self::English)
                    .map_err(|e| DomainError::DateParseError {
                        date_string: value.to_string(),
                        error: e.to_string(),
                    })
            }
            DateFormat::Nepali => NepaliDate::parse(value).map(Self::Nepali),
        }
    }

    /// Returns the calendar this date belongs to.
    #[must_use]
    pub const fn date_format(&self) -> DateFormat {
        match self {
            Self::English(_) => DateFormat::English,
            Self::Nepali(_) => DateFormat::Nepali,
        }
    }

    /// Compares two dates of the same calendar.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::CalendarMismatch` if the calendars differ.
    pub fn try_cmp(&self, other: &Self) -> Result<Ordering, DomainError> {
        match (self, other) {
            (Self::English(a), Self::English(b)) => Ok(a.cmp(b)),
            (Self::Nepali(a), Self::Nepali(b)) => Ok(a.cmp(b)),
            _ => Err(DomainError::CalendarMismatch {
                expected: self.date_format(),
                found: other.date_format(),
            }),
        }
    }

    /// Checks whether `self` is strictly after `other`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::CalendarMismatch` if the calendars differ.
    pub fn is_after(&self, other: &Self) -> Result<bool, DomainError> {
        Ok(self.try_cmp(other)? == Ordering::Greater)
    }

    /// Checks whether `self` is the day immediately after `previous`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::CalendarMismatch` if the calendars differ.
    pub fn immediately_follows(&self, previous: &Self) -> Result<bool, DomainError> {
        match (previous, self) {
            (Self::English(prev), Self::English(next)) => Ok(prev.next_day() == Some(*next)),
            (Self::Nepali(prev), Self::Nepali(next)) => Ok(prev.is_followed_by(next)),
            _ => Err(DomainError::CalendarMismatch {
                expected: previous.date_format(),
                found: self.date_format(),
            }),
        }
    }

    /// Returns the date a fiscal year ending on `self` hands over to.
    ///
    /// # Errors
    ///
    /// Returns an error if the next day is not representable.
    pub fn next_fiscal_start(&self) -> Result<Self, DomainError> {
        match self {
            Self::English(date) => date.next_day().map(Self::English).ok_or_else(|| {
                DomainError::DateArithmeticOverflow {
                    operation: format!("day after {date}"),
                }
            }),
            Self::Nepali(date) => date.next_day().map(Self::Nepali),
        }
    }

    /// Computes the default end date of a fiscal year starting on `self`:
    /// one year later, minus one day.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::DateArithmeticOverflow` if the end date falls
    /// outside the supported range.
    pub fn default_fiscal_end(&self) -> Result<Self, DomainError> {
        match self {
            Self::English(start) => {
                let overflow = || DomainError::DateArithmeticOverflow {
                    operation: format!("one year after {start}"),
                };
                let next_year: i32 = start.year().checked_add(1).ok_or_else(overflow)?;
                // Feb 29 has no anniversary; the year then ends on Feb 28.
                let anniversary: Date = start
                    .replace_year(next_year)
                    .or_else(|_| Date::from_calendar_date(next_year, Month::March, 1))
                    .map_err(|_| overflow())?;
                anniversary
                    .previous_day()
                    .map(Self::English)
                    .ok_or_else(overflow)
            }
            Self::Nepali(start) => start
                .anniversary()?
                .previous_day()
                .map(Self::Nepali),
        }
    }

    /// Returns the calendar year component.
    #[must_use]
    pub fn year(&self) -> i32 {
        match self {
            Self::English(date) => date.year(),
            Self::Nepali(date) => i32::from(date.year()),
        }
    }
}

impl std::fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::English(date) => write!(
                f,
                "{:04}-{:02}-{:02}",
                date.year(),
                u8::from(date.month()),
                date.day()
            ),
            Self::Nepali(date) => write!(f, "{date}"),
        }
    }
}
