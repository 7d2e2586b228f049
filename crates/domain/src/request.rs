// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::calendar::{CalendarDate, DateFormat};
use crate::error::DomainError;
use serde::{Deserialize, Serialize};

/// A validated request to roll a company over into a new fiscal year.
///
/// Invariants enforced at construction:
/// - the start and end dates belong to the same calendar
/// - when an end date is present it falls strictly after the start date
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RolloverRequest {
    /// The calendar of both dates.
    date_format: DateFormat,
    /// The first day of the new fiscal year.
    start_date: CalendarDate,
    /// The last day of the new fiscal year, if supplied.
    end_date: Option<CalendarDate>,
    /// Idempotency key shared by every attempt of the same rollover.
    request_id: Option<String>,
}

impl RolloverRequest {
    /// Creates a validated rollover request.
    ///
    /// # Arguments
    ///
    /// * `start_date` - The first day of the new fiscal year
    /// * `end_date` - The last day of the new fiscal year, or `None` for the default
    /// * `request_id` - Optional idempotency key
    ///
    /// # Errors
    ///
    /// Returns an error if the dates use different calendars or the end date
    /// does not fall after the start date.
    pub fn new(
        start_date: CalendarDate,
        end_date: Option<CalendarDate>,
        request_id: Option<String>,
    ) -> Result<Self, DomainError> {
        if let Some(end) = &end_date
            && !end.is_after(&start_date)?
        {
            return Err(DomainError::EndDateNotAfterStart {
                start_date: start_date.to_string(),
                end_date: end.to_string(),
            });
        }

        Ok(Self {
            date_format: start_date.date_format(),
            start_date,
            end_date,
            request_id: request_id.filter(|id| !id.trim().is_empty()),
        })
    }

    /// Returns the calendar of this request.
    #[must_use]
    pub const fn date_format(&self) -> DateFormat {
        self.date_format
    }

    /// Returns the requested start date.
    #[must_use]
    pub const fn start_date(&self) -> &CalendarDate {
        &self.start_date
    }

    /// Returns the requested end date, if supplied.
    #[must_use]
    pub const fn end_date(&self) -> Option<&CalendarDate> {
        self.end_date.as_ref()
    }

    /// Returns the idempotency key, if any.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }

    /// Returns the end date, falling back to one year after the start minus one day.
    ///
    /// # Errors
    ///
    /// Returns an error if no end date was supplied and none can be derived.
    pub fn resolved_end_date(&self) -> Result<CalendarDate, DomainError> {
        match self.end_date {
            Some(end) => Ok(end),
            None => self.start_date.default_fiscal_end(),
        }
    }

    /// Encodes this request as channel query parameters.
    #[must_use]
    pub fn to_query(&self) -> RolloverQuery {
        let start: Option<String> = Some(self.start_date.to_string());
        let end: Option<String> = self.end_date.map(|d| d.to_string());
        let mut query: RolloverQuery = RolloverQuery {
            date_format: self.date_format.as_str().to_string(),
            request_id: self.request_id.clone(),
            ..RolloverQuery::default()
        };
        match self.date_format {
            DateFormat::Nepali => {
                query.start_date_nepali = start;
                query.end_date_nepali = end;
            }
            DateFormat::English => {
                query.start_date_english = start;
                query.end_date_english = end;
            }
        }
        query
    }

    /// Decodes and validates channel query parameters.
    ///
    /// Only the date pair matching `dateFormat` may be populated.
    ///
    /// # Errors
    ///
    /// Returns an error if the date format is unknown, the start date is
    /// missing, a date for the other calendar is present, or any date is invalid.
    pub fn from_query(query: &RolloverQuery) -> Result<Self, DomainError> {
        let date_format: DateFormat = query.date_format.parse()?;

        let (start, end, foreign): (Option<&str>, Option<&str>, [(&'static str, Option<&str>); 2]) =
            match date_format {
                DateFormat::Nepali => (
                    non_empty(query.start_date_nepali.as_ref()),
                    non_empty(query.end_date_nepali.as_ref()),
                    [
                        ("startDateEnglish", non_empty(query.start_date_english.as_ref())),
                        ("endDateEnglish", non_empty(query.end_date_english.as_ref())),
                    ],
                ),
                DateFormat::English => (
                    non_empty(query.start_date_english.as_ref()),
                    non_empty(query.end_date_english.as_ref()),
                    [
                        ("startDateNepali", non_empty(query.start_date_nepali.as_ref())),
                        ("endDateNepali", non_empty(query.end_date_nepali.as_ref())),
                    ],
                ),
            };

        if let Some((field, _)) = foreign.iter().find(|(_, value)| value.is_some()) {
            return Err(DomainError::UnexpectedDate {
                field: *field,
                date_format,
            });
        }

        let start_field: &'static str = match date_format {
            DateFormat::Nepali => "startDateNepali",
            DateFormat::English => "startDateEnglish",
        };
        let start: &str = start.ok_or(DomainError::MissingDate { field: start_field })?;
        let start_date: CalendarDate = CalendarDate::parse(date_format, start)?;
        let end_date: Option<CalendarDate> = end
            .map(|value| CalendarDate::parse(date_format, value))
            .transpose()?;

        Self::new(start_date, end_date, query.request_id.clone())
    }
}

/// Treats blank form values the same as absent ones.
fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|v| !v.trim().is_empty())
}

/// Wire form of a rollover request, carried as query parameters on the
/// progress channel address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RolloverQuery {
    /// `nepali` or `english`.
    pub date_format: String,
    /// Start date when the company uses the Nepali calendar.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date_nepali: Option<String>,
    /// Start date when the company uses the English calendar.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date_english: Option<String>,
    /// End date when the company uses the Nepali calendar.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date_nepali: Option<String>,
    /// End date when the company uses the English calendar.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date_english: Option<String>,
    /// Idempotency key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}
