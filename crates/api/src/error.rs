// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use fiscal_rollover_domain::DomainError;
use fiscal_rollover_persistence::PersistenceError;

/// Message reported when a company already has a rollover running.
pub const DUPLICATE_ROLLOVER_MESSAGE: &str = "duplicate rollover in progress";

/// API-level errors.
///
/// These are distinct from domain and persistence errors and represent the
/// API contract. The server maps each variant to one HTTP status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// The request is well-formed but contradicts the stored fiscal years.
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// Another rollover for the same company is still running.
    RolloverInProgress {
        /// The company the running rollover belongs to.
        company_id: i64,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::DomainRuleViolation { message, .. } => write!(f, "{message}"),
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::RolloverInProgress { .. } => write!(f, "{DUPLICATE_ROLLOVER_MESSAGE}"),
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<PersistenceError> for ApiError {
    fn from(err: PersistenceError) -> Self {
        translate_persistence_error(err)
    }
}

/// Translates a domain error into an API error.
///
/// Request-shape problems become `InvalidInput`; contradictions with the
/// stored fiscal years become `DomainRuleViolation`.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    let message: String = err.to_string();
    match err {
        DomainError::InvalidDateFormat(_) => ApiError::InvalidInput {
            field: String::from("dateFormat"),
            message,
        },
        DomainError::MissingDate { field } | DomainError::UnexpectedDate { field, .. } => {
            ApiError::InvalidInput {
                field: field.to_string(),
                message,
            }
        }
        DomainError::DateParseError { .. } | DomainError::DateArithmeticOverflow { .. } => {
            ApiError::InvalidInput {
                field: String::from("date"),
                message,
            }
        }
        DomainError::EndDateNotAfterStart { .. } => ApiError::InvalidInput {
            field: String::from("endDate"),
            message,
        },
        DomainError::CalendarMismatch { .. } => ApiError::DomainRuleViolation {
            rule: String::from("calendar_match"),
            message,
        },
        DomainError::StartDateNotContiguous { .. } => ApiError::DomainRuleViolation {
            rule: String::from("contiguous_start"),
            message,
        },
        DomainError::NoCurrentFiscalYear | DomainError::MultipleCurrentFiscalYears { .. } => {
            ApiError::DomainRuleViolation {
                rule: String::from("single_current_fiscal_year"),
                message,
            }
        }
    }
}

/// Translates a persistence error into an API error.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::FiscalYearNotFound { fiscal_year_id } => ApiError::ResourceNotFound {
            resource_type: String::from("Fiscal year"),
            message: format!("Fiscal year {fiscal_year_id} does not exist"),
        },
        PersistenceError::InvalidData(domain) => translate_domain_error(domain),
        PersistenceError::StaleFiscalYear { .. } => ApiError::DomainRuleViolation {
            rule: String::from("current_fiscal_year_unchanged"),
            message: err.to_string(),
        },
        other => ApiError::Internal {
            message: other.to_string(),
        },
    }
}
