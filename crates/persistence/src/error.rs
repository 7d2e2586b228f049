// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use fiscal_rollover_domain::DomainError;

/// Errors that can occur during persistence operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// A database error occurred.
    DatabaseError(String),
    /// Database connection failed.
    DatabaseConnectionFailed(String),
    /// Database migration failed.
    MigrationFailed(String),
    /// Query execution failed.
    QueryFailed(String),
    /// A stored value could not be decoded.
    SerializationError(String),
    /// A value violated a domain rule.
    InvalidData(DomainError),
    /// Initialization error.
    InitializationError(String),
    /// Foreign key enforcement is not enabled.
    ForeignKeyEnforcementNotEnabled,
    /// A company already exists; bootstrap only runs on an empty database.
    CompanyAlreadyExists { name: String },
    /// The fiscal year does not exist or belongs to another company.
    FiscalYearNotFound { fiscal_year_id: i64 },
    /// The fiscal year a rollover was planned against is no longer current.
    StaleFiscalYear { expected_fiscal_year_id: i64 },
    /// A carried-forward quantity or balance does not fit in 64 bits.
    ArithmeticOverflow { context: String },
    /// A step observer stopped the rollover.
    StepAborted(String),
    /// The requested resource was not found.
    NotFound(String),
}

impl std::fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DatabaseError(msg) => write!(f, "Database error: {msg}"),
            Self::DatabaseConnectionFailed(msg) => {
                write!(f, "Database connection failed: {msg}")
            }
            Self::MigrationFailed(msg) => write!(f, "Migration failed: {msg}"),
            Self::QueryFailed(msg) => write!(f, "Query failed: {msg}"),
            Self::SerializationError(msg) => write!(f, "Serialization error: {msg}"),
            Self::InvalidData(err) => write!(f, "Invalid data: {err}"),
            Self::InitializationError(msg) => write!(f, "Initialization error: {msg}"),
            Self::ForeignKeyEnforcementNotEnabled => {
                write!(f, "Foreign key enforcement is not enabled")
            }
            Self::CompanyAlreadyExists { name } => {
                write!(f, "Company '{name}' already exists")
            }
            Self::FiscalYearNotFound { fiscal_year_id } => {
                write!(f, "Fiscal year {fiscal_year_id} not found")
            }
            Self::StaleFiscalYear {
                expected_fiscal_year_id,
            } => write!(
                f,
                "Fiscal year {expected_fiscal_year_id} is no longer the current fiscal year"
            ),
            Self::ArithmeticOverflow { context } => {
                write!(f, "Arithmetic overflow while {context}")
            }
            Self::StepAborted(msg) => write!(f, "Rollover aborted: {msg}"),
            Self::NotFound(msg) => write!(f, "Not found: {msg}"),
        }
    }
}

impl std::error::Error for PersistenceError {}

impl From<diesel::result::Error> for PersistenceError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => Self::NotFound("Record not found".to_string()),
            _ => Self::DatabaseError(err.to_string()),
        }
    }
}

impl From<diesel::ConnectionError> for PersistenceError {
    fn from(err: diesel::ConnectionError) -> Self {
        Self::DatabaseConnectionFailed(err.to_string())
    }
}

impl From<DomainError> for PersistenceError {
    fn from(err: DomainError) -> Self {
        Self::InvalidData(err)
    }
}
