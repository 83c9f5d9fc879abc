//! Error types for the domain layer.

use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use thiserror::Error;

/// Errors that occur during value object construction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' must be between {min} and {max}, got {actual}")]
    OutOfRange {
        field: String,
        min: i32,
        max: i32,
        actual: i32,
    },
}

impl ValidationError {
    /// Creates an empty field validation error.
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    /// Creates an out of range validation error.
    pub fn out_of_range(field: impl Into<String>, min: i32, max: i32, actual: i32) -> Self {
        ValidationError::OutOfRange {
            field: field.into(),
            min,
            max,
            actual,
        }
    }
}

/// Error codes organized by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Validation errors
    ValidationFailed,
    EmptyField,
    OutOfRange,

    // Period and migration errors
    InvalidPeriod,
    NoOpMigration,
    IncompleteStrategy,
    PlanMismatch,
    PartitionMismatch,

    // Not found errors
    ContractNotFound,
    SignatureNotFound,
    BucketNotFound,

    // Concurrency errors
    MigrationInProgress,
    ConcurrencyConflict,

    // Infrastructure errors
    DatabaseError,
    InternalError,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::ValidationFailed => "VALIDATION_FAILED",
            ErrorCode::EmptyField => "EMPTY_FIELD",
            ErrorCode::OutOfRange => "OUT_OF_RANGE",
            ErrorCode::InvalidPeriod => "INVALID_PERIOD",
            ErrorCode::NoOpMigration => "NO_OP_MIGRATION",
            ErrorCode::IncompleteStrategy => "INCOMPLETE_STRATEGY",
            ErrorCode::PlanMismatch => "PLAN_MISMATCH",
            ErrorCode::PartitionMismatch => "PARTITION_MISMATCH",
            ErrorCode::ContractNotFound => "CONTRACT_NOT_FOUND",
            ErrorCode::SignatureNotFound => "SIGNATURE_NOT_FOUND",
            ErrorCode::BucketNotFound => "BUCKET_NOT_FOUND",
            ErrorCode::MigrationInProgress => "MIGRATION_IN_PROGRESS",
            ErrorCode::ConcurrencyConflict => "CONCURRENCY_CONFLICT",
            ErrorCode::DatabaseError => "DATABASE_ERROR",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        };
        write!(f, "{}", s)
    }
}

/// Standard domain error with code, message, and optional details.
#[derive(Debug, Clone)]
pub struct DomainError {
    pub code: ErrorCode,
    pub message: String,
    pub details: HashMap<String, String>,
}

impl DomainError {
    /// Creates a new domain error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: HashMap::new(),
        }
    }

    /// Creates a validation error for a specific field.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::ValidationFailed,
            message: message.into(),
            details: HashMap::new(),
        }
        .with_detail("field", field.into())
    }

    /// Adds a detail to the error.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    /// Returns true if this error carries the given code.
    pub fn is(&self, code: ErrorCode) -> bool {
        self.code == code
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl Error for DomainError {}

impl From<ValidationError> for DomainError {
    fn from(err: ValidationError) -> Self {
        let code = match &err {
            ValidationError::EmptyField { .. } => ErrorCode::EmptyField,
            ValidationError::OutOfRange { .. } => ErrorCode::OutOfRange,
        };
        DomainError::new(code, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_empty_field_displays_correctly() {
        let err = ValidationError::empty_field("name");
        assert_eq!(format!("{}", err), "Field 'name' cannot be empty");
    }

    #[test]
    fn validation_error_out_of_range_displays_correctly() {
        let err = ValidationError::out_of_range("percentage", 0, 100, 150);
        assert_eq!(
            format!("{}", err),
            "Field 'percentage' must be between 0 and 100, got 150"
        );
    }

    #[test]
    fn domain_error_displays_code_and_message() {
        let err = DomainError::new(ErrorCode::NoOpMigration, "Period is unchanged");
        assert_eq!(format!("{}", err), "[NO_OP_MIGRATION] Period is unchanged");
    }

    #[test]
    fn domain_error_with_detail_adds_detail() {
        let err = DomainError::new(ErrorCode::IncompleteStrategy, "Missing selection")
            .with_detail("bucket", "12")
            .with_detail("kind", "merge");

        assert_eq!(err.details.get("bucket"), Some(&"12".to_string()));
        assert_eq!(err.details.get("kind"), Some(&"merge".to_string()));
    }

    #[test]
    fn validation_error_converts_to_matching_code() {
        let err: DomainError = ValidationError::out_of_range("percentage", 0, 100, 101).into();
        assert!(err.is(ErrorCode::OutOfRange));
    }

    #[test]
    fn error_code_display_formats_correctly() {
        assert_eq!(format!("{}", ErrorCode::InvalidPeriod), "INVALID_PERIOD");
        assert_eq!(format!("{}", ErrorCode::MigrationInProgress), "MIGRATION_IN_PROGRESS");
    }
}
