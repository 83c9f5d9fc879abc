//! Period migration error types.

use crate::domain::foundation::{ContractId, DomainError, ErrorCode};
use crate::domain::schedule::Period;

/// Errors raised while previewing or applying a period change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrationError {
    /// Contract was not found.
    ContractNotFound(ContractId),
    /// The contract already reports at the requested period.
    NoOp(Period),
    /// Another period change for the contract is still running.
    InProgress(ContractId),
    /// A candidate of the plan has no selection.
    IncompleteStrategy(String),
    /// The plan does not describe the stored data.
    PlanMismatch(String),
    /// Stored records do not form the partition of the current period.
    PartitionMismatch(String),
    /// Reporting period value is not supported.
    InvalidPeriod(String),
    /// Validation failed.
    ValidationFailed { field: String, message: String },
    /// The contract changed after it was read; preview again.
    Conflict(String),
    /// Infrastructure error.
    Infrastructure(String),
}

impl MigrationError {
    pub fn code(&self) -> ErrorCode {
        match self {
            MigrationError::ContractNotFound(_) => ErrorCode::ContractNotFound,
            MigrationError::NoOp(_) => ErrorCode::NoOpMigration,
            MigrationError::InProgress(_) => ErrorCode::MigrationInProgress,
            MigrationError::IncompleteStrategy(_) => ErrorCode::IncompleteStrategy,
            MigrationError::PlanMismatch(_) => ErrorCode::PlanMismatch,
            MigrationError::PartitionMismatch(_) => ErrorCode::PartitionMismatch,
            MigrationError::InvalidPeriod(_) => ErrorCode::InvalidPeriod,
            MigrationError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            MigrationError::Conflict(_) => ErrorCode::ConcurrencyConflict,
            MigrationError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    pub fn message(&self) -> String {
        match self {
            MigrationError::ContractNotFound(id) => format!("Contract not found: {}", id),
            MigrationError::NoOp(period) => {
                format!("Contract already reports every {}", period)
            }
            MigrationError::InProgress(id) => {
                format!("A period change for contract {} is already running", id)
            }
            MigrationError::IncompleteStrategy(msg)
            | MigrationError::PlanMismatch(msg)
            | MigrationError::PartitionMismatch(msg)
            | MigrationError::InvalidPeriod(msg)
            | MigrationError::Conflict(msg) => msg.clone(),
            MigrationError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            MigrationError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }
}

impl std::fmt::Display for MigrationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for MigrationError {}

impl From<DomainError> for MigrationError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::IncompleteStrategy => MigrationError::IncompleteStrategy(err.message),
            ErrorCode::PlanMismatch => MigrationError::PlanMismatch(err.message),
            ErrorCode::PartitionMismatch => MigrationError::PartitionMismatch(err.message),
            ErrorCode::InvalidPeriod => MigrationError::InvalidPeriod(err.message),
            ErrorCode::ConcurrencyConflict => MigrationError::Conflict(err.message),
            ErrorCode::ValidationFailed
            | ErrorCode::EmptyField
            | ErrorCode::OutOfRange => MigrationError::ValidationFailed {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            _ => MigrationError::Infrastructure(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migration_codes_survive_conversion() {
        let err: MigrationError =
            DomainError::new(ErrorCode::IncompleteStrategy, "No merge mode chosen").into();
        assert_eq!(err.code(), ErrorCode::IncompleteStrategy);
        assert_eq!(err.to_string(), "No merge mode chosen");

        let err: MigrationError = DomainError::new(ErrorCode::PlanMismatch, "stale").into();
        assert_eq!(err.code(), ErrorCode::PlanMismatch);
    }

    #[test]
    fn invalid_period_keeps_its_code() {
        let err: MigrationError = Period::try_from_value(0.25).unwrap_err().into();
        assert!(matches!(err, MigrationError::InvalidPeriod(_)));
        assert_eq!(err.code(), ErrorCode::InvalidPeriod);
        assert!(err.to_string().contains("0.25"));
    }

    #[test]
    fn no_op_names_period() {
        assert_eq!(
            MigrationError::NoOp(Period::QUARTERLY).to_string(),
            "Contract already reports every 3 months"
        );
    }
}
