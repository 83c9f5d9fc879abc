//! Contract and progress error types.

use crate::domain::foundation::{ContractId, DomainError, ErrorCode, ValidationError};

/// Errors raised by contract and progress commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractError {
    /// Contract was not found.
    NotFound(ContractId),
    /// Signature is not part of the contract.
    SignatureNotFound(String),
    /// No record exists for the requested bucket.
    BucketNotFound(String),
    /// Reporting period value is not supported.
    InvalidPeriod(String),
    /// Validation failed.
    ValidationFailed { field: String, message: String },
    /// The contract changed after it was read; reload and retry.
    Conflict(String),
    /// Infrastructure error.
    Infrastructure(String),
}

impl ContractError {
    pub fn not_found(id: ContractId) -> Self {
        ContractError::NotFound(id)
    }
    pub fn bucket_not_found(message: impl Into<String>) -> Self {
        ContractError::BucketNotFound(message.into())
    }
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        ContractError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }
    pub fn code(&self) -> ErrorCode {
        match self {
            ContractError::NotFound(_) => ErrorCode::ContractNotFound,
            ContractError::SignatureNotFound(_) => ErrorCode::SignatureNotFound,
            ContractError::BucketNotFound(_) => ErrorCode::BucketNotFound,
            ContractError::InvalidPeriod(_) => ErrorCode::InvalidPeriod,
            ContractError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            ContractError::Conflict(_) => ErrorCode::ConcurrencyConflict,
            ContractError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }
    pub fn message(&self) -> String {
        match self {
            ContractError::NotFound(id) => format!("Contract not found: {}", id),
            ContractError::SignatureNotFound(msg) => msg.clone(),
            ContractError::BucketNotFound(msg)
            | ContractError::InvalidPeriod(msg)
            | ContractError::Conflict(msg) => msg.clone(),
            ContractError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            ContractError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }
}

impl std::fmt::Display for ContractError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ContractError {}

impl From<DomainError> for ContractError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::SignatureNotFound => ContractError::SignatureNotFound(err.message),
            ErrorCode::BucketNotFound => ContractError::BucketNotFound(err.message),
            ErrorCode::InvalidPeriod => ContractError::InvalidPeriod(err.message),
            ErrorCode::ConcurrencyConflict => ContractError::Conflict(err.message),
            ErrorCode::ValidationFailed
            | ErrorCode::EmptyField
            | ErrorCode::OutOfRange => ContractError::ValidationFailed {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            _ => ContractError::Infrastructure(err.to_string()),
        }
    }
}

impl From<ValidationError> for ContractError {
    fn from(err: ValidationError) -> Self {
        DomainError::from(err).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_domain_error_keeps_field() {
        let err: ContractError = DomainError::validation("signature", "duplicate").into();
        assert_eq!(err, ContractError::validation("signature", "duplicate"));
        assert_eq!(err.code(), ErrorCode::ValidationFailed);
    }

    #[test]
    fn database_error_becomes_infrastructure() {
        let err: ContractError = DomainError::new(ErrorCode::DatabaseError, "down").into();
        assert!(matches!(err, ContractError::Infrastructure(_)));
        assert_eq!(err.code(), ErrorCode::DatabaseError);
    }

    #[test]
    fn invalid_period_keeps_its_code() {
        let err: ContractError = crate::domain::schedule::Period::try_from_value(5.0)
            .unwrap_err()
            .into();
        assert!(matches!(err, ContractError::InvalidPeriod(_)));
        assert_eq!(err.code(), ErrorCode::InvalidPeriod);
    }

    #[test]
    fn concurrency_conflict_is_not_infrastructure() {
        let err: ContractError =
            DomainError::new(ErrorCode::ConcurrencyConflict, "changed since read").into();
        assert_eq!(err, ContractError::Conflict("changed since read".to_string()));
        assert_eq!(err.code(), ErrorCode::ConcurrencyConflict);
    }

    #[test]
    fn not_found_message_names_contract() {
        let id = ContractId::new();
        assert!(ContractError::not_found(id).to_string().contains(&id.to_string()));
    }
}
