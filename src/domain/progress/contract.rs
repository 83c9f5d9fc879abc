//! Contract aggregate.
//!
//! A contract owns the reporting period and the ordered signature list that
//! every progress record of every year mirrors. Every committed write to the
//! contract or its records advances the contract version.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ContractId, DomainError, ErrorCode, Timestamp, ValidationError};
use crate::domain::schedule::{partition, Period};

use super::{ProgressRecord, Signature};

/// Optimistic-locking version of a contract and its stored records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ContractVersion(u32);

impl ContractVersion {
    /// The version of a freshly created contract.
    pub fn initial() -> Self {
        Self(1)
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }

    pub fn increment(&self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl Default for ContractVersion {
    fn default() -> Self {
        Self::initial()
    }
}

impl fmt::Display for ContractVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Contract aggregate.
///
/// # Invariants
///
/// - `name` is non-empty
/// - signature ids are unique and their order is stable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contract {
    id: ContractId,
    name: String,
    period: Period,
    signatures: Vec<Signature>,
    version: ContractVersion,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Contract {
    /// Creates a contract reporting at `period`.
    pub fn new(
        name: impl Into<String>,
        period: Period,
        signatures: Vec<Signature>,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::empty_field("contract.name"));
        }
        let now = Timestamp::now();
        Ok(Self {
            id: ContractId::new(),
            name,
            period,
            signatures,
            version: ContractVersion::initial(),
            created_at: now,
            updated_at: now,
        })
    }

    pub fn id(&self) -> ContractId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn period(&self) -> Period {
        self.period
    }

    pub fn signatures(&self) -> &[Signature] {
        &self.signatures
    }

    pub fn total_signatures(&self) -> usize {
        self.signatures.len()
    }

    pub fn version(&self) -> ContractVersion {
        self.version
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    /// Default records for a year: one empty record per partition bucket.
    pub fn open_year(&self) -> Vec<ProgressRecord> {
        partition(self.period)
            .into_iter()
            .map(|bucket| ProgressRecord::empty(bucket, &self.signatures))
            .collect()
    }

    /// Appends a signature slot. Existing records must be extended by the caller.
    pub fn add_signature(&mut self, signature: Signature) -> Result<(), DomainError> {
        if self.signatures.iter().any(|s| s.id == signature.id) {
            return Err(DomainError::validation(
                "signature",
                format!("Signature {} already exists on contract", signature.id),
            ));
        }
        self.signatures.push(signature);
        self.touch();
        Ok(())
    }

    /// Switches the reporting period. Records must be migrated alongside.
    pub fn change_period(&mut self, period: Period) -> Result<(), DomainError> {
        if period == self.period {
            return Err(DomainError::new(
                ErrorCode::NoOpMigration,
                format!("Contract already reports every {}", period),
            ));
        }
        self.period = period;
        self.touch();
        Ok(())
    }

    /// Advances the version for a write that only touches records.
    pub fn touch(&mut self) {
        self.version = self.version.increment();
        self.updated_at = Timestamp::now();
    }

    /// Checks that `records` are exactly the partition of the current period
    /// and mirror the contract's signatures.
    ///
    /// # Errors
    ///
    /// - `PartitionMismatch` on missing, extra or out-of-order buckets
    /// - `ValidationFailed` when a record's signature list differs
    pub fn verify_year(&self, records: &[ProgressRecord]) -> Result<(), DomainError> {
        let expected = partition(self.period);
        let actual: Vec<_> = records.iter().map(ProgressRecord::bucket).collect();
        if expected != actual {
            return Err(DomainError::new(
                ErrorCode::PartitionMismatch,
                format!(
                    "Records do not match the {} partition ({} expected, {} given)",
                    self.period,
                    expected.len(),
                    actual.len()
                ),
            ));
        }

        for record in records {
            let ids = record.signature_statuses().iter().map(|s| s.signature_id);
            if !ids.eq(self.signatures.iter().map(|s| s.id)) {
                return Err(DomainError::validation(
                    "signature_statuses",
                    format!("Bucket {} does not mirror the contract signatures", record.bucket()),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contract(period: Period) -> Contract {
        let sigs = vec![
            Signature::new("Ana", "Supervisor").unwrap(),
            Signature::new("Ben", "Contractor").unwrap(),
        ];
        Contract::new("Cleaning services", period, sigs).unwrap()
    }

    #[test]
    fn rejects_blank_name() {
        assert!(Contract::new(" ", Period::MONTHLY, vec![]).is_err());
    }

    #[test]
    fn open_year_covers_partition() {
        let c = contract(Period::QUARTERLY);
        let records = c.open_year();
        assert_eq!(records.len(), 4);
        assert!(c.verify_year(&records).is_ok());
        assert!(records.iter().all(|r| r.signature_statuses().len() == 2));
    }

    #[test]
    fn verify_year_rejects_missing_bucket() {
        let c = contract(Period::QUARTERLY);
        let mut records = c.open_year();
        records.pop();
        let err = c.verify_year(&records).unwrap_err();
        assert!(err.is(ErrorCode::PartitionMismatch));
    }

    #[test]
    fn verify_year_rejects_stale_signatures() {
        let mut c = contract(Period::ANNUAL);
        let records = c.open_year();
        c.add_signature(Signature::new("Cy", "Auditor").unwrap()).unwrap();
        let err = c.verify_year(&records).unwrap_err();
        assert!(err.is(ErrorCode::ValidationFailed));
    }

    #[test]
    fn add_signature_rejects_duplicates() {
        let mut c = contract(Period::MONTHLY);
        let existing = c.signatures()[0].clone();
        assert!(c.add_signature(existing).is_err());
        assert_eq!(c.total_signatures(), 2);
    }

    #[test]
    fn change_period_rejects_same_value() {
        let mut c = contract(Period::MONTHLY);
        let err = c.change_period(Period::MONTHLY).unwrap_err();
        assert!(err.is(ErrorCode::NoOpMigration));
        c.change_period(Period::HalfMonth).unwrap();
        assert_eq!(c.period(), Period::HalfMonth);
    }

    #[test]
    fn every_mutation_advances_version() {
        let mut c = contract(Period::MONTHLY);
        assert_eq!(c.version(), ContractVersion::initial());

        c.add_signature(Signature::new("Cy", "Auditor").unwrap()).unwrap();
        assert_eq!(c.version().as_u32(), 2);
        c.change_period(Period::ANNUAL).unwrap();
        assert_eq!(c.version().as_u32(), 3);
        c.touch();
        assert_eq!(c.version().as_u32(), 4);

        assert!(c.change_period(Period::ANNUAL).is_err());
        assert_eq!(c.version().as_u32(), 4);
    }
}
