//! Progress repository port.
//!
//! Persists a contract together with its per-year record sets. A year is
//! always stored as the full partition of the contract's current period.
//!
//! Writes are guarded by the contract version: a writer names the version it
//! read, and the write is rejected if anything was committed since.

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::domain::foundation::{ContractId, DomainError};
use crate::domain::progress::{Contract, ContractVersion, ProgressRecord};

/// Records of several years keyed by calendar year.
pub type YearRecords = BTreeMap<i32, Vec<ProgressRecord>>;

/// Repository port for contracts and their progress records.
///
/// Implementations must ensure:
/// - `save_contract_years` replaces the contract and every listed year in one
///   step, or changes nothing
/// - years not listed in a commit are left untouched
/// - a write naming a version other than the stored one changes nothing
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Stores the contract and replaces the records of every year in `years`.
    ///
    /// `expected` is `None` when creating the contract, otherwise the version
    /// the caller read before advancing `contract`. Used for creation,
    /// signature extension, opening a year and period changes.
    ///
    /// # Errors
    ///
    /// - `ConcurrencyConflict` if the contract exists on create, or the stored
    ///   version differs from `expected`
    /// - `ContractNotFound` if `expected` is set and the contract doesn't exist
    /// - `DatabaseError` on persistence failure
    async fn save_contract_years(
        &self,
        contract: &Contract,
        years: &YearRecords,
        expected: Option<ContractVersion>,
    ) -> Result<(), DomainError>;

    /// Replaces a single record of a stored year, matched by bucket, and
    /// advances the stored contract version. Returns the new version.
    ///
    /// # Errors
    ///
    /// - `ContractNotFound` if the contract doesn't exist
    /// - `ConcurrencyConflict` if the stored version differs from `expected`
    /// - `BucketNotFound` if the year holds no record for that bucket
    /// - `DatabaseError` on persistence failure
    async fn save_record(
        &self,
        contract_id: &ContractId,
        year: i32,
        record: &ProgressRecord,
        expected: ContractVersion,
    ) -> Result<ContractVersion, DomainError>;

    /// Find a contract by its ID.
    ///
    /// Returns `None` if not found.
    async fn find_contract(&self, id: &ContractId) -> Result<Option<Contract>, DomainError>;

    /// Records of one year in bucket order. `None` if the year was never opened.
    async fn find_year(
        &self,
        contract_id: &ContractId,
        year: i32,
    ) -> Result<Option<Vec<ProgressRecord>>, DomainError>;

    /// Every stored year of a contract.
    async fn find_all_years(&self, contract_id: &ContractId) -> Result<YearRecords, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[allow(dead_code)]
    fn assert_object_safe(_: &dyn ProgressRepository) {}
}
