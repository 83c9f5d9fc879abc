//! In-memory progress repository.
//!
//! Keeps contracts and their yearly records behind a single lock, so a
//! multi-year commit is observed either completely or not at all. Version
//! checks happen under the same lock as the write.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{ContractId, DomainError, ErrorCode};
use crate::domain::progress::{Contract, ContractVersion, ProgressRecord};
use crate::ports::{ProgressRepository, YearRecords};

#[derive(Debug, Clone)]
struct StoredContract {
    contract: Contract,
    years: YearRecords,
}

/// In-memory storage for contracts and progress records.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProgressRepository {
    contracts: Arc<RwLock<HashMap<ContractId, StoredContract>>>,
}

impl InMemoryProgressRepository {
    /// Create a new in-memory repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of stored contracts
    pub async fn contract_count(&self) -> usize {
        self.contracts.read().await.len()
    }

    /// Clear all stored data (useful for tests)
    pub async fn clear(&self) {
        self.contracts.write().await.clear();
    }
}

fn contract_not_found(id: &ContractId) -> DomainError {
    DomainError::new(ErrorCode::ContractNotFound, format!("Contract not found: {}", id))
}

fn check_version(stored: &Contract, expected: ContractVersion) -> Result<(), DomainError> {
    if stored.version() != expected {
        return Err(DomainError::new(
            ErrorCode::ConcurrencyConflict,
            format!(
                "Contract {} changed since it was read: expected {}, found {}",
                stored.id(),
                expected,
                stored.version()
            ),
        ));
    }
    Ok(())
}

#[async_trait]
impl ProgressRepository for InMemoryProgressRepository {
    async fn save_contract_years(
        &self,
        contract: &Contract,
        years: &YearRecords,
        expected: Option<ContractVersion>,
    ) -> Result<(), DomainError> {
        let mut contracts = self.contracts.write().await;
        let Some(expected) = expected else {
            if contracts.contains_key(&contract.id()) {
                return Err(DomainError::new(
                    ErrorCode::ConcurrencyConflict,
                    format!("Contract {} already exists", contract.id()),
                ));
            }
            contracts.insert(
                contract.id(),
                StoredContract {
                    contract: contract.clone(),
                    years: years.clone(),
                },
            );
            return Ok(());
        };

        let stored = contracts
            .get_mut(&contract.id())
            .ok_or_else(|| contract_not_found(&contract.id()))?;
        check_version(&stored.contract, expected)?;
        if contract.version() <= expected {
            return Err(DomainError::new(
                ErrorCode::InternalError,
                format!("Write to contract {} did not advance its version", contract.id()),
            ));
        }
        stored.contract = contract.clone();
        for (year, records) in years {
            stored.years.insert(*year, records.clone());
        }
        Ok(())
    }

    async fn save_record(
        &self,
        contract_id: &ContractId,
        year: i32,
        record: &ProgressRecord,
        expected: ContractVersion,
    ) -> Result<ContractVersion, DomainError> {
        let mut contracts = self.contracts.write().await;
        let stored = contracts
            .get_mut(contract_id)
            .ok_or_else(|| contract_not_found(contract_id))?;
        check_version(&stored.contract, expected)?;
        let slot = stored
            .years
            .get_mut(&year)
            .and_then(|records| records.iter_mut().find(|r| r.bucket() == record.bucket()))
            .ok_or_else(|| {
                DomainError::new(
                    ErrorCode::BucketNotFound,
                    format!("No record for bucket {} in {}", record.bucket(), year),
                )
            })?;
        *slot = record.clone();
        stored.contract.touch();
        Ok(stored.contract.version())
    }

    async fn find_contract(&self, id: &ContractId) -> Result<Option<Contract>, DomainError> {
        let contracts = self.contracts.read().await;
        Ok(contracts.get(id).map(|s| s.contract.clone()))
    }

    async fn find_year(
        &self,
        contract_id: &ContractId,
        year: i32,
    ) -> Result<Option<Vec<ProgressRecord>>, DomainError> {
        let contracts = self.contracts.read().await;
        Ok(contracts
            .get(contract_id)
            .and_then(|s| s.years.get(&year).cloned()))
    }

    async fn find_all_years(&self, contract_id: &ContractId) -> Result<YearRecords, DomainError> {
        let contracts = self.contracts.read().await;
        Ok(contracts
            .get(contract_id)
            .map(|s| s.years.clone())
            .unwrap_or_default())
    }
}
