//! Integration tests for writes that interleave on one contract.
//!
//! One handler is held inside its repository write while another handler
//! commits against the same contract. The held write must then fail with a
//! conflict and leave the other handler's committed change intact.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Notify;

use contract_tracker::adapters::{InMemoryEventBus, InMemoryProgressRepository};
use contract_tracker::application::{
    AddSignatureCommand, AddSignatureHandler, ChangePeriodCommand, ChangePeriodHandler,
    CreateContractCommand, CreateContractHandler, PreviewPeriodChangeHandler,
    PreviewPeriodChangeQuery, ProgressChange, SignatureInput, UpdateProgressCommand,
    UpdateProgressHandler,
};
use contract_tracker::config::MigrationDefaults;
use contract_tracker::domain::foundation::{
    CommandMetadata, ContractId, DomainError, ErrorCode, UserId,
};
use contract_tracker::domain::migration::{MigrationError, MigrationStrategy};
use contract_tracker::domain::progress::{Contract, ContractError, ContractVersion, ProgressRecord};
use contract_tracker::domain::schedule::{Bucket, Period};
use contract_tracker::ports::{ProgressRepository, YearRecords};

// =============================================================================
// Test Infrastructure
// =============================================================================

/// Repository that parks its first write until released.
struct GatedRepository {
    inner: InMemoryProgressRepository,
    armed: AtomicBool,
    entered: Notify,
    release: Notify,
}

impl GatedRepository {
    fn new(inner: InMemoryProgressRepository) -> Self {
        Self {
            inner,
            armed: AtomicBool::new(true),
            entered: Notify::new(),
            release: Notify::new(),
        }
    }

    async fn hold_first_write(&self) {
        if self.armed.swap(false, Ordering::SeqCst) {
            self.entered.notify_one();
            self.release.notified().await;
        }
    }
}

#[async_trait]
impl ProgressRepository for GatedRepository {
    async fn save_contract_years(
        &self,
        contract: &Contract,
        years: &YearRecords,
        expected: Option<ContractVersion>,
    ) -> Result<(), DomainError> {
        self.hold_first_write().await;
        self.inner.save_contract_years(contract, years, expected).await
    }

    async fn save_record(
        &self,
        contract_id: &ContractId,
        year: i32,
        record: &ProgressRecord,
        expected: ContractVersion,
    ) -> Result<ContractVersion, DomainError> {
        self.hold_first_write().await;
        self.inner.save_record(contract_id, year, record, expected).await
    }

    async fn find_contract(&self, id: &ContractId) -> Result<Option<Contract>, DomainError> {
        self.inner.find_contract(id).await
    }

    async fn find_year(
        &self,
        contract_id: &ContractId,
        year: i32,
    ) -> Result<Option<Vec<ProgressRecord>>, DomainError> {
        self.inner.find_year(contract_id, year).await
    }

    async fn find_all_years(&self, contract_id: &ContractId) -> Result<YearRecords, DomainError> {
        self.inner.find_all_years(contract_id).await
    }
}

struct Setup {
    repo: Arc<InMemoryProgressRepository>,
    gated: Arc<GatedRepository>,
    bus: Arc<InMemoryEventBus>,
    contract: Contract,
}

async fn setup() -> Setup {
    let repo = Arc::new(InMemoryProgressRepository::new());
    let bus = Arc::new(InMemoryEventBus::new());
    let contract = CreateContractHandler::new(repo.clone(), bus.clone())
        .handle(
            CreateContractCommand {
                name: "Building maintenance".to_string(),
                period: Period::MONTHLY,
                signatures: vec![SignatureInput {
                    name: "Ana".to_string(),
                    role: "Supervisor".to_string(),
                }],
                year: 2025,
            },
            metadata(),
        )
        .await
        .unwrap()
        .contract;
    let gated = Arc::new(GatedRepository::new((*repo).clone()));
    Setup {
        repo,
        gated,
        bus,
        contract,
    }
}

fn metadata() -> CommandMetadata {
    CommandMetadata::new(UserId::new("admin@example.com").unwrap())
        .with_correlation_id("concurrency-test")
}

async fn change_to_annual(
    repository: Arc<dyn ProgressRepository>,
    bus: Arc<InMemoryEventBus>,
    contract_id: ContractId,
) -> Result<Contract, MigrationError> {
    let plan = PreviewPeriodChangeHandler::new(repository.clone())
        .handle(PreviewPeriodChangeQuery {
            contract_id,
            year: 2025,
            new_period: Period::ANNUAL,
        })
        .await?;
    ChangePeriodHandler::new(repository, bus, MigrationDefaults::default())
        .handle(
            ChangePeriodCommand {
                contract_id,
                year: 2025,
                new_period: Period::ANNUAL,
                plan,
                strategy: MigrationStrategy::new(),
            },
            metadata(),
        )
        .await
        .map(|result| result.contract)
}

fn december() -> Bucket {
    Bucket::month(12).unwrap()
}

// =============================================================================
// Interleavings
// =============================================================================

#[tokio::test]
async fn signature_added_during_period_change_survives() {
    let s = setup().await;
    let contract_id = s.contract.id();

    let change = tokio::spawn(change_to_annual(s.gated.clone(), s.bus.clone(), contract_id));
    s.gated.entered.notified().await;

    AddSignatureHandler::new(s.repo.clone(), s.bus.clone())
        .handle(
            AddSignatureCommand {
                contract_id,
                name: "Bo".to_string(),
                role: "Contractor".to_string(),
            },
            metadata(),
        )
        .await
        .unwrap();

    s.gated.release.notify_one();
    let result = change.await.unwrap();
    assert!(matches!(result, Err(MigrationError::Conflict(_))));
    assert_eq!(result.unwrap_err().code(), ErrorCode::ConcurrencyConflict);

    let stored = s.repo.find_contract(&contract_id).await.unwrap().unwrap();
    assert_eq!(stored.period(), Period::MONTHLY);
    assert_eq!(stored.total_signatures(), 2);
    let records = s.repo.find_year(&contract_id, 2025).await.unwrap().unwrap();
    assert_eq!(records.len(), 12);
    assert!(records.iter().all(|r| r.signature_statuses().len() == 2));
    assert!(!s.bus.has_event("period.migrated.v1").await);

    // a fresh preview and change now carries the new signature along
    let migrated = change_to_annual(s.repo.clone(), s.bus.clone(), contract_id)
        .await
        .unwrap();
    assert_eq!(migrated.total_signatures(), 2);
    let records = s.repo.find_year(&contract_id, 2025).await.unwrap().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].signature_statuses().len(), 2);
}

#[tokio::test]
async fn year_opened_against_old_period_is_rejected() {
    let s = setup().await;
    let contract_id = s.contract.id();
    let update = Arc::new(UpdateProgressHandler::new(s.gated.clone(), s.bus.clone()));

    let opening = {
        let update = update.clone();
        tokio::spawn(async move {
            update
                .handle(
                    UpdateProgressCommand {
                        contract_id,
                        year: 2026,
                        bucket: december(),
                        change: ProgressChange::Notes(Some("carry over".to_string())),
                    },
                    metadata(),
                )
                .await
        })
    };
    s.gated.entered.notified().await;

    change_to_annual(s.repo.clone(), s.bus.clone(), contract_id)
        .await
        .unwrap();

    s.gated.release.notify_one();
    let result = opening.await.unwrap();
    assert!(matches!(result, Err(ContractError::Conflict(_))));

    let stored = s.repo.find_contract(&contract_id).await.unwrap().unwrap();
    assert_eq!(stored.period(), Period::ANNUAL);
    assert!(s.repo.find_year(&contract_id, 2026).await.unwrap().is_none());
    let records = s.repo.find_year(&contract_id, 2025).await.unwrap().unwrap();
    assert!(stored.verify_year(&records).is_ok());
    assert!(!s.bus.has_event("progress.updated.v1").await);
}

#[tokio::test]
async fn bucket_edit_against_old_period_is_rejected() {
    let s = setup().await;
    let contract_id = s.contract.id();
    let update = Arc::new(UpdateProgressHandler::new(s.gated.clone(), s.bus.clone()));

    let edit = {
        let update = update.clone();
        tokio::spawn(async move {
            update
                .handle(
                    UpdateProgressCommand {
                        contract_id,
                        year: 2025,
                        bucket: december(),
                        change: ProgressChange::Notes(Some("december audit".to_string())),
                    },
                    metadata(),
                )
                .await
        })
    };
    s.gated.entered.notified().await;

    change_to_annual(s.repo.clone(), s.bus.clone(), contract_id)
        .await
        .unwrap();

    s.gated.release.notify_one();
    let result = edit.await.unwrap();
    assert!(matches!(result, Err(ContractError::Conflict(_))));

    let records = s.repo.find_year(&contract_id, 2025).await.unwrap().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].notes(), None);
    assert!(!s.bus.has_event("progress.updated.v1").await);
}

#[tokio::test]
async fn sequential_writes_each_see_the_latest_version() {
    let s = setup().await;
    let contract_id = s.contract.id();
    let update = UpdateProgressHandler::new(s.repo.clone(), s.bus.clone());

    for note in ["first", "second"] {
        update
            .handle(
                UpdateProgressCommand {
                    contract_id,
                    year: 2025,
                    bucket: december(),
                    change: ProgressChange::Notes(Some(note.to_string())),
                },
                metadata(),
            )
            .await
            .unwrap();
    }

    let stored = s.repo.find_contract(&contract_id).await.unwrap().unwrap();
    assert_eq!(stored.version().as_u32(), s.contract.version().as_u32() + 2);
    let records = s.repo.find_year(&contract_id, 2025).await.unwrap().unwrap();
    assert_eq!(records[11].notes(), Some("second"));
}
