//! UpdateProgressHandler - Records signature, upload and notes edits for a bucket.
//!
//! A year that was never stored is opened with default records on first edit.
//! Every write names the contract version it read, so an edit computed
//! against a period or signature list that has since changed is rejected
//! with a conflict rather than stored.

use std::sync::Arc;

use tracing::{debug, info};

use crate::application::handlers::publish_committed;
use crate::domain::foundation::{CommandMetadata, ContractId, EventId, SignatureId, Timestamp};
use crate::domain::progress::{ContractError, ProgressRecord, ProgressUpdated};
use crate::domain::schedule::Bucket;
use crate::ports::{EventPublisher, ProgressRepository, YearRecords};

/// One edit to a progress record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressChange {
    /// Mark a signature as signed or unsigned.
    Signature {
        signature_id: SignatureId,
        completed: bool,
    },
    /// Set the upload state and its link.
    Upload {
        completed: bool,
        link: Option<String>,
    },
    /// Replace the free-text notes.
    Notes(Option<String>),
}

/// Command to edit one bucket of one year.
#[derive(Debug, Clone)]
pub struct UpdateProgressCommand {
    pub contract_id: ContractId,
    pub year: i32,
    pub bucket: Bucket,
    pub change: ProgressChange,
}

/// Result of a successful edit.
#[derive(Debug, Clone)]
pub struct UpdateProgressResult {
    pub record: ProgressRecord,
    pub event: ProgressUpdated,
}

/// Handler for progress edits.
pub struct UpdateProgressHandler {
    repository: Arc<dyn ProgressRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl UpdateProgressHandler {
    pub fn new(
        repository: Arc<dyn ProgressRepository>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            repository,
            event_publisher,
        }
    }

    pub async fn handle(
        &self,
        cmd: UpdateProgressCommand,
        metadata: CommandMetadata,
    ) -> Result<UpdateProgressResult, ContractError> {
        let mut contract = self
            .repository
            .find_contract(&cmd.contract_id)
            .await?
            .ok_or(ContractError::NotFound(cmd.contract_id))?;

        let read_version = contract.version();
        let stored = self.repository.find_year(&cmd.contract_id, cmd.year).await?;
        let year_is_new = stored.is_none();
        let mut records = stored.unwrap_or_else(|| contract.open_year());

        let record = records
            .iter_mut()
            .find(|r| r.bucket() == cmd.bucket)
            .ok_or_else(|| {
                ContractError::bucket_not_found(format!(
                    "Bucket {} is not part of the {} schedule",
                    cmd.bucket,
                    contract.period()
                ))
            })?;

        let now = Timestamp::now();
        match cmd.change {
            ProgressChange::Signature {
                signature_id,
                completed,
            } => record.set_signature(signature_id, completed, now)?,
            ProgressChange::Upload { completed, link } => record.set_upload(completed, link),
            ProgressChange::Notes(notes) => record.set_notes(notes),
        }
        let record = record.clone();

        if year_is_new {
            debug!(contract_id = %contract.id(), year = cmd.year, "Opening year on first edit");
            let years: YearRecords = [(cmd.year, records)].into_iter().collect();
            contract.touch();
            self.repository
                .save_contract_years(&contract, &years, Some(read_version))
                .await?;
        } else {
            self.repository
                .save_record(&cmd.contract_id, cmd.year, &record, read_version)
                .await?;
        }

        let event = ProgressUpdated {
            event_id: EventId::new(),
            contract_id: contract.id(),
            year: cmd.year,
            bucket: record.bucket(),
            percentage: record.percentage(),
            updated_at: now,
        };
        publish_committed(self.event_publisher.as_ref(), &event, &metadata).await;

        info!(
            contract_id = %contract.id(),
            year = cmd.year,
            bucket = %record.bucket(),
            percentage = record.percentage().value(),
            "Progress updated"
        );

        Ok(UpdateProgressResult { record, event })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{InMemoryEventBus, InMemoryProgressRepository};
    use crate::domain::foundation::Percentage;
    use crate::domain::progress::{Contract, PercentageSource, Signature};
    use crate::domain::schedule::Period;

    struct Fixture {
        repo: Arc<InMemoryProgressRepository>,
        bus: Arc<InMemoryEventBus>,
        contract: Contract,
        handler: UpdateProgressHandler,
    }

    async fn fixture() -> Fixture {
        let repo = Arc::new(InMemoryProgressRepository::new());
        let bus = Arc::new(InMemoryEventBus::new());
        let contract = Contract::new(
            "Cleaning services",
            Period::QUARTERLY,
            vec![
                Signature::new("Ana", "Supervisor").unwrap(),
                Signature::new("Ben", "Contractor").unwrap(),
                Signature::new("Carla", "Auditor").unwrap(),
            ],
        )
        .unwrap();
        let years: YearRecords = [(2025, contract.open_year())].into_iter().collect();
        repo.save_contract_years(&contract, &years, None).await.unwrap();
        let handler = UpdateProgressHandler::new(repo.clone(), bus.clone());
        Fixture {
            repo,
            bus,
            contract,
            handler,
        }
    }

    fn command(f: &Fixture, year: i32, bucket: u8, change: ProgressChange) -> UpdateProgressCommand {
        UpdateProgressCommand {
            contract_id: f.contract.id(),
            year,
            bucket: Bucket::month(bucket).unwrap(),
            change,
        }
    }

    #[tokio::test]
    async fn signature_completion_derives_percentage() {
        let f = fixture().await;
        let change = ProgressChange::Signature {
            signature_id: f.contract.signatures()[0].id,
            completed: true,
        };

        let result = f
            .handler
            .handle(command(&f, 2025, 6, change), CommandMetadata::test_fixture())
            .await
            .unwrap();

        assert_eq!(result.record.percentage(), Percentage::new(25));
        assert!(result.record.signature_statuses()[0].completed_at.is_some());
        let stored = f.repo.find_year(&f.contract.id(), 2025).await.unwrap().unwrap();
        assert_eq!(stored[1], result.record);
        assert!(f.bus.has_event("progress.updated.v1").await);
    }

    #[tokio::test]
    async fn upload_edit_clears_migration_override() {
        let f = fixture().await;
        let mut records = f.contract.open_year();
        records[0] = ProgressRecord::migrated(
            records[0].bucket(),
            f.contract.signatures(),
            Percentage::new(90),
            None,
        );
        let years: YearRecords = [(2025, records)].into_iter().collect();
        let mut contract = f.contract.clone();
        contract.touch();
        f.repo
            .save_contract_years(&contract, &years, Some(f.contract.version()))
            .await
            .unwrap();

        let change = ProgressChange::Upload {
            completed: true,
            link: Some("https://files/q1.pdf".to_string()),
        };
        let result = f
            .handler
            .handle(command(&f, 2025, 3, change), CommandMetadata::test_fixture())
            .await
            .unwrap();

        assert_eq!(result.record.percentage(), Percentage::new(25));
        assert_eq!(result.record.percentage_source(), PercentageSource::Derived);
        assert_eq!(result.record.upload_link(), Some("https://files/q1.pdf"));
    }

    #[tokio::test]
    async fn notes_edit_keeps_percentage() {
        let f = fixture().await;
        let change = ProgressChange::Notes(Some("invoice pending".to_string()));
        let result = f
            .handler
            .handle(command(&f, 2025, 9, change), CommandMetadata::test_fixture())
            .await
            .unwrap();

        assert_eq!(result.record.notes(), Some("invoice pending"));
        assert_eq!(result.record.percentage(), Percentage::ZERO);
    }

    #[tokio::test]
    async fn first_edit_opens_unstored_year() {
        let f = fixture().await;
        let change = ProgressChange::Notes(Some("carry over".to_string()));
        f.handler
            .handle(command(&f, 2026, 12, change), CommandMetadata::test_fixture())
            .await
            .unwrap();

        let stored = f.repo.find_year(&f.contract.id(), 2026).await.unwrap().unwrap();
        assert_eq!(stored.len(), 4);
        assert_eq!(stored[3].notes(), Some("carry over"));
    }

    #[tokio::test]
    async fn bucket_outside_schedule_is_rejected() {
        let f = fixture().await;
        let change = ProgressChange::Notes(None);
        let result = f
            .handler
            .handle(command(&f, 2025, 4, change), CommandMetadata::test_fixture())
            .await;

        assert!(matches!(result, Err(ContractError::BucketNotFound(_))));
        assert_eq!(f.bus.event_count().await, 0);
    }

    #[tokio::test]
    async fn unknown_signature_is_rejected() {
        let f = fixture().await;
        let change = ProgressChange::Signature {
            signature_id: SignatureId::new(),
            completed: true,
        };
        let result = f
            .handler
            .handle(command(&f, 2025, 3, change), CommandMetadata::test_fixture())
            .await;

        assert!(matches!(result, Err(ContractError::SignatureNotFound(_))));
    }
}
