//! CreateContractHandler - Command handler for creating contracts.

use std::sync::Arc;

use tracing::info;

use crate::application::handlers::publish_committed;
use crate::domain::foundation::{CommandMetadata, EventId};
use crate::domain::progress::{Contract, ContractCreated, ContractError, ProgressRecord, Signature};
use crate::domain::schedule::Period;
use crate::ports::{EventPublisher, ProgressRepository, YearRecords};

/// A signature slot to create.
#[derive(Debug, Clone)]
pub struct SignatureInput {
    pub name: String,
    pub role: String,
}

/// Command to create a contract and open its first year.
#[derive(Debug, Clone)]
pub struct CreateContractCommand {
    pub name: String,
    pub period: Period,
    pub signatures: Vec<SignatureInput>,
    pub year: i32,
}

/// Result of successful contract creation.
#[derive(Debug, Clone)]
pub struct CreateContractResult {
    pub contract: Contract,
    pub records: Vec<ProgressRecord>,
    pub event: ContractCreated,
}

/// Handler for creating contracts.
pub struct CreateContractHandler {
    repository: Arc<dyn ProgressRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl CreateContractHandler {
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
        cmd: CreateContractCommand,
        metadata: CommandMetadata,
    ) -> Result<CreateContractResult, ContractError> {
        let signatures = cmd
            .signatures
            .into_iter()
            .map(|s| Signature::new(s.name, s.role))
            .collect::<Result<Vec<_>, _>>()?;
        let contract = Contract::new(cmd.name, cmd.period, signatures)?;
        let records = contract.open_year();

        let years: YearRecords = [(cmd.year, records.clone())].into_iter().collect();
        self.repository.save_contract_years(&contract, &years, None).await?;

        let event = ContractCreated {
            event_id: EventId::new(),
            contract_id: contract.id(),
            name: contract.name().to_string(),
            period: contract.period(),
            year: cmd.year,
            created_at: contract.created_at(),
        };
        publish_committed(self.event_publisher.as_ref(), &event, &metadata).await;

        info!(
            contract_id = %contract.id(),
            period = %contract.period(),
            year = cmd.year,
            "Contract created"
        );

        Ok(CreateContractResult {
            contract,
            records,
            event,
        })
    }
}
