//! AddSignatureHandler - Appends a signature slot to a contract.
//!
//! Every stored record of every year gains an incomplete status for the new
//! signature, so per-bucket signature lists keep mirroring the contract. The
//! commit fails with a conflict if the contract changed after it was read.

use std::sync::Arc;

use tracing::info;

use crate::application::handlers::publish_committed;
use crate::domain::foundation::{CommandMetadata, ContractId, EventId, Timestamp};
use crate::domain::progress::{Contract, ContractError, Signature, SignatureAdded};
use crate::ports::{EventPublisher, ProgressRepository};

/// Command to add a signature to a contract.
#[derive(Debug, Clone)]
pub struct AddSignatureCommand {
    pub contract_id: ContractId,
    pub name: String,
    pub role: String,
}

/// Result of a successful signature addition.
#[derive(Debug, Clone)]
pub struct AddSignatureResult {
    pub contract: Contract,
    pub signature: Signature,
    pub event: SignatureAdded,
}

/// Handler for adding signatures.
pub struct AddSignatureHandler {
    repository: Arc<dyn ProgressRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl AddSignatureHandler {
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
        cmd: AddSignatureCommand,
        metadata: CommandMetadata,
    ) -> Result<AddSignatureResult, ContractError> {
        let mut contract = self
            .repository
            .find_contract(&cmd.contract_id)
            .await?
            .ok_or(ContractError::NotFound(cmd.contract_id))?;

        let read_version = contract.version();
        let signature = Signature::new(cmd.name, cmd.role)?;
        contract.add_signature(signature.clone())?;

        let mut years = self.repository.find_all_years(&cmd.contract_id).await?;
        let mut records_extended = 0;
        for record in years.values_mut().flatten() {
            record.extend_signature(signature.id);
            records_extended += 1;
        }

        self.repository
            .save_contract_years(&contract, &years, Some(read_version))
            .await?;

        let event = SignatureAdded {
            event_id: EventId::new(),
            contract_id: contract.id(),
            signature_id: signature.id,
            records_extended,
            added_at: Timestamp::now(),
        };
        publish_committed(self.event_publisher.as_ref(), &event, &metadata).await;

        info!(
            contract_id = %contract.id(),
            signature_id = %signature.id,
            records_extended,
            "Signature added"
        );

        Ok(AddSignatureResult {
            contract,
            signature,
            event,
        })
    }
}
