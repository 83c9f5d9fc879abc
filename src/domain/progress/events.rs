//! Contract and progress domain events.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{domain_event, ContractId, EventId, Percentage, SignatureId, Timestamp};
use crate::domain::schedule::{Bucket, Period};

/// Published when a contract is created together with its first year.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractCreated {
    pub event_id: EventId,
    pub contract_id: ContractId,
    pub name: String,
    pub period: Period,
    pub year: i32,
    pub created_at: Timestamp,
}

domain_event!(
    ContractCreated,
    event_type = "contract.created.v1",
    aggregate_id = contract_id,
    aggregate_type = "Contract",
    occurred_at = created_at,
    event_id = event_id
);

/// Published when a signature slot is appended to a contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignatureAdded {
    pub event_id: EventId,
    pub contract_id: ContractId,
    pub signature_id: SignatureId,
    pub records_extended: usize,
    pub added_at: Timestamp,
}

domain_event!(
    SignatureAdded,
    event_type = "signature.added.v1",
    aggregate_id = contract_id,
    aggregate_type = "Contract",
    occurred_at = added_at,
    event_id = event_id
);

/// Published after a signature or upload edit changes a bucket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressUpdated {
    pub event_id: EventId,
    pub contract_id: ContractId,
    pub year: i32,
    pub bucket: Bucket,
    pub percentage: Percentage,
    pub updated_at: Timestamp,
}

domain_event!(
    ProgressUpdated,
    event_type = "progress.updated.v1",
    aggregate_id = contract_id,
    aggregate_type = "Contract",
    occurred_at = updated_at,
    event_id = event_id
);
